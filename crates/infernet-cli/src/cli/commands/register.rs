//! `infernet-node register` - Register the node with the coordinator.

use anyhow::Result;
use chrono::TimeDelta;
use colored::Colorize;
use infernet_node::RegisterOutcome;

use super::{format_secs, Context};

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    ctx.check_version(&client).await;

    let node = ctx.lifecycle(client)?;
    let outcome = node.register().await?;

    if ctx.output_format.print_structured(&outcome)? {
        return Ok(());
    }

    match outcome {
        RegisterOutcome::Registered(receipt) => {
            println!(
                "{} Node {} registered.",
                "Success:".green().bold(),
                receipt.address.to_string().cyan()
            );
            println!("  {} {}", "Registration:".bold(), receipt.registration_id);
            println!("  {} {}", "Registered at:".bold(), receipt.registered_at);
            if receipt.cooldown_secs > 0 {
                let ready = i64::try_from(receipt.cooldown_secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .and_then(|delta| receipt.registered_at.checked_add_signed(delta))
                    .map_or_else(|| "-".to_string(), |at| at.to_string());
                println!(
                    "  {} {} (activate after {})",
                    "Cooldown:".bold(),
                    format_secs(receipt.cooldown_secs),
                    ready
                );
            }
            println!();
            println!("Run {} once the cooldown has passed.", "infernet-node activate".cyan());
        }
        RegisterOutcome::AlreadyRegistered(info) => {
            println!(
                "{} Node {} is already registered.",
                "Note:".yellow().bold(),
                info.address.to_string().cyan()
            );
            if let Some(at) = info.activatable_at() {
                println!("  {} {}", "Activatable at:".bold(), at);
            }
        }
        RegisterOutcome::AlreadyActive(info) => {
            println!(
                "{} Node {} is already active.",
                "Note:".yellow().bold(),
                info.address.to_string().cyan()
            );
        }
    }

    Ok(())
}
