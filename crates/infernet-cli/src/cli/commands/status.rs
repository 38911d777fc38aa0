//! `infernet-node status` - Coordinator and local registration state.

use anyhow::Result;
use colored::Colorize;
use infernet_node::NodeStatus;

use super::{format_secs, Context};

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let node = ctx.lifecycle(client)?;
    let report = node.status().await?;

    if ctx.output_format.print_structured(&report)? {
        return Ok(());
    }

    let status = report.info.status.to_string();
    let status = match report.info.status {
        NodeStatus::Active => status.green(),
        NodeStatus::Registered => status.yellow(),
        NodeStatus::Inactive => status.red(),
    };

    println!("{}", "Node Status".bold().underline());
    println!();
    println!("  {} {}", "Address:".bold(), report.info.address);
    println!("  {} {}", "Status:".bold(), status);
    if let Some(id) = &report.info.registration_id {
        println!("  {} {}", "Registration:".bold(), id);
    }
    if report.info.status == NodeStatus::Registered {
        if report.cooldown_remaining_secs > 0 {
            println!(
                "  {} {} remaining",
                "Cooldown:".bold(),
                format_secs(report.cooldown_remaining_secs)
            );
        } else {
            println!("  {} {}", "Cooldown:".bold(), "elapsed, ready to activate".green());
        }
    }

    println!();
    match &report.record {
        Some(record) => {
            println!("  {} {}", "Local record:".bold(), node.store().path().display());
            println!("    {} {}", "Coordinator:".bold(), record.coordinator_url);
            println!("    {} {}", "Registered at:".bold(), record.registered_at);
            if let Some(at) = record.activated_at {
                println!("    {} {}", "Activated at:".bold(), at);
            }
        }
        None => {
            println!("  {} {}", "Local record:".bold(), "(none)".dimmed());
        }
    }

    Ok(())
}
