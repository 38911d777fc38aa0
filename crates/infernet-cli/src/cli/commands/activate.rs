//! `infernet-node activate` - Activate a registered node.

use anyhow::Result;
use colored::Colorize;
use infernet_node::{ActivateOutcome, NodeError};

use super::{format_secs, Context};

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    ctx.check_version(&client).await;

    let node = ctx.lifecycle(client)?;
    let outcome = match node.activate().await {
        Ok(outcome) => outcome,
        Err(NodeError::NotRegistered { address }) => anyhow::bail!(
            "Node {address} is not registered.\n\n\
             Run `infernet-node register` first, then activate after the cooldown."
        ),
        Err(NodeError::CooldownPending { remaining_secs }) => anyhow::bail!(
            "Cooldown still pending: activation possible in {}",
            format_secs(remaining_secs)
        ),
        Err(e) => return Err(e.into()),
    };

    if ctx.output_format.print_structured(&outcome)? {
        return Ok(());
    }

    match outcome {
        ActivateOutcome::Activated(receipt) => {
            println!(
                "{} Node {} activated.",
                "Success:".green().bold(),
                receipt.address.to_string().cyan()
            );
            println!("  {} {}", "Activated at:".bold(), receipt.activated_at);
        }
        ActivateOutcome::AlreadyActive(info) => {
            println!(
                "{} Node {} is already active.",
                "Note:".yellow().bold(),
                info.address.to_string().cyan()
            );
        }
    }

    Ok(())
}
