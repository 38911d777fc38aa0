//! `infernet-node deactivate` - Deactivate the node.

use anyhow::Result;
use colored::Colorize;
use infernet_node::DeactivateOutcome;

use super::Context;

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let node = ctx.lifecycle(client)?;
    let outcome = node.deactivate().await?;

    if ctx.output_format.print_structured(&outcome)? {
        return Ok(());
    }

    match outcome {
        DeactivateOutcome::Deactivated(info) => {
            println!(
                "{} Node {} deactivated.",
                "Success:".green().bold(),
                info.address.to_string().cyan()
            );
        }
        DeactivateOutcome::AlreadyInactive => {
            println!(
                "{} Node {} is not registered.",
                "Note:".yellow().bold(),
                node.address().to_string().cyan()
            );
        }
    }
    if ctx.verbose {
        println!("  {} {}", "Cleared:".bold(), node.store().path().display());
    }

    Ok(())
}
