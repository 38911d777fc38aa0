//! `infernet-node config` - Inspect the node configuration.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::redacted;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Path => show_path(&ctx),
        ConfigCommands::Validate => validate_config(&ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output_format.print_structured(&config)? {
        return Ok(());
    }

    let unset = || "(not set)".dimmed().to_string();

    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "coordinator.url:".bold(),
        non_empty(&config.coordinator.url).unwrap_or_else(unset)
    );
    println!(
        "  {} {}",
        "coordinator.api_key:".bold(),
        config.coordinator.api_key.clone().unwrap_or_else(unset)
    );
    println!("  {} {}s", "coordinator.timeout_secs:".bold(), config.coordinator.timeout_secs);
    println!("  {} {}", "coordinator.max_retries:".bold(), config.coordinator.max_retries);
    println!(
        "  {} {}",
        "node.address:".bold(),
        non_empty(&config.node.address).unwrap_or_else(unset)
    );
    println!(
        "  {} {}",
        "node.payment_address:".bold(),
        config.node.payment_address.clone().unwrap_or_else(unset)
    );
    println!("  {} {}", "log.level:".bold(), config.log.level);
    println!("  {} {}", "version_check.enabled:".bold(), config.version_check.enabled);

    if !config.containers.is_empty() {
        println!();
        println!("{}", "Containers:".bold());
        for container in &config.containers {
            let gpu = if container.gpu { " (gpu)" } else { "" };
            println!("  {} {}{}", container.id.cyan(), container.image, gpu);
        }
    }

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    println!("{} {}", "config:".bold(), ctx.config_path.display());
    println!("{} {}", "state:".bold(), ctx.config.state_path()?.display());
    if let Some(log) = ctx.config.log_path()? {
        println!("{} {}", "log:".bold(), log.display());
    }
    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.config.validate()?;
    println!("{} Configuration is valid.", "Success:".green().bold());
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
