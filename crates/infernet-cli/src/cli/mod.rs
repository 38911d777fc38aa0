//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::logging::init_logging;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Config file plus command-line / environment overrides
    let config = crate::config::load(&cli)?;

    let log_path = config.log_path()?;
    let _guard = init_logging(&config.log, log_path.as_deref(), cli.verbose, cli.no_color)?;

    let ctx = commands::Context {
        config,
        config_path: cli.config,
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
        verbose: cli.verbose,
        no_color: cli.no_color,
        skip_version_check: cli.skip_version_check,
    };

    match cli.command {
        Commands::Register => commands::register::execute(ctx).await,
        Commands::Activate => commands::activate::execute(ctx).await,
        Commands::Deactivate => commands::deactivate::execute(ctx).await,
        Commands::Status => commands::status::execute(ctx).await,
        Commands::Version(args) => commands::version::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}
