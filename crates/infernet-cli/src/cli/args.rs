//! Command-line argument definitions using clap.

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use infernet_node::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Register and activate an Infernet compute node
///
/// Run `register` once, then `activate` once the coordinator's cooldown has
/// passed. Configuration comes from the config file and environment.
#[derive(Parser, Debug)]
#[command(name = "infernet-node")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Node config file (JSON, or TOML by extension)
    #[arg(
        short,
        long,
        env = "INFERNET_CONFIG_PATH",
        default_value = DEFAULT_CONFIG_PATH,
        global = true
    )]
    pub config: PathBuf,

    /// Coordinator base URL, overrides coordinator.url
    #[arg(long, env = "INFERNET_COORDINATOR_URL", global = true)]
    pub coordinator_url: Option<String>,

    /// Coordinator bearer token, overrides coordinator.api_key
    #[arg(long, env = "INFERNET_COORDINATOR_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Node address, overrides node.address
    #[arg(long, env = "INFERNET_NODE_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Skip the latest-release check
    #[arg(
        long,
        env = "INFERNET_SKIP_VERSION_CHECK",
        global = true,
        value_parser = BoolishValueParser::new()
    )]
    pub skip_version_check: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register this node with the coordinator
    #[command(alias = "register-node")]
    Register,

    /// Activate a registered node
    #[command(alias = "activate-node")]
    Activate,

    /// Deactivate the node and forget its registration
    Deactivate,

    /// Show coordinator and local registration state
    Status,

    /// Show node version and container images
    Version(VersionArgs),

    /// Inspect the node configuration
    Config(ConfigArgs),
}

// ============================================================================
// Version command
// ============================================================================

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Compare against the latest published release
    #[arg(long)]
    pub check: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show config and registration state file paths
    Path,

    /// Validate the effective configuration
    Validate,
}
