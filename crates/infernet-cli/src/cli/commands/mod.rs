//! Command implementations.

pub mod activate;
pub mod config;
pub mod deactivate;
pub mod register;
pub mod status;
pub mod version;

use anyhow::Context as _;
use infernet_node::{CoordinatorClient, NodeConfig, NodeLifecycle};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective node configuration
    pub config: NodeConfig,

    /// Path the configuration was loaded from
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Disable colors
    pub no_color: bool,

    /// Skip the latest-release check
    pub skip_version_check: bool,
}

impl Context {
    /// Validate the configuration and create a coordinator client.
    pub fn client(&self) -> anyhow::Result<CoordinatorClient> {
        self.config
            .validate()
            .with_context(|| format!("Invalid configuration ({})", self.config_path.display()))?;

        Ok(self.config.coordinator.client()?)
    }

    /// Create the node lifecycle on top of `client`.
    pub fn lifecycle(
        &self,
        client: CoordinatorClient,
    ) -> anyhow::Result<NodeLifecycle<CoordinatorClient>> {
        Ok(NodeLifecycle::from_config(client, &self.config)?)
    }

    /// Warn if a newer node release is published.
    pub async fn check_version(&self, client: &CoordinatorClient) {
        if self.skip_version_check || !self.config.version_check.enabled {
            return;
        }
        infernet_node::version::warn_if_outdated(client, &self.config.version_check.url).await;
    }
}

/// Render a duration in seconds as `1h 2m 3s`.
pub(crate) fn format_secs(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{s}s"),
        (0, _) => format!("{m}m {s}s"),
        _ => format!("{h}h {m}m {s}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(0), "0s");
        assert_eq!(format_secs(59), "59s");
        assert_eq!(format_secs(61), "1m 1s");
        assert_eq!(format_secs(3_725), "1h 2m 5s");
    }
}
