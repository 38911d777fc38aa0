//! Configuration loading for the command line.

use anyhow::{Context as _, Result};
use infernet_node::config::DEFAULT_CONFIG_PATH;
use infernet_node::{ConfigOverrides, NodeConfig};
use std::path::Path;

use crate::cli::args::Cli;

/// Load the config file named on the command line and apply overrides.
///
/// Only the default `config.json` may be missing; an explicitly named file
/// must exist. The result is not validated; commands validate what they need.
pub fn load(cli: &Cli) -> Result<NodeConfig> {
    let loaded = if cli.config == Path::new(DEFAULT_CONFIG_PATH) {
        NodeConfig::load_or_default(&cli.config)
    } else {
        NodeConfig::load(&cli.config)
    };
    let mut config =
        loaded.with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    config.apply_overrides(overrides(cli));

    Ok(config)
}

fn overrides(cli: &Cli) -> ConfigOverrides {
    ConfigOverrides {
        coordinator_url: cli.coordinator_url.clone(),
        api_key: cli.api_key.clone(),
        address: cli.address.clone(),
    }
}

/// Copy of `config` that is safe to print.
#[must_use]
pub fn redacted(config: &NodeConfig) -> NodeConfig {
    let mut shown = config.clone();
    if let Some(key) = shown.coordinator.api_key.as_mut() {
        *key = mask_key(key);
    }
    shown
}

fn mask_key(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcd1234efgh5678"), "abcd...5678");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_redacted_leaves_original() {
        let mut config = NodeConfig::default();
        config.coordinator.api_key = Some("secret-token-value".into());

        let shown = redacted(&config);
        assert_eq!(shown.coordinator.api_key.as_deref(), Some("secr...alue"));
        assert_eq!(config.coordinator.api_key.as_deref(), Some("secret-token-value"));
    }
}
