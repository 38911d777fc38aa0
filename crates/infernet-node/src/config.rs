//! Node configuration.
//!
//! Loaded from `config.json` (or a `.toml` file), then overridden from the
//! command line / environment, then validated before any network call.

use directories::ProjectDirs;
use infernet_client::{CoordinatorClient, RetryConfig};
use infernet_core::{NodeAddress, NodeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "INFERNET_CONFIG_PATH";

/// Config file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// State file name used when `node.state_path` is not set
pub const DEFAULT_STATE_FILE: &str = "node-registration.json";

/// Release manifest consulted by the version check: this workspace's root
/// `Cargo.toml`, whose `[workspace.package]` version is the release version
pub const DEFAULT_RELEASE_URL: &str =
    "https://raw.githubusercontent.com/ritual-net/infernet-node-rs/main/Cargo.toml";

/// Top-level node configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Coordinator connection settings
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Node identity and local state
    #[serde(default)]
    pub node: IdentityConfig,

    /// Containers served by this node
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,

    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,

    /// Release version check
    #[serde(default)]
    pub version_check: VersionCheckConfig,
}

/// `coordinator` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Base URL of the coordinator API
    #[serde(default)]
    pub url: String,

    /// Bearer token for the coordinator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for connection failures, timeouts and rate limiting
    #[serde(default)]
    pub max_retries: u32,
}

/// `node` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Node address registered with the coordinator
    #[serde(default)]
    pub address: String,

    /// Address receiving payments for the node's work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_address: Option<String>,

    /// Where the registration record is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

/// Entry of the `containers` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Container id announced to the coordinator
    pub id: String,

    /// Container image
    pub image: String,

    /// Whether the container needs a GPU
    #[serde(default)]
    pub gpu: bool,

    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Single file, never rotated
    Never,
    /// New file every hour
    Hourly,
    /// New file every day
    #[default]
    Daily,
}

/// `log` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Also write JSON logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Console filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output format
    #[serde(default)]
    pub format: LogFormat,

    /// Log file filter
    #[serde(default = "default_file_log_level")]
    pub file_level: String,

    /// Log file rotation
    #[serde(default)]
    pub rotation: LogRotation,

    /// Log files kept, including the current one
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

/// `version_check` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionCheckConfig {
    /// Warn at start-up when a newer release exists
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Release manifest to read the latest version from
    #[serde(default = "default_release_url")]
    pub url: String,
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `coordinator.url`
    pub coordinator_url: Option<String>,
    /// Replaces `coordinator.api_key`
    pub api_key: Option<String>,
    /// Replaces `node.address`
    pub address: Option<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: default_log_level(),
            format: LogFormat::default(),
            file_level: default_file_log_level(),
            rotation: LogRotation::default(),
            max_files: default_max_log_files(),
        }
    }
}

impl Default for VersionCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_release_url(),
        }
    }
}

impl NodeConfig {
    /// Load config from a JSON or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(NodeError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(NodeError::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&content)
                .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))
        }
    }

    /// Load config, falling back to defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply command-line / environment overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.coordinator_url {
            self.coordinator.url = url;
        }
        if let Some(key) = overrides.api_key {
            self.coordinator.api_key = Some(key);
        }
        if let Some(address) = overrides.address {
            self.node.address = address;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.coordinator.validate()?;
        self.node_address()?;
        self.payment_address()?;

        if self.log.max_files == 0 {
            return Err(NodeError::Config(
                "log.max_files must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for container in &self.containers {
            if container.id.trim().is_empty() {
                return Err(NodeError::Config("container id must not be empty".into()));
            }
            if container.image.trim().is_empty() {
                return Err(NodeError::Config(format!(
                    "container {}: image must not be empty",
                    container.id
                )));
            }
            if !seen.insert(container.id.as_str()) {
                return Err(NodeError::Config(format!(
                    "duplicate container id: {}",
                    container.id
                )));
            }
        }

        Ok(())
    }

    /// Parsed node address
    pub fn node_address(&self) -> Result<NodeAddress> {
        if self.node.address.trim().is_empty() {
            return Err(NodeError::Config(
                "node.address must be set (or INFERNET_NODE_ADDRESS)".into(),
            ));
        }
        let address: NodeAddress = self.node.address.parse()?;
        if address.is_zero() {
            return Err(NodeError::InvalidAddress(
                "node.address must not be the zero address".into(),
            ));
        }
        Ok(address)
    }

    /// Parsed payment address, if configured
    pub fn payment_address(&self) -> Result<Option<NodeAddress>> {
        self.node
            .payment_address
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    /// Ids of the configured containers
    #[must_use]
    pub fn container_ids(&self) -> Vec<String> {
        self.containers.iter().map(|c| c.id.clone()).collect()
    }

    /// Resolve where the registration record lives.
    ///
    /// `~` and environment variables are expanded. Without an explicit path the
    /// record goes to the platform data directory.
    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.node.state_path {
            Some(path) => expand_path(path),
            None => Ok(ProjectDirs::from("net", "ritual", "infernet-node").map_or_else(
                || PathBuf::from(DEFAULT_STATE_FILE),
                |dirs| dirs.data_dir().join(DEFAULT_STATE_FILE),
            )),
        }
    }

    /// Resolve the log file path, if any
    pub fn log_path(&self) -> Result<Option<PathBuf>> {
        self.log.path.as_deref().map(expand_path).transpose()
    }
}

impl CoordinatorConfig {
    /// Validate the coordinator section
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(NodeError::Config(
                "coordinator.url must be set (or INFERNET_COORDINATOR_URL)".into(),
            ));
        }

        let url = Url::parse(&self.url)
            .map_err(|e| NodeError::InvalidUrl(format!("{}: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NodeError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(NodeError::Config(
                "coordinator.timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Build a coordinator client from these settings
    pub fn client(&self) -> Result<CoordinatorClient> {
        let mut builder = CoordinatorClient::builder(&self.url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .retry(RetryConfig::new().max_retries(self.max_retries));

        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }

        builder.build()
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| NodeError::Config(format!("cannot expand {raw}: {e}")))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

// Default value functions for serde.
const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_file_log_level() -> String {
    String::from("debug")
}

const fn default_max_log_files() -> usize {
    3
}

fn default_release_url() -> String {
    String::from(DEFAULT_RELEASE_URL)
}
