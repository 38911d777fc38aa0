//! Registration and activation lifecycle for Infernet compute nodes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use infernet_node::{NodeConfig, NodeLifecycle, RegisterOutcome};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> infernet_node::Result<()> {
//!     let config = NodeConfig::load(Path::new("config.json"))?;
//!     config.validate()?;
//!
//!     let client = config.coordinator.client()?;
//!     let node = NodeLifecycle::from_config(client, &config)?;
//!
//!     if let RegisterOutcome::Registered(receipt) = node.register().await? {
//!         println!("Registered: {}", receipt.registration_id);
//!     }
//!     node.activate().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/infernet-node/1.2.0")]

pub mod config;
pub mod lifecycle;
pub mod state;
pub mod version;

pub use config::{
    ConfigOverrides, ContainerConfig, CoordinatorConfig, IdentityConfig, LogConfig, LogFormat,
    LogRotation, NodeConfig, VersionCheckConfig,
};
pub use lifecycle::{
    ActivateOutcome, Coordinator, DeactivateOutcome, NodeLifecycle, NodeStatusReport,
    RegisterOutcome,
};
pub use state::RegistrationStore;
pub use version::{VersionStatus, NODE_VERSION};

// Re-export core types
pub use infernet_core::*;

// Re-export client
pub use infernet_client::{CoordinatorClient, CoordinatorClientBuilder, RetryConfig};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
