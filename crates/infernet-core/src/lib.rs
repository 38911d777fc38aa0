//! Core types and errors for the Infernet node lifecycle tooling.
//!
//! This crate provides the foundational types shared by the client, the
//! lifecycle facade and the CLI:
//!
//! - **Types**: node identity, coordinator-side status and records, image references
//! - **Errors**: a single error taxonomy with [`NodeError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use infernet_core::{NodeAddress, NodeStatus, Result};
//!
//! fn check(address: &str) -> Result<NodeAddress> {
//!     let address: NodeAddress = address.parse()?;
//!     assert!(NodeStatus::Inactive.can_transition_to(NodeStatus::Registered));
//!     Ok(address)
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/infernet-core/1.2.0")]

mod error;
pub mod types;

pub use error::{NodeError, Result};
pub use types::*;
