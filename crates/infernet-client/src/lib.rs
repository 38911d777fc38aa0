//! HTTP client for the Infernet node coordinator.
//!
//! This crate provides [`CoordinatorClient`] for registering, activating and
//! inspecting nodes, plus a small release lookup used by the version check.

#![doc(html_root_url = "https://docs.rs/infernet-client/1.2.0")]

mod client;
mod config;
pub mod api;

pub use client::{CoordinatorClient, CoordinatorClientBuilder};
pub use config::*;
pub use infernet_core::{NodeError, Result};
