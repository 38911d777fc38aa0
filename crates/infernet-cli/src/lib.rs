//! # infernet-cli
//!
//! Command-line interface for the Infernet node lifecycle.
//!
//! ## Features
//!
//! - **Registration**: `register` (alias `register-node`) introduces the node to its coordinator
//! - **Activation**: `activate` (alias `activate-node`) makes a registered node eligible for work
//! - **Inspection**: `status`, `version` and `config` subcommands
//! - **Multiple output formats**: pretty text, JSON, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
