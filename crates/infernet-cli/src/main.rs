//! infernet-node - node registration and activation
//!
//! Registers a compute node with its coordinator and activates it.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    infernet_cli::run().await
}
