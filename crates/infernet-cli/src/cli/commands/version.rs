//! `infernet-node version` - Node version and container images.

use anyhow::{Context as _, Result};
use colored::Colorize;
use infernet_node::version::{check_latest, node_images, VersionStatus};
use infernet_node::{CoordinatorClient, NODE_VERSION};
use serde::Serialize;
use std::time::Duration;

use super::Context;
use crate::cli::args::VersionArgs;

#[derive(Serialize)]
struct VersionReport {
    version: &'static str,
    images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release: Option<VersionStatus>,
}

pub async fn execute(ctx: Context, args: VersionArgs) -> Result<()> {
    let release = if args.check {
        let url = &ctx.config.version_check.url;
        let client = CoordinatorClient::builder(url)
            .timeout(Duration::from_secs(ctx.config.coordinator.timeout_secs.max(1)))
            .build()
            .with_context(|| format!("Invalid release URL: {url}"))?;
        Some(check_latest(&client, url).await?)
    } else {
        None
    };

    let report = VersionReport {
        version: NODE_VERSION,
        images: node_images().iter().map(ToString::to_string).collect(),
        release,
    };

    if ctx.output_format.print_structured(&report)? {
        return Ok(());
    }

    println!("{} {}", "infernet-node".bold(), report.version);
    for image in &report.images {
        println!("  {} {}", "Image:".bold(), image);
    }

    match report.release {
        Some(VersionStatus::UpToDate { .. }) => {
            println!();
            println!("{}", "Running the latest release.".green());
        }
        Some(VersionStatus::Outdated { latest, .. }) => {
            println!();
            println!(
                "{} Latest release is v{}. Consider updating your node.",
                "Warning:".yellow().bold(),
                latest
            );
        }
        None => {}
    }

    Ok(())
}
