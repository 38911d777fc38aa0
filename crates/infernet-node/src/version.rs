//! Running version and the latest-release check.

use infernet_client::CoordinatorClient;
use infernet_core::{NodeImage, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Version of this node build
pub const NODE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of comparing the running version with the latest release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VersionStatus {
    /// Running the latest release
    UpToDate {
        /// Running version
        current: String,
    },
    /// A different release is published
    Outdated {
        /// Running version
        current: String,
        /// Published version
        latest: String,
    },
}

/// Container images matching the running version
#[must_use]
pub fn node_images() -> [NodeImage; 2] {
    [NodeImage::cpu(NODE_VERSION), NodeImage::gpu(NODE_VERSION)]
}

/// Compare the running version with the release manifest at `url`
pub async fn check_latest(client: &CoordinatorClient, url: &str) -> Result<VersionStatus> {
    let latest = client.release().latest_version(url).await?;
    debug!(%latest, current = NODE_VERSION, "Fetched latest release version");

    if latest == NODE_VERSION {
        Ok(VersionStatus::UpToDate {
            current: NODE_VERSION.to_string(),
        })
    } else {
        Ok(VersionStatus::Outdated {
            current: NODE_VERSION.to_string(),
            latest,
        })
    }
}

/// Log a warning if the node is not on the latest release.
///
/// Lookup failures are logged and otherwise ignored.
pub async fn warn_if_outdated(client: &CoordinatorClient, url: &str) {
    match check_latest(client, url).await {
        Ok(VersionStatus::UpToDate { .. }) => {}
        Ok(VersionStatus::Outdated { current, latest }) => {
            warn!(
                %current,
                %latest,
                "Your node version (v{current}) does not match the latest release (v{latest}). \
                 Consider updating your node."
            );
        }
        Err(e) => warn!(error = %e, "Failed to fetch latest node version"),
    }
}
