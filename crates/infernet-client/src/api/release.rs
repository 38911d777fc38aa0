//! Latest release lookup.

use crate::CoordinatorClient;
use infernet_core::{NodeError, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*"([0-9]+\.[0-9]+\.[0-9]+)""#)
        .expect("valid version regex")
});

/// Extract the first `version = "X.Y.Z"` assignment from a release manifest
#[must_use]
pub fn parse_version(manifest: &str) -> Option<String> {
    VERSION_LINE
        .captures(manifest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Release lookup
pub struct ReleaseApi<'a> {
    client: &'a CoordinatorClient,
}

impl<'a> ReleaseApi<'a> {
    pub(crate) fn new(client: &'a CoordinatorClient) -> Self {
        Self { client }
    }

    /// Fetch the release manifest at `url` and return the version it declares
    #[instrument(skip(self))]
    pub async fn latest_version(&self, url: &str) -> Result<String> {
        let manifest = self.client.get_text(url).await?;
        parse_version(&manifest)
            .ok_or_else(|| NodeError::Version(format!("no version found at {url}")))
    }
}
