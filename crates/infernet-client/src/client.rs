//! Main coordinator client implementation.

use crate::api::{NodesApi, ReleaseApi};
use crate::config::RetryConfig;
use infernet_core::{NodeError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("infernet-node/", env!("CARGO_PKG_VERSION"));

/// Client for the node coordinator API
#[derive(Clone)]
pub struct CoordinatorClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl CoordinatorClient {
    /// Create a new client for the coordinator at `base_url` using default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        CoordinatorClientBuilder::new(base_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> CoordinatorClientBuilder {
        CoordinatorClientBuilder::new(base_url)
    }

    /// Access node lifecycle endpoints
    #[must_use]
    pub fn nodes(&self) -> NodesApi<'_> {
        NodesApi::new(self)
    }

    /// Access release lookup
    #[must_use]
    pub fn release(&self) -> ReleaseApi<'_> {
        ReleaseApi::new(self)
    }

    /// Coordinator base URL, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Perform a GET request against the coordinator
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        debug!(url = %url, "GET request");

        self.execute(|http| self.authorize(http.get(&url))).await
    }

    /// Perform a POST request with JSON body against the coordinator
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        debug!(url = %url, "POST request");

        self.execute(|http| self.authorize(http.post(&url).json(body)))
            .await
    }

    /// Fetch a plain-text document from an absolute URL, without credentials
    pub(crate) async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url = %url, "GET text request");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            response.text().await.map_err(|e| NodeError::Http(e.to_string()))
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Send a request, retrying retryable failures per the retry configuration
    async fn execute<T, F>(&self, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&HttpClient) -> RequestBuilder,
    {
        let retry = &self.inner.retry_config;
        let mut attempt = 0;

        loop {
            match self.send(build(&self.inner.http)).await {
                Err(err) if attempt < retry.max_retries && self.should_retry(&err) => {
                    let delay = match &err {
                        NodeError::RateLimited {
                            retry_after: Some(secs),
                        } => Duration::from_secs(*secs).min(retry.max_backoff),
                        _ => retry.backoff_for(attempt),
                    };
                    warn!(
                        error = %err,
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying coordinator request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn should_retry(&self, err: &NodeError) -> bool {
        match err {
            NodeError::RateLimited { .. } => self.inner.retry_config.retry_on_rate_limit,
            other => other.is_retryable(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        self.handle_response(response).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.inner.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn map_send_error(&self, err: reqwest::Error) -> NodeError {
        if err.is_timeout() {
            NodeError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            NodeError::Connection(err.to_string())
        } else {
            NodeError::Http(err.to_string())
        }
    }

    /// Handle a coordinator response that returns JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| NodeError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(NodeError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a [`NodeError`]
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        // Prefer the `error` field of a JSON body
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        match status {
            401 | 403 => Err(NodeError::Unauthorized),
            404 => Err(NodeError::NotFound { resource: message }),
            409 | 422 => Err(NodeError::Rejected { message }),
            429 => {
                warn!(?retry_after, "Rate limited by coordinator");
                Err(NodeError::RateLimited { retry_after })
            }
            _ => Err(NodeError::Api {
                code: status,
                message,
            }),
        }
    }
}

impl std::fmt::Debug for CoordinatorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorClient")
            .field("base_url", &self.inner.base_url)
            .field("authenticated", &self.inner.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`CoordinatorClient`]
pub struct CoordinatorClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl CoordinatorClientBuilder {
    /// Create a new builder for the coordinator at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the bearer token sent with coordinator requests
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry configuration
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client, validating the base URL
    pub fn build(self) -> Result<CoordinatorClient> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| NodeError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NodeError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NodeError::Http(e.to_string()))?;

        Ok(CoordinatorClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                api_key: self.api_key,
                timeout: self.timeout,
                retry_config: self.retry_config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_bad_urls() {
        assert!(matches!(
            CoordinatorClient::new("not a url"),
            Err(NodeError::InvalidUrl(_))
        ));
        assert!(matches!(
            CoordinatorClient::new("ftp://coordinator.example"),
            Err(NodeError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CoordinatorClient::new("http://localhost:4000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(
            client.build_url("/api/v1/nodes"),
            "http://localhost:4000/api/v1/nodes"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = CoordinatorClient::builder("http://localhost:4000")
            .api_key("secret-token")
            .build()
            .unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("authenticated: true"));
    }
}
