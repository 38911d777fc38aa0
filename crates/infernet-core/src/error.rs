use thiserror::Error;

use crate::types::NodeStatus;

/// Result type alias for node lifecycle operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors that can occur while registering, activating or inspecting a node
#[derive(Error, Debug)]
pub enum NodeError {
    /// Authentication failed - invalid or missing coordinator API key
    #[error("authentication failed: coordinator rejected credentials")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// The coordinator understood the request but refused it
    #[error("coordinator rejected request: {message}")]
    Rejected {
        /// Reason given by the coordinator
        message: String,
    },

    /// Coordinator returned an unexpected error response
    #[error("coordinator error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the coordinator
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed node or payment address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Registration state file could not be read or written
    #[error("state error: {0}")]
    State(String),

    /// Activation attempted without a prior registration
    #[error("node {address} is not registered; run `register` first")]
    NotRegistered {
        /// Address of the node
        address: String,
    },

    /// Activation attempted before the registration cooldown elapsed
    #[error("registration cooldown still pending, {remaining_secs} seconds remaining")]
    CooldownPending {
        /// Seconds until activation is accepted
        remaining_secs: u64,
    },

    /// Status change not permitted by the node lifecycle
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: NodeStatus,
        /// Requested status
        to: NodeStatus,
    },

    /// Release version lookup failed
    #[error("version check failed: {0}")]
    Version(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl NodeError {
    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Connection(_)
        )
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this error came from a coordinator response
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Rejected { .. } => Some(409),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(NodeError::Timeout(30).is_retryable());
        assert!(NodeError::Connection("refused".into()).is_retryable());
        assert!(NodeError::RateLimited { retry_after: Some(2) }.is_retryable());
        assert!(!NodeError::Unauthorized.is_retryable());
        assert!(!NodeError::Rejected { message: "dup".into() }.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(NodeError::Unauthorized.status_code(), Some(401));
        assert_eq!(
            NodeError::Api { code: 503, message: String::new() }.status_code(),
            Some(503)
        );
        assert_eq!(NodeError::Config("x".into()).status_code(), None);
    }

    #[test]
    fn test_display_messages() {
        let err = NodeError::CooldownPending { remaining_secs: 42 };
        assert_eq!(
            err.to_string(),
            "registration cooldown still pending, 42 seconds remaining"
        );

        let err = NodeError::InvalidTransition {
            from: NodeStatus::Inactive,
            to: NodeStatus::Active,
        };
        assert_eq!(err.to_string(), "invalid status transition: inactive -> active");
    }
}
