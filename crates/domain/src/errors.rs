//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for SpendView
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum SpendViewError {
    /// Missing or invalid configuration (credentials, secrets, URLs).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The expense provider refused to issue an access token.
    #[error("Upstream token acquisition failed (HTTP {status}): {body}")]
    UpstreamAuth { status: u16, body: String },

    /// A single provider listing failed.
    #[error("Upstream resource '{resource}' failed: {message}")]
    UpstreamResource { resource: String, message: String },

    /// An outbound call exceeded its time budget.
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    /// OAuth state parameter or PKCE material was invalid or expired.
    #[error("OAuth state validation failed: {0}")]
    StateValidation(String),

    /// Authenticated identity is not allowed by the email-domain policy.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SpendViewError {
    /// Coarse reason code safe to show to end users (e.g. in redirect URLs).
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration",
            Self::StateValidation(_) => "InvalidState",
            Self::AccessDenied(_) => "AccessDenied",
            Self::UpstreamAuth { .. } | Self::Auth(_) => "AuthenticationFailed",
            Self::Timeout { .. } => "Timeout",
            Self::UpstreamResource { .. } | Self::Network(_) => "UpstreamUnavailable",
            Self::NotFound(_) => "NotFound",
            Self::InvalidInput(_) => "InvalidInput",
            Self::Internal(_) => "Internal",
        }
    }

    /// Whether the failure is transient and worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network(_) | Self::UpstreamResource { .. })
    }
}

/// Result type alias for SpendView operations
pub type Result<T> = std::result::Result<T, SpendViewError>;
