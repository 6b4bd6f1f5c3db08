//! Error types and result aliases.
//!
//! Defines the core `LoginError` enumeration and common `Result` type.

use http::StatusCode;
use thiserror::Error;

/// Login and session-token errors.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Configuration error (bad key length, invalid setting). Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The checker did not accept the supplied credentials.
    #[error("login credentials rejected")]
    CredentialsRejected,

    /// Malformed request body.
    #[error("bad input: {0}")]
    BadInput(String),

    /// Request body larger than the configured limit.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// No token cookie on the request.
    #[error("token not found")]
    NotFound,

    /// Token value is not valid unpadded base64url.
    #[error("token is not valid base64url")]
    Decode,

    /// Token did not authenticate: tampered, truncated, wrong key or garbage.
    #[error("token failed authentication")]
    Authentication,

    /// Token payload could not be serialized.
    #[error("token payload could not be serialized: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Decrypted token payload does not match the requested shape.
    #[error("token payload has unexpected shape: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Sealing failed (random source or cipher).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The token could not be attached to or cleared from the response.
    #[error("failed to store token on response: {0}")]
    Storage(String),

    /// Any other collaborator failure, e.g. an unreachable credential store.
    #[error("collaborator failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Socket or listener error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoginError {
    /// Wraps an arbitrary collaborator error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CredentialsRejected => StatusCode::FORBIDDEN,
            Self::BadInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound | Self::Decode | Self::Authentication | Self::Deserialization(_) => {
                StatusCode::FORBIDDEN
            }
            Self::Config(_)
            | Self::Serialization(_)
            | Self::Encryption(_)
            | Self::Storage(_)
            | Self::Backend(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when no token was presented at all.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// True when a token was presented but could not be turned back into a value.
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            Self::Decode | Self::Authentication | Self::Deserialization(_)
        )
    }

    /// True for failures that belong on the operational-failure channel.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Result type alias for `LoginError`.
pub type Result<T> = std::result::Result<T, LoginError>;
