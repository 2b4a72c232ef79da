/*
[INPUT]:  Error sources (HTTP, API, storage, wallet pairing)
[OUTPUT]: Structured error types with user-facing messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the LegalBounty client
#[derive(Error, Debug)]
pub enum BountyError {
    /// The API rejected the email/password pair
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A request field failed server-side validation
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Duplicate email/username on registration
    #[error("conflict: {0}")]
    Conflict(String),

    /// The bearer token was rejected
    #[error("unauthorized")]
    Unauthorized,

    /// No refresh token is persisted
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The refresh token was rejected; the session cannot be recovered
    #[error("refresh token expired")]
    Expired,

    /// Wallet pairing failed, timed out, or was rejected
    #[error("wallet connection failed: {0}")]
    ConnectionFailed(String),

    /// Operation not valid in the current state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned an error response not covered by a specific variant
    #[error("API error (status {code}): {message}")]
    Api { code: u16, message: String },

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Persistent storage failed
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl BountyError {
    /// Check if the error means the session is no longer valid
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            BountyError::InvalidCredentials
                | BountyError::Unauthorized
                | BountyError::NoRefreshToken
                | BountyError::Expired
        )
    }

    /// Stable user-facing message, suitable for display in a UI error slot
    pub fn user_message(&self) -> String {
        match self {
            BountyError::InvalidCredentials => "Invalid email or password".to_string(),
            BountyError::Validation { field, message } => format!("{field}: {message}"),
            BountyError::Conflict(_) => {
                "An account with that email or username already exists".to_string()
            }
            BountyError::Unauthorized | BountyError::NoRefreshToken | BountyError::Expired => {
                "Your session has expired, please sign in again".to_string()
            }
            BountyError::ConnectionFailed(_) => {
                "Could not connect to your wallet, please try again".to_string()
            }
            BountyError::Network(_) => "Network error, please try again".to_string(),
            other => other.to_string(),
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        BountyError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for LegalBounty client operations
pub type Result<T> = std::result::Result<T, BountyError>;
