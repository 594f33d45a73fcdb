//! Error types for cfddns
//!
//! This module defines all error types used throughout the workspace and the
//! mapping from each kind to the process exit code.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for validation, configuration and provider failures
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for public-IP resolution failures
pub const EXIT_IP_RESOLUTION: u8 = 2;

/// Core error type for cfddns
#[derive(Error, Debug)]
pub enum Error {
    /// A flag or config value failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors (missing credentials, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public-IP resolution failed
    #[error("IP resolution error: {0}")]
    IpSource(String),

    /// Provider call failed or returned an error payload
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A provider timestamp did not match the expected format
    ///
    /// Never fatal: the throttle treats it as "just modified".
    #[error("Unparseable provider timestamp: {0}")]
    TimestampParse(String),

    /// Push notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP resolution error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a timestamp parse error
    pub fn timestamp(msg: impl Into<String>) -> Self {
        Self::TimestampParse(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Process exit code for this error
    ///
    /// IP resolution failures exit with 2; every other fatal error exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::IpSource(_) => EXIT_IP_RESOLUTION,
            _ => EXIT_FAILURE,
        }
    }
}
