//! Error types for the provisioning adapters
//!
//! This module defines the uniform error taxonomy returned by every
//! [`SiteBuilderProvider`](crate::SiteBuilderProvider) operation.
//!
//! Errors fall into two groups:
//!
//! - **Normalized** errors have an interpretable shape and carry a
//!   user-facing message plus an optional diagnostic payload
//!   ([`Error::InvalidInput`], [`Error::ProviderApi`],
//!   [`Error::InvalidResponse`], [`Error::NotFound`], [`Error::Config`]).
//! - **Unexpected** errors ([`Error::Transport`], [`Error::Json`]) are
//!   propagated unchanged, since the adapter cannot know how to recover.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error for failures propagated unchanged
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for the provisioning adapters
#[derive(Error, Debug)]
pub enum Error {
    /// Required contract input missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// The remote platform answered with an error response
    #[error("Provider API Error: {message}")]
    ProviderApi {
        /// Message taken from the response body or the HTTP reason phrase
        message: String,
        /// Diagnostic payload (parsed response body)
        data: Value,
    },

    /// The remote platform answered with a body that is not usable JSON
    #[error("Unknown Provider API Error")]
    InvalidResponse {
        /// Raw response text
        response: String,
    },

    /// A local lookup against a remote catalog found no match
    #[error("{message}")]
    NotFound {
        /// Error message
        message: String,
        /// Diagnostic payload (the catalog that was searched)
        data: Value,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure with no response (timeouts, connection errors)
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider API error
    pub fn provider_api(message: impl Into<String>, data: Value) -> Self {
        Self::ProviderApi {
            message: message.into(),
            data,
        }
    }

    /// Create a "not found" error
    pub fn not_found(message: impl Into<String>, data: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            data,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap a transport failure
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Whether this error was normalized into the uniform error result
    ///
    /// Transport and JSON errors are the only ones left as-is.
    pub fn is_normalized(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Json(_))
    }

    /// Diagnostic payload attached to the error, if any
    pub fn data(&self) -> Option<Value> {
        match self {
            Self::ProviderApi { data, .. } | Self::NotFound { data, .. } => Some(data.clone()),
            Self::InvalidResponse { response } => {
                Some(serde_json::json!({ "response": response }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_api_display() {
        let err = Error::provider_api("Site not found", json!({ "response_data": null }));
        assert_eq!(err.to_string(), "Provider API Error: Site not found");
        assert!(err.is_normalized());
    }

    #[test]
    fn test_invalid_response_payload() {
        let err = Error::InvalidResponse {
            response: "<html>".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown Provider API Error");
        assert_eq!(err.data(), Some(json!({ "response": "<html>" })));
    }

    #[test]
    fn test_transport_not_normalized() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = Error::transport(io);
        assert!(!err.is_normalized());
        assert!(err.data().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }
}
