//! Content loading error types.

use thiserror::Error;

/// Why an item's content could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    #[error("content could not be decoded: {message}")]
    Decode { message: String },

    #[error("failed to store downloaded content: {message}")]
    Io { message: String },

    #[error("download cancelled")]
    Cancelled,
}

impl LoadError {
    /// Creates a transport error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an error for a non-success HTTP status.
    #[must_use]
    pub fn http(status: u16, reason: &str) -> Self {
        Self::Network {
            message: format!("HTTP {status}: {reason}"),
            status: Some(status),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a file error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// HTTP status attached to the error, if any.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns whether the error is a cancellation.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns whether the error reaches the delegate. Cancellations are
    /// expected during eviction and stay internal.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !self.is_cancellation()
    }
}
