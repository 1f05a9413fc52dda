//! Error types for the chefdesk client.
//!
//! This module defines the centralized error type [`ChefdeskError`] and a type alias
//! [`Result`] used throughout the crate. The four request-facing variants
//! (`Validation`, `Transport`, `Application`, `Network`) mirror the ways an
//! ingredient operation can fail; the rest cover local concerns like
//! configuration and session persistence.

use thiserror::Error;

/// The main error type for chefdesk operations.
///
/// # Examples
///
/// ```
/// use chefdesk::ChefdeskError;
///
/// let err = ChefdeskError::Transport {
///     status: 500,
///     message: "request failed: 500 Internal Server Error".to_string(),
/// };
/// assert_eq!(err.to_string(), "request failed: 500 Internal Server Error");
/// assert!(!err.is_local());
/// ```
#[derive(Debug, Error)]
pub enum ChefdeskError {
    /// Form data was rejected before any request was issued.
    ///
    /// Never reaches the store: the operation's status stays untouched.
    #[error("{field} {reason}")]
    Validation {
        /// Name of the offending form field (`name`, `unit`, ...).
        field: &'static str,
        /// Human-readable reason (`is required`, ...).
        reason: String,
    },

    /// The server answered with a non-2xx status.
    ///
    /// The message is taken from the response body when it is JSON with a
    /// `message` field, otherwise synthesized from the status line.
    #[error("{message}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Message shown to the user.
        message: String,
    },

    /// The server answered 2xx but flagged the operation as unsuccessful.
    #[error("{message}")]
    Application {
        /// Message from the response body, or a per-operation default.
        message: String,
    },

    /// The request never reached the server.
    ///
    /// The user-facing text is always `network error`; `detail` keeps the
    /// underlying cause for logs.
    #[error("network error")]
    Network {
        /// Underlying transport error description.
        detail: String,
    },

    /// A 2xx body could not be decoded into the expected envelope.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The operation needs a logged-in identity and none is present.
    #[error("Session error: {0}")]
    Session(String),

    /// Session persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChefdeskError {
    /// Builds a validation error for `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` when the error was raised without talking to the server.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Session(_) | Self::Config(_) | Self::Io(_)
        )
    }
}

/// A specialized `Result` type for chefdesk operations.
pub type Result<T> = std::result::Result<T, ChefdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_hides_detail() {
        let err = ChefdeskError::Network {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "network error");
        assert!(!err.is_local());
    }

    #[test]
    fn validation_error_names_field() {
        let err = ChefdeskError::validation("unit", "is required");
        assert_eq!(err.to_string(), "unit is required");
        assert!(err.is_local());
    }
}
