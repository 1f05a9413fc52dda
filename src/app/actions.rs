//! Side effects requested by the store's event handler.
//!
//! The handler never performs I/O. When a settlement calls for a user
//! notification or a re-fetch it returns an [`Action`]; the dispatcher
//! executes them in order.

use crate::gateway::ListQuery;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Commands produced by [`handle_event`](super::handle_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Shows a transient notification.
    Notify(Notice),

    /// Re-fetches the listing with the given parameters.
    ///
    /// Emitted after successful mutations when re-fetching is enabled, so the
    /// page reflects the server's ordering.
    Refetch(ListQuery),
}
