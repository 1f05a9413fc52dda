//! Request lifecycle types.
//!
//! Each operation family (list, create, update, delete) moves independently
//! through `Idle → Pending → Settled(outcome)`. A new request of a family
//! returns it to `Pending`, whatever its previous state.
//!
//! # Example
//!
//! ```rust
//! use chefdesk::app::{OperationFamily, Outcome, RequestStatus};
//!
//! let status = RequestStatus::Settled(Outcome::Failure);
//! assert!(status.is_failure());
//! assert_eq!(OperationFamily::Delete.as_str(), "delete");
//! ```

use crate::domain::IngredientId;

/// Logical operation family tracked by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationFamily {
    List,
    Create,
    Update,
    Delete,
}

impl OperationFamily {
    /// All families, in table order.
    pub const ALL: [Self; 4] = [Self::List, Self::Create, Self::Update, Self::Delete];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::List => 0,
            Self::Create => 1,
            Self::Update => 2,
            Self::Delete => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a settled request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Lifecycle state of one operation family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// Nothing issued yet, or the issuing view was detached.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The latest request resolved.
    Settled(Outcome),
}

impl RequestStatus {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Settled(Outcome::Failure))
    }
}

/// Handle identifying one issued request.
///
/// Settlements carry their ticket back to the store. A ticket from an older
/// generation is always dropped. Within the current generation a list ticket
/// must be the latest list issued, an update ticket the latest update of its
/// record; create and delete tickets always apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub family: OperationFamily,
    pub(crate) sequence: u64,
    pub(crate) generation: u64,
    pub(crate) target: Option<IngredientId>,
}

impl Ticket {
    /// Per-family sequence number, starting at 1.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Record the request addresses, for updates.
    #[must_use]
    pub const fn target(&self) -> Option<IngredientId> {
        self.target
    }
}
