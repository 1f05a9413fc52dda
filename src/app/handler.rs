//! Settlement handling: the store's reducer.
//!
//! Every resolved or rejected request arrives here as a [`StoreEvent`]
//! carrying the [`Ticket`] it was issued with. [`handle_event`] discards stale
//! settlements (see [`ResourceStore::is_current`]), applies current ones to the [`ResourceStore`], and returns the
//! follow-up [`Action`]s (notifications, optional re-fetch).
//!
//! # Example
//!
//! ```rust
//! use chefdesk::app::{handle_event, OperationFamily, ResourceStore, StoreEvent};
//!
//! let mut store = ResourceStore::new(10);
//! let ticket = store.issue(OperationFamily::Delete);
//! let reaction = handle_event(&mut store, StoreEvent::Failed {
//!     ticket,
//!     message: "delete failed".into(),
//! });
//! assert!(reaction.applied);
//! assert_eq!(store.last_error(), Some("delete failed"));
//! ```

use super::actions::{Action, Notice};
use super::state::ResourceStore;
use super::status::{Outcome, Ticket};
use crate::domain::{Ingredient, IngredientId};
use crate::gateway::ListPage;

/// A settled request, as delivered to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A list request succeeded.
    Listed {
        ticket: Ticket,
        page: ListPage,
        /// Search filter the request was made with.
        search: Option<String>,
    },
    /// A create request succeeded with the server's record.
    Created { ticket: Ticket, ingredient: Ingredient },
    /// An update request succeeded with the server's record.
    Updated { ticket: Ticket, ingredient: Ingredient },
    /// A delete request succeeded.
    Deleted { ticket: Ticket, id: IngredientId },
    /// Any family's request failed (transport, network, application or decode).
    Failed { ticket: Ticket, message: String },
}

impl StoreEvent {
    #[must_use]
    pub const fn ticket(&self) -> &Ticket {
        match self {
            Self::Listed { ticket, .. }
            | Self::Created { ticket, .. }
            | Self::Updated { ticket, .. }
            | Self::Deleted { ticket, .. }
            | Self::Failed { ticket, .. } => ticket,
        }
    }
}

/// Result of handling one settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// `false` when the settlement was stale and left the store untouched.
    pub applied: bool,
    pub actions: Vec<Action>,
}

impl Reaction {
    fn applied(actions: Vec<Action>) -> Self {
        Self {
            applied: true,
            actions,
        }
    }

    fn discarded() -> Self {
        Self::default()
    }
}

/// Applies a settlement to the store.
///
/// Stale settlements (a list superseded by a newer list, an update superseded
/// by a newer update of the same record, or anything issued before a
/// [`detach`](ResourceStore::detach)) are dropped without any state change. Failures keep the previous listing intact.
pub fn handle_event(store: &mut ResourceStore, event: StoreEvent) -> Reaction {
    let ticket = *event.ticket();
    let _span = tracing::debug_span!(
        "handle_event",
        family = %ticket.family,
        sequence = ticket.sequence()
    )
    .entered();

    if !store.is_current(&ticket) {
        tracing::debug!("stale settlement discarded");
        return Reaction::discarded();
    }

    match event {
        StoreEvent::Listed { page, search, .. } => {
            tracing::debug!(
                items = page.items.len(),
                total = page.total,
                current = page.current,
                page_size = page.page_size,
                "listing replaced"
            );
            store.replace_listing(page, search);
            store.settle(&ticket, Outcome::Success);
            Reaction::applied(vec![])
        }
        StoreEvent::Created { ingredient, .. } => {
            let id = ingredient.id;
            let placed = store.insert_created(ingredient);
            tracing::debug!(id, placed, total = store.listing().total, "ingredient created");
            store.settle(&ticket, Outcome::Success);
            Reaction::applied(mutation_actions(store, "ingredient created"))
        }
        StoreEvent::Updated { ingredient, .. } => {
            let id = ingredient.id;
            let replaced = store.replace_updated(ingredient);
            if !replaced {
                tracing::debug!(id, "updated ingredient not on current page");
            }
            store.settle(&ticket, Outcome::Success);
            Reaction::applied(mutation_actions(store, "ingredient updated"))
        }
        StoreEvent::Deleted { id, .. } => {
            let removed = store.remove_deleted(id);
            tracing::debug!(
                id,
                removed,
                accounting = ?store.delete_accounting(),
                total = store.listing().total,
                "ingredient deleted"
            );
            store.settle(&ticket, Outcome::Success);
            Reaction::applied(mutation_actions(store, "ingredient deleted"))
        }
        StoreEvent::Failed { ticket, message } => {
            tracing::warn!(family = %ticket.family, message = %message, "request failed");
            store.record_failure(&ticket, message.clone());
            Reaction::applied(vec![Action::Notify(Notice::error(message))])
        }
    }
}

fn mutation_actions(store: &ResourceStore, message: &str) -> Vec<Action> {
    let mut actions = vec![Action::Notify(Notice::success(message))];
    if store.refetch_after_mutation() {
        actions.push(Action::Refetch(store.listing().query()));
    }
    actions
}
