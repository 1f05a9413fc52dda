//! Resource store: the listing and request lifecycle of the ingredient screen.
//!
//! [`ResourceStore`] is the single owner of the current page of ingredients,
//! its pagination metadata, and the per-family request status and error
//! message. It is mutated only by [`handle_event`](super::handle_event) when a
//! request settles; everything else reads.
//!
//! # Staleness
//!
//! Every issued request gets a [`Ticket`] with a per-family sequence number and
//! the store's current generation. [`detach`](ResourceStore::detach) moves the
//! generation, so everything still in flight is dropped. Within a generation:
//!
//! - a list response applies only if no newer list was issued, since it
//!   replaces the whole page;
//! - an update applies only if no newer update of the same record was issued;
//! - creates and deletes always apply. The server has committed them, and
//!   two of them never touch the same row.
//!
//! A family stays `Pending` until every request of it that can still apply
//! has settled.
//!
//! # Example
//!
//! ```rust
//! use chefdesk::app::{OperationFamily, RequestStatus, ResourceStore};
//!
//! let mut store = ResourceStore::new(10);
//! let ticket = store.issue(OperationFamily::List);
//! assert!(store.is_loading());
//! assert!(store.is_current(&ticket));
//!
//! store.detach();
//! assert!(!store.is_current(&ticket));
//! assert_eq!(store.status(OperationFamily::List), RequestStatus::Idle);
//! ```

use super::status::{OperationFamily, Outcome, RequestStatus, Ticket};
use crate::domain::{Ingredient, IngredientId};
use crate::gateway::{ListPage, ListQuery};
use serde::Deserialize;
use std::collections::HashMap;

/// Page size used until the first list response arrives.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const FAMILIES: usize = OperationFamily::ALL.len();

/// How `total` reacts to a successful delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteAccounting {
    /// Decrement only when the deleted record was on the current page.
    #[default]
    OnRemoval,
    /// Always decrement, even if the record was on another page.
    Always,
}

impl std::str::FromStr for DeleteAccounting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-removal" => Ok(Self::OnRemoval),
            "always" => Ok(Self::Always),
            other => Err(format!("unknown delete accounting `{other}`")),
        }
    }
}

/// One page of ingredients plus the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Server order, never re-sorted locally.
    pub items: Vec<Ingredient>,
    /// Count across all pages.
    pub total: u64,
    /// 1-based page index.
    pub current: u32,
    pub page_size: u32,
    pub search: Option<String>,
}

impl Listing {
    fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current: 1,
            page_size,
            search: None,
        }
    }

    /// Parameters that reproduce this page.
    #[must_use]
    pub fn query(&self) -> ListQuery {
        ListQuery {
            current: Some(self.current),
            page_size: Some(self.page_size),
            search: self.search.clone(),
        }
    }

    #[must_use]
    pub fn position(&self, id: IngredientId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: IngredientId) -> bool {
        self.position(id).is_some()
    }

    /// Number of pages implied by `total` and `page_size`.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.page_size as usize
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self::empty(DEFAULT_PAGE_SIZE)
    }
}

/// Central store for the ingredient screen.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    listing: Listing,
    statuses: [RequestStatus; FAMILIES],
    errors: [Option<String>; FAMILIES],
    last_failed: Option<OperationFamily>,
    issued: [u64; FAMILIES],
    in_flight: [u32; FAMILIES],
    latest_update: HashMap<Option<IngredientId>, u64>,
    generation: u64,
    delete_accounting: DeleteAccounting,
    refetch_after_mutation: bool,
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ResourceStore {
    /// Creates an empty store on page 1.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            listing: Listing::empty(page_size),
            statuses: [RequestStatus::Idle; FAMILIES],
            errors: Default::default(),
            last_failed: None,
            issued: [0; FAMILIES],
            in_flight: [0; FAMILIES],
            latest_update: HashMap::new(),
            generation: 0,
            delete_accounting: DeleteAccounting::default(),
            refetch_after_mutation: false,
        }
    }

    #[must_use]
    pub fn with_delete_accounting(mut self, accounting: DeleteAccounting) -> Self {
        self.delete_accounting = accounting;
        self
    }

    #[must_use]
    pub fn with_refetch_after_mutation(mut self, enabled: bool) -> Self {
        self.refetch_after_mutation = enabled;
        self
    }

    #[must_use]
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    #[must_use]
    pub const fn status(&self, family: OperationFamily) -> RequestStatus {
        self.statuses[family.index()]
    }

    /// Last failure message of `family`, cleared when the family is reissued.
    #[must_use]
    pub fn error(&self, family: OperationFamily) -> Option<&str> {
        self.errors[family.index()].as_deref()
    }

    /// Message of the most recent failure across all families, if still set.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_failed.and_then(|family| self.error(family))
    }

    /// True while any family has a request in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.statuses.iter().any(|status| status.is_pending())
    }

    #[must_use]
    pub const fn delete_accounting(&self) -> DeleteAccounting {
        self.delete_accounting
    }

    #[must_use]
    pub const fn refetch_after_mutation(&self) -> bool {
        self.refetch_after_mutation
    }

    /// Clears every stored error message.
    pub fn clear_error(&mut self) {
        self.errors = Default::default();
        self.last_failed = None;
    }

    /// Marks `family` pending and returns the ticket its settlement must carry.
    ///
    /// Any error previously recorded for the family is cleared. Updates should
    /// go through [`issue_update`](Self::issue_update) so that updates of
    /// different records do not supersede each other.
    pub fn issue(&mut self, family: OperationFamily) -> Ticket {
        self.issue_ticket(family, None)
    }

    /// Issues an update ticket for record `id`.
    pub fn issue_update(&mut self, id: IngredientId) -> Ticket {
        self.issue_ticket(OperationFamily::Update, Some(id))
    }

    fn issue_ticket(&mut self, family: OperationFamily, target: Option<IngredientId>) -> Ticket {
        let idx = family.index();
        self.issued[idx] += 1;
        let sequence = self.issued[idx];

        // A superseded request will be discarded, so it no longer counts.
        let supersedes = match family {
            OperationFamily::List => self.in_flight[idx] > 0,
            OperationFamily::Update => self.latest_update.insert(target, sequence).is_some(),
            OperationFamily::Create | OperationFamily::Delete => false,
        };
        if !supersedes {
            self.in_flight[idx] += 1;
        }

        self.statuses[idx] = RequestStatus::Pending;
        self.errors[idx] = None;
        if self.last_failed == Some(family) {
            self.last_failed = None;
        }

        let ticket = Ticket {
            family,
            sequence,
            generation: self.generation,
            target,
        };
        tracing::debug!(family = %family, sequence, generation = ticket.generation, target = ?target, "request issued");
        ticket
    }

    /// Whether a settlement carrying `ticket` would be applied.
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        match ticket.family {
            OperationFamily::List => ticket.sequence == self.issued[ticket.family.index()],
            OperationFamily::Update => {
                self.latest_update.get(&ticket.target) == Some(&ticket.sequence)
            }
            OperationFamily::Create | OperationFamily::Delete => true,
        }
    }

    /// Invalidates every in-flight request.
    ///
    /// Called when the view that issued them goes away. Pending families go
    /// back to `Idle`; the listing itself is kept.
    pub fn detach(&mut self) {
        self.generation += 1;
        self.in_flight = [0; FAMILIES];
        self.latest_update.clear();
        for status in &mut self.statuses {
            if status.is_pending() {
                *status = RequestStatus::Idle;
            }
        }
        tracing::debug!(generation = self.generation, "store detached, in-flight results will be dropped");
    }

    /// Retires `ticket`. The family settles once nothing else of it is in flight.
    pub(crate) fn settle(&mut self, ticket: &Ticket, outcome: Outcome) {
        let idx = ticket.family.index();
        if ticket.family == OperationFamily::Update {
            self.latest_update.remove(&ticket.target);
        }
        self.in_flight[idx] = self.in_flight[idx].saturating_sub(1);
        self.statuses[idx] = if self.in_flight[idx] > 0 {
            RequestStatus::Pending
        } else {
            RequestStatus::Settled(outcome)
        };
    }

    pub(crate) fn record_failure(&mut self, ticket: &Ticket, message: String) {
        self.settle(ticket, Outcome::Failure);
        self.errors[ticket.family.index()] = Some(message);
        self.last_failed = Some(ticket.family);
    }

    pub(crate) fn replace_listing(&mut self, page: ListPage, search: Option<String>) {
        self.listing = Listing {
            items: page.items,
            total: page.total,
            current: page.current,
            page_size: page.page_size,
            search,
        };
    }

    /// Adds a created record. Returns `true` if it was placed on the page.
    pub(crate) fn insert_created(&mut self, ingredient: Ingredient) -> bool {
        if let Some(idx) = self.listing.position(ingredient.id) {
            self.listing.items[idx] = ingredient;
            return true;
        }
        self.listing.total += 1;
        if self.listing.is_full() {
            return false;
        }
        self.listing.items.push(ingredient);
        true
    }

    /// Replaces a record in place. Returns `false` if it is not on this page.
    pub(crate) fn replace_updated(&mut self, ingredient: Ingredient) -> bool {
        match self.listing.position(ingredient.id) {
            Some(idx) => {
                self.listing.items[idx] = ingredient;
                true
            }
            None => false,
        }
    }

    /// Removes a record. Returns `true` if it was on this page.
    pub(crate) fn remove_deleted(&mut self, id: IngredientId) -> bool {
        let before = self.listing.items.len();
        self.listing.items.retain(|item| item.id != id);
        let removed = self.listing.items.len() < before;

        if removed || self.delete_accounting == DeleteAccounting::Always {
            self.listing.total = self.listing.total.saturating_sub(1);
        }
        removed
    }
}
