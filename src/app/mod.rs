//! Application layer: the resource store and everything that mutates it.
//!
//! Data only flows one way:
//!
//! ```text
//! intent → Dispatcher → IngredientApi → StoreEvent → handle_event → ResourceStore
//!                ↑                                         │
//!                └─────────────── Actions ─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects requested by the reducer (notices, re-fetch)
//! - [`dispatcher`]: Async orchestration of intents against the gateway
//! - [`flow`]: Node/edge state of the flow diagram editor
//! - [`handler`]: The reducer applying settlements to the store
//! - [`state`]: `ResourceStore` and its listing
//! - [`status`]: Per-family request lifecycle and tickets
//!
//! # Example
//!
//! ```rust
//! use chefdesk::app::{handle_event, OperationFamily, ResourceStore, StoreEvent};
//! use chefdesk::gateway::ListPage;
//!
//! let mut store = ResourceStore::new(10);
//! let ticket = store.issue(OperationFamily::List);
//! let page = ListPage { items: vec![], total: 0, current: 1, page_size: 10 };
//! let reaction = handle_event(&mut store, StoreEvent::Listed { ticket, page, search: None });
//! assert!(reaction.applied);
//! ```

pub mod actions;
pub mod dispatcher;
pub mod flow;
pub mod handler;
pub mod state;
pub mod status;

pub use actions::{Action, Notice, NoticeLevel};
pub use dispatcher::Dispatcher;
pub use flow::FlowState;
pub use handler::{handle_event, Reaction, StoreEvent};
pub use state::{DeleteAccounting, Listing, ResourceStore, DEFAULT_PAGE_SIZE};
pub use status::{OperationFamily, Outcome, RequestStatus, Ticket};
