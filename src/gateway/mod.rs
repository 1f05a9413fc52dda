//! Async operation gateway.
//!
//! Translates store intents into REST calls and normalizes their outcome into
//! `Result`s the dispatcher can feed to the store. Failures are surfaced once;
//! there is no retry or backoff.
//!
//! # Modules
//!
//! - [`api`]: `IngredientApi` trait, the seam used by the dispatcher
//! - [`http`]: reqwest implementation and the login call
//! - [`messages`]: Wire envelopes, list query and trace context propagation

pub mod api;
pub mod http;
pub mod messages;

pub use api::IngredientApi;
pub use http::HttpGateway;
pub use messages::{ListPage, ListQuery, TraceContext};
