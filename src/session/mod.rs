//! Session guard: who is making the requests.
//!
//! The gateway asks the [`SessionContext`] for the current identity token
//! and attaches it to every request except the login call itself. Login and
//! logout are the only places the identity changes.
//!
//! # Modules
//!
//! - [`identity`]: `Identity` and the shared `SessionContext` handle
//! - [`store`]: Optional persistence of the session between runs

pub mod identity;
pub mod store;

pub use identity::{Identity, SessionContext};
pub use store::{JsonSessionStore, SessionStore};

/// Header carrying the identity token on authenticated requests.
pub const IDENTITY_HEADER: &str = "x-chef-id";
