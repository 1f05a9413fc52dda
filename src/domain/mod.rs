//! Domain layer for the chefdesk client.
//!
//! Plain data types and their local rules, independent of HTTP, persistence or
//! tracing concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`ingredient`]: Ingredient record and form validation
//! - [`flow`]: Node/edge model of the flow diagram
//!
//! # Examples
//!
//! ```
//! use chefdesk::domain::{IngredientForm, Result};
//!
//! fn prepare() -> Result<IngredientForm> {
//!     let form = IngredientForm::new("Salt", "g");
//!     form.validate()?;
//!     Ok(form)
//! }
//! # prepare().unwrap();
//! ```

pub mod error;
pub mod flow;
pub mod ingredient;

pub use error::{ChefdeskError, Result};
pub use flow::{Edge, Node, NodeKind, NodePatch, Position};
pub use ingredient::{parse_timestamp, Ingredient, IngredientForm, IngredientId, MAX_FIELD_CHARS};
