//! Gateway abstraction.
//!
//! [`IngredientApi`] is the seam between the dispatcher and the network.
//! Implementations turn each call into exactly one remote request and
//! normalize the outcome: transport and body-level success both have to hold
//! for `Ok`. No implementation retries.

use super::messages::{ListPage, ListQuery};
use crate::domain::error::Result;
use crate::domain::{Ingredient, IngredientForm, IngredientId};
use async_trait::async_trait;

/// Remote operations on the ingredient resource.
///
/// # Implementations
///
/// - [`HttpGateway`](super::HttpGateway): REST over HTTP with the session's identity header
#[async_trait]
pub trait IngredientApi: Send + Sync {
    /// Fetches one page of ingredients.
    ///
    /// # Errors
    ///
    /// Returns a transport, network, application or decode error.
    async fn list(&self, query: &ListQuery) -> Result<ListPage>;

    /// Creates an ingredient; the server assigns id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns a transport, network, application or decode error.
    async fn create(&self, form: &IngredientForm) -> Result<Ingredient>;

    /// Replaces name and unit of ingredient `id`.
    ///
    /// # Errors
    ///
    /// Returns a transport, network, application or decode error.
    async fn update(&self, id: IngredientId, form: &IngredientForm) -> Result<Ingredient>;

    /// Deletes ingredient `id`.
    ///
    /// # Errors
    ///
    /// Returns a transport, network, application or decode error.
    async fn delete(&self, id: IngredientId) -> Result<()>;
}
