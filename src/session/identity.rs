//! Identity context shared with the gateway.
//!
//! The logged-in identity is held in an explicit [`SessionContext`] handle
//! rather than ambient global storage. The handle is cheap to clone; every
//! clone observes the same identity, so the gateway sees a login or logout as
//! soon as it happens.

use super::store::SessionStore;
use crate::domain::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// A logged-in chef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Client-side time the session was acquired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_time: Option<DateTime<Utc>>,
}

impl Identity {
    /// Value sent in the identity header: the chef id in decimal.
    #[must_use]
    pub fn token(&self) -> String {
        self.id.to_string()
    }
}

/// Shared, explicitly managed identity context.
///
/// Acquired with [`establish`](Self::establish) after a successful login and
/// released with [`clear`](Self::clear) on logout. When built with a
/// [`SessionStore`], both transitions are persisted and the identity is
/// restored on construction.
///
/// ```
/// use chefdesk::session::{Identity, SessionContext};
///
/// let session = SessionContext::new();
/// assert!(session.current_identity().is_none());
///
/// session.establish(Identity {
///     id: 42,
///     username: "gordon".into(),
///     name: "Gordon".into(),
///     login_time: None,
/// })?;
/// assert_eq!(session.identity_token().as_deref(), Some("42"));
/// # Ok::<(), chefdesk::ChefdeskError>(())
/// ```
#[derive(Clone, Default)]
pub struct SessionContext {
    identity: Arc<RwLock<Option<Identity>>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl SessionContext {
    /// Creates an in-memory context with no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context backed by `store`, restoring any persisted identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    pub fn with_store(store: Arc<dyn SessionStore>) -> Result<Self> {
        let restored = store.load()?;
        tracing::debug!(restored = restored.is_some(), "session context initialized");
        Ok(Self {
            identity: Arc::new(RwLock::new(restored)),
            store: Some(store),
        })
    }

    /// Returns the current identity, if logged in.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the identity token attached to outgoing requests.
    #[must_use]
    pub fn identity_token(&self) -> Option<String> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Identity::token)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Installs `identity` as the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the identity fails. The in-memory
    /// identity is left unchanged in that case.
    pub fn establish(&self, identity: Identity) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&identity)?;
        }
        tracing::debug!(chef_id = identity.id, username = %identity.username, "session established");
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
        Ok(())
    }

    /// Drops the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be removed. The
    /// in-memory identity is cleared regardless.
    pub fn clear(&self) -> Result<()> {
        let previous = self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        tracing::debug!(had_identity = previous.is_some(), "session cleared");
        match &self.store {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("identity", &self.current_identity())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
