//! Intent dispatch: validation → gateway → store.
//!
//! [`Dispatcher`] is what a UI talks to. Each intent validates its input,
//! issues a ticket on the [`ResourceStore`], awaits the gateway, and feeds the
//! settlement back through [`handle_event`]. The store lock is never held
//! across an await, so overlapping requests of the same family are allowed;
//! the ticket check decides which one wins.
//!
//! # Example
//!
//! ```rust,no_run
//! use chefdesk::app::Dispatcher;
//! use chefdesk::session::SessionContext;
//! use chefdesk::{Config, IngredientForm};
//!
//! # async fn run() -> chefdesk::Result<()> {
//! let dispatcher = Dispatcher::from_config(&Config::default(), SessionContext::new())?;
//! dispatcher.refresh().await?;
//! dispatcher.create(IngredientForm::new("Butter", "g")).await?;
//! for notice in dispatcher.drain_notices() {
//!     println!("{}", notice.message);
//! }
//! # Ok(())
//! # }
//! ```

use super::actions::{Action, Notice};
use super::handler::{handle_event, Reaction, StoreEvent};
use super::state::ResourceStore;
use super::status::{OperationFamily, Ticket};
use crate::domain::error::Result;
use crate::domain::{Ingredient, IngredientForm, IngredientId};
use crate::gateway::{HttpGateway, IngredientApi, ListQuery};
use crate::session::SessionContext;
use crate::Config;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Drives the ingredient store from user intents.
#[derive(Debug)]
pub struct Dispatcher<A> {
    api: A,
    store: Mutex<ResourceStore>,
    notices: Mutex<Vec<Notice>>,
}

impl Dispatcher<HttpGateway> {
    /// Builds a dispatcher over an [`HttpGateway`] configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Config`](crate::ChefdeskError::Config) if the
    /// HTTP client cannot be built.
    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self> {
        let store = ResourceStore::new(config.page_size)
            .with_delete_accounting(config.delete_accounting)
            .with_refetch_after_mutation(config.refetch_after_mutation);
        Ok(Self::new(HttpGateway::new(config, session)?, store))
    }
}

impl<A: IngredientApi> Dispatcher<A> {
    pub fn new(api: A, store: ResourceStore) -> Self {
        Self {
            api,
            store: Mutex::new(store),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// A copy of the store as it is right now.
    pub fn snapshot(&self) -> ResourceStore {
        self.lock_store().clone()
    }

    /// Runs `f` against the store without cloning it.
    pub fn with_store<R>(&self, f: impl FnOnce(&ResourceStore) -> R) -> R {
        f(&self.lock_store())
    }

    /// Fetches a page and replaces the listing with it.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the store. The previous
    /// listing is kept.
    pub async fn list(&self, query: ListQuery) -> Result<()> {
        let ticket = self.issue(OperationFamily::List);
        let search = query.search_filter().map(str::to_string);

        match self.api.list(&query).await {
            Ok(page) => {
                self.apply(StoreEvent::Listed {
                    ticket,
                    page,
                    search,
                });
                Ok(())
            }
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    /// Re-fetches the page currently shown.
    ///
    /// # Errors
    ///
    /// See [`list`](Self::list).
    pub async fn refresh(&self) -> Result<()> {
        let query = self.with_store(|store| store.listing().query());
        self.list(query).await
    }

    /// Fetches page 1 filtered by `text`. Blank text clears the filter.
    ///
    /// # Errors
    ///
    /// See [`list`](Self::list).
    pub async fn search(&self, text: &str) -> Result<()> {
        let page_size = self.with_store(|store| store.listing().page_size);
        self.list(ListQuery::page(1, page_size).with_search(text.trim()))
            .await
    }

    /// Fetches `page` keeping the current page size and filter.
    ///
    /// # Errors
    ///
    /// See [`list`](Self::list).
    pub async fn goto_page(&self, page: u32) -> Result<()> {
        let mut query = self.with_store(|store| store.listing().query());
        query.current = Some(page.max(1));
        self.list(query).await
    }

    /// Validates and creates an ingredient.
    ///
    /// # Errors
    ///
    /// Returns a validation error without touching the store, or the gateway
    /// error after recording it.
    pub async fn create(&self, form: IngredientForm) -> Result<Ingredient> {
        form.validate()?;
        let ticket = self.issue(OperationFamily::Create);

        match self.api.create(&form).await {
            Ok(ingredient) => {
                let refetch = self.apply(StoreEvent::Created {
                    ticket,
                    ingredient: ingredient.clone(),
                });
                self.refetch(refetch).await;
                Ok(ingredient)
            }
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    /// Reloads the current page, then creates.
    ///
    /// A failed reload is logged and recorded in the store but does not stop
    /// the create.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub async fn refresh_then_create(&self, form: IngredientForm) -> Result<Ingredient> {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "listing before create failed, creating anyway");
        }
        self.create(form).await
    }

    /// Validates and updates ingredient `id`.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub async fn update(&self, id: IngredientId, form: IngredientForm) -> Result<Ingredient> {
        form.validate()?;
        let ticket = self.lock_store().issue_update(id);

        match self.api.update(id, &form).await {
            Ok(ingredient) => {
                let refetch = self.apply(StoreEvent::Updated {
                    ticket,
                    ingredient: ingredient.clone(),
                });
                self.refetch(refetch).await;
                Ok(ingredient)
            }
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    /// Deletes ingredient `id`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error after recording it in the store.
    pub async fn delete(&self, id: IngredientId) -> Result<()> {
        let ticket = self.issue(OperationFamily::Delete);

        match self.api.delete(id).await {
            Ok(()) => {
                let refetch = self.apply(StoreEvent::Deleted { ticket, id });
                self.refetch(refetch).await;
                Ok(())
            }
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    /// Drops every in-flight result. See [`ResourceStore::detach`].
    pub fn detach(&self) {
        self.lock_store().detach();
    }

    pub fn clear_error(&self) {
        self.lock_store().clear_error();
    }

    /// Takes the notifications queued since the last call, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Most recent queued notification, without consuming it.
    pub fn latest_notice(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    fn lock_store(&self) -> MutexGuard<'_, ResourceStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(&self, family: OperationFamily) -> Ticket {
        self.lock_store().issue(family)
    }

    fn fail(&self, ticket: Ticket, err: &crate::ChefdeskError) {
        self.apply(StoreEvent::Failed {
            ticket,
            message: err.to_string(),
        });
    }

    /// Applies a settlement, queues its notices and returns any re-fetch it asked for.
    fn apply(&self, event: StoreEvent) -> Vec<ListQuery> {
        let Reaction { applied, actions } = handle_event(&mut self.lock_store(), event);
        if !applied {
            return Vec::new();
        }

        let mut refetch = Vec::new();
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        for action in actions {
            match action {
                Action::Notify(notice) => notices.push(notice),
                Action::Refetch(query) => refetch.push(query),
            }
        }
        refetch
    }

    async fn refetch(&self, queries: Vec<ListQuery>) {
        for query in queries {
            if let Err(err) = self.list(query).await {
                tracing::warn!(error = %err, "re-fetch after mutation failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::NoticeLevel;
    use crate::app::status::RequestStatus;
    use crate::domain::ChefdeskError;
    use crate::gateway::ListPage;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory backend holding one unpaginated table.
    #[derive(Default)]
    struct FakeApi {
        rows: Mutex<Vec<Ingredient>>,
        fail_list: Mutex<Option<ChefdeskError>>,
        calls: AtomicUsize,
    }

    fn ingredient(id: IngredientId, name: &str, unit: &str) -> Ingredient {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Ingredient {
            id,
            name: name.into(),
            unit: unit.into(),
            created_at: at,
            updated_at: at,
        }
    }

    impl FakeApi {
        fn seeded() -> Self {
            let api = Self::default();
            *api.rows.lock().unwrap() = vec![
                ingredient(1, "Flour", "kg"),
                ingredient(2, "Salt", "g"),
                ingredient(3, "Sugar", "g"),
            ];
            api
        }
    }

    #[async_trait]
    impl IngredientApi for FakeApi {
        async fn list(&self, query: &ListQuery) -> Result<ListPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_list.lock().unwrap().take() {
                return Err(err);
            }
            let rows = self.rows.lock().unwrap().clone();
            let items: Vec<_> = rows
                .into_iter()
                .filter(|r| query.search_filter().map_or(true, |s| r.name.contains(s)))
                .collect();
            Ok(ListPage {
                total: items.len() as u64,
                items,
                current: query.current.unwrap_or(1),
                page_size: query.page_size.unwrap_or(10),
            })
        }

        async fn create(&self, form: &IngredientForm) -> Result<Ingredient> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let created = ingredient(rows.len() as i64 + 1, &form.name, &form.unit);
            rows.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: IngredientId, form: &IngredientForm) -> Result<Ingredient> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| ChefdeskError::Application {
                    message: "update failed".into(),
                })?;
            row.name.clone_from(&form.name);
            row.unit.clone_from(&form.unit);
            Ok(row.clone())
        }

        async fn delete(&self, id: IngredientId) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<FakeApi> {
        Dispatcher::new(FakeApi::seeded(), ResourceStore::new(10))
    }

    #[tokio::test]
    async fn create_after_list_grows_the_page() {
        let d = dispatcher();
        d.refresh().await.unwrap();
        d.create(IngredientForm::new("Butter", "g")).await.unwrap();

        let store = d.snapshot();
        assert_eq!(store.listing().items.len(), 4);
        assert_eq!(store.listing().total, 4);
        let notices = d.drain_notices();
        assert_eq!(notices, vec![Notice::success("ingredient created")]);
        assert!(d.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_api() {
        let d = dispatcher();
        let err = d.create(IngredientForm::new("  ", "g")).await.unwrap_err();

        assert!(matches!(err, ChefdeskError::Validation { field: "name", .. }));
        assert_eq!(d.api().calls.load(Ordering::SeqCst), 0);
        assert_eq!(d.snapshot().status(OperationFamily::Create), RequestStatus::Idle);
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_page() {
        let d = dispatcher();
        d.refresh().await.unwrap();
        *d.api().fail_list.lock().unwrap() = Some(ChefdeskError::Transport {
            status: 500,
            message: "request failed: 500 Internal Server Error".into(),
        });

        assert!(d.refresh().await.is_err());
        let store = d.snapshot();
        assert_eq!(store.listing().items.len(), 3);
        assert!(store.status(OperationFamily::List).is_failure());
        assert_eq!(
            store.error(OperationFamily::List),
            Some("request failed: 500 Internal Server Error")
        );
        assert_eq!(d.latest_notice().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[tokio::test]
    async fn search_resets_to_first_page() {
        let d = dispatcher();
        d.goto_page(2).await.unwrap();
        assert_eq!(d.snapshot().listing().current, 2);

        d.search(" Sa ").await.unwrap();
        let store = d.snapshot();
        assert_eq!(store.listing().current, 1);
        assert_eq!(store.listing().search.as_deref(), Some("Sa"));
        assert_eq!(store.listing().items.len(), 1);
    }

    #[tokio::test]
    async fn refetch_after_mutation_reloads_the_page() {
        let store = ResourceStore::new(10).with_refetch_after_mutation(true);
        let d = Dispatcher::new(FakeApi::seeded(), store);
        d.refresh().await.unwrap();

        d.update(2, IngredientForm::new("Sea Salt", "g")).await.unwrap();
        // list, update, list
        assert_eq!(d.api().calls.load(Ordering::SeqCst), 3);
        assert_eq!(d.snapshot().listing().items[1].name, "Sea Salt");
    }

    #[tokio::test]
    async fn create_goes_ahead_when_listing_fails() {
        let d = dispatcher();
        *d.api().fail_list.lock().unwrap() = Some(ChefdeskError::Network {
            detail: "connection refused".into(),
        });

        let created = d
            .refresh_then_create(IngredientForm::new("Butter", "g"))
            .await
            .unwrap();
        assert_eq!(created.name, "Butter");
        // list attempt + create
        assert_eq!(d.api().calls.load(Ordering::SeqCst), 2);

        let store = d.snapshot();
        assert!(store.status(OperationFamily::List).is_failure());
        assert_eq!(store.listing().items, vec![created]);
        let levels: Vec<_> = d.drain_notices().into_iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![NoticeLevel::Error, NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn delete_removes_and_counts_down() {
        let d = dispatcher();
        d.refresh().await.unwrap();
        d.delete(2).await.unwrap();

        let store = d.snapshot();
        assert!(!store.listing().contains(2));
        assert_eq!(store.listing().total, 2);
    }
}
