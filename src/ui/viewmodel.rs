//! View-model adapter: read-only projections of store state.
//!
//! Everything here is a pure function of its inputs. Nothing mutates the
//! store, so these can be recomputed on every render.
//!
//! # Example
//!
//! ```rust
//! use chefdesk::ui::viewmodel::{find_by_id, options_from_resources};
//! # use chefdesk::Ingredient;
//! # use chrono::Utc;
//! # let now = Utc::now();
//! # let items = vec![Ingredient { id: 1, name: "Flour".into(), unit: "kg".into(), created_at: now, updated_at: now }];
//!
//! let options = options_from_resources(&items);
//! assert_eq!(options[0].label, "Flour (kg)");
//! assert!(find_by_id(&items, 1).is_some());
//! assert!(find_by_id(&items, 7).is_none());
//! ```

use crate::app::{NoticeLevel, ResourceStore};
use crate::domain::{Ingredient, IngredientForm, IngredientId};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

/// Entry of a selection dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: IngredientId,
    /// `name (unit)`
    pub label: String,
}

/// One option per ingredient, in listing order.
#[must_use]
pub fn options_from_resources(items: &[Ingredient]) -> Vec<SelectOption> {
    items
        .iter()
        .map(|item| SelectOption {
            value: item.id,
            label: item.label(),
        })
        .collect()
}

#[must_use]
pub fn find_by_id(items: &[Ingredient], id: IngredientId) -> Option<&Ingredient> {
    items.iter().find(|item| item.id == id)
}

/// Edit-form prefill for ingredient `id`, if it is on the page.
#[must_use]
pub fn form_for(items: &[Ingredient], id: IngredientId) -> Option<IngredientForm> {
    find_by_id(items, id).map(|item| IngredientForm::new(item.name.clone(), item.unit.clone()))
}

/// Options whose label fuzzy-matches every whitespace-separated token of
/// `query`, case-insensitively. An empty query keeps everything.
///
/// ```rust
/// use chefdesk::ui::viewmodel::{filter_options, SelectOption};
///
/// let options = vec![
///     SelectOption { value: 1, label: "Flour (kg)".into() },
///     SelectOption { value: 2, label: "Sea Salt (g)".into() },
/// ];
/// let hits = filter_options(&options, "salt g");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].value, 2);
/// ```
#[must_use]
pub fn filter_options(options: &[SelectOption], query: &str) -> Vec<SelectOption> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return options.to_vec();
    }

    let matcher = SkimMatcherV2::default();
    let hits: Vec<SelectOption> = options
        .iter()
        .filter(|option| {
            let label = option.label.to_lowercase();
            tokens
                .iter()
                .all(|token| matcher.fuzzy_match(&label, token).is_some())
        })
        .cloned()
        .collect();

    tracing::debug!(options = options.len(), hits = hits.len(), "options filtered");
    hits
}

/// Table row of the ingredient listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: IngredientId,
    pub name: String,
    pub unit: String,
    /// `YYYY-MM-DD HH:MM` in UTC.
    pub updated: String,
}

impl From<&Ingredient> for RowView {
    fn from(item: &Ingredient) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            updated: item.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Everything the listing screen draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    pub rows: Vec<RowView>,
    /// e.g. `page 1/3 · 21 total`
    pub summary: String,
    pub search: Option<String>,
    pub loading: bool,
    /// Latest failure message still recorded in the store.
    pub error: Option<String>,
}

impl ListingView {
    #[must_use]
    pub fn from_store(store: &ResourceStore) -> Self {
        let listing = store.listing();
        let pages = listing.page_count().max(1);
        Self {
            rows: listing.items.iter().map(RowView::from).collect(),
            summary: format!(
                "page {}/{} · {} total",
                listing.current, pages, listing.total
            ),
            search: listing.search.clone(),
            loading: store.is_loading(),
            error: store.last_error().map(str::to_string),
        }
    }
}

/// Single-line rendering prefix for a notice level.
#[must_use]
pub const fn notice_marker(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, OperationFamily, StoreEvent};
    use crate::gateway::ListPage;
    use chrono::{TimeZone, Utc};

    fn items() -> Vec<Ingredient> {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        [(1, "Flour", "kg"), (2, "Salt", "g"), (3, "Sugar", "g")]
            .into_iter()
            .map(|(id, name, unit)| Ingredient {
                id,
                name: name.into(),
                unit: unit.into(),
                created_at: at,
                updated_at: at,
            })
            .collect()
    }

    #[test]
    fn options_keep_listing_order() {
        let labels: Vec<_> = options_from_resources(&items())
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["Flour (kg)", "Salt (g)", "Sugar (g)"]);
    }

    #[test]
    fn projections_do_not_change_between_calls() {
        let items = items();
        assert_eq!(options_from_resources(&items), options_from_resources(&items));
        assert_eq!(find_by_id(&items, 2), find_by_id(&items, 2));
    }

    #[test]
    fn form_for_prefills_from_record() {
        assert_eq!(form_for(&items(), 3), Some(IngredientForm::new("Sugar", "g")));
        assert_eq!(form_for(&items(), 9), None);
    }

    #[test]
    fn filter_requires_every_token() {
        let options = options_from_resources(&items());
        assert_eq!(filter_options(&options, "").len(), 3);
        assert_eq!(filter_options(&options, "  ").len(), 3);

        let hits = filter_options(&options, "SU g");
        assert_eq!(hits.iter().map(|o| o.value).collect::<Vec<_>>(), vec![3]);
        assert!(filter_options(&options, "xyz").is_empty());
    }

    #[test]
    fn listing_view_summarizes_store() {
        let mut store = ResourceStore::new(2);
        let ticket = store.issue(OperationFamily::List);
        handle_event(
            &mut store,
            StoreEvent::Listed {
                ticket,
                page: ListPage {
                    items: items()[..2].to_vec(),
                    total: 3,
                    current: 1,
                    page_size: 2,
                },
                search: None,
            },
        );
        store.issue(OperationFamily::Delete);

        let view = ListingView::from_store(&store);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].updated, "2024-05-02 08:30");
        assert_eq!(view.summary, "page 1/2 · 3 total");
        assert!(view.loading);
        assert_eq!(view.error, None);
    }
}
