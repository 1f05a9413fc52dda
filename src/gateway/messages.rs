//! Wire types for the ingredient REST endpoint.
//!
//! Envelopes mirror the JSON bodies exactly; conversion methods turn them into
//! domain values or into [`ChefdeskError::Application`] when the body-level
//! `success` flag is false. This module also carries the trace context
//! propagated to the backend on every request.

use crate::domain::error::{ChefdeskError, Result};
use crate::domain::Ingredient;
use serde::{Deserialize, Serialize};

/// Parameters of a list request.
///
/// Every field is optional; absent or empty values are omitted from the query
/// string so the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub current: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn page(current: u32, page_size: u32) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
            search: None,
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Search filter with blank values normalized away.
    #[must_use]
    pub fn search_filter(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    /// Query-string pairs, skipping absent and empty values.
    ///
    /// ```
    /// use chefdesk::gateway::ListQuery;
    ///
    /// let query = ListQuery::page(2, 20).with_search("");
    /// assert_eq!(
    ///     query.to_params(),
    ///     vec![("current", "2".to_string()), ("pageSize", "20".to_string())]
    /// );
    /// ```
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(current) = self.current {
            params.push(("current", current.to_string()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("pageSize", page_size.to_string()));
        }
        if let Some(search) = self.search_filter() {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// One page of ingredients as returned by a successful list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    pub items: Vec<Ingredient>,
    pub total: u64,
    pub current: u32,
    pub page_size: u32,
}

/// `GET /api/ingredients` body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Ingredient>,
    pub total: Option<u64>,
    pub current: Option<u32>,
    pub page_size: Option<u32>,
    pub message: Option<String>,
}

impl ListEnvelope {
    /// Converts into a [`ListPage`], falling back to the request's paging
    /// values when the server omits them.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Application`] when `success` is false.
    pub fn into_page(self, query: &ListQuery, defaults: (u32, u32)) -> Result<ListPage> {
        if !self.success {
            return Err(application_failure(self.message, "load failed"));
        }
        let total = self.total.unwrap_or(self.data.len() as u64);
        Ok(ListPage {
            current: self.current.or(query.current).unwrap_or(defaults.0),
            page_size: self.page_size.or(query.page_size).unwrap_or(defaults.1),
            total,
            items: self.data,
        })
    }
}

/// `POST` / `PUT` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEnvelope {
    pub success: bool,
    pub data: Option<Ingredient>,
    pub message: Option<String>,
}

impl ItemEnvelope {
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Application`] when `success` is false and
    /// [`ChefdeskError::Decode`] when a successful body has no `data`.
    pub fn into_ingredient(self, default_failure: &str) -> Result<Ingredient> {
        if !self.success {
            return Err(application_failure(self.message, default_failure));
        }
        self.data
            .ok_or_else(|| ChefdeskError::Decode("successful response is missing `data`".into()))
    }
}

/// `DELETE` body.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEnvelope {
    pub success: bool,
    pub message: Option<String>,
}

impl DeleteEnvelope {
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Application`] when `success` is false.
    pub fn into_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(application_failure(self.message, "delete failed"))
        }
    }
}

/// `POST /api/chefs/login` request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Chef profile returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct ChefProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
}

/// `POST /api/chefs/login` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginEnvelope {
    pub success: bool,
    pub data: Option<ChefProfile>,
    pub message: Option<String>,
}

impl LoginEnvelope {
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Application`] unless the body reports success
    /// and carries a profile.
    pub fn into_profile(self) -> Result<ChefProfile> {
        match (self.success, self.data) {
            (true, Some(profile)) => Ok(profile),
            (_, _) => Err(application_failure(self.message, "login failed")),
        }
    }
}

fn application_failure(message: Option<String>, default: &str) -> ChefdeskError {
    ChefdeskError::Application {
        message: message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default.to_string()),
    }
}

/// Distributed tracing context for propagation to the backend.
///
/// Captures the OpenTelemetry trace and span ids of the current `tracing`
/// span so the server can join the client's trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub parent_span_id: String,
}

impl TraceContext {
    /// Returns `None` when the current span has no valid OpenTelemetry
    /// context (for instance when no OpenTelemetry layer is installed).
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        span_context.is_valid().then(|| Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// W3C `traceparent` header value (sampled).
    #[must_use]
    pub fn traceparent(&self) -> String {
        format!("00-{}-{}-01", self.trace_id, self.parent_span_id)
    }
}
