//! reqwest-backed implementation of [`IngredientApi`] plus the login call.

use super::api::IngredientApi;
use super::messages::{
    DeleteEnvelope, ItemEnvelope, ListEnvelope, ListPage, ListQuery, LoginEnvelope, LoginRequest,
    TraceContext,
};
use crate::domain::error::{ChefdeskError, Result};
use crate::domain::{Ingredient, IngredientForm, IngredientId};
use crate::session::{Identity, SessionContext, IDENTITY_HEADER};
use crate::Config;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const INGREDIENTS_PATH: &str = "/api/ingredients";
const LOGIN_PATH: &str = "/api/chefs/login";

/// Whether a request carries the session's identity header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Session,
    /// Used only by the login call.
    Skip,
}

/// HTTP gateway to the REST backend.
///
/// Every request sends `Content-Type: application/json`, the `x-chef-id`
/// identity header when a session exists (except for login), and a
/// `traceparent` header when OpenTelemetry tracing is active.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    session: SessionContext,
    default_paging: (u32, u32),
}

impl HttpGateway {
    /// Builds a gateway for `config.base_url` using `session` for identity.
    ///
    /// No timeout is applied unless `config.request_timeout_secs` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &Config, session: SessionContext) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ChefdeskError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            default_paging: (1, config.page_size),
        })
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Logs in and installs the resulting identity in the session context.
    ///
    /// The request is sent without the identity header.
    ///
    /// # Errors
    ///
    /// Returns a transport or network error, an application error when the
    /// server rejects the credentials, or a storage error if the session
    /// cannot be persisted.
    #[tracing::instrument(level = "debug", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity> {
        let envelope: LoginEnvelope = self
            .execute(
                self.request(Method::POST, LOGIN_PATH, Auth::Skip)
                    .json(&LoginRequest { username, password }),
            )
            .await?;
        let profile = envelope.into_profile()?;

        let identity = Identity {
            id: profile.id,
            username: profile.username,
            name: profile.name,
            login_time: Some(chrono::Utc::now()),
        };
        self.session.establish(identity.clone())?;
        tracing::info!(chef_id = identity.id, "logged in");
        Ok(identity)
    }

    /// Clears the session. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted session cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if auth == Auth::Session {
            if let Some(token) = self.session.identity_token() {
                builder = builder.header(IDENTITY_HEADER, token);
            }
        }
        if let Some(trace) = TraceContext::from_current() {
            builder = builder.header("traceparent", trace.traceparent());
        }
        builder
    }

    /// Sends the request and decodes a 2xx body into `T`.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request did not reach the server");
            ChefdeskError::Network {
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(status, &body);
            tracing::warn!(status = status.as_u16(), message = %message, "request failed");
            return Err(ChefdeskError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(|e| ChefdeskError::Network {
            detail: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ChefdeskError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IngredientApi for HttpGateway {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        let envelope: ListEnvelope = self
            .execute(
                self.request(Method::GET, INGREDIENTS_PATH, Auth::Session)
                    .query(&query.to_params()),
            )
            .await?;
        let page = envelope.into_page(query, self.default_paging)?;
        tracing::debug!(items = page.items.len(), total = page.total, "page received");
        Ok(page)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, form: &IngredientForm) -> Result<Ingredient> {
        let envelope: ItemEnvelope = self
            .execute(
                self.request(Method::POST, INGREDIENTS_PATH, Auth::Session)
                    .json(form),
            )
            .await?;
        envelope.into_ingredient("create failed")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(&self, id: IngredientId, form: &IngredientForm) -> Result<Ingredient> {
        let envelope: ItemEnvelope = self
            .execute(
                self.request(Method::PUT, &format!("{INGREDIENTS_PATH}/{id}"), Auth::Session)
                    .json(form),
            )
            .await?;
        envelope.into_ingredient("update failed")
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: IngredientId) -> Result<()> {
        let envelope: DeleteEnvelope = self
            .execute(self.request(
                Method::DELETE,
                &format!("{INGREDIENTS_PATH}/{id}"),
                Auth::Session,
            ))
            .await?;
        envelope.into_result()
    }
}

/// Extracts the user-facing message of a non-2xx response.
///
/// - JSON body with a non-empty `message` string: that message
/// - any other JSON body: `request failed`
/// - anything else: `request failed: <code> <reason>`
#[must_use]
pub fn failure_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => json
            .get("message")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .map_or_else(|| "request failed".to_string(), str::to_string),
        Err(_) => format!(
            "request failed: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string(),
    }
}
