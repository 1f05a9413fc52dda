//! Chefdesk: client core for the chef admin console.
//!
//! Chefdesk manages the ingredient catalogue of a kitchen backend over REST:
//! - Paginated, searchable ingredient listing held in a single store
//! - Create/update/delete with local validation and per-operation status
//! - Stale-response protection for overlapping requests and torn-down views
//! - Explicit login session attached to every request as an identity header
//! - Flow diagram state (nodes and edges) for the process editor

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI shim (main.rs)                                 │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Dispatcher: intent → gateway → store             │
//! │  - ResourceStore + reducer (handle_event)           │
//! │  - Flow graph state                                 │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Gateway       │   │ Session       │
//! │ (ui/)         │   │ (gateway/)    │   │ (session/)    │
//! │ - View models │   │ - REST calls  │   │ - Identity    │
//! │ - Text output │   │ - Envelopes   │   │ - Persistence │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Ingredient and flow models (domain/)             │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - stderr logging, optional OTLP file export        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Values are layered, later sources winning: built-in defaults, a TOML file
//! (`~/.config/chefdesk/config.toml` unless another path is given), then
//! `CHEFDESK_*` environment variables.
//!
//! ```toml
//! base_url = "https://kitchen.example.com"
//! page_size = 20
//! request_timeout_secs = 15
//! delete_accounting = "on-removal"
//! trace_level = "debug"
//! trace_file = "~/.local/share/chefdesk/chefdesk-otlp.json"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use chefdesk::{Config, Dispatcher, IngredientForm, SessionContext};
//!
//! # async fn run() -> chefdesk::Result<()> {
//! let config = Config::load(None)?;
//! let dispatcher = Dispatcher::from_config(&config, SessionContext::new())?;
//! dispatcher.api().login("chef", "secret").await?;
//! dispatcher.refresh().await?;
//! dispatcher.create(IngredientForm::new("Butter", "g")).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod gateway;
pub mod infrastructure;
pub mod observability;
pub mod session;
pub mod ui;

pub use app::{handle_event, Action, DeleteAccounting, Dispatcher, ResourceStore, StoreEvent};
pub use domain::{ChefdeskError, Ingredient, IngredientForm, IngredientId, Result};
pub use gateway::{HttpGateway, IngredientApi, ListQuery};
pub use session::{Identity, SessionContext};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read by [`Config::env_overrides`].
pub const ENV_PREFIX: &str = "CHEFDESK_";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin, without the `/api` suffix. Default: `http://localhost:3000`
    pub base_url: String,

    /// Page size used before the first list response. Default: 10
    pub page_size: u32,

    /// Per-request timeout. `None` leaves it to the HTTP client.
    pub request_timeout_secs: Option<u64>,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Enables OTLP JSON span export to this file.
    pub trace_file: Option<PathBuf>,

    /// Where the login session is persisted. Default: `<data dir>/session.json`
    pub session_file: Option<PathBuf>,

    pub delete_accounting: DeleteAccounting,

    /// Reload the current page after each successful mutation.
    pub refetch_after_mutation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            page_size: app::DEFAULT_PAGE_SIZE,
            request_timeout_secs: None,
            trace_level: None,
            trace_file: None,
            session_file: None,
            delete_accounting: DeleteAccounting::default(),
            refetch_after_mutation: false,
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    trace_level: Option<String>,
    trace_file: Option<String>,
    session_file: Option<String>,
    delete_accounting: Option<DeleteAccounting>,
    refetch_after_mutation: Option<bool>,
}

impl Config {
    /// Builds a configuration from string key/value pairs over the defaults.
    ///
    /// Malformed numbers and unknown enum values are ignored (the default is
    /// kept) and logged at debug level.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use chefdesk::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "25".to_string());
    /// map.insert("request_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 25);
    /// assert_eq!(config.request_timeout_secs, None);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies the keys present in `map` on top of `self`.
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        if let Some(url) = map.get("base_url").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.base_url = url.to_string();
        }
        if let Some(size) = parse_key::<u32>(map, "page_size").filter(|n| *n > 0) {
            self.page_size = size;
        }
        if let Some(secs) = parse_key::<u64>(map, "request_timeout_secs") {
            self.request_timeout_secs = Some(secs);
        }
        if let Some(level) = map.get("trace_level") {
            self.trace_level = Some(level.clone());
        }
        if let Some(path) = map.get("trace_file") {
            self.trace_file = Some(infrastructure::expand_tilde(path));
        }
        if let Some(path) = map.get("session_file") {
            self.session_file = Some(infrastructure::expand_tilde(path));
        }
        if let Some(accounting) = parse_key::<DeleteAccounting>(map, "delete_accounting") {
            self.delete_accounting = accounting;
        }
        if let Some(enabled) = parse_key::<bool>(map, "refetch_after_mutation") {
            self.refetch_after_mutation = enabled;
        }
        self
    }

    /// Parses a TOML document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)
            .map_err(|e| ChefdeskError::Config(format!("invalid config: {e}")))?;

        let mut config = Self::default();
        if let Some(url) = file.base_url {
            config.base_url = url;
        }
        if let Some(size) = file.page_size.filter(|n| *n > 0) {
            config.page_size = size;
        }
        config.request_timeout_secs = file.request_timeout_secs;
        config.trace_level = file.trace_level;
        config.trace_file = file.trace_file.as_deref().map(infrastructure::expand_tilde);
        config.session_file = file.session_file.as_deref().map(infrastructure::expand_tilde);
        if let Some(accounting) = file.delete_accounting {
            config.delete_accounting = accounting;
        }
        if let Some(enabled) = file.refetch_after_mutation {
            config.refetch_after_mutation = enabled;
        }
        Ok(config)
    }

    /// Reads a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ChefdeskError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads defaults, then the config file, then `CHEFDESK_*` variables.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used only if present.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Config`] if a config file is unreadable or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = infrastructure::default_config_file();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_overrides(&Self::env_overrides()))
    }

    /// `CHEFDESK_PAGE_SIZE=20` becomes `page_size = "20"`.
    #[must_use]
    pub fn env_overrides() -> BTreeMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Session file location, falling back to the data directory.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(infrastructure::default_session_file)
    }
}

fn parse_key<T>(map: &BTreeMap<String, String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = map.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(key, value = %raw, error = %e, "ignoring malformed config value");
            None
        }
    }
}
