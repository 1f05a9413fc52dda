//! Subscriber setup.

use super::span_formatter::SCOPE_NAME;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Level resolution: `RUST_LOG`, then `config.trace_level`, then `info`.
/// Human-readable events go to stderr. When `config.trace_file` is set, spans
/// are also exported as OTLP JSON to that file (created along with its parent
/// directory); if the directory cannot be created the file export is skipped
/// and only stderr logging is installed.
///
/// Calling it more than once is harmless: later calls leave the first
/// subscriber in place.
///
/// # Example
///
/// ```rust
/// use chefdesk::observability::init_tracing;
/// use chefdesk::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let otel_layer = config.trace_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("chefdesk: trace export disabled, cannot create {}: {e}", parent.display());
                return None;
            }
        }
        let resource = Resource::new(vec![
            opentelemetry::KeyValue::new("service.name", "chefdesk"),
            opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = tracer::create_tracer_provider(path.clone(), resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME)))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(otel_layer)
        .try_init();
}
