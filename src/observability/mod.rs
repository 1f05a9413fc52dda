//! Logging and optional OpenTelemetry span export.
//!
//! ```text
//! tracing macros ─┬─► fmt layer ──────────────────────────► stderr
//!                 └─► tracing-opentelemetry ─► FileSpanExporter ─► OTLP JSON file
//! ```
//!
//! The export branch exists only when `trace_file` is configured. Files rotate
//! at 10 MiB keeping 3 backups (`<file>.1` .. `<file>.3`). While it is active,
//! outgoing requests carry a W3C `traceparent` header so backend spans join
//! the same trace.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with file export
//! - [`span_formatter`]: OTLP JSON encoding
//! - [`file_writer`]: Rotating line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
