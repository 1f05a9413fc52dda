//! Tracer provider that exports spans to a rotating JSON file.

use super::file_writer::FileWriter;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Writes each exported batch as one OTLP JSON line.
#[derive(Debug)]
struct FileSpanExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    is_shutdown: bool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown {
            Err(TraceError::from("exporter is shut down"))
        } else {
            let line = self.formatter.format_batch(&batch).to_string();
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }
}

/// Builds a provider that exports every finished span immediately to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter {
        writer: FileWriter::new(file_path),
        formatter: SpanFormatter::new(resource.clone()),
        is_shutdown: false,
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry::KeyValue;
    use tempfile::TempDir;

    #[test]
    fn finished_spans_land_in_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("otlp.json");
        let provider = create_tracer_provider(
            path.clone(),
            Resource::new(vec![KeyValue::new("service.name", "chefdesk")]),
        );

        provider.tracer("test").in_span("list ingredients", |_cx| {});

        let contents = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(
            doc["resourceSpans"][0]["scopeSpans"][0]["spans"][0]["name"],
            "list ingredients"
        );
    }
}
