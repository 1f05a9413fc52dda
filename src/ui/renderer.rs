//! Plain-text rendering of view models for the CLI.
//!
//! Output is returned as a `String` so callers decide where it goes.
//!
//! ```rust
//! use chefdesk::app::ResourceStore;
//! use chefdesk::ui::{render_listing, ListingView};
//!
//! let view = ListingView::from_store(&ResourceStore::new(10));
//! let text = render_listing(&view);
//! assert!(text.contains("no ingredients"));
//! ```

use crate::app::{FlowState, Notice};
use crate::ui::viewmodel::{notice_marker, ListingView, SelectOption};
use std::fmt::Write;

const ID_WIDTH: usize = 6;
const NAME_WIDTH: usize = 32;
const UNIT_WIDTH: usize = 10;

/// Renders the listing as a fixed-width table followed by the page summary.
#[must_use]
pub fn render_listing(view: &ListingView) -> String {
    let mut out = String::new();

    if let Some(search) = &view.search {
        let _ = writeln!(out, "search: {search}");
    }

    if view.rows.is_empty() {
        out.push_str("no ingredients\n");
    } else {
        let _ = writeln!(
            out,
            "{:<ID_WIDTH$} {:<NAME_WIDTH$} {:<UNIT_WIDTH$} UPDATED",
            "ID", "NAME", "UNIT"
        );
        for row in &view.rows {
            let _ = writeln!(
                out,
                "{:<ID_WIDTH$} {:<NAME_WIDTH$} {:<UNIT_WIDTH$} {}",
                row.id,
                truncate(&row.name, NAME_WIDTH),
                truncate(&row.unit, UNIT_WIDTH),
                row.updated
            );
        }
    }

    let _ = writeln!(out, "{}", view.summary);
    if view.loading {
        out.push_str("loading…\n");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

/// One `value  label` line per option.
#[must_use]
pub fn render_options(options: &[SelectOption]) -> String {
    options.iter().fold(String::new(), |mut out, option| {
        let _ = writeln!(out, "{:<ID_WIDTH$} {}", option.value, option.label);
        out
    })
}

#[must_use]
pub fn render_notice(notice: &Notice) -> String {
    format!("{} {}", notice_marker(notice.level), notice.message)
}

/// Lists nodes, then edges as `source -> target`.
#[must_use]
pub fn render_flow(flow: &FlowState) -> String {
    let mut out = String::from("nodes:\n");
    for node in &flow.nodes {
        let _ = writeln!(
            out,
            "  {:<4} {:<16} {:?} at ({}, {})",
            node.id, node.label, node.kind, node.position.x, node.position.y
        );
    }
    out.push_str("edges:\n");
    for edge in &flow.edges {
        let _ = writeln!(out, "  {:<8} {} -> {}", edge.id, edge.source, edge.target);
    }
    out
}

/// Cuts `text` to `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::RowView;

    #[test]
    fn table_has_header_and_summary() {
        let view = ListingView {
            rows: vec![RowView {
                id: 2,
                name: "Salt".into(),
                unit: "g".into(),
                updated: "2024-01-01 00:00".into(),
            }],
            summary: "page 1/1 · 1 total".into(),
            search: Some("sa".into()),
            loading: false,
            error: Some("delete failed".into()),
        };
        let text = render_listing(&view);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "search: sa");
        assert!(lines[1].starts_with("ID"));
        assert!(lines[2].starts_with("2      Salt"));
        assert_eq!(lines[3], "page 1/1 · 1 total");
        assert_eq!(lines[4], "error: delete failed");
    }

    #[test]
    fn long_names_are_truncated() {
        let name = "x".repeat(40);
        let cut = truncate(&name, NAME_WIDTH);
        assert_eq!(cut.chars().count(), NAME_WIDTH);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn flow_lists_edges() {
        let text = render_flow(&FlowState::default());
        assert!(text.contains("e1-2     1 -> 2"));
    }

    #[test]
    fn notice_has_marker() {
        assert_eq!(render_notice(&Notice::error("network error")), "✗ network error");
    }
}
