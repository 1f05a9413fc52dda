//! Node/edge types for the flow diagram editor.
//!
//! Only the data model lives here. Layout and rendering are left to whatever
//! front end draws the diagram.

use serde::{Deserialize, Serialize};

/// Role of a node in the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Entry node, only has outgoing edges.
    Input,
    #[default]
    Default,
    /// Terminal node, only has incoming edges.
    Output,
}

/// Canvas coordinates of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Default,
            label: label.into(),
            position,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Creates an edge with the conventional `e<source>-<target>` id.
    pub fn connect(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e{source}-{target}"),
            source,
            target,
        }
    }

    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Partial update applied by `FlowState::update_node`.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub id: String,
    pub kind: Option<NodeKind>,
    pub label: Option<String>,
    pub position: Option<Position>,
}

impl NodePatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
