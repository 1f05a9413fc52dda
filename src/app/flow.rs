//! Flow diagram state.
//!
//! Holds the nodes and edges edited on the flow screen. Unlike the ingredient
//! store there is no remote lifecycle: every operation applies immediately.
//! Deleting a node also deletes every edge that touches it, so the graph never
//! keeps edges to removed nodes through this API.

use crate::domain::{Edge, Node, NodeKind, NodePatch, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Default for FlowState {
    /// Start → Processing → End, laid out vertically.
    fn default() -> Self {
        Self {
            nodes: vec![
                Node::new("1", "Start", Position::new(250.0, 0.0)).with_kind(NodeKind::Input),
                Node::new("2", "Processing", Position::new(250.0, 100.0)),
                Node::new("3", "End", Position::new(250.0, 200.0)).with_kind(NodeKind::Output),
            ],
            edges: vec![Edge::connect("1", "2"), Edge::connect("2", "3")],
        }
    }
}

impl FlowState {
    /// An empty diagram.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
    }

    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    pub fn add_node(&mut self, node: Node) {
        tracing::debug!(node_id = %node.id, "node added");
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: Edge) {
        tracing::debug!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "edge added");
        self.edges.push(edge);
    }

    /// Applies `patch` to the node with the same id. Unknown ids are ignored.
    ///
    /// Returns whether a node was updated.
    pub fn update_node(&mut self, patch: NodePatch) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == patch.id) else {
            tracing::debug!(node_id = %patch.id, "update for unknown node ignored");
            return false;
        };
        if let Some(kind) = patch.kind {
            node.kind = kind;
        }
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(position) = patch.position {
            node.position = position;
        }
        true
    }

    /// Removes a node and all edges into or out of it.
    ///
    /// Returns whether the node existed.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != node_id);
        let edges_before = self.edges.len();
        self.edges.retain(|e| !e.touches(node_id));

        tracing::debug!(
            node_id = %node_id,
            edges_removed = edges_before - self.edges.len(),
            "node deleted"
        );
        self.nodes.len() < before
    }

    #[must_use]
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }
}
