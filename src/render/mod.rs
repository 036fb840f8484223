//! Renderer-facing view of a recipe graph.
//!
//! A renderer never sees [`RecipeGraph`] internals. Per redraw it gets a
//! [`RenderGraph`]: a flat node list (the synthesized `start` and `end`
//! vertices included) and an edge list. Clicks travel back as
//! [`RenderEvent`]s naming the vertex.

mod visualizer;

pub use visualizer::visualize;

use crate::graph::{RecipeGraph, Vertex};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// CSS class of a job with no live status.
pub const NO_STATUS: &str = "nostatus";

/// Live status decorations, keyed by job name.
///
/// Filled by whatever polls job status; the graph never reads it.
pub type NodeStatuses = AHashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Job,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub class: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
}

/// Everything a renderer needs for one redraw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn new(graph: &RecipeGraph) -> Self {
        Self::decorated(graph, &NodeStatuses::new(), None)
    }

    /// Builds the view with live statuses and the current selection applied.
    pub fn decorated(graph: &RecipeGraph, statuses: &NodeStatuses, selected: Option<&str>) -> Self {
        let is_selected = |id: &str| selected == Some(id);

        let mut nodes = Vec::with_capacity(graph.len() + 2);
        nodes.push(RenderNode {
            id: Vertex::Start.id().to_string(),
            kind: NodeKind::Start,
            label: "Start".to_string(),
            icon: None,
            class: NO_STATUS.to_string(),
            selected: is_selected(Vertex::Start.id()),
        });
        for node in graph.nodes() {
            nodes.push(RenderNode {
                id: node.name().to_string(),
                kind: NodeKind::Job,
                label: node.name().to_string(),
                icon: node.schema().icon_code.clone(),
                class: statuses
                    .get(node.name())
                    .map(|status| status.to_lowercase())
                    .unwrap_or_else(|| NO_STATUS.to_string()),
                selected: is_selected(node.name()),
            });
        }
        nodes.push(RenderNode {
            id: Vertex::End.id().to_string(),
            kind: NodeKind::End,
            label: "End".to_string(),
            icon: None,
            class: NO_STATUS.to_string(),
            selected: false,
        });

        let edges = graph
            .edges()
            .into_iter()
            .map(|(from, to)| RenderEdge {
                from: from.id().to_string(),
                to: to.id().to_string(),
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }
}

/// How the user interacted with a rendered vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    /// Single click.
    Select,
    /// Double click: open the job's details without changing the edit state.
    Activate,
}

/// A click reported back by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEvent {
    pub node: String,
    pub gesture: Gesture,
}

impl RenderEvent {
    pub fn select(node: &str) -> Self {
        Self {
            node: node.to_string(),
            gesture: Gesture::Select,
        }
    }

    pub fn activate(node: &str) -> Self {
        Self {
            node: node.to_string(),
            gesture: Gesture::Activate,
        }
    }

    /// The clicked vertex; `start` and `end` map to the virtual vertices.
    pub fn vertex(&self) -> Vertex<'_> {
        match self.node.as_str() {
            "start" => Vertex::Start,
            "end" => Vertex::End,
            name => Vertex::Job(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_vertex() {
        assert_eq!(RenderEvent::select("start").vertex(), Vertex::Start);
        assert_eq!(RenderEvent::select("end").vertex(), Vertex::End);
        assert_eq!(RenderEvent::activate("ingest").vertex(), Vertex::Job("ingest"));
    }

    #[test]
    fn test_empty_graph_has_only_virtual_vertices() {
        let view = RenderGraph::new(&RecipeGraph::new());
        let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["start", "end"]);
        assert!(view.edges.is_empty());
    }
}
