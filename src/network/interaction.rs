//! Maps renderer-reported ids back to domain nodes and edges.

use super::edge::Edge;
use super::graph::Graph;
use super::node::Node;
use super::render::{ClickEvent, DoubleClickEvent};

/// Exactly one selected node resolves to that node; anything else to `None`.
pub fn clicked_node<'g>(graph: &'g Graph, event: &ClickEvent) -> Option<&'g Node> {
	match event.nodes.as_slice() {
		[id] => graph.node(*id),
		_ => None,
	}
}

/// Selected edges in graph order, or `None` when no edge was selected.
pub fn clicked_edges<'g>(graph: &'g Graph, event: &ClickEvent) -> Option<Vec<&'g Edge>> {
	if event.edges.is_empty() {
		return None;
	}
	Some(
		graph
			.edges
			.iter()
			.filter(|edge| event.edges.contains(&edge.id))
			.collect(),
	)
}

/// The first node under the pointer, if it belongs to the graph.
pub fn double_clicked_node<'g>(graph: &'g Graph, event: &DoubleClickEvent) -> Option<&'g Node> {
	event.nodes.first().and_then(|id| graph.node(*id))
}
