use std::collections::VecDeque;

use log::info;

use super::{GenerationRequest, TraversalAlgorithm, expand, start};
use crate::network::error::Result;
use crate::network::graph::Graph;

/// Expands level by level; a limit cut keeps the shallowest ingredients.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirst;

impl TraversalAlgorithm for BreadthFirst {
	fn name(&self) -> &'static str {
		"Breadth first"
	}

	fn generate_network(&self, request: &GenerationRequest<'_>) -> Result<Graph> {
		let (mut builder, root) = start(request);
		let mut queue: VecDeque<_> = root.into_iter().collect();

		while let Some(item) = queue.pop_front() {
			queue.extend(expand(&mut builder, request, &item)?);
		}

		let graph = builder.finish();
		info!(
			"breadth-first generation: {} node(s), {} edge(s)",
			graph.nodes.len(),
			graph.edges.len()
		);
		Ok(graph)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use crate::network::algorithm::AlgorithmKind;
	use crate::network::algorithm::tests::{names, run};
	use crate::network::node::NodeGroup;
	use crate::network::pattern::{Filter, compile_all};
	use crate::network::recipe::RecipeBook;

	fn book() -> RecipeBook {
		RecipeBook::new()
			.with("circuit", &[("cable", 3), ("plate", 1)])
			.with("cable", &[("copper", 1)])
			.with("plate", &[("iron", 1)])
			.with("copper", &[("copper_ore", 1)])
	}

	#[test]
	fn iron_ingot_scenario() {
		let book = RecipeBook::new().with("iron_ingot", &[("iron_ore", 1)]);
		let graph = run(AlgorithmKind::BreadthFirst, &book, "iron_ingot", 10, Some(2), &Filter::default());

		assert_eq!(names(&graph), ["iron_ingot", "iron_ore"]);
		assert_eq!(graph.edges.len(), 1);
		let edge = graph.edges[0];
		assert_eq!(graph.node(edge.child).and_then(|n| n.name()), Some("iron_ore"));
		assert_eq!(graph.node(edge.parent).and_then(|n| n.name()), Some("iron_ingot"));
		assert_eq!(graph.nodes[1].group, NodeGroup::Raw);
	}

	#[test]
	fn two_cycle_terminates() {
		let book = RecipeBook::new().with("a", &[("b", 1)]).with("b", &[("a", 1)]);
		let graph = run(AlgorithmKind::BreadthFirst, &book, "a", 100, Some(2), &Filter::default());

		assert_eq!(names(&graph), ["a", "b"]);
		// b -> a plus the back edge a -> b
		assert_eq!(graph.edges.len(), 2);
		assert!(graph.is_consistent());
	}

	#[test]
	fn limit_keeps_shallow_items() {
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 3, Some(5), &Filter::default());
		assert_eq!(names(&graph), ["circuit", "cable", "plate"]);
		assert_eq!(graph.nodes[1].group, NodeGroup::Unexpanded);
	}

	#[test]
	fn depth_bounds_expansion() {
		// expand levels 0 and 1 only
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 100, Some(1), &Filter::default());
		assert_eq!(names(&graph), ["circuit", "cable", "plate", "copper", "iron"]);
		assert_eq!(graph.node_named("copper").map(|n| n.group), Some(NodeGroup::Unexpanded));

		let root_only = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 100, None, &Filter::default());
		assert_eq!(names(&root_only), ["circuit"]);
		assert!(root_only.edges.is_empty());
	}

	#[test]
	fn blacklisted_items_stay_terminal() {
		let filter = Filter::new(compile_all(["cable|copper"]).unwrap(), compile_all(["^cable$"]).unwrap());
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 100, Some(5), &filter);

		// circuit itself is not whitelisted
		assert_eq!(names(&graph), ["circuit"]);

		let filter = Filter::new(Vec::new(), compile_all(["CABLE"]).unwrap());
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 100, Some(5), &filter);
		assert_eq!(names(&graph), ["circuit", "cable", "plate", "iron"]);
		assert_eq!(graph.node_named("cable").map(|n| n.group), Some(NodeGroup::Filtered));
	}

	#[test]
	fn unknown_target_yields_single_node() {
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "bedrock", 10, Some(3), &Filter::default());
		assert_eq!(names(&graph), ["bedrock"]);
		assert!(graph.edges.is_empty());
		assert_eq!(graph.nodes[0].group, NodeGroup::Target);
	}

	#[test]
	fn zero_limit_yields_target_only() {
		let graph = run(AlgorithmKind::BreadthFirst, &book(), "circuit", 0, Some(3), &Filter::default());
		assert_eq!(names(&graph), ["circuit"]);
		assert!(graph.edges.is_empty());
	}
}
