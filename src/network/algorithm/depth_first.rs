use log::info;

use super::{GenerationRequest, TraversalAlgorithm, expand, start};
use crate::network::error::Result;
use crate::network::graph::Graph;

/// Follows the first relation chain to the bottom before its siblings.
///
/// A node's direct ingredients are all discovered when it is expanded, so a
/// limit cut keeps whole recipes along the leftmost branch.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthFirst;

impl TraversalAlgorithm for DepthFirst {
	fn name(&self) -> &'static str {
		"Depth first"
	}

	fn generate_network(&self, request: &GenerationRequest<'_>) -> Result<Graph> {
		let (mut builder, root) = start(request);
		let mut stack: Vec<_> = root.into_iter().collect();

		while let Some(item) = stack.pop() {
			let discovered = expand(&mut builder, request, &item)?;
			stack.extend(discovered.into_iter().rev());
		}

		let graph = builder.finish();
		info!(
			"depth-first generation: {} node(s), {} edge(s)",
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
	use crate::network::pattern::Filter;
	use crate::network::recipe::RecipeBook;

	fn book() -> RecipeBook {
		RecipeBook::new()
			.with("circuit", &[("cable", 3), ("plate", 1)])
			.with("cable", &[("copper", 1)])
			.with("copper", &[("copper_ore", 1)])
			.with("plate", &[("iron", 1)])
	}

	#[test]
	fn limit_keeps_leftmost_branch() {
		let graph = run(AlgorithmKind::DepthFirst, &book(), "circuit", 5, Some(5), &Filter::default());
		assert_eq!(names(&graph), ["circuit", "cable", "plate", "copper", "copper_ore"]);
		assert!(graph.is_consistent());
	}

	#[test]
	fn two_cycle_terminates() {
		let book = RecipeBook::new().with("a", &[("b", 1)]).with("b", &[("a", 1)]);
		let graph = run(AlgorithmKind::DepthFirst, &book, "a", 100, Some(2), &Filter::default());
		assert_eq!(names(&graph), ["a", "b"]);
		assert_eq!(graph.edges.len(), 2);
	}

	#[test]
	fn shared_ingredient_gets_one_node() {
		let book = RecipeBook::new()
			.with("engine", &[("gear", 1), ("pipe", 2)])
			.with("gear", &[("plate", 2)])
			.with("pipe", &[("plate", 1)]);
		let graph = run(AlgorithmKind::DepthFirst, &book, "engine", 100, Some(4), &Filter::default());
		assert_eq!(names(&graph), ["engine", "gear", "pipe", "plate"]);
		assert_eq!(graph.edges.len(), 4);
	}
}
