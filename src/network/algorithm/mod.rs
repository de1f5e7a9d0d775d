//! Traversal strategies turning a target stack into a recipe graph.
//!
//! Every variant shares the same node policy (see [`expand`]): items are
//! de-duplicated by canonical name, the root occupies level 0 and an item is
//! expanded again only when a shorter path to it turns up. Variants only
//! differ in the order in which discovered items are expanded, which matters
//! once `limit` cuts the traversal short.

mod breadth_first;
mod depth_first;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use serde::{Deserialize, Serialize};

pub use breadth_first::BreadthFirst;
pub use depth_first::DepthFirst;

use super::error::{NetworkError, Result};
use super::graph::{Graph, GraphBuilder};
use super::node::{NodeGroup, NodeId};
use super::pattern::Filter;
use super::recipe::RecipeSource;
use super::stack::Stack;

/// Cooperative cancellation flag checked between expansions.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// Inputs of one generation.
pub struct GenerationRequest<'a> {
	pub target: &'a Stack,
	pub recipes: &'a dyn RecipeSource,
	/// Maximum node count; the root always fits.
	pub limit: usize,
	/// Deepest level whose items may still be expanded, `None` to expand nothing.
	pub depth: Option<usize>,
	pub filter: &'a Filter,
	pub cancel: &'a CancelToken,
}

/// A graph generation strategy.
pub trait TraversalAlgorithm {
	fn name(&self) -> &'static str;

	fn generate_network(&self, request: &GenerationRequest<'_>) -> Result<Graph>;
}

/// The closed registry of traversal strategies, persisted by index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum AlgorithmKind {
	#[default]
	BreadthFirst,
	DepthFirst,
}

impl AlgorithmKind {
	pub const ALL: [AlgorithmKind; 2] = [AlgorithmKind::BreadthFirst, AlgorithmKind::DepthFirst];

	pub fn index(self) -> usize {
		match self {
			AlgorithmKind::BreadthFirst => 0,
			AlgorithmKind::DepthFirst => 1,
		}
	}

	pub fn from_index(index: usize) -> Result<Self> {
		Self::ALL
			.get(index)
			.copied()
			.ok_or(NetworkError::UnknownAlgorithm(index))
	}

	pub fn name(self) -> &'static str {
		self.instance().name()
	}

	pub fn instance(self) -> Box<dyn TraversalAlgorithm> {
		match self {
			AlgorithmKind::BreadthFirst => Box::new(BreadthFirst),
			AlgorithmKind::DepthFirst => Box::new(DepthFirst),
		}
	}

	/// Display names in registry order.
	pub fn names() -> Vec<&'static str> {
		Self::ALL.iter().map(|kind| kind.name()).collect()
	}
}

impl TryFrom<usize> for AlgorithmKind {
	type Error = NetworkError;

	fn try_from(index: usize) -> Result<Self> {
		Self::from_index(index)
	}
}

impl From<AlgorithmKind> for usize {
	fn from(kind: AlgorithmKind) -> usize {
		kind.index()
	}
}

impl fmt::Display for AlgorithmKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An item waiting to be expanded.
#[derive(Clone, Debug)]
pub(crate) struct Pending {
	pub(crate) id: NodeId,
	pub(crate) stack: Stack,
	pub(crate) level: usize,
}

/// Seed the builder with the root and return it as the first pending item.
pub(crate) fn start(request: &GenerationRequest<'_>) -> (GraphBuilder, Option<Pending>) {
	let mut builder = GraphBuilder::new(request.limit);
	let root = builder
		.add_node(request.target.clone(), NodeGroup::Target, 0)
		.map(|id| Pending {
			id,
			stack: request.target.clone(),
			level: 0,
		});
	(builder, root)
}

/// Expand one item, returning the ingredients to visit next in relation order.
///
/// Those are the newly added nodes plus existing ones now reached at a
/// shallower level, so a node cut off by `depth` down a long path is still
/// expanded when a shorter path reaches it later.
pub(crate) fn expand(
	builder: &mut GraphBuilder,
	request: &GenerationRequest<'_>,
	item: &Pending,
) -> Result<Vec<Pending>> {
	if request.cancel.is_cancelled() {
		return Err(NetworkError::Cancelled);
	}
	// superseded by an entry queued from a shorter path
	if builder.level(item.id).is_some_and(|best| best < item.level) {
		return Ok(Vec::new());
	}
	if !request.filter.allows(&item.stack) {
		builder.set_group(item.id, NodeGroup::Filtered);
		return Ok(Vec::new());
	}
	if request.depth.is_none_or(|depth| item.level > depth) {
		builder.set_group(item.id, NodeGroup::Unexpanded);
		return Ok(Vec::new());
	}

	let relations = request.recipes.lookup_stack(&item.stack);
	if relations.is_empty() {
		builder.set_group(item.id, NodeGroup::Raw);
		return Ok(Vec::new());
	}

	let level = item.level + 1;
	let mut discovered = Vec::new();
	let mut connected = false;
	for relation in relations {
		let stack = relation.to_stack();
		let Some(name) = stack.canonical() else {
			continue;
		};
		if let Some(existing) = builder.find(name) {
			builder.connect(existing, item.id);
			connected = true;
			if builder.lower_level(existing, level) {
				let stack = builder.node(existing).map(|node| node.stack.clone()).unwrap_or(stack);
				discovered.push(Pending {
					id: existing,
					stack,
					level,
				});
			}
		} else if let Some(id) = builder.add_node(stack.clone(), NodeGroup::Unexpanded, level) {
			builder.connect(id, item.id);
			connected = true;
			discovered.push(Pending { id, stack, level });
		}
	}

	let group = if connected {
		NodeGroup::Ingredient
	} else {
		NodeGroup::Unexpanded
	};
	builder.set_group(item.id, group);
	debug!(
		"expanded {:?} at level {}: {} ingredient(s) queued",
		item.stack.canonical(),
		item.level,
		discovered.len()
	);
	Ok(discovered)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::network::recipe::RecipeBook;

	pub(crate) fn run(
		kind: AlgorithmKind,
		book: &RecipeBook,
		target: &str,
		limit: usize,
		depth: Option<usize>,
		filter: &Filter,
	) -> Graph {
		let target = Stack::new([target]).with_amount(1);
		let cancel = CancelToken::new();
		let request = GenerationRequest {
			target: &target,
			recipes: book,
			limit,
			depth,
			filter,
			cancel: &cancel,
		};
		kind.instance().generate_network(&request).unwrap()
	}

	pub(crate) fn names(graph: &Graph) -> Vec<&str> {
		graph.nodes.iter().filter_map(|node| node.name()).collect()
	}

	#[test]
	fn registry_round_trips_indices() {
		for kind in AlgorithmKind::ALL {
			assert_eq!(AlgorithmKind::from_index(kind.index()).unwrap(), kind);
		}
		assert!(matches!(
			AlgorithmKind::from_index(2),
			Err(NetworkError::UnknownAlgorithm(2))
		));
		assert_eq!(AlgorithmKind::names(), ["Breadth first", "Depth first"]);
	}

	#[test]
	fn persisted_as_integer() {
		assert_eq!(serde_json::to_string(&AlgorithmKind::DepthFirst).unwrap(), "1");
		let kind: AlgorithmKind = serde_json::from_str("0").unwrap();
		assert_eq!(kind, AlgorithmKind::BreadthFirst);
		assert!(serde_json::from_str::<AlgorithmKind>("7").is_err());
	}

	#[test]
	fn cancelled_request_fails() {
		let book = RecipeBook::new().with("a", &[("b", 1)]);
		let target = Stack::new(["a"]);
		let cancel = CancelToken::new();
		cancel.cancel();
		let filter = Filter::default();
		let request = GenerationRequest {
			target: &target,
			recipes: &book,
			limit: 10,
			depth: Some(2),
			filter: &filter,
			cancel: &cancel,
		};
		for kind in AlgorithmKind::ALL {
			assert!(matches!(
				kind.instance().generate_network(&request),
				Err(NetworkError::Cancelled)
			));
		}
	}

	#[test]
	fn variants_agree_without_limit_pressure() {
		let book = RecipeBook::new()
			.with("circuit", &[("cable", 3), ("plate", 1)])
			.with("cable", &[("copper", 1)])
			.with("plate", &[("iron", 1)]);
		let filter = Filter::default();
		let bfs = run(AlgorithmKind::BreadthFirst, &book, "circuit", 100, Some(5), &filter);
		let dfs = run(AlgorithmKind::DepthFirst, &book, "circuit", 100, Some(5), &filter);

		let mut a = names(&bfs);
		let mut b = names(&dfs);
		a.sort_unstable();
		b.sort_unstable();
		assert_eq!(a, b);
		assert_eq!(bfs.edges.len(), dfs.edges.len());
	}

	#[test]
	fn shared_ingredient_is_expanded_from_its_shortest_path() {
		// x is four hops away through a and b, but only two through c
		let book = RecipeBook::new()
			.with("r", &[("a", 1), ("c", 1)])
			.with("a", &[("b", 1)])
			.with("b", &[("x", 1)])
			.with("c", &[("x", 1)])
			.with("x", &[("y", 1)]);
		let filter = Filter::default();
		for kind in AlgorithmKind::ALL {
			let graph = run(kind, &book, "r", 100, Some(2), &filter);
			let mut found = names(&graph);
			found.sort_unstable();
			assert_eq!(found, ["a", "b", "c", "r", "x", "y"], "{kind}");
			let x = graph.node_named("x").unwrap();
			assert_eq!(x.group, NodeGroup::Ingredient, "{kind}");
			assert_eq!(graph.children_of(x.id).count(), 1, "{kind}");
			assert_eq!(graph.edges.len(), 6, "{kind}");
		}
	}
}
