use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::edge::{Edge, EdgeId};
use super::node::{Node, NodeGroup, NodeId};
use super::stack::Stack;

/// The node and edge sets produced by one generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl Graph {
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|node| node.id == id)
	}

	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.iter().find(|edge| edge.id == id)
	}

	/// First node whose canonical name is `name`.
	pub fn node_named(&self, name: &str) -> Option<&Node> {
		self.nodes.iter().find(|node| node.name() == Some(name))
	}

	/// The generation root.
	pub fn root(&self) -> Option<&Node> {
		self.nodes.iter().find(|node| node.group == NodeGroup::Target)
	}

	/// Every edge endpoint is a member of the node set.
	pub fn is_consistent(&self) -> bool {
		let ids: HashSet<NodeId> = self.nodes.iter().map(|node| node.id).collect();
		self.edges
			.iter()
			.all(|edge| ids.contains(&edge.child) && ids.contains(&edge.parent))
	}

	/// Ingredients feeding directly into `parent`.
	pub fn children_of(&self, parent: NodeId) -> impl Iterator<Item = &Node> {
		self.edges
			.iter()
			.filter(move |edge| edge.parent == parent)
			.filter_map(|edge| self.node(edge.child))
	}
}

/// Incremental graph construction shared by the traversal variants.
///
/// Nodes are keyed by canonical name so an item appears at most once, and
/// the `(child, parent)` pair keys edges so a relation listed twice yields
/// one arc. Each node also carries the shallowest level it was reached at.
#[derive(Debug)]
pub(crate) struct GraphBuilder {
	graph: Graph,
	by_name: HashMap<String, NodeId>,
	pairs: HashSet<(NodeId, NodeId)>,
	levels: Vec<usize>,
	limit: usize,
}

impl GraphBuilder {
	/// `limit` is clamped to at least one so the root always fits, and to
	/// the id space.
	pub(crate) fn new(limit: usize) -> Self {
		Self {
			graph: Graph::default(),
			by_name: HashMap::new(),
			pairs: HashSet::new(),
			levels: Vec::new(),
			limit: limit.clamp(1, u32::MAX as usize),
		}
	}

	pub(crate) fn is_full(&self) -> bool {
		self.graph.nodes.len() >= self.limit
	}

	pub(crate) fn find(&self, name: &str) -> Option<NodeId> {
		self.by_name.get(name).copied()
	}

	/// Add a node for `stack` reached at `level`, or return `None` when the
	/// limit is reached.
	pub(crate) fn add_node(&mut self, stack: Stack, group: NodeGroup, level: usize) -> Option<NodeId> {
		if self.is_full() {
			return None;
		}
		let id = NodeId(u32::try_from(self.graph.nodes.len()).ok()?);
		if let Some(name) = stack.canonical() {
			self.by_name.insert(name.to_owned(), id);
		}
		self.graph.nodes.push(Node::new(id, stack, group));
		self.levels.push(level);
		Some(id)
	}

	pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
		self.graph.nodes.get(id.0 as usize)
	}

	/// Shallowest level `id` has been reached at.
	pub(crate) fn level(&self, id: NodeId) -> Option<usize> {
		self.levels.get(id.0 as usize).copied()
	}

	/// Record that `id` was reached at `level`; true if that is shallower
	/// than before.
	pub(crate) fn lower_level(&mut self, id: NodeId, level: usize) -> bool {
		match self.levels.get_mut(id.0 as usize) {
			Some(known) if level < *known => {
				*known = level;
				true
			}
			_ => false,
		}
	}

	pub(crate) fn set_group(&mut self, id: NodeId, group: NodeGroup) {
		if let Some(node) = self.graph.nodes.get_mut(id.0 as usize) {
			// the root keeps its group whatever happens to its expansion
			if node.group != NodeGroup::Target {
				node.group = group;
			}
		}
	}

	pub(crate) fn connect(&mut self, child: NodeId, parent: NodeId) {
		let Ok(id) = u32::try_from(self.graph.edges.len()) else {
			return;
		};
		if !self.pairs.insert((child, parent)) {
			return;
		}
		self.graph.edges.push(Edge::new(EdgeId(id), child, parent));
	}

	pub(crate) fn finish(self) -> Graph {
		self.graph
	}
}
