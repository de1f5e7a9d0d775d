use std::fmt;

use serde::{Deserialize, Serialize};

use super::stack::Stack;

/// Identifier of a node, unique within one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Visual category of a node, assigned by the traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeGroup {
	/// The generation root.
	Target,
	/// Expanded item with at least one production relation.
	#[default]
	Ingredient,
	/// Expanded item with no known production relations.
	Raw,
	/// Not expanded because the filter policy rejected it.
	Filtered,
	/// Not expanded because a bound was exhausted first.
	Unexpanded,
}

impl NodeGroup {
	/// Stable index used by renderers to pick a palette entry.
	pub fn index(self) -> u32 {
		match self {
			NodeGroup::Target => 0,
			NodeGroup::Ingredient => 1,
			NodeGroup::Raw => 2,
			NodeGroup::Filtered => 3,
			NodeGroup::Unexpanded => 4,
		}
	}
}

/// A graph vertex: a stack plus presentation metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	pub stack: Stack,
	pub group: NodeGroup,
	/// Resolved externally on reload from the canonical name.
	pub image: Option<String>,
	/// Mirrors `stack.amount`.
	pub amount: u32,
}

impl Node {
	pub fn new(id: NodeId, stack: Stack, group: NodeGroup) -> Self {
		let amount = stack.amount;
		Self {
			id,
			stack,
			group,
			image: None,
			amount,
		}
	}

	/// Canonical item identifier of the wrapped stack.
	pub fn name(&self) -> Option<&str> {
		self.stack.canonical()
	}

	pub fn set_image(&mut self, image: Option<String>) {
		self.image = image;
	}

	/// Display label: the amount when it is positive.
	pub fn label(&self) -> Option<String> {
		(self.amount > 0).then(|| self.amount.to_string())
	}
}
