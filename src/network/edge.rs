use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Identifier of an edge, unique within one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A dependency arc: `child` is an ingredient of `parent`.
///
/// Rendered from `child` to `parent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
	pub id: EdgeId,
	pub child: NodeId,
	pub parent: NodeId,
}

impl Edge {
	pub fn new(id: EdgeId, child: NodeId, parent: NodeId) -> Self {
		Self { id, child, parent }
	}
}
