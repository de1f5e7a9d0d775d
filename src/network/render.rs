//! The boundary between a generated network and whatever draws it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::edge::{Edge, EdgeId};
use super::error::Result;
use super::graph::Graph;
use super::node::{Node, NodeGroup, NodeId};
use super::options::RenderOptions;

/// Renderer-facing node record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
	pub id: NodeId,
	pub group: NodeGroup,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}

impl From<&Node> for RenderNode {
	fn from(node: &Node) -> Self {
		Self {
			id: node.id,
			group: node.group,
			image: node.image.clone(),
			label: node.label(),
		}
	}
}

/// Renderer-facing edge record, drawn `from` the ingredient `to` the product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEdge {
	pub id: EdgeId,
	pub from: NodeId,
	pub to: NodeId,
}

impl From<&Edge> for RenderEdge {
	fn from(edge: &Edge) -> Self {
		Self {
			id: edge.id,
			from: edge.child,
			to: edge.parent,
		}
	}
}

/// An immutable snapshot of everything a renderer needs for one bind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderScene {
	pub nodes: Vec<RenderNode>,
	pub edges: Vec<RenderEdge>,
	pub options: RenderOptions,
}

impl RenderScene {
	pub fn new(graph: &Graph, options: &RenderOptions, seed: Option<u32>) -> Self {
		let mut options = options.clone();
		options.layout.random_seed = seed;
		Self {
			nodes: graph.nodes.iter().map(RenderNode::from).collect(),
			edges: graph.edges.iter().map(RenderEdge::from).collect(),
			options,
		}
	}

	pub fn seed(&self) -> Option<u32> {
		self.options.layout.random_seed
	}
}

/// Selection reported by the renderer on click.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickEvent {
	pub nodes: Vec<NodeId>,
	pub edges: Vec<EdgeId>,
}

/// Nodes under the pointer on double click.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoubleClickEvent {
	pub nodes: Vec<NodeId>,
}

/// Handler registered for click events.
pub type ClickListener = Box<dyn FnMut(&ClickEvent)>;
/// Handler registered for double-click events.
pub type DoubleClickListener = Box<dyn FnMut(&DoubleClickEvent)>;

/// A live, bound rendering of one scene. Dropping it releases the surface.
pub trait RenderSurface {
	/// The seed the surface laid nodes out with.
	fn seed(&self) -> u32;

	fn on_click(&mut self, listener: ClickListener);

	fn on_double_click(&mut self, listener: DoubleClickListener);
}

/// Binds scenes to named containers.
pub trait Renderer {
	fn bind(&mut self, container: &str, scene: &RenderScene) -> Result<Box<dyn RenderSurface>>;
}

/// Resolves display images from canonical item names.
pub trait ImageResolver {
	fn resolve(&self, name: &str) -> Option<String>;
}

/// No images at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
	fn resolve(&self, _name: &str) -> Option<String> {
		None
	}
}

/// Item icons exported into a game profile directory.
///
/// `mod:item` becomes `file://<profile>/config/jeiexporter/items/mod_item.png`.
#[derive(Clone, Debug)]
pub struct ProfileImages {
	pub profile: PathBuf,
}

impl ProfileImages {
	pub fn new(profile: impl Into<PathBuf>) -> Self {
		Self {
			profile: profile.into(),
		}
	}
}

impl ImageResolver for ProfileImages {
	fn resolve(&self, name: &str) -> Option<String> {
		let path = self
			.profile
			.join("config")
			.join("jeiexporter")
			.join("items")
			.join(format!("{}.png", name.replace(':', "_")));
		Some(format!("file://{}", path.display()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::stack::Stack;

	#[test]
	fn profile_images_sanitise_names() {
		let images = ProfileImages::new("/home/me/.minecraft");
		assert_eq!(
			images.resolve("minecraft:iron_ingot").as_deref(),
			Some("file:///home/me/.minecraft/config/jeiexporter/items/minecraft_iron_ingot.png")
		);
		assert_eq!(NoImages.resolve("anything"), None);
	}

	#[test]
	fn scene_translates_direction_and_labels() {
		let graph = Graph {
			nodes: vec![
				Node::new(NodeId(0), Stack::new(["ingot"]).with_amount(2), NodeGroup::Target),
				Node::new(NodeId(1), Stack::new(["ore"]), NodeGroup::Raw),
			],
			edges: vec![Edge::new(EdgeId(0), NodeId(1), NodeId(0))],
		};
		let scene = RenderScene::new(&graph, &RenderOptions::default(), Some(7));

		assert_eq!(scene.seed(), Some(7));
		assert_eq!(scene.nodes[0].label.as_deref(), Some("2"));
		assert_eq!(scene.nodes[1].label, None);
		assert_eq!(scene.edges[0], RenderEdge { id: EdgeId(0), from: NodeId(1), to: NodeId(0) });

		let json = serde_json::to_value(&scene.nodes[1]).unwrap();
		assert_eq!(json, serde_json::json!({ "id": 1, "group": "raw" }));
	}
}
