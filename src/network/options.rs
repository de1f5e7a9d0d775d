//! Typed renderer configuration.
//!
//! Only the keys the layouts touch are modelled; everything else is kept in
//! flattened maps so a persisted configuration survives a round trip intact.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layering direction of the hierarchical layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
	/// Up-down.
	#[default]
	#[serde(rename = "UD")]
	UpDown,
	/// Down-up.
	#[serde(rename = "DU")]
	DownUp,
	/// Left-right.
	#[serde(rename = "LR")]
	LeftRight,
	/// Right-left.
	#[serde(rename = "RL")]
	RightLeft,
}

/// How levels are assigned in the hierarchical layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
	#[default]
	Hubsize,
	Directed,
}

/// Physics solver driving node placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Solver {
	#[default]
	BarnesHut,
	ForceAtlas2Based,
	Repulsion,
	HierarchicalRepulsion,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchicalOptions {
	pub enabled: bool,
	pub direction: Direction,
	pub sort_method: SortMethod,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
	/// Seed for deterministic placement; absent lets the renderer choose.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub random_seed: Option<u32>,
	pub hierarchical: HierarchicalOptions,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsOptions {
	pub solver: Solver,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmoothOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeOptions {
	pub smooth: SmoothOptions,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Configuration handed to the renderer at bind time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
	pub layout: LayoutOptions,
	pub physics: PhysicsOptions,
	pub edges: EdgeOptions,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl RenderOptions {
	/// Smooth edges are on unless explicitly disabled.
	pub fn smooth_edges(&self) -> bool {
		self.edges.smooth.enabled.unwrap_or(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_keys_survive_round_trip() {
		let json = serde_json::json!({
			"layout": {
				"randomSeed": 42,
				"improvedLayout": true,
				"hierarchical": { "enabled": true, "direction": "DU", "sortMethod": "directed", "levelSeparation": 150 }
			},
			"physics": { "solver": "hierarchicalRepulsion", "stabilization": { "iterations": 200 } },
			"edges": { "smooth": { "enabled": false, "type": "cubicBezier" }, "arrows": "to" },
			"groups": { "0": { "shape": "image" } }
		});
		let options: RenderOptions = serde_json::from_value(json.clone()).unwrap();
		assert_eq!(options.layout.random_seed, Some(42));
		assert_eq!(options.layout.hierarchical.direction, Direction::DownUp);
		assert_eq!(options.physics.solver, Solver::HierarchicalRepulsion);
		assert!(!options.smooth_edges());

		assert_eq!(serde_json::to_value(&options).unwrap(), json);
	}

	#[test]
	fn missing_sections_default() {
		let options: RenderOptions = serde_json::from_str("{}").unwrap();
		assert_eq!(options, RenderOptions::default());
		assert!(options.smooth_edges());
		assert!(!options.layout.hierarchical.enabled);
	}
}
