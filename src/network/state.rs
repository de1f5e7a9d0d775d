use serde::{Deserialize, Serialize};

use super::options::RenderOptions;
use super::stack::Stack;

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_DEPTH: usize = 3;

fn default_limit() -> usize {
	DEFAULT_LIMIT
}

fn default_depth() -> usize {
	DEFAULT_DEPTH
}

/// The persisted form of a network.
///
/// Filters and registry selections are stored raw; they are validated when
/// the state is turned back into a [`Network`](super::Network).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
	pub target: Stack,
	#[serde(default)]
	pub vis_options: Option<RenderOptions>,
	pub id: String,
	#[serde(default)]
	pub whitelist: Vec<String>,
	#[serde(default)]
	pub blacklist: Vec<String>,
	#[serde(default)]
	pub algorithm: usize,
	#[serde(default = "default_limit")]
	pub limit: usize,
	#[serde(default = "default_depth")]
	pub depth: usize,
	#[serde(default)]
	pub seed: Option<u32>,
	#[serde(default)]
	pub selected_layout: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn optional_fields_default() {
		let state: NetworkState = serde_json::from_str(
			r#"{ "target": { "names": ["iron_ingot"], "amount": 1 }, "id": "n1", "visOptions": null }"#,
		)
		.unwrap();
		assert_eq!(state.limit, DEFAULT_LIMIT);
		assert_eq!(state.depth, DEFAULT_DEPTH);
		assert_eq!(state.seed, None);
		assert_eq!(state.vis_options, None);
		assert!(state.whitelist.is_empty());
	}

	#[test]
	fn absent_seed_is_written_as_null() {
		let state = NetworkState {
			target: Stack::new(["a"]),
			vis_options: None,
			id: "x".into(),
			whitelist: vec!["ore".into()],
			blacklist: Vec::new(),
			algorithm: 1,
			limit: 5,
			depth: 2,
			seed: None,
			selected_layout: 1,
		};
		let json = serde_json::to_value(&state).unwrap();
		assert_eq!(json["seed"], serde_json::Value::Null);
		assert_eq!(json["selectedLayout"], 1);
		assert_eq!(json["whitelist"], serde_json::json!(["ore"]));
	}
}
