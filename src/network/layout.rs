use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{NetworkError, Result};
use super::options::{Direction, RenderOptions, SmoothOptions, SortMethod, Solver};

/// Named layout strategies, persisted by index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum LayoutKind {
	/// Force-directed free placement.
	#[default]
	Normal,
	/// Layered placement, ingredients below what they make.
	Hierarchical,
}

impl LayoutKind {
	pub const ALL: [LayoutKind; 2] = [LayoutKind::Normal, LayoutKind::Hierarchical];

	pub fn index(self) -> usize {
		match self {
			LayoutKind::Normal => 0,
			LayoutKind::Hierarchical => 1,
		}
	}

	pub fn from_index(index: usize) -> Result<Self> {
		Self::ALL
			.get(index)
			.copied()
			.ok_or(NetworkError::UnknownLayout(index))
	}

	pub fn name(self) -> &'static str {
		match self {
			LayoutKind::Normal => "Normal",
			LayoutKind::Hierarchical => "Hierarchical",
		}
	}

	/// Rewrite the layout-related keys of `options`.
	pub fn apply(self, options: &mut RenderOptions) {
		match self {
			LayoutKind::Normal => {
				options.layout.hierarchical.enabled = false;
				options.physics.solver = Solver::BarnesHut;
				options.edges.smooth = SmoothOptions::default();
			}
			LayoutKind::Hierarchical => {
				let hierarchical = &mut options.layout.hierarchical;
				hierarchical.enabled = true;
				hierarchical.direction = Direction::DownUp;
				hierarchical.sort_method = SortMethod::Directed;
				options.physics.solver = Solver::HierarchicalRepulsion;
				options.edges.smooth.enabled = Some(false);
			}
		}
	}
}

impl TryFrom<usize> for LayoutKind {
	type Error = NetworkError;

	fn try_from(index: usize) -> Result<Self> {
		Self::from_index(index)
	}
}

impl From<LayoutKind> for usize {
	fn from(kind: LayoutKind) -> usize {
		kind.index()
	}
}

impl fmt::Display for LayoutKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hierarchical_then_normal() {
		let mut options = RenderOptions::default();
		LayoutKind::Hierarchical.apply(&mut options);
		assert!(options.layout.hierarchical.enabled);
		assert_eq!(options.layout.hierarchical.direction, Direction::DownUp);
		assert_eq!(options.layout.hierarchical.sort_method, SortMethod::Directed);
		assert_eq!(options.physics.solver, Solver::HierarchicalRepulsion);
		assert!(!options.smooth_edges());

		LayoutKind::Normal.apply(&mut options);
		assert!(!options.layout.hierarchical.enabled);
		assert_eq!(options.physics.solver, Solver::BarnesHut);
		assert!(options.smooth_edges());
	}

	#[test]
	fn apply_is_idempotent() {
		let mut once = RenderOptions::default();
		LayoutKind::Hierarchical.apply(&mut once);
		let mut twice = once.clone();
		LayoutKind::Hierarchical.apply(&mut twice);
		assert_eq!(once, twice);
	}

	#[test]
	fn rejects_unknown_index() {
		assert_eq!(LayoutKind::from_index(1).unwrap(), LayoutKind::Hierarchical);
		assert!(matches!(LayoutKind::from_index(9), Err(NetworkError::UnknownLayout(9))));
	}
}
