use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::network::options::{Direction, Solver};
use crate::network::{EdgeId, NodeGroup, NodeId, RenderScene};

const COLORS: &[&str] = &[
	"#d62728", "#1f77b4", "#2ca02c", "#7f7f7f", "#ff7f0e", "#9467bd", "#8c564b", "#e377c2",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;
const LEVEL_SPACING: f32 = 80.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: Option<NodeId>,
	pub label: Option<String>,
	pub color: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Rows a hierarchical layout pins nodes to.
#[derive(Clone, Debug)]
struct Layering {
	direction: Direction,
	rows: HashMap<DefaultNodeIdx, f32>,
}

/// Tiny LCG so a seed always produces the same initial placement.
struct SeededJitter(u32);

impl SeededJitter {
	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		f64::from(self.0 >> 8) / f64::from(1u32 << 24)
	}
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub smooth_edges: bool,
	edges: Vec<(EdgeId, DefaultNodeIdx, DefaultNodeIdx)>,
	layering: Option<Layering>,
}

impl ForceGraphState {
	pub fn new(scene: &RenderScene, seed: u32, width: f64, height: f64) -> Self {
		let options = &scene.options;
		let mut graph = ForceGraph::new(simulation_parameters(options.physics.solver));
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let mut jitter = SeededJitter(seed);
		let levels = levels(scene);
		let hierarchical = options.layout.hierarchical.enabled;
		let direction = options.layout.hierarchical.direction;
		let max_level = levels.values().copied().max().unwrap_or(0) as f32;
		let mut rows = HashMap::new();

		for (i, node) in scene.nodes.iter().enumerate() {
			let color = COLORS[node.group.index() as usize % COLORS.len()].to_owned();
			let angle = (i as f64) * 2.0 * PI / scene.nodes.len() as f64 + jitter.next();
			let radius = 100.0 + 40.0 * jitter.next();
			let (mut x, mut y) = ((radius * angle.cos()) as f32, (radius * angle.sin()) as f32);

			let row = levels.get(&node.id).copied().unwrap_or(0) as f32;
			let row = (row - max_level / 2.0) * LEVEL_SPACING;
			if hierarchical {
				match direction {
					Direction::DownUp => y = row,
					Direction::UpDown => y = -row,
					Direction::RightLeft => x = row,
					Direction::LeftRight => x = -row,
				}
			}

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: if node.group == NodeGroup::Target { 20.0 } else { 10.0 },
				is_anchor: false,
				user_data: NodeInfo {
					id: Some(node.id),
					label: node.label.clone(),
					color,
				},
			});
			id_to_idx.insert(node.id, idx);
			rows.insert(idx, row);
		}

		for edge in &scene.edges {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((edge.id, src, tgt));
			}
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			smooth_edges: options.smooth_edges(),
			layering: hierarchical.then_some(Layering { direction, rows }),
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Edges whose segment passes within half the hit radius of the point.
	pub fn edges_at_position(&self, sx: f64, sy: f64) -> Vec<EdgeId> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		self.edges
			.iter()
			.filter(|(_, src, tgt)| {
				let (Some(&a), Some(&b)) = (positions.get(src), positions.get(tgt)) else {
					return false;
				};
				distance_to_segment((gx, gy), a, b) < HIT_RADIUS / 2.0
			})
			.map(|(id, _, _)| *id)
			.collect()
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = node.data.user_data.id;
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(_, src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.pin_rows();
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	/// Keep every node on its level's row; physics only moves it along the row.
	fn pin_rows(&mut self) {
		let Some(layering) = &self.layering else {
			return;
		};
		self.graph.visit_nodes_mut(|node| {
			let Some(&row) = layering.rows.get(&node.index()) else {
				return;
			};
			match layering.direction {
				Direction::DownUp => node.data.y = row,
				Direction::UpDown => node.data.y = -row,
				Direction::RightLeft => node.data.x = row,
				Direction::LeftRight => node.data.x = -row,
			}
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn simulation_parameters(solver: Solver) -> SimulationParameters {
	match solver {
		Solver::HierarchicalRepulsion => SimulationParameters {
			force_charge: 250.0,
			force_spring: 0.02,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.8,
		},
		Solver::Repulsion => SimulationParameters {
			force_charge: 200.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		},
		Solver::BarnesHut | Solver::ForceAtlas2Based => SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		},
	}
}

/// Hops from the nearest root, following edges from product back to ingredient.
fn levels(scene: &RenderScene) -> HashMap<NodeId, usize> {
	let mut ingredients: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
	for edge in &scene.edges {
		ingredients.entry(edge.to).or_default().push(edge.from);
	}

	let mut levels = HashMap::new();
	let mut queue: VecDeque<NodeId> = scene
		.nodes
		.iter()
		.filter(|node| node.group == NodeGroup::Target)
		.map(|node| node.id)
		.collect();
	for id in &queue {
		levels.insert(*id, 0);
	}

	while let Some(id) = queue.pop_front() {
		let level = levels[&id];
		for child in ingredients.get(&id).into_iter().flatten() {
			if !levels.contains_key(child) {
				levels.insert(*child, level + 1);
				queue.push_back(*child);
			}
		}
	}
	levels
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < f64::EPSILON {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
