use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use uuid::Uuid;

use super::algorithm::{AlgorithmKind, CancelToken, GenerationRequest};
use super::edge::Edge;
use super::error::{NetworkError, Result};
use super::events::{NetworkEvent, Subscribers, SubscriptionId};
use super::graph::Graph;
use super::interaction;
use super::layout::LayoutKind;
use super::node::Node;
use super::options::RenderOptions;
use super::pattern::{Filter, Pattern, compile_all};
use super::recipe::RecipeSource;
use super::render::{ImageResolver, RenderScene, RenderSurface, Renderer};
use super::stack::Stack;
use super::state::{DEFAULT_DEPTH, DEFAULT_LIMIT, NetworkState};

type ClickCallback = Rc<RefCell<dyn FnMut(Option<&Node>, Option<Vec<&Edge>>)>>;
type DoubleClickCallback = Rc<RefCell<dyn FnMut(Option<&Node>)>>;

/// Everything a traversal needs, detached from the network that made it.
///
/// Plans are `Send`, so a generation can run off the interactive thread and
/// be [installed](Network::install) once it finishes.
#[derive(Clone, Debug)]
pub struct GenerationPlan {
	pub target: Stack,
	pub filter: Filter,
	pub algorithm: AlgorithmKind,
	pub limit: usize,
	pub depth: usize,
}

impl GenerationPlan {
	pub fn run(&self, recipes: &dyn RecipeSource, cancel: &CancelToken) -> Result<Graph> {
		let request = GenerationRequest {
			target: &self.target,
			recipes,
			limit: self.limit,
			// the target itself occupies level 0
			depth: self.depth.checked_sub(1),
			filter: &self.filter,
			cancel,
		};
		self.algorithm.instance().generate_network(&request)
	}
}

/// A recipe graph for one target together with its configuration.
pub struct Network {
	id: String,
	target: Stack,
	whitelist: Vec<Pattern>,
	blacklist: Vec<Pattern>,
	algorithm: AlgorithmKind,
	limit: usize,
	depth: usize,
	seed: Option<u32>,
	layout: LayoutKind,
	options: RenderOptions,
	collapsed: bool,
	graph: Option<Graph>,
	scene: Option<RenderScene>,
	snapshot: Option<Rc<Graph>>,
	surface: Option<Box<dyn RenderSurface>>,
	on_click: Option<ClickCallback>,
	on_double_click: Option<DoubleClickCallback>,
	subscribers: Subscribers,
}

impl std::fmt::Debug for Network {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Network")
			.field("id", &self.id)
			.field("target", &self.target)
			.field("algorithm", &self.algorithm)
			.field("limit", &self.limit)
			.field("depth", &self.depth)
			.field("seed", &self.seed)
			.field("layout", &self.layout)
			.field("generated", &self.graph.is_some())
			.field("bound", &self.surface.is_some())
			.finish()
	}
}

impl Network {
	pub fn new(target: Stack) -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			target,
			whitelist: Vec::new(),
			blacklist: Vec::new(),
			algorithm: AlgorithmKind::default(),
			limit: DEFAULT_LIMIT,
			depth: DEFAULT_DEPTH,
			seed: None,
			layout: LayoutKind::default(),
			options: RenderOptions::default(),
			collapsed: false,
			graph: None,
			scene: None,
			snapshot: None,
			surface: None,
			on_click: None,
			on_double_click: None,
			subscribers: Subscribers::default(),
		}
	}

	// --- persistence ---

	pub fn serialize(&self) -> NetworkState {
		NetworkState {
			target: self.target.clone(),
			vis_options: Some(self.options.clone()),
			id: self.id.clone(),
			whitelist: self.whitelist_sources(),
			blacklist: self.blacklist_sources(),
			algorithm: self.algorithm.index(),
			limit: self.limit,
			depth: self.depth,
			seed: self.seed,
			selected_layout: self.layout.index(),
		}
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(&self.serialize())?)
	}

	pub fn from_state(state: NetworkState) -> Result<Self> {
		let mut network = Network::new(Stack::default());
		network.deserialize(state)?;
		Ok(network)
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Self::from_state(serde_json::from_str(json)?)
	}

	/// Overwrite the configuration from persisted state.
	///
	/// Everything is validated before anything is assigned, so a failure
	/// leaves the network as it was.
	pub fn deserialize(&mut self, state: NetworkState) -> Result<()> {
		let whitelist = compile_all(state.whitelist)?;
		let blacklist = compile_all(state.blacklist)?;
		let algorithm = AlgorithmKind::from_index(state.algorithm)?;
		let layout = LayoutKind::from_index(state.selected_layout)?;

		self.target = state.target;
		self.options = state.vis_options.unwrap_or_default();
		self.id = state.id;
		self.whitelist = whitelist;
		self.blacklist = blacklist;
		self.algorithm = algorithm;
		self.limit = state.limit;
		self.depth = state.depth;
		self.seed = state.seed;
		self.layout = layout;
		debug!("restored network {} targeting {:?}", self.id, self.target.canonical());
		Ok(())
	}

	// --- generation ---

	/// Snapshot the current configuration for a traversal.
	pub fn plan(&self) -> Result<GenerationPlan> {
		if self.target.is_empty() {
			return Err(NetworkError::EmptyTarget);
		}
		Ok(GenerationPlan {
			target: self.target.clone(),
			filter: Filter::new(self.whitelist.clone(), self.blacklist.clone()),
			algorithm: self.algorithm,
			limit: self.limit,
			depth: self.depth,
		})
	}

	/// Replace the graph wholesale with a finished generation.
	pub fn install(&mut self, graph: Graph) {
		let (nodes, edges) = (graph.nodes.len(), graph.edges.len());
		self.graph = Some(graph);
		info!("network {} generated: {nodes} node(s), {edges} edge(s)", self.id);
		self.emit(NetworkEvent::Generated { nodes, edges });
	}

	pub fn generate(&mut self, recipes: &dyn RecipeSource) -> Result<&Graph> {
		self.generate_with(recipes, &CancelToken::new())
	}

	/// Generate, aborting without touching the current graph if `cancel` fires.
	pub fn generate_with(
		&mut self,
		recipes: &dyn RecipeSource,
		cancel: &CancelToken,
	) -> Result<&Graph> {
		let graph = self.plan()?.run(recipes, cancel)?;
		self.install(graph);
		self.graph.as_ref().ok_or(NetworkError::NotGenerated)
	}

	pub fn graph(&self) -> Option<&Graph> {
		self.graph.as_ref()
	}

	pub fn nodes(&self) -> &[Node] {
		self.graph.as_ref().map_or(&[], |graph| graph.nodes.as_slice())
	}

	pub fn edges(&self) -> &[Edge] {
		self.graph.as_ref().map_or(&[], |graph| graph.edges.as_slice())
	}

	pub fn is_generated(&self) -> bool {
		self.graph.is_some()
	}

	// --- rendering ---

	/// The scene a reload would bind right now.
	pub fn render_scene(&self, images: &dyn ImageResolver) -> Result<RenderScene> {
		let graph = self.resolved_graph(images)?;
		Ok(RenderScene::new(&graph, &self.options, self.seed))
	}

	fn resolved_graph(&self, images: &dyn ImageResolver) -> Result<Graph> {
		let mut graph = self.graph.clone().ok_or(NetworkError::NotGenerated)?;
		for node in &mut graph.nodes {
			let image = node.name().and_then(|name| images.resolve(name));
			node.set_image(image);
			node.amount = node.stack.amount;
		}
		Ok(graph)
	}

	/// Bind the graph to a fresh surface in the container named by `id`.
	///
	/// The previous surface is released first, so after a failed bind the
	/// network is unbound with no last scene. On success the seed the
	/// surface used is captured, so later reloads lay out identically.
	pub fn reload(
		&mut self,
		renderer: &mut dyn Renderer,
		images: &dyn ImageResolver,
	) -> Result<u32> {
		let graph = self.resolved_graph(images)?;
		let scene = RenderScene::new(&graph, &self.options, self.seed);

		self.unbind();
		let surface = renderer.bind(&self.id, &scene)?;
		let seed = surface.seed();
		debug!("network {} bound with seed {seed}", self.id);

		let seed_changed = self.seed != Some(seed);
		self.seed = Some(seed);
		self.options.layout.random_seed = Some(seed);
		self.snapshot = Some(Rc::new(graph.clone()));
		self.graph = Some(graph);
		self.scene = Some(scene);
		self.surface = Some(surface);
		self.bind_click();
		self.bind_double_click();

		if seed_changed {
			self.emit(NetworkEvent::SeedChanged(Some(seed)));
		}
		self.emit(NetworkEvent::Reloaded { seed });
		Ok(seed)
	}

	/// The scene handed to the renderer by the last successful reload.
	pub fn last_scene(&self) -> Option<&RenderScene> {
		self.scene.as_ref()
	}

	pub fn is_bound(&self) -> bool {
		self.surface.is_some()
	}

	/// Release the render surface, if any.
	pub fn unbind(&mut self) {
		self.surface = None;
		self.scene = None;
		self.snapshot = None;
	}

	/// Mutate the renderer configuration, reloading if a graph exists.
	pub fn apply_network_options(
		&mut self,
		mutate: impl FnOnce(&mut RenderOptions),
		renderer: &mut dyn Renderer,
		images: &dyn ImageResolver,
	) -> Result<()> {
		mutate(&mut self.options);
		self.emit(NetworkEvent::OptionsChanged);
		if self.graph.is_some() {
			self.reload(renderer, images)?;
		}
		Ok(())
	}

	pub fn render_options(&self) -> &RenderOptions {
		&self.options
	}

	pub fn set_render_options(&mut self, options: RenderOptions) {
		self.options = options;
		self.emit(NetworkEvent::OptionsChanged);
	}

	// --- interaction ---

	/// Called with the single selected node and the selected edges.
	pub fn set_on_click(&mut self, callback: impl FnMut(Option<&Node>, Option<Vec<&Edge>>) + 'static) {
		self.on_click = Some(Rc::new(RefCell::new(callback)));
		self.bind_click();
	}

	/// Called with the node under the pointer.
	pub fn set_on_double_click(&mut self, callback: impl FnMut(Option<&Node>) + 'static) {
		self.on_double_click = Some(Rc::new(RefCell::new(callback)));
		self.bind_double_click();
	}

	fn bind_click(&mut self) {
		let (Some(surface), Some(graph), Some(callback)) =
			(self.surface.as_mut(), self.snapshot.clone(), self.on_click.clone())
		else {
			return;
		};
		surface.on_click(Box::new(move |event| {
			let node = interaction::clicked_node(&graph, event);
			let edges = interaction::clicked_edges(&graph, event);
			(&mut *callback.borrow_mut())(node, edges);
		}));
	}

	fn bind_double_click(&mut self) {
		let (Some(surface), Some(graph), Some(callback)) = (
			self.surface.as_mut(),
			self.snapshot.clone(),
			self.on_double_click.clone(),
		) else {
			return;
		};
		surface.on_double_click(Box::new(move |event| {
			let node = interaction::double_clicked_node(&graph, event);
			(&mut *callback.borrow_mut())(node);
		}));
	}

	// --- configuration ---

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn new_id(&mut self) {
		self.id = Uuid::new_v4().to_string();
		self.emit(NetworkEvent::IdChanged);
	}

	pub fn target(&self) -> &Stack {
		&self.target
	}

	/// Canonical name of the target.
	pub fn target_name(&self) -> Option<&str> {
		self.target.canonical()
	}

	/// Replace the target with a single-name stack.
	pub fn set_target(&mut self, name: impl Into<String>) {
		self.set_target_stack(Stack::new([name.into()]));
	}

	pub fn set_target_stack(&mut self, target: Stack) {
		self.target = target;
		self.emit(NetworkEvent::TargetChanged);
	}

	pub fn set_target_amount(&mut self, amount: u32) {
		self.target.set_amount(amount);
		self.emit(NetworkEvent::TargetChanged);
	}

	pub fn algorithm(&self) -> AlgorithmKind {
		self.algorithm
	}

	pub fn set_algorithm(&mut self, algorithm: AlgorithmKind) {
		self.algorithm = algorithm;
		self.emit(NetworkEvent::AlgorithmChanged(algorithm));
	}

	/// Select an algorithm by registry index.
	pub fn set_algorithm_index(&mut self, index: usize) -> Result<()> {
		let algorithm = AlgorithmKind::from_index(index).inspect_err(|err| warn!("{err}"))?;
		self.set_algorithm(algorithm);
		Ok(())
	}

	/// Display names of every registered algorithm.
	pub fn algorithm_names(&self) -> Vec<&'static str> {
		AlgorithmKind::names()
	}

	pub fn limit(&self) -> usize {
		self.limit
	}

	pub fn set_limit(&mut self, limit: usize) {
		self.limit = limit;
		self.emit_bounds();
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn set_depth(&mut self, depth: usize) {
		self.depth = depth;
		self.emit_bounds();
	}

	fn emit_bounds(&mut self) {
		let (limit, depth) = (self.limit, self.depth);
		self.emit(NetworkEvent::BoundsChanged { limit, depth });
	}

	pub fn seed(&self) -> Option<u32> {
		self.seed
	}

	pub fn set_seed(&mut self, seed: Option<u32>) {
		self.seed = seed;
		self.emit(NetworkEvent::SeedChanged(seed));
	}

	/// Forget the seed so the next reload lets the renderer pick one.
	pub fn new_seed(&mut self) {
		self.set_seed(None);
	}

	pub fn layout(&self) -> LayoutKind {
		self.layout
	}

	/// Select a layout and rewrite the renderer configuration for it.
	///
	/// Takes effect on the next reload.
	pub fn set_layout(&mut self, layout: LayoutKind) {
		self.layout = layout;
		layout.apply(&mut self.options);
		self.emit(NetworkEvent::LayoutChanged(layout));
	}

	pub fn set_layout_index(&mut self, index: usize) -> Result<()> {
		let layout = LayoutKind::from_index(index).inspect_err(|err| warn!("{err}"))?;
		self.set_layout(layout);
		Ok(())
	}

	pub fn collapsed(&self) -> bool {
		self.collapsed
	}

	pub fn set_collapsed(&mut self, collapsed: bool) {
		self.collapsed = collapsed;
		self.emit(NetworkEvent::CollapsedChanged(collapsed));
	}

	// --- filters ---

	pub fn whitelist(&self) -> &[Pattern] {
		&self.whitelist
	}

	pub fn blacklist(&self) -> &[Pattern] {
		&self.blacklist
	}

	pub fn whitelist_sources(&self) -> Vec<String> {
		self.whitelist.iter().map(Pattern::to_string).collect()
	}

	pub fn blacklist_sources(&self) -> Vec<String> {
		self.blacklist.iter().map(Pattern::to_string).collect()
	}

	pub fn set_whitelist(&mut self, whitelist: Vec<Pattern>) {
		self.whitelist = whitelist;
		self.emit(NetworkEvent::FiltersChanged);
	}

	pub fn set_blacklist(&mut self, blacklist: Vec<Pattern>) {
		self.blacklist = blacklist;
		self.emit(NetworkEvent::FiltersChanged);
	}

	/// Compile and replace the whitelist; nothing changes on failure.
	pub fn set_whitelist_sources<I, S>(&mut self, sources: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let whitelist = compile_all(sources).inspect_err(|err| warn!("{err}"))?;
		self.set_whitelist(whitelist);
		Ok(())
	}

	/// Compile and replace the blacklist; nothing changes on failure.
	pub fn set_blacklist_sources<I, S>(&mut self, sources: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let blacklist = compile_all(sources).inspect_err(|err| warn!("{err}"))?;
		self.set_blacklist(blacklist);
		Ok(())
	}

	pub fn add_whitelist_item(&mut self, item: Pattern) {
		self.whitelist.push(item);
		self.emit(NetworkEvent::FiltersChanged);
	}

	pub fn add_blacklist_item(&mut self, item: Pattern) {
		self.blacklist.push(item);
		self.emit(NetworkEvent::FiltersChanged);
	}

	/// Remove every whitelist pattern whose source is `item`.
	pub fn remove_whitelist_item(&mut self, item: &str) -> bool {
		let removed = remove_source(&mut self.whitelist, item);
		if removed {
			self.emit(NetworkEvent::FiltersChanged);
		}
		removed
	}

	/// Remove every blacklist pattern whose source is `item`.
	pub fn remove_blacklist_item(&mut self, item: &str) -> bool {
		let removed = remove_source(&mut self.blacklist, item);
		if removed {
			self.emit(NetworkEvent::FiltersChanged);
		}
		removed
	}

	// --- notification ---

	pub fn subscribe(&mut self, listener: impl FnMut(&NetworkEvent) + 'static) -> SubscriptionId {
		self.subscribers.subscribe(listener)
	}

	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		self.subscribers.unsubscribe(id)
	}

	fn emit(&mut self, event: NetworkEvent) {
		self.subscribers.emit(&event);
	}
}

fn remove_source(patterns: &mut Vec<Pattern>, source: &str) -> bool {
	let before = patterns.len();
	patterns.retain(|pattern| pattern.source() != source);
	patterns.len() != before
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::network::node::NodeGroup;
	use crate::network::recipe::RecipeBook;

	fn iron() -> RecipeBook {
		RecipeBook::new()
			.with("iron_ingot", &[("iron_ore", 1)])
			.with("iron_ore", &[])
	}

	#[test]
	fn defaults() {
		let network = Network::new(Stack::new(["iron_ingot"]));
		assert_eq!(network.limit(), 100);
		assert_eq!(network.depth(), 3);
		assert_eq!(network.algorithm(), AlgorithmKind::BreadthFirst);
		assert_eq!(network.layout(), LayoutKind::Normal);
		assert_eq!(network.seed(), None);
		assert!(!network.is_generated());
		assert!(Uuid::parse_str(network.id()).is_ok());
	}

	#[test]
	fn generate_replaces_graph() {
		let mut network = Network::new(Stack::new(["iron_ingot"]).with_amount(1));
		network.set_limit(10);
		let graph = network.generate(&iron()).unwrap();
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(network.nodes()[0].group, NodeGroup::Target);

		network.set_target("iron_ore");
		network.generate(&iron()).unwrap();
		assert_eq!(network.nodes().len(), 1);
		assert!(network.edges().is_empty());
	}

	#[test]
	fn depth_zero_never_expands() {
		let mut network = Network::new(Stack::new(["iron_ingot"]));
		network.set_depth(0);
		network.generate(&iron()).unwrap();
		assert_eq!(network.nodes().len(), 1);
	}

	#[test]
	fn empty_target_is_rejected() {
		let mut network = Network::new(Stack::default());
		assert!(matches!(network.generate(&iron()), Err(NetworkError::EmptyTarget)));
		assert!(!network.is_generated());
	}

	#[test]
	fn cancelled_generation_keeps_previous_graph() {
		let mut network = Network::new(Stack::new(["iron_ingot"]));
		network.generate(&iron()).unwrap();

		network.set_target("iron_ore");
		let cancel = CancelToken::new();
		cancel.cancel();
		assert!(matches!(
			network.generate_with(&iron(), &cancel),
			Err(NetworkError::Cancelled)
		));
		assert_eq!(network.nodes().len(), 2);
		assert_eq!(network.nodes()[0].name(), Some("iron_ingot"));
	}

	#[test]
	fn plan_runs_on_another_thread() {
		let network = Network::new(Stack::new(["iron_ingot"]));
		let plan = network.plan().unwrap();
		let graph = std::thread::spawn(move || plan.run(&iron(), &CancelToken::new()))
			.join()
			.unwrap()
			.unwrap();

		let mut network = network;
		network.install(graph);
		assert_eq!(network.nodes().len(), 2);
	}

	#[test]
	fn filter_mutators() {
		let mut network = Network::new(Stack::new(["a"]));
		network.set_whitelist_sources(["ore", "ingot"]).unwrap();
		network.add_whitelist_item(Pattern::new("ore").unwrap());
		assert_eq!(network.whitelist_sources(), ["ore", "ingot", "ore"]);

		assert!(network.remove_whitelist_item("ore"));
		assert_eq!(network.whitelist_sources(), ["ingot"]);
		assert!(!network.remove_whitelist_item("ore"));

		assert!(network.set_blacklist_sources(["ok", "(bad"]).is_err());
		assert!(network.blacklist().is_empty());
		network.add_blacklist_item(Pattern::new("dust").unwrap());
		assert!(network.remove_blacklist_item("dust"));
	}

	#[test]
	fn mutators_notify_subscribers() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut network = Network::new(Stack::new(["iron_ingot"]));
		let sink = seen.clone();
		network.subscribe(move |event| sink.borrow_mut().push(event.clone()));

		network.set_depth(2);
		network.set_algorithm(AlgorithmKind::DepthFirst);
		network.generate(&iron()).unwrap();
		assert!(network.set_algorithm_index(5).is_err());

		assert_eq!(
			*seen.borrow(),
			vec![
				NetworkEvent::BoundsChanged { limit: 100, depth: 2 },
				NetworkEvent::AlgorithmChanged(AlgorithmKind::DepthFirst),
				NetworkEvent::Generated { nodes: 2, edges: 1 },
			]
		);
	}

	#[test]
	fn layout_selection_rewrites_options() {
		let mut network = Network::new(Stack::new(["a"]));
		network.set_layout(LayoutKind::Hierarchical);
		assert!(network.render_options().layout.hierarchical.enabled);
		assert!(network.set_layout_index(3).is_err());
		assert_eq!(network.layout(), LayoutKind::Hierarchical);
	}

	#[test]
	fn deserialize_is_atomic() {
		let mut network = Network::new(Stack::new(["a"]));
		network.set_limit(7);
		let mut state = network.serialize();
		state.limit = 50;
		state.blacklist = vec!["[".into()];

		assert!(matches!(
			network.deserialize(state.clone()),
			Err(NetworkError::InvalidPattern { .. })
		));
		assert_eq!(network.limit(), 7);

		state.blacklist.clear();
		state.algorithm = 4;
		assert!(matches!(
			network.deserialize(state),
			Err(NetworkError::UnknownAlgorithm(4))
		));
		assert_eq!(network.limit(), 7);
	}

	#[test]
	fn new_id_changes_identity() {
		let mut network = Network::new(Stack::new(["a"]));
		let old = network.id().to_owned();
		network.new_id();
		assert_ne!(network.id(), old);
	}
}
