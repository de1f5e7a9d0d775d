use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;

use crate::components::force_graph::NetworkCanvas;
use crate::network::{
	AlgorithmKind, ImageResolver, LayoutKind, Network, NoImages, RecipeBook, Stack,
};

/// A small crafting tree with a shared ingredient and a smelting loop.
const SAMPLE_RECIPES: &str = r#"{
	"electronic_circuit": [
		{ "names": ["copper_cable"], "quantity": 3 },
		{ "names": ["iron_plate"], "quantity": 1 }
	],
	"copper_cable": [{ "names": ["copper_plate"], "quantity": 1 }],
	"copper_plate": [{ "names": ["copper_ore"], "quantity": 1 }],
	"iron_plate": [{ "names": ["iron_ore"], "quantity": 1 }],
	"iron_gear_wheel": [{ "names": ["iron_plate"], "quantity": 2 }],
	"inserter": [
		{ "names": ["electronic_circuit"], "quantity": 1 },
		{ "names": ["iron_gear_wheel"], "quantity": 1 },
		{ "names": ["iron_plate"], "quantity": 1 }
	],
	"iron_ore": [{ "names": ["scrap"], "quantity": 4 }],
	"scrap": [{ "names": ["iron_plate"], "quantity": 1 }]
}"#;

fn sample_recipes() -> RecipeBook {
	RecipeBook::from_json(SAMPLE_RECIPES).unwrap_or_else(|err| {
		warn!("sample recipes unavailable: {err}");
		RecipeBook::new()
	})
}

/// Network explorer page
#[component]
pub fn Home() -> impl IntoView {
	let recipes = Rc::new(sample_recipes());
	let network = Rc::new(RefCell::new(Network::new(
		Stack::new(["inserter"]).with_amount(1),
	)));
	let images: Rc<dyn ImageResolver> = Rc::new(NoImages);
	let revision = RwSignal::new(0u64);
	let selected = RwSignal::new(None::<String>);
	let status = RwSignal::new(String::new());

	{
		let mut network = network.borrow_mut();
		network.set_on_click(move |node, edges| {
			let label = match (node, edges) {
				(Some(node), _) => node.name().map(str::to_owned),
				(None, Some(edges)) => Some(format!("{} edge(s)", edges.len())),
				(None, None) => None,
			};
			selected.set(label);
		});
		network.set_on_double_click(move |node| {
			if let Some(name) = node.and_then(|node| node.name()) {
				selected.set(Some(format!("{name} (double click)")));
			}
		});
	}

	let regenerate = {
		let (network, recipes) = (network.clone(), recipes.clone());
		move || {
			let mut network = network.borrow_mut();
			match network.generate(recipes.as_ref()) {
				Ok(graph) => status.set(format!(
					"{} node(s), {} edge(s)",
					graph.nodes.len(),
					graph.edges.len()
				)),
				Err(err) => status.set(err.to_string()),
			}
			revision.update(|r| *r += 1);
		}
	};
	regenerate();

	let layout_buttons = LayoutKind::ALL
		.into_iter()
		.map(|layout| {
			let network = network.clone();
			let on_click = move |_| {
				network.borrow_mut().set_layout(layout);
				revision.update(|r| *r += 1);
			};
			view! { <button on:click=on_click>{layout.name()}</button> }
		})
		.collect_view();

	let algorithm_buttons = AlgorithmKind::ALL
		.into_iter()
		.map(|algorithm| {
			let (network, regenerate) = (network.clone(), regenerate.clone());
			let on_click = move |_| {
				network.borrow_mut().set_algorithm(algorithm);
				regenerate();
			};
			view! { <button on:click=on_click>{algorithm.name()}</button> }
		})
		.collect_view();

	let depth_buttons = [(-1i64, "Depth -"), (1, "Depth +")]
		.into_iter()
		.map(|(delta, text)| {
			let (network, regenerate) = (network.clone(), regenerate.clone());
			let on_click = move |_| {
				{
					let mut network = network.borrow_mut();
					let depth = (network.depth() as i64 + delta).max(0) as usize;
					network.set_depth(depth);
				}
				regenerate();
			};
			view! { <button on:click=on_click>{text}</button> }
		})
		.collect_view();

	let on_new_seed = {
		let network = network.clone();
		move |_| {
			network.borrow_mut().new_seed();
			revision.update(|r| *r += 1);
		}
	};

	view! {
		<div class="fullscreen-graph">
			<NetworkCanvas network=network images=images revision=revision fullscreen=true />
			<div class="graph-overlay">
				<h1>"Recipe Network"</h1>
				<p class="subtitle">{move || status.get()}</p>
				<div class="controls">
					{layout_buttons}
					{algorithm_buttons}
					{depth_buttons}
					<button on:click=on_new_seed>"New seed"</button>
				</div>
				<p class="selection">
					{move || selected.get().unwrap_or_else(|| "Click a node or edge".to_owned())}
				</p>
			</div>
		</div>
	}
}
