use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};

use super::surface::CanvasRenderer;
use crate::network::{ImageResolver, Network};

/// Hosts a network's render container and reloads it when `revision` changes.
///
/// The container's id is the network id, which is where the canvas renderer
/// looks for it.
#[component]
pub fn NetworkCanvas(
	network: Rc<RefCell<Network>>,
	images: Rc<dyn ImageResolver>,
	#[prop(into)] revision: Signal<u64>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let container_id = network.borrow().id().to_owned();

	Effect::new(move |_| {
		let revision = revision.get();
		if host_ref.get().is_none() {
			return;
		}
		let mut network = network.borrow_mut();
		if !network.is_generated() {
			return;
		}
		match network.reload(&mut CanvasRenderer, images.as_ref()) {
			Ok(seed) => info!("reloaded network {} (revision {revision}, seed {seed})", network.id()),
			Err(err) => warn!("reload of network {} failed: {err}", network.id()),
		}
	});

	let class = if fullscreen {
		"network-canvas fullscreen-graph"
	} else {
		"network-canvas"
	};

	view! { <div node_ref=host_ref id=container_id class=class /> }
}
