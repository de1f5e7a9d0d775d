//! Canvas implementation of the network render boundary.
//!
//! A [`CanvasRenderer`] mounts a canvas inside the element whose id matches
//! the network id, runs the force simulation on animation frames and turns
//! pointer input into click and double-click events. Dropping the returned
//! surface stops the loop and removes the canvas together with its
//! listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::Listeners;
use crate::network::render::{ClickListener, DoubleClickListener};
use crate::network::{
	ClickEvent, DoubleClickEvent, NetworkError, RenderScene, RenderSurface, Renderer, Result,
};

type SharedState = Rc<RefCell<ForceGraphState>>;
type MouseHandler = Closure<dyn FnMut(MouseEvent)>;

/// Pointer travel, in pixels, below which a press and release is a click.
const CLICK_SLOP: f64 = 4.0;
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Binds scenes to canvases created inside existing DOM containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasRenderer;

impl Renderer for CanvasRenderer {
	fn bind(&mut self, container: &str, scene: &RenderScene) -> Result<Box<dyn RenderSurface>> {
		let binding = || NetworkError::RenderBinding(container.to_owned());
		let document = web_sys::window()
			.and_then(|window| window.document())
			.ok_or_else(binding)?;
		let host = document.get_element_by_id(container).ok_or_else(binding)?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.ok()
			.and_then(|element| element.dyn_into().ok())
			.ok_or_else(binding)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or_else(binding)?;

		let (w, h) = host_size(&host);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		canvas.set_class_name("force-graph-canvas");
		let _ = canvas.style().set_property("display", "block");
		let _ = canvas.style().set_property("cursor", "grab");
		host.append_child(&canvas).map_err(|_| binding())?;

		let seed = scene
			.seed()
			.unwrap_or_else(|| (js_sys::Math::random() * f64::from(u32::MAX)) as u32);
		let state = Rc::new(RefCell::new(ForceGraphState::new(scene, seed, w, h)));
		debug!(
			"bound {} node(s) to #{container} ({w}x{h}, seed {seed})",
			scene.nodes.len()
		);

		let mut surface = CanvasSurface {
			canvas,
			host,
			state,
			seed,
			listeners: Listeners::default(),
			mouse_handlers: Vec::new(),
			wheel_handler: None,
			resize_handler: None,
			animate: Rc::new(RefCell::new(None)),
			frame: Rc::new(Cell::new(None)),
		};
		surface.attach_pointer_handlers();
		surface.attach_resize_handler();
		surface.start(ctx);
		Ok(Box::new(surface))
	}
}

fn host_size(host: &Element) -> (f64, f64) {
	let (w, h) = (host.client_width() as f64, host.client_height() as f64);
	(
		if w > 0.0 { w } else { FALLBACK_SIZE.0 },
		if h > 0.0 { h } else { FALLBACK_SIZE.1 },
	)
}

fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// A live canvas rendering of one scene.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	host: Element,
	state: SharedState,
	seed: u32,
	listeners: Listeners,
	mouse_handlers: Vec<(&'static str, MouseHandler)>,
	wheel_handler: Option<Closure<dyn FnMut(WheelEvent)>>,
	resize_handler: Option<Closure<dyn FnMut()>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl CanvasSurface {
	fn on_mouse(&mut self, event: &'static str, handler: impl FnMut(MouseEvent) + 'static) {
		let closure = MouseHandler::new(handler);
		let _ = self
			.canvas
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
		self.mouse_handlers.push((event, closure));
	}

	fn attach_pointer_handlers(&mut self) {
		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		self.on_mouse("mousedown", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			let mut s = state.borrow_mut();
			if let Some(idx) = s.node_at_position(x, y) {
				let mut start = (0.0, 0.0);
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						start = (node.x(), node.y());
					}
				});
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				(s.drag.node_start_x, s.drag.node_start_y) = start;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		});

		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		self.on_mouse("mousemove", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			let mut s = state.borrow_mut();
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					s.drag.moved = true;
				}
				if let (Some(idx), true) = (s.drag.node_idx, s.drag.moved) {
					let k = s.transform.k;
					let (nx, ny) = (
						s.drag.node_start_x + (dx / k) as f32,
						s.drag.node_start_y + (dy / k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		});

		let (state, canvas, listeners) =
			(self.state.clone(), self.canvas.clone(), self.listeners.clone());
		self.on_mouse("mouseup", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			let click = {
				let mut s = state.borrow_mut();
				let click = if s.drag.active && !s.drag.moved {
					s.drag
						.node_idx
						.and_then(|idx| s.node_id(idx))
						.map(|id| ClickEvent {
							nodes: vec![id],
							edges: Vec::new(),
						})
				} else if s.pan.active && (x - s.pan.start_x).hypot(y - s.pan.start_y) <= CLICK_SLOP {
					Some(ClickEvent {
						nodes: Vec::new(),
						edges: s.edges_at_position(x, y),
					})
				} else {
					None
				};
				s.drag.active = false;
				s.drag.node_idx = None;
				s.pan.active = false;
				click
			};
			// listeners run with the state released
			if let Some(click) = click {
				listeners.click(&click);
			}
		});

		let state = self.state.clone();
		self.on_mouse("mouseleave", move |_| {
			let mut s = state.borrow_mut();
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		});

		let (state, canvas, listeners) =
			(self.state.clone(), self.canvas.clone(), self.listeners.clone());
		self.on_mouse("dblclick", move |ev| {
			let (x, y) = local_position(&canvas, &ev);
			let nodes = {
				let s = state.borrow();
				s.node_at_position(x, y)
					.and_then(|idx| s.node_id(idx))
					.into_iter()
					.collect()
			};
			listeners.double_click(&DoubleClickEvent { nodes });
		});

		let (state, canvas) = (self.state.clone(), self.canvas.clone());
		let wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
			ev.prevent_default();
			let (x, y) = local_position(&canvas, &ev);
			let mut s = state.borrow_mut();
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		});
		let _ = self
			.canvas
			.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref());
		self.wheel_handler = Some(wheel);
	}

	fn attach_resize_handler(&mut self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let (state, canvas, host) = (self.state.clone(), self.canvas.clone(), self.host.clone());
		let resize = Closure::<dyn FnMut()>::new(move || {
			let (w, h) = host_size(&host);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			state.borrow_mut().resize(w, h);
		});
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
		self.resize_handler = Some(resize);
	}

	fn start(&self, ctx: CanvasRenderingContext2d) {
		let (state, frame, animate_inner) =
			(self.state.clone(), self.frame.clone(), self.animate.clone());
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut s = state.borrow_mut();
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(&s, &ctx);
			}
			if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let (Some(cb), Some(window)) = (self.animate.borrow().as_ref(), web_sys::window()) {
			self.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}
}

impl RenderSurface for CanvasSurface {
	fn seed(&self) -> u32 {
		self.seed
	}

	fn on_click(&mut self, listener: ClickListener) {
		self.listeners.set_click(listener);
	}

	fn on_double_click(&mut self, listener: DoubleClickListener) {
		self.listeners.set_double_click(listener);
	}
}

impl Drop for CanvasSurface {
	fn drop(&mut self) {
		let window = web_sys::window();
		if let (Some(window), Some(id)) = (&window, self.frame.take()) {
			let _ = window.cancel_animation_frame(id);
		}
		// breaks the closure's reference to itself
		self.animate.borrow_mut().take();

		for (event, handler) in self.mouse_handlers.drain(..) {
			let _ = self
				.canvas
				.remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
		}
		if let Some(wheel) = self.wheel_handler.take() {
			let _ = self
				.canvas
				.remove_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref());
		}
		if let (Some(window), Some(resize)) = (&window, self.resize_handler.take()) {
			let _ = window.remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
		}
		self.canvas.remove();
		debug!("released canvas surface (seed {})", self.seed);
	}
}
