use std::cell::RefCell;
use std::rc::Rc;

use crate::network::render::{ClickListener, DoubleClickListener};
use crate::network::{ClickEvent, DoubleClickEvent};

/// Interaction listeners shared between a surface and its DOM closures.
///
/// A listener is taken out of its slot while it runs, so it may replace
/// itself (for example by reloading the network that owns the surface).
#[derive(Clone, Default)]
pub struct Listeners {
	click: Rc<RefCell<Option<ClickListener>>>,
	double_click: Rc<RefCell<Option<DoubleClickListener>>>,
}

impl Listeners {
	pub fn set_click(&self, listener: ClickListener) {
		*self.click.borrow_mut() = Some(listener);
	}

	pub fn set_double_click(&self, listener: DoubleClickListener) {
		*self.double_click.borrow_mut() = Some(listener);
	}

	pub fn click(&self, event: &ClickEvent) {
		dispatch(&self.click, |listener| listener(event));
	}

	pub fn double_click(&self, event: &DoubleClickEvent) {
		dispatch(&self.double_click, |listener| listener(event));
	}
}

/// Run the listener in `slot` with the cell released, restoring it unless
/// it was replaced meanwhile.
fn dispatch<L>(slot: &RefCell<Option<L>>, call: impl FnOnce(&mut L)) {
	let Some(mut listener) = slot.borrow_mut().take() else {
		return;
	};
	call(&mut listener);
	let mut slot = slot.borrow_mut();
	if slot.is_none() {
		*slot = Some(listener);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::network::NodeId;

	fn click_on(node: u32) -> ClickEvent {
		ClickEvent {
			nodes: vec![NodeId(node)],
			edges: Vec::new(),
		}
	}

	#[test]
	fn listener_survives_its_own_call() {
		let listeners = Listeners::default();
		let calls = Rc::new(Cell::new(0));
		let count = calls.clone();
		listeners.set_click(Box::new(move |_| count.set(count.get() + 1)));

		listeners.click(&click_on(0));
		listeners.click(&click_on(1));
		assert_eq!(calls.get(), 2);
	}

	#[test]
	fn listener_may_replace_itself() {
		let listeners = Listeners::default();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let (inner, sink) = (listeners.clone(), seen.clone());
		listeners.set_click(Box::new(move |event| {
			sink.borrow_mut().push(("first", event.nodes[0]));
			let sink = sink.clone();
			inner.set_click(Box::new(move |event| sink.borrow_mut().push(("second", event.nodes[0]))));
		}));

		listeners.click(&click_on(0));
		listeners.click(&click_on(1));
		assert_eq!(*seen.borrow(), vec![("first", NodeId(0)), ("second", NodeId(1))]);
	}

	#[test]
	fn double_click_without_listener_is_ignored() {
		Listeners::default().double_click(&DoubleClickEvent { nodes: Vec::new() });
	}
}
