use super::algorithm::AlgorithmKind;
use super::layout::LayoutKind;

/// A change observed on a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkEvent {
	TargetChanged,
	FiltersChanged,
	AlgorithmChanged(AlgorithmKind),
	BoundsChanged { limit: usize, depth: usize },
	LayoutChanged(LayoutKind),
	OptionsChanged,
	SeedChanged(Option<u32>),
	IdChanged,
	CollapsedChanged(bool),
	/// A generation replaced the graph. Owners persist settings on this.
	Generated { nodes: usize, edges: usize },
	/// The graph was bound to a fresh render surface.
	Reloaded { seed: u32 },
}

/// Handle returned by [`Network::subscribe`](crate::network::Network::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&NetworkEvent)>;

/// Observers notified by every network mutator.
#[derive(Default)]
pub struct Subscribers {
	next: u64,
	listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
	pub fn subscribe(&mut self, listener: impl FnMut(&NetworkEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next);
		self.next += 1;
		self.listeners.push((id, Box::new(listener)));
		id
	}

	/// Returns whether a listener was removed.
	pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
		let before = self.listeners.len();
		self.listeners.retain(|(existing, _)| *existing != id);
		self.listeners.len() != before
	}

	pub fn emit(&mut self, event: &NetworkEvent) {
		for (_, listener) in &mut self.listeners {
			listener(event);
		}
	}
}

impl std::fmt::Debug for Subscribers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscribers")
			.field("listeners", &self.listeners.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;

	#[test]
	fn unsubscribed_listeners_stop_receiving() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut subscribers = Subscribers::default();
		let sink = seen.clone();
		let id = subscribers.subscribe(move |event| sink.borrow_mut().push(event.clone()));

		subscribers.emit(&NetworkEvent::TargetChanged);
		assert!(subscribers.unsubscribe(id));
		assert!(!subscribers.unsubscribe(id));
		subscribers.emit(&NetworkEvent::IdChanged);

		assert_eq!(*seen.borrow(), vec![NetworkEvent::TargetChanged]);
		assert!(subscribers.listeners.is_empty());
	}
}
