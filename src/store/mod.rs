//! Application state store.
//!
//! A single owner holds the state and applies typed [`Action`] messages in
//! order. Each applied action publishes a new immutable [`AppState`] and
//! notifies subscribers, who read the current state back through
//! [`Store::state`].

mod action;
/// Data shapes exchanged with the feed.
pub mod model;
mod state;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

pub use action::Action;
pub use state::AppState;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Identifies one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Inner {
	state: Arc<AppState>,
	mailbox: VecDeque<Action>,
	draining: bool,
	listeners: Vec<(ListenerId, Listener)>,
	next_listener: u64,
}

/// Cloneable handle to the store.
#[derive(Clone, Default)]
pub struct Store {
	inner: Arc<Mutex<Inner>>,
}

impl Store {
	/// A store holding the initial state.
	pub fn new() -> Self {
		Self::default()
	}

	/// A store starting from `state`.
	pub fn with_state(state: AppState) -> Self {
		let store = Self::default();
		store.lock().state = Arc::new(state);
		store
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// The most recently published state.
	pub fn state(&self) -> Arc<AppState> {
		self.lock().state.clone()
	}

	/// Queues an action and, unless a dispatch is already in progress,
	/// applies queued actions one by one, notifying listeners after each.
	///
	/// Actions dispatched from within a listener are applied after the
	/// current notification round finishes.
	pub fn dispatch(&self, action: Action) {
		{
			let mut inner = self.lock();
			inner.mailbox.push_back(action);
			if inner.draining {
				return;
			}
			inner.draining = true;
		}

		loop {
			let listeners: Vec<Listener> = {
				let mut inner = self.lock();
				let Some(action) = inner.mailbox.pop_front() else {
					inner.draining = false;
					return;
				};
				trace!("apply {action:?}");
				let next = inner.state.next(action);
				inner.state = Arc::new(next);
				inner.listeners.iter().map(|(_, l)| l.clone()).collect()
			};
			for listener in listeners {
				listener();
			}
		}
	}

	/// Registers a change callback. The returned [`Subscription`] releases it
	/// when dropped.
	pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
		let mut inner = self.lock();
		let id = ListenerId(inner.next_listener);
		inner.next_listener += 1;
		inner.listeners.push((id, Arc::new(listener)));
		Subscription {
			store: self.clone(),
			id,
		}
	}

	fn unsubscribe(&self, id: ListenerId) {
		self.lock().listeners.retain(|(lid, _)| *lid != id);
	}

	/// Number of live subscriptions.
	pub fn listener_count(&self) -> usize {
		self.lock().listeners.len()
	}
}

/// Keeps a store listener registered for as long as it lives.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	store: Store,
	id: ListenerId,
}

impl Subscription {
	/// Id of the listener this subscription holds.
	pub fn id(&self) -> ListenerId {
		self.id
	}

	/// Releases the listener now rather than at end of scope.
	pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.store.unsubscribe(self.id);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn listeners_see_the_applied_state() {
		let store = Store::new();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let (seen_cb, store_cb) = (seen.clone(), store.clone());
		let _sub = store.subscribe(move || {
			seen_cb.lock().unwrap().push(store_cb.state().revision());
		});

		store.dispatch(Action::OpenWebsocket);
		store.dispatch(Action::CloseWebsocket);
		assert_eq!(*seen.lock().unwrap(), [1, 2]);
		assert!(store.state().is_websocket_closed());
	}

	#[test]
	fn dispatch_from_a_listener_is_queued_in_order() {
		let store = Store::new();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let (seen_cb, store_cb) = (seen.clone(), store.clone());
		let _sub = store.subscribe(move || {
			let state = store_cb.state();
			seen_cb.lock().unwrap().push(state.revision());
			if state.revision() == 1 {
				store_cb.dispatch(Action::ClearError);
			}
		});

		store.dispatch(Action::ReceiveError("http://feed".into()));
		assert_eq!(*seen.lock().unwrap(), [1, 2]);
		assert_eq!(store.state().error_url(), None);
	}

	#[test]
	fn unsubscribing_stops_notifications() {
		let store = Store::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let calls_cb = calls.clone();
		let sub = store.subscribe(move || {
			calls_cb.fetch_add(1, Ordering::SeqCst);
		});
		store.dispatch(Action::OpenWebsocket);
		assert_eq!(store.listener_count(), 1);

		sub.unsubscribe();
		store.dispatch(Action::CloseWebsocket);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(store.listener_count(), 0);
	}

	#[test]
	fn published_states_are_not_mutated_later() {
		let store = Store::new();
		let before = store.state();
		store.dispatch(Action::OpenWebsocket);
		assert!(before.is_websocket_closed());
		assert!(!store.state().is_websocket_closed());
	}
}
