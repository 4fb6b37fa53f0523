//! Top-level orchestration: keeps a render snapshot in step with the store
//! and turns key presses into store actions.

mod keys;
mod snapshot;

use std::sync::{Mutex, PoisonError};

use log::{debug, info};

pub use keys::{KeyCommand, KeyInput, key_command};
pub use snapshot::{LayoutHints, NodeView, RenderSnapshot};

use crate::api::ApiClient;
use crate::router::{Router, RouterOptions};
use crate::store::{Action, Store, Subscription};

/// Result of handling a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
	/// No binding for the key.
	Ignored,
	/// The key dispatched store actions.
	Dispatched,
	/// The debug toolbar is view-local state; the caller flips it.
	ToggleDebugToolbar,
}

/// Keeps the view in step with the store for as long as it is mounted.
pub struct AppController {
	store: Store,
	subscription: Mutex<Option<Subscription>>,
}

impl AppController {
	/// Subscribes `on_change` to the store and bootstraps the initial data.
	///
	/// `on_change` receives a snapshot freshly derived from the store's
	/// current state after every applied action.
	pub fn mount(
		store: Store,
		router: &dyn Router,
		api: &dyn ApiClient,
		on_change: impl Fn(RenderSnapshot) + Send + Sync + 'static,
	) -> Self {
		let store_cb = store.clone();
		let subscription = store.subscribe(move || {
			on_change(RenderSnapshot::derive(&store_cb.state()));
		});

		router.start(RouterOptions { hashbang: true });
		if router.is_route_set() {
			info!("topology selected by route");
		} else {
			api.get_topologies(&store.state().active_topology_options());
		}
		api.get_api_details();

		Self {
			store,
			subscription: Mutex::new(Some(subscription)),
		}
	}

	/// Snapshot of the store's current state.
	pub fn snapshot(&self) -> RenderSnapshot {
		RenderSnapshot::derive(&self.store.state())
	}

	/// The store this controller drives.
	pub fn store(&self) -> &Store {
		&self.store
	}

	/// Runs the key dispatch table for one key-up event.
	pub fn handle_key(&self, input: &KeyInput) -> KeyOutcome {
		debug!(target: "topology::key_press", "key_code {} {:?}", input.key_code, input.key_identifier);
		let Some(command) = key_command(input) else {
			return KeyOutcome::Ignored;
		};
		match command {
			KeyCommand::HitEsc => self.store.dispatch(Action::HitEsc),
			KeyCommand::LockNextMetric(delta) => self.store.dispatch(Action::LockNextMetric(delta)),
			KeyCommand::UnlockMetric => {
				self.store.dispatch(Action::UnlockMetric);
				self.store.dispatch(Action::SelectMetric(None));
			}
			KeyCommand::ToggleDebugToolbar => return KeyOutcome::ToggleDebugToolbar,
		}
		KeyOutcome::Dispatched
	}

	/// Releases the store subscription. Safe to call more than once.
	pub fn unmount(&self) {
		let released = self
			.subscription
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.take();
		if released.is_some() {
			debug!("controller unmounted");
		}
	}

	/// Whether the store subscription is still held.
	pub fn is_mounted(&self) -> bool {
		self.subscription
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.is_some()
	}
}

impl Drop for AppController {
	fn drop(&mut self) {
		self.unmount();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
	use std::sync::{Arc, Mutex};

	use super::*;
	use crate::store::model::TopologyOptions;

	#[derive(Default)]
	struct FakeRouter {
		route_set: bool,
		started: AtomicBool,
	}

	impl Router for FakeRouter {
		fn start(&self, options: RouterOptions) {
			assert!(options.hashbang);
			self.started.store(true, Ordering::SeqCst);
		}

		fn is_route_set(&self) -> bool {
			self.route_set
		}
	}

	#[derive(Default)]
	struct FakeApi {
		topologies: AtomicUsize,
		details: AtomicUsize,
	}

	impl ApiClient for FakeApi {
		fn get_topologies(&self, _: &TopologyOptions) {
			self.topologies.fetch_add(1, Ordering::SeqCst);
		}

		fn get_api_details(&self) {
			self.details.fetch_add(1, Ordering::SeqCst);
		}

		fn get_node_details(&self, _: &str, _: &str) {}
	}

	#[test]
	fn mount_fetches_topologies_unless_routed() {
		let (router, api) = (FakeRouter::default(), FakeApi::default());
		let _controller = AppController::mount(Store::new(), &router, &api, |_| {});
		assert!(router.started.load(Ordering::SeqCst));
		assert_eq!(api.topologies.load(Ordering::SeqCst), 1);
		assert_eq!(api.details.load(Ordering::SeqCst), 1);

		let routed = FakeRouter {
			route_set: true,
			..FakeRouter::default()
		};
		let api = FakeApi::default();
		let _controller = AppController::mount(Store::new(), &routed, &api, |_| {});
		assert_eq!(api.topologies.load(Ordering::SeqCst), 0);
		assert_eq!(api.details.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn q_unlocks_and_clears_selection() {
		let store = Store::new();
		store.dispatch(Action::LockMetric("cpu".into()));
		let controller =
			AppController::mount(store.clone(), &FakeRouter::default(), &FakeApi::default(), |_| {});

		let outcome = controller.handle_key(&KeyInput::code(keys::Q_KEY_CODE));
		assert_eq!(outcome, KeyOutcome::Dispatched);
		assert_eq!(store.state().locked_metric(), None);
		assert_eq!(store.state().selected_metric(), None);
	}

	#[test]
	fn debug_toggle_leaves_the_store_alone() {
		let store = Store::new();
		let controller =
			AppController::mount(store.clone(), &FakeRouter::default(), &FakeApi::default(), |_| {});
		let revision = store.state().revision();
		assert_eq!(
			controller.handle_key(&KeyInput::code(keys::D_KEY_CODE)),
			KeyOutcome::ToggleDebugToolbar
		);
		assert_eq!(controller.handle_key(&KeyInput::code(90)), KeyOutcome::Ignored);
		assert_eq!(store.state().revision(), revision);
	}

	#[test]
	fn every_notification_renders_current_state() {
		let store = Store::new();
		let rendered = Arc::new(Mutex::new(Vec::<RenderSnapshot>::new()));
		let sink = rendered.clone();
		let controller = AppController::mount(
			store.clone(),
			&FakeRouter::default(),
			&FakeApi::default(),
			move |snapshot| sink.lock().unwrap().push(snapshot),
		);

		for metric in ["cpu", "memory", "load"] {
			store.dispatch(Action::SelectMetric(Some(metric.into())));
		}
		let rendered = rendered.lock().unwrap();
		let last = rendered.last().unwrap();
		assert_eq!(last.selected_metric.as_deref(), Some("load"));
		assert_eq!(*last, controller.snapshot());
		assert!(rendered.windows(2).all(|w| w[0].revision < w[1].revision));
	}

	#[test]
	fn unmount_releases_the_subscription() {
		let store = Store::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let calls_cb = calls.clone();
		let controller = AppController::mount(
			store.clone(),
			&FakeRouter::default(),
			&FakeApi::default(),
			move |_| {
				calls_cb.fetch_add(1, Ordering::SeqCst);
			},
		);
		assert_eq!(store.listener_count(), 1);

		controller.unmount();
		controller.unmount();
		assert!(!controller.is_mounted());
		assert_eq!(store.listener_count(), 0);
		store.dispatch(Action::HitEsc);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}
}
