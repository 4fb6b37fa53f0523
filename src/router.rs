//! Hash-bang routing: `#!/state/<base64 json>` mirrors the shareable part of
//! the store state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use leptos::ev;
use leptos::prelude::{WindowListenerHandle, window_event_listener};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, SharedApi};
use crate::error::{Error, Result};
use crate::store::model::TopologyOptions;
use crate::store::{Action, AppState, Store};

const STATE_PREFIX: &str = "#!/state/";

/// The part of the state a URL carries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteState {
	/// Topology being shown.
	pub topology_id: Option<String>,
	/// Its option values.
	pub topology_options: TopologyOptions,
	/// Node whose details are open.
	pub selected_node_id: Option<String>,
	/// Locked metric.
	pub pinned_metric: Option<String>,
}

impl RouteState {
	/// The route describing `state`.
	pub fn from_state(state: &AppState) -> Self {
		Self {
			topology_id: state.current_topology_id().map(str::to_owned),
			topology_options: state.active_topology_options(),
			selected_node_id: state.selected_node_id().map(str::to_owned),
			pinned_metric: state.locked_metric().map(str::to_owned),
		}
	}

	/// Encodes the route as a `#!/state/` hash.
	pub fn to_hash(&self) -> String {
		// Serializing plain maps and strings cannot fail.
		let json = serde_json::to_vec(self).unwrap_or_default();
		format!("{STATE_PREFIX}{}", URL_SAFE_NO_PAD.encode(json))
	}

	/// Decodes a `#!/state/` hash.
	pub fn from_hash(hash: &str) -> Result<Self> {
		let encoded = hash
			.strip_prefix(STATE_PREFIX)
			.ok_or_else(|| Error::NotAStateRoute(hash.to_owned()))?;
		let json = URL_SAFE_NO_PAD.decode(encoded)?;
		serde_json::from_slice(&json).map_err(Error::RouteJson)
	}
}

/// Options for [`Router::start`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouterOptions {
	/// Read and follow `#!` routes.
	pub hashbang: bool,
}

/// Route bootstrap collaborator consumed by the controller at mount.
pub trait Router {
	/// Applies the current route and starts following route changes.
	fn start(&self, options: RouterOptions);
	/// Whether the current route already selected a topology.
	fn is_route_set(&self) -> bool;
}

/// Applies a route read from the URL and fetches what it points at: the
/// topology list for the routed options and the selected node's details.
pub fn apply_route(store: &Store, api: &dyn ApiClient, route: RouteState) {
	debug!("route {route:?}");
	store.dispatch(Action::RouteChanged(route));

	let state = store.state();
	api.get_topologies(&state.active_topology_options());
	let state = store.state();
	if let (Some(topology_id), Some(node_id)) = (state.current_topology_id(), state.selected_node_id()) {
		api.get_node_details(topology_id, node_id);
	}
}

/// Router over `window.location.hash`.
#[derive(Clone)]
pub struct HashRouter {
	store: Store,
	api: SharedApi,
	listening: Arc<AtomicBool>,
	listener: Arc<Mutex<Option<WindowListenerHandle>>>,
}

impl HashRouter {
	/// A router dispatching into `store` and fetching through `api`.
	pub fn new(store: Store, api: SharedApi) -> Self {
		Self {
			store,
			api,
			listening: Arc::new(AtomicBool::new(false)),
			listener: Arc::new(Mutex::new(None)),
		}
	}

	fn apply_hash(store: &Store, api: &dyn ApiClient, hash: &str) {
		if hash.is_empty() || hash == "#" || hash == "#!" {
			return;
		}
		match RouteState::from_hash(hash) {
			Ok(route) => apply_route(store, api, route),
			Err(err) => warn!("ignoring route: {err}"),
		}
	}

	/// Claims the hashchange listener slot; false if already listening.
	fn begin_listening(&self) -> bool {
		!self.listening.swap(true, Ordering::SeqCst)
	}

	/// Removes the hashchange listener. Safe to call more than once.
	pub fn stop(&self) {
		let handle = self
			.listener
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.take();
		if let Some(handle) = handle {
			handle.remove();
		}
		self.listening.store(false, Ordering::SeqCst);
	}

	/// Writes the route for `state` if it differs from the current hash.
	pub fn update_route(&self, state: &AppState) -> Result<()> {
		if !state.is_topologies_loaded() {
			return Ok(());
		}
		let location = web_sys::window()
			.ok_or_else(|| Error::Dom("no window".into()))?
			.location();
		let hash = RouteState::from_state(state).to_hash();
		let current = location.hash().map_err(|e| Error::Dom(format!("{e:?}")))?;
		if current != hash {
			location
				.set_hash(&hash)
				.map_err(|e| Error::Dom(format!("{e:?}")))?;
		}
		Ok(())
	}
}

impl Router for HashRouter {
	fn start(&self, options: RouterOptions) {
		if !options.hashbang || !self.begin_listening() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Ok(hash) = window.location().hash() {
			Self::apply_hash(&self.store, &*self.api, &hash);
		}

		let (store, api) = (self.store.clone(), self.api.clone());
		let handle = window_event_listener(ev::hashchange, move |_| {
			if let Some(hash) = web_sys::window().and_then(|w| w.location().hash().ok()) {
				Self::apply_hash(&store, &*api, &hash);
			}
		});
		*self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
	}

	fn is_route_set(&self) -> bool {
		self.store.state().is_route_set()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::DemoFeed;

	#[test]
	fn hash_carries_the_shareable_state() {
		let route = RouteState {
			topology_id: Some("containers".into()),
			topology_options: TopologyOptions::from([("system".into(), "show".into())]),
			selected_node_id: Some("web;<container>".into()),
			pinned_metric: Some("cpu".into()),
		};
		let hash = route.to_hash();
		assert!(hash.starts_with("#!/state/"));
		assert!(!hash.contains('='));
		assert_eq!(RouteState::from_hash(&hash).unwrap(), route);
	}

	#[test]
	fn foreign_hashes_are_rejected() {
		assert!(matches!(
			RouteState::from_hash("#/about"),
			Err(Error::NotAStateRoute(_))
		));
		assert!(matches!(
			RouteState::from_hash("#!/state/%%%"),
			Err(Error::RouteEncoding(_))
		));
		let not_json = format!("#!/state/{}", URL_SAFE_NO_PAD.encode("nope"));
		assert!(matches!(
			RouteState::from_hash(&not_json),
			Err(Error::RouteJson(_))
		));
	}

	#[test]
	fn a_router_listens_once_until_stopped() {
		let store = Store::new();
		let router = HashRouter::new(store.clone(), Arc::new(DemoFeed::new(store)));
		assert!(router.begin_listening());
		assert!(!router.clone().begin_listening());
		router.stop();
		router.stop();
		assert!(router.begin_listening());
	}

	#[test]
	fn missing_fields_default() {
		let hash = format!("#!/state/{}", URL_SAFE_NO_PAD.encode(r#"{"topologyId":"hosts"}"#));
		let route = RouteState::from_hash(&hash).unwrap();
		assert_eq!(route.topology_id.as_deref(), Some("hosts"));
		assert!(route.topology_options.is_empty());
		assert_eq!(route.pinned_metric, None);
	}
}
