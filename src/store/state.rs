use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use super::action::Action;
use super::model::{
	ControlPipe, ControlStatus, MetricOption, Node, NodeDetails, NodesDelta, Topology,
	TopologyOption, TopologyOptions, edge_id,
};
use crate::router::RouteState;

/// One revision of the application state.
///
/// Values are never mutated once published by the store; every action
/// produces a new `AppState`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
	revision: u64,
	topologies: Vec<Topology>,
	topologies_loaded: bool,
	current_topology_id: Option<String>,
	topology_options: BTreeMap<String, TopologyOptions>,
	nodes: IndexMap<String, Node>,
	available_canvas_metrics: Vec<MetricOption>,
	highlighted_node_ids: BTreeSet<String>,
	highlighted_edge_ids: BTreeSet<String>,
	selected_node_id: Option<String>,
	selected_metric: Option<String>,
	locked_metric: Option<String>,
	node_details: IndexMap<String, NodeDetails>,
	control_pipe: Option<ControlPipe>,
	control_status: BTreeMap<String, ControlStatus>,
	websocket_closed: bool,
	update_paused_at: Option<f64>,
	buffered_deltas: Vec<NodesDelta>,
	error_url: Option<String>,
	hostname: String,
	version: String,
	route_set: bool,
	force_relayout: bool,
}

impl Default for AppState {
	fn default() -> Self {
		Self {
			revision: 0,
			topologies: Vec::new(),
			topologies_loaded: false,
			current_topology_id: None,
			topology_options: BTreeMap::new(),
			nodes: IndexMap::new(),
			available_canvas_metrics: Vec::new(),
			highlighted_node_ids: BTreeSet::new(),
			highlighted_edge_ids: BTreeSet::new(),
			selected_node_id: None,
			selected_metric: None,
			locked_metric: None,
			node_details: IndexMap::new(),
			control_pipe: None,
			control_status: BTreeMap::new(),
			websocket_closed: true,
			update_paused_at: None,
			buffered_deltas: Vec::new(),
			error_url: None,
			hostname: String::new(),
			version: String::new(),
			route_set: false,
			force_relayout: false,
		}
	}
}

// Read accessors
impl AppState {
	/// Number of actions applied so far.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// All known topologies.
	pub fn topologies(&self) -> &[Topology] {
		&self.topologies
	}

	/// Whether the topology list has arrived.
	pub fn is_topologies_loaded(&self) -> bool {
		self.topologies_loaded
	}

	/// Id of the topology being shown.
	pub fn current_topology_id(&self) -> Option<&str> {
		self.current_topology_id.as_deref()
	}

	/// The topology being shown, once the list has it.
	pub fn current_topology(&self) -> Option<&Topology> {
		let id = self.current_topology_id.as_deref()?;
		self.topologies.iter().find(|t| t.id == id)
	}

	/// Options offered by the current topology.
	pub fn current_topology_options(&self) -> &[TopologyOption] {
		self.current_topology()
			.map(|t| t.options.as_slice())
			.unwrap_or_default()
	}

	/// Defaults of the current topology overlaid with the chosen values.
	pub fn active_topology_options(&self) -> TopologyOptions {
		let mut options = self
			.current_topology()
			.map(Topology::default_options)
			.unwrap_or_default();
		if let Some(chosen) = self
			.current_topology_id
			.as_ref()
			.and_then(|id| self.topology_options.get(id))
		{
			options.extend(chosen.iter().map(|(k, v)| (k.clone(), v.clone())));
		}
		options
	}

	/// Nodes of the current topology, keyed by id in feed order.
	pub fn nodes(&self) -> &IndexMap<String, Node> {
		&self.nodes
	}

	/// The hovered node and its neighbours.
	pub fn highlighted_node_ids(&self) -> &BTreeSet<String> {
		&self.highlighted_node_ids
	}

	/// Edges touching the hovered node.
	pub fn highlighted_edge_ids(&self) -> &BTreeSet<String> {
		&self.highlighted_edge_ids
	}

	/// Node whose details are open.
	pub fn selected_node_id(&self) -> Option<&str> {
		self.selected_node_id.as_deref()
	}

	/// Metric drawn on the nodes, locked or previewed.
	pub fn selected_metric(&self) -> Option<&str> {
		self.selected_metric.as_deref()
	}

	/// Metric pinned by the user.
	pub fn locked_metric(&self) -> Option<&str> {
		self.locked_metric.as_deref()
	}

	/// Metrics carried by the current nodes, in first-seen order.
	pub fn available_canvas_metrics(&self) -> &[MetricOption] {
		&self.available_canvas_metrics
	}

	/// Open details cards, keyed by node id in opening order.
	pub fn node_details(&self) -> &IndexMap<String, NodeDetails> {
		&self.node_details
	}

	/// Open terminal pipe.
	pub fn control_pipe(&self) -> Option<&ControlPipe> {
		self.control_pipe.as_ref()
	}

	/// Control progress per node id.
	pub fn control_status(&self) -> &BTreeMap<String, ControlStatus> {
		&self.control_status
	}

	/// Whether the update stream is down.
	pub fn is_websocket_closed(&self) -> bool {
		self.websocket_closed
	}

	/// Whether node deltas are being buffered.
	pub fn is_update_paused(&self) -> bool {
		self.update_paused_at.is_some()
	}

	/// When updates were paused, in ms since the epoch.
	pub fn update_paused_at(&self) -> Option<f64> {
		self.update_paused_at
	}

	/// URL of the last failed request.
	pub fn error_url(&self) -> Option<&str> {
		self.error_url.as_deref()
	}

	/// API host, empty until known.
	pub fn hostname(&self) -> &str {
		&self.hostname
	}

	/// API version, empty until known.
	pub fn version(&self) -> &str {
		&self.version
	}

	/// Whether a URL route chose the topology.
	pub fn is_route_set(&self) -> bool {
		self.route_set
	}

	/// Whether the layout must restart on the next sync.
	pub fn is_force_relayout(&self) -> bool {
		self.force_relayout
	}
}

impl AppState {
	pub(super) fn next(&self, action: Action) -> AppState {
		let mut next = self.clone();
		next.apply(action);
		next.revision = self.revision + 1;
		next
	}

	fn apply(&mut self, action: Action) {
		match action {
			Action::ReceiveTopologies(topologies) => {
				self.topologies = topologies;
				self.topologies_loaded = true;
				let known = self
					.current_topology_id
					.as_ref()
					.is_some_and(|id| self.topologies.iter().any(|t| &t.id == id));
				if !known && !self.route_set {
					self.current_topology_id = self.topologies.first().map(|t| t.id.clone());
				}
			}
			Action::ClickTopology(id) => {
				if self.current_topology_id.as_deref() != Some(id.as_str()) {
					self.current_topology_id = Some(id);
					self.reset_topology_view();
				}
			}
			Action::ChangeTopologyOption { option, value } => {
				if let Some(id) = self.current_topology_id.clone() {
					self.topology_options
						.entry(id)
						.or_default()
						.insert(option, value);
					self.reset_topology_view();
					self.force_relayout = true;
				}
			}
			Action::ClickRelayout => self.force_relayout = true,
			Action::RouteChanged(route) => self.apply_route(route),

			Action::ReceiveNodesDelta(delta) => {
				if self.update_paused_at.is_some() {
					self.buffered_deltas.push(delta);
				} else {
					self.apply_delta(delta);
				}
			}
			Action::ReceiveNodeDetails(details) => {
				if let Some(slot) = self.node_details.get_mut(&details.id) {
					*slot = details;
				}
			}
			Action::ClickNode(id) => {
				if self.selected_node_id.as_deref() == Some(id.as_str()) {
					self.selected_node_id = None;
					self.node_details.clear();
				} else {
					self.open_details(id);
				}
			}
			Action::ClickCloseDetails(id) => {
				self.node_details.shift_remove(&id);
				if self.selected_node_id.as_deref() == Some(id.as_str()) {
					self.selected_node_id = None;
				}
			}
			Action::EnterNode(id) => self.highlight_neighbourhood(&id),
			Action::LeaveNode(_) => self.clear_highlight(),
			Action::HitEsc => {
				if self.control_pipe.is_some() {
					self.control_pipe = None;
				} else if !self.node_details.is_empty() {
					self.node_details.clear();
					self.selected_node_id = None;
				}
				self.clear_highlight();
			}

			Action::SelectMetric(id) => self.selected_metric = id,
			Action::LockMetric(id) => {
				self.selected_metric = Some(id.clone());
				self.locked_metric = Some(id);
			}
			Action::UnlockMetric => self.locked_metric = None,
			Action::LockNextMetric(delta) => {
				if let Some(id) = self.next_metric(delta) {
					self.selected_metric = Some(id.clone());
					self.locked_metric = Some(id);
				}
			}

			Action::ReceiveApiDetails { hostname, version } => {
				self.hostname = hostname;
				self.version = version;
			}
			Action::OpenWebsocket => self.websocket_closed = false,
			Action::CloseWebsocket => self.websocket_closed = true,
			Action::ReceiveError(url) => self.error_url = Some(url),
			Action::ClearError => self.error_url = None,
			Action::PauseUpdates(at) => {
				self.update_paused_at.get_or_insert(at);
			}
			Action::ResumeUpdates => {
				self.update_paused_at = None;
				for delta in std::mem::take(&mut self.buffered_deltas) {
					self.apply_delta(delta);
				}
			}

			Action::DoControl(node_id) => {
				self.control_status.insert(
					node_id,
					ControlStatus {
						pending: true,
						error: None,
					},
				);
			}
			Action::DoControlSuccess(node_id) => {
				self.control_status.insert(node_id, ControlStatus::default());
			}
			Action::DoControlError { node_id, error } => {
				self.control_status.insert(
					node_id,
					ControlStatus {
						pending: false,
						error: Some(error),
					},
				);
			}
			Action::ReceiveControlPipe(pipe) => self.control_pipe = Some(pipe),
			Action::ClosePipe(id) => {
				if self.control_pipe.as_ref().is_some_and(|p| p.id == id) {
					self.control_pipe = None;
				}
			}
		}
	}

	fn reset_topology_view(&mut self) {
		self.nodes.clear();
		self.buffered_deltas.clear();
		self.node_details.clear();
		self.selected_node_id = None;
		self.clear_highlight();
		self.refresh_available_metrics();
	}

	fn clear_highlight(&mut self) {
		self.highlighted_node_ids.clear();
		self.highlighted_edge_ids.clear();
	}

	fn open_details(&mut self, id: String) {
		let label = self
			.nodes
			.get(&id)
			.map(|n| n.label.clone())
			.unwrap_or_else(|| id.clone());
		self.node_details.clear();
		self.node_details.insert(
			id.clone(),
			NodeDetails {
				id: id.clone(),
				label,
				rows: Vec::new(),
			},
		);
		self.selected_node_id = Some(id);
	}

	fn apply_route(&mut self, route: RouteState) {
		self.route_set = true;
		if let Some(id) = route.topology_id {
			if self.current_topology_id.as_deref() != Some(id.as_str()) {
				self.current_topology_id = Some(id.clone());
				self.reset_topology_view();
			}
			if !route.topology_options.is_empty() {
				self.topology_options.insert(id, route.topology_options);
			}
		}
		match route.selected_node_id {
			Some(node) if self.selected_node_id.as_deref() != Some(node.as_str()) => {
				self.open_details(node);
			}
			Some(_) => {}
			None => {
				self.selected_node_id = None;
				self.node_details.clear();
			}
		}
		self.locked_metric = route.pinned_metric.clone();
		if route.pinned_metric.is_some() {
			self.selected_metric = route.pinned_metric;
		}
	}

	fn apply_delta(&mut self, delta: NodesDelta) {
		for id in &delta.remove {
			self.nodes.shift_remove(id);
		}
		for node in delta.add.into_iter().chain(delta.update) {
			self.nodes.insert(node.id.clone(), node);
		}
		self.force_relayout = false;
		self.refresh_available_metrics();
	}

	fn refresh_available_metrics(&mut self) {
		let mut catalog: IndexMap<&str, &str> = IndexMap::new();
		for metric in self.nodes.values().flat_map(|n| n.metrics.iter()) {
			catalog.entry(&metric.id).or_insert(&metric.label);
		}
		self.available_canvas_metrics = catalog
			.into_iter()
			.map(|(id, label)| MetricOption {
				id: id.to_owned(),
				label: label.to_owned(),
			})
			.collect();

		// Keep a route-pinned metric until the first nodes arrive.
		if self.nodes.is_empty() {
			return;
		}
		if !self.is_available(self.locked_metric.as_deref()) {
			self.locked_metric = None;
			self.selected_metric = None;
		}
		if !self.is_available(self.selected_metric.as_deref()) {
			self.selected_metric = self.locked_metric.clone();
		}
	}

	fn is_available(&self, metric: Option<&str>) -> bool {
		metric.is_none_or(|id| self.available_canvas_metrics.iter().any(|m| m.id == id))
	}

	fn next_metric(&self, delta: i32) -> Option<String> {
		let metrics = &self.available_canvas_metrics;
		if metrics.is_empty() {
			return None;
		}
		let current = self
			.locked_metric
			.as_deref()
			.or(self.selected_metric.as_deref())
			.and_then(|id| metrics.iter().position(|m| m.id == id));
		let index = match current {
			Some(index) => (index as i64 + delta as i64).rem_euclid(metrics.len() as i64) as usize,
			None => 0,
		};
		Some(metrics[index].id.clone())
	}

	fn highlight_neighbourhood(&mut self, id: &str) {
		self.clear_highlight();
		let Some(node) = self.nodes.get(id) else {
			return;
		};
		self.highlighted_node_ids.insert(id.to_owned());
		for target in &node.adjacency {
			self.highlighted_node_ids.insert(target.clone());
			self.highlighted_edge_ids.insert(edge_id(id, target));
		}
		for source in self.nodes.values() {
			if source.adjacency.iter().any(|t| t == id) {
				self.highlighted_node_ids.insert(source.id.clone());
				self.highlighted_edge_ids.insert(edge_id(&source.id, id));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metrics::{MetricDescriptor, MetricFormat};

	fn metric(id: &str, value: f64) -> MetricDescriptor {
		MetricDescriptor {
			id: id.into(),
			label: id.to_uppercase(),
			value: Some(value),
			min: 0.0,
			max: 100.0,
			format: MetricFormat::Number,
		}
	}

	fn node(id: &str, adjacency: &[&str], metrics: &[(&str, f64)]) -> Node {
		Node {
			id: id.into(),
			label: format!("{id}-label"),
			label_minor: None,
			metrics: metrics.iter().map(|(m, v)| metric(m, *v)).collect(),
			adjacency: adjacency.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn with_nodes(nodes: Vec<Node>) -> AppState {
		AppState::default().next(Action::ReceiveNodesDelta(NodesDelta {
			add: nodes,
			..NodesDelta::default()
		}))
	}

	fn topology(id: &str) -> Topology {
		Topology {
			id: id.into(),
			name: id.to_uppercase(),
			options: vec![TopologyOption {
				id: "system".into(),
				default_value: "hide".into(),
				values: vec!["hide".into(), "show".into()],
			}],
		}
	}

	#[test]
	fn every_action_bumps_the_revision() {
		let state = AppState::default();
		let next = state.next(Action::UnlockMetric);
		assert_eq!(next.revision(), state.revision() + 1);
		assert_eq!(state.revision(), 0);
	}

	#[test]
	fn catalog_keeps_first_seen_order() {
		let state = with_nodes(vec![
			node("a", &[], &[("memory", 1.0), ("cpu", 2.0)]),
			node("b", &[], &[("open_files", 3.0), ("cpu", 4.0)]),
		]);
		let ids: Vec<_> = state
			.available_canvas_metrics()
			.iter()
			.map(|m| m.id.as_str())
			.collect();
		assert_eq!(ids, ["memory", "cpu", "open_files"]);
	}

	#[test]
	fn lock_next_from_nothing_picks_first_in_either_direction() {
		let state = with_nodes(vec![node("a", &[], &[("memory", 1.0), ("cpu", 2.0), ("load", 0.5)])]);
		for delta in [1, -1] {
			let next = state.next(Action::LockNextMetric(delta));
			assert_eq!(next.locked_metric(), Some("memory"));
			assert_eq!(next.selected_metric(), Some("memory"));
		}
	}

	#[test]
	fn lock_next_cycles_and_wraps() {
		let state = with_nodes(vec![node("a", &[], &[("memory", 1.0), ("cpu", 2.0), ("load", 0.5)])])
			.next(Action::LockMetric("memory".into()));
		let forward = state.next(Action::LockNextMetric(1));
		assert_eq!(forward.locked_metric(), Some("cpu"));
		let back = state.next(Action::LockNextMetric(-1));
		assert_eq!(back.locked_metric(), Some("load"));
	}

	#[test]
	fn lock_next_without_metrics_is_a_no_op() {
		let state = AppState::default();
		let next = state.next(Action::LockNextMetric(1));
		assert_eq!(next.locked_metric(), None);
	}

	#[test]
	fn unlock_keeps_selection_until_cleared() {
		let state = with_nodes(vec![node("a", &[], &[("cpu", 2.0)])])
			.next(Action::LockMetric("cpu".into()))
			.next(Action::UnlockMetric);
		assert_eq!(state.locked_metric(), None);
		assert_eq!(state.selected_metric(), Some("cpu"));
		assert_eq!(state.next(Action::SelectMetric(None)).selected_metric(), None);
	}

	#[test]
	fn vanished_locked_metric_is_released() {
		let state = with_nodes(vec![node("a", &[], &[("cpu", 2.0)])])
			.next(Action::LockMetric("cpu".into()))
			.next(Action::ReceiveNodesDelta(NodesDelta {
				update: vec![node("a", &[], &[("memory", 2.0)])],
				..NodesDelta::default()
			}));
		assert_eq!(state.locked_metric(), None);
	}

	#[test]
	fn vanished_previewed_metric_falls_back_to_the_locked_one() {
		let state = with_nodes(vec![node("a", &[], &[("cpu", 2.0), ("memory", 1.0)])])
			.next(Action::LockMetric("memory".into()))
			.next(Action::SelectMetric(Some("cpu".into())))
			.next(Action::ReceiveNodesDelta(NodesDelta {
				update: vec![node("a", &[], &[("memory", 2.0)])],
				..NodesDelta::default()
			}));
		assert_eq!(state.selected_metric(), Some("memory"));
		assert_eq!(state.locked_metric(), Some("memory"));

		let unlocked = with_nodes(vec![node("a", &[], &[("cpu", 2.0)])])
			.next(Action::SelectMetric(Some("cpu".into())))
			.next(Action::ReceiveNodesDelta(NodesDelta {
				update: vec![node("a", &[], &[("load", 1.0)])],
				..NodesDelta::default()
			}));
		assert_eq!(unlocked.selected_metric(), None);

		let still_there = with_nodes(vec![node("a", &[], &[("cpu", 2.0)])])
			.next(Action::SelectMetric(Some("cpu".into())))
			.next(Action::ReceiveNodesDelta(NodesDelta {
				update: vec![node("a", &[], &[("cpu", 3.0)])],
				..NodesDelta::default()
			}));
		assert_eq!(still_there.selected_metric(), Some("cpu"));
	}

	#[test]
	fn entering_a_node_highlights_its_neighbourhood() {
		let state = with_nodes(vec![
			node("a", &["b"], &[]),
			node("b", &[], &[]),
			node("c", &["a"], &[]),
			node("d", &[], &[]),
		])
		.next(Action::EnterNode("a".into()));
		let nodes: Vec<_> = state.highlighted_node_ids().iter().map(String::as_str).collect();
		assert_eq!(nodes, ["a", "b", "c"]);
		assert!(state.highlighted_edge_ids().contains(&edge_id("a", "b")));
		assert!(state.highlighted_edge_ids().contains(&edge_id("c", "a")));

		let left = state.next(Action::LeaveNode("a".into()));
		assert!(left.highlighted_node_ids().is_empty());
		assert!(left.highlighted_edge_ids().is_empty());
	}

	#[test]
	fn esc_closes_one_overlay_and_clears_highlight() {
		let state = with_nodes(vec![node("a", &[], &[])])
			.next(Action::ClickNode("a".into()))
			.next(Action::ReceiveControlPipe(ControlPipe {
				id: "pipe-1".into(),
				node_id: "a".into(),
				raw: false,
				deleted: false,
			}))
			.next(Action::EnterNode("a".into()));

		let once = state.next(Action::HitEsc);
		assert!(once.control_pipe().is_none());
		assert_eq!(once.node_details().len(), 1);
		assert!(once.highlighted_node_ids().is_empty());

		let twice = once.next(Action::HitEsc);
		assert!(twice.node_details().is_empty());
		assert_eq!(twice.selected_node_id(), None);
	}

	#[test]
	fn clicking_a_node_toggles_details() {
		let state = with_nodes(vec![node("a", &[], &[])]).next(Action::ClickNode("a".into()));
		assert_eq!(state.selected_node_id(), Some("a"));
		assert_eq!(state.node_details()["a"].label, "a-label");

		let details = NodeDetails {
			id: "a".into(),
			label: "a-label".into(),
			rows: vec![("pid".into(), "42".into())],
		};
		let filled = state.next(Action::ReceiveNodeDetails(details.clone()));
		assert_eq!(filled.node_details()["a"], details);

		let stale = filled.next(Action::ReceiveNodeDetails(NodeDetails {
			id: "zz".into(),
			..details
		}));
		assert_eq!(stale.node_details().len(), 1);

		let closed = filled.next(Action::ClickNode("a".into()));
		assert!(closed.node_details().is_empty());
	}

	#[test]
	fn paused_deltas_apply_on_resume() {
		let state = AppState::default()
			.next(Action::PauseUpdates(1_000.0))
			.next(Action::ReceiveNodesDelta(NodesDelta {
				add: vec![node("a", &[], &[])],
				..NodesDelta::default()
			}));
		assert!(state.is_update_paused());
		assert_eq!(state.update_paused_at(), Some(1_000.0));
		assert!(state.nodes().is_empty());

		let resumed = state.next(Action::ResumeUpdates);
		assert!(!resumed.is_update_paused());
		assert!(resumed.nodes().contains_key("a"));
	}

	#[test]
	fn topologies_select_first_and_expose_default_options() {
		let state = AppState::default()
			.next(Action::ReceiveTopologies(vec![topology("processes"), topology("hosts")]));
		assert!(state.is_topologies_loaded());
		assert_eq!(state.current_topology_id(), Some("processes"));
		assert_eq!(state.active_topology_options()["system"], "hide");

		let changed = state.next(Action::ChangeTopologyOption {
			option: "system".into(),
			value: "show".into(),
		});
		assert_eq!(changed.active_topology_options()["system"], "show");
		assert!(changed.is_force_relayout());
	}

	#[test]
	fn switching_topology_resets_the_view() {
		let state = with_nodes(vec![node("a", &[], &[("cpu", 1.0)])])
			.next(Action::ReceiveTopologies(vec![topology("processes"), topology("hosts")]))
			.next(Action::ClickNode("a".into()))
			.next(Action::ClickTopology("hosts".into()));
		assert_eq!(state.current_topology_id(), Some("hosts"));
		assert!(state.nodes().is_empty());
		assert!(state.node_details().is_empty());
		assert!(state.available_canvas_metrics().is_empty());
	}

	#[test]
	fn route_wins_over_first_topology() {
		let route = RouteState {
			topology_id: Some("hosts".into()),
			topology_options: TopologyOptions::from([("system".into(), "show".into())]),
			selected_node_id: Some("web-1".into()),
			pinned_metric: Some("cpu".into()),
		};
		let state = AppState::default()
			.next(Action::RouteChanged(route))
			.next(Action::ReceiveTopologies(vec![topology("processes"), topology("hosts")]));
		assert!(state.is_route_set());
		assert_eq!(state.current_topology_id(), Some("hosts"));
		assert_eq!(state.active_topology_options()["system"], "show");
		assert_eq!(state.selected_node_id(), Some("web-1"));
		assert_eq!(state.locked_metric(), Some("cpu"));
	}
}
