use std::collections::{BTreeMap, BTreeSet};

use crate::charts::colors::node_color;
use crate::config::AppConfig;
use crate::metrics::MetricDescriptor;
use crate::store::AppState;
use crate::store::model::{
	ControlPipe, ControlStatus, MetricOption, NodeDetails, Topology, TopologyOption,
	TopologyOptions,
};

/// A node as the graph draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
	/// Node id.
	pub id: String,
	/// Main label.
	pub label: String,
	/// Secondary label.
	pub label_minor: Option<String>,
	/// Border color derived from the label.
	pub color: String,
	/// Hovered, or a neighbour of the hovered node.
	pub highlighted: bool,
	/// The node whose details are open.
	pub selected: bool,
	/// The node's sample of the selected metric, if any.
	pub metric: Option<MetricDescriptor>,
	/// Ids of the nodes this one has edges to.
	pub adjacency: Vec<String>,
}

/// Everything the view renders, derived from a single store revision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderSnapshot {
	/// Store revision this snapshot was derived from.
	pub revision: u64,
	/// All known topologies.
	pub topologies: Vec<Topology>,
	/// Whether the topology list has arrived.
	pub topologies_loaded: bool,
	/// The topology being shown.
	pub current_topology: Option<Topology>,
	/// Id of the topology being shown.
	pub current_topology_id: Option<String>,
	/// Options the current topology offers.
	pub current_topology_options: Vec<TopologyOption>,
	/// Option values in effect, defaults included.
	pub active_topology_options: TopologyOptions,
	/// Nodes in feed order.
	pub nodes: Vec<NodeView>,
	/// Highlighted node ids.
	pub highlighted_node_ids: BTreeSet<String>,
	/// Highlighted edge ids.
	pub highlighted_edge_ids: BTreeSet<String>,
	/// Node whose details are open.
	pub selected_node_id: Option<String>,
	/// Metric drawn on the nodes.
	pub selected_metric: Option<String>,
	/// Metric pinned by the user.
	pub locked_metric: Option<String>,
	/// Metrics some node currently carries.
	pub available_canvas_metrics: Vec<MetricOption>,
	/// Open terminal pipe.
	pub control_pipe: Option<ControlPipe>,
	/// Control progress per node.
	pub control_status: BTreeMap<String, ControlStatus>,
	/// Open details cards, oldest first.
	pub node_details: Vec<NodeDetails>,
	/// Whether the update stream is down.
	pub websocket_closed: bool,
	/// Whether updates are paused.
	pub update_paused: bool,
	/// When updates were paused.
	pub update_paused_at: Option<f64>,
	/// URL of the last failed request.
	pub error_url: Option<String>,
	/// API host.
	pub hostname: String,
	/// API version.
	pub version: String,
	/// Whether the layout must restart.
	pub force_relayout: bool,
}

impl RenderSnapshot {
	/// Re-reads every accessor. Deriving twice from the same state yields
	/// equal snapshots.
	pub fn derive(state: &AppState) -> Self {
		let highlighted = state.highlighted_node_ids();
		let selected_node = state.selected_node_id();
		let selected_metric = state.selected_metric();

		let nodes = state
			.nodes()
			.values()
			.map(|node| NodeView {
				id: node.id.clone(),
				label: node.label.clone(),
				label_minor: node.label_minor.clone(),
				color: node_color(&node.label).to_owned(),
				highlighted: highlighted.contains(&node.id),
				selected: selected_node == Some(node.id.as_str()),
				metric: selected_metric.and_then(|id| node.metric(id)).cloned(),
				adjacency: node.adjacency.clone(),
			})
			.collect();

		Self {
			revision: state.revision(),
			topologies: state.topologies().to_vec(),
			topologies_loaded: state.is_topologies_loaded(),
			current_topology: state.current_topology().cloned(),
			current_topology_id: state.current_topology_id().map(str::to_owned),
			current_topology_options: state.current_topology_options().to_vec(),
			active_topology_options: state.active_topology_options(),
			nodes,
			highlighted_node_ids: highlighted.clone(),
			highlighted_edge_ids: state.highlighted_edge_ids().clone(),
			selected_node_id: selected_node.map(str::to_owned),
			selected_metric: selected_metric.map(str::to_owned),
			locked_metric: state.locked_metric().map(str::to_owned),
			available_canvas_metrics: state.available_canvas_metrics().to_vec(),
			control_pipe: state.control_pipe().cloned(),
			control_status: state.control_status().clone(),
			node_details: state.node_details().values().cloned().collect(),
			websocket_closed: state.is_websocket_closed(),
			update_paused: state.is_update_paused(),
			update_paused_at: state.update_paused_at(),
			error_url: state.error_url().map(str::to_owned),
			hostname: state.hostname().to_owned(),
			version: state.version().to_owned(),
			force_relayout: state.is_force_relayout(),
		}
	}

	/// Whether any details card is open.
	pub fn showing_details(&self) -> bool {
		!self.node_details.is_empty()
	}

	/// Whether a terminal pipe is open.
	pub fn showing_terminal(&self) -> bool {
		self.control_pipe.is_some()
	}
}

/// Space the graph must leave free for surrounding panels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutHints {
	/// Width taken by the details panel, 0 when it is closed.
	pub details_width: f64,
	/// Height taken by the header.
	pub top_margin: f64,
}

impl LayoutHints {
	/// Hints for the panels `snapshot` shows.
	pub fn new(snapshot: &RenderSnapshot, config: &AppConfig) -> Self {
		Self {
			details_width: if snapshot.showing_details() {
				config.details_width
			} else {
				0.0
			},
			top_margin: config.top_margin,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::metrics::MetricFormat;
	use crate::store::model::{Node, NodesDelta};
	use crate::store::{Action, Store};

	fn seeded_store() -> Store {
		let store = Store::new();
		let metric = |id: &str, v| MetricDescriptor {
			id: id.into(),
			label: id.into(),
			value: Some(v),
			min: 0.0,
			max: 100.0,
			format: MetricFormat::Percent,
		};
		store.dispatch(Action::ReceiveNodesDelta(NodesDelta {
			add: vec![
				Node {
					id: "a".into(),
					label: "alpha".into(),
					label_minor: None,
					metrics: vec![metric("cpu", 12.0), metric("memory", 40.0)],
					adjacency: vec!["b".into()],
				},
				Node {
					id: "b".into(),
					label: "beta".into(),
					label_minor: None,
					metrics: vec![metric("memory", 80.0)],
					adjacency: Vec::new(),
				},
			],
			..NodesDelta::default()
		}));
		store
	}

	#[test]
	fn deriving_twice_is_identical() {
		let store = seeded_store();
		store.dispatch(Action::EnterNode("a".into()));
		store.dispatch(Action::LockMetric("cpu".into()));
		let state = store.state();
		assert_eq!(RenderSnapshot::derive(&state), RenderSnapshot::derive(&state));
	}

	#[test]
	fn nodes_carry_the_selected_metric_and_highlight() {
		let store = seeded_store();
		store.dispatch(Action::SelectMetric(Some("cpu".into())));
		store.dispatch(Action::EnterNode("b".into()));
		let snapshot = RenderSnapshot::derive(&store.state());

		let a = &snapshot.nodes[0];
		assert_eq!(a.metric.as_ref().and_then(|m| m.value), Some(12.0));
		assert!(a.highlighted);
		let b = &snapshot.nodes[1];
		assert!(b.metric.is_none());
		assert!(b.highlighted);
		assert_eq!(snapshot.revision, 3);
	}

	#[test]
	fn details_width_follows_the_panel() {
		let store = seeded_store();
		let config = AppConfig::default();
		let closed = LayoutHints::new(&RenderSnapshot::derive(&store.state()), &config);
		assert_eq!(closed.details_width, 0.0);
		assert_eq!(closed.top_margin, 100.0);

		store.dispatch(Action::ClickNode("a".into()));
		let open = LayoutHints::new(&RenderSnapshot::derive(&store.state()), &config);
		assert_eq!(open.details_width, 450.0);
	}
}
