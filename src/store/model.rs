use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricDescriptor;

/// A node as reported by the feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique within a topology.
	pub id: String,
	/// Main label.
	pub label: String,
	/// Secondary label.
	#[serde(default)]
	pub label_minor: Option<String>,
	/// Metric samples, at most one per metric id.
	#[serde(default)]
	pub metrics: Vec<MetricDescriptor>,
	/// Ids of nodes this node has an edge to.
	#[serde(default)]
	pub adjacency: Vec<String>,
}

impl Node {
	/// This node's sample of metric `id`.
	pub fn metric(&self, id: &str) -> Option<&MetricDescriptor> {
		self.metrics.iter().find(|m| m.id == id)
	}
}

/// Id of the edge from `source` to `target`.
pub fn edge_id(source: &str, target: &str) -> String {
	format!("{source}{EDGE_ID_SEPARATOR}{target}")
}

/// Joins source and target in an edge id.
pub const EDGE_ID_SEPARATOR: &str = "---";

/// One batch of node changes from the feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodesDelta {
	/// New nodes.
	#[serde(default)]
	pub add: Vec<Node>,
	/// Replacements for existing nodes.
	#[serde(default)]
	pub update: Vec<Node>,
	/// Ids of nodes that went away.
	#[serde(default)]
	pub remove: Vec<String>,
}

impl NodesDelta {
	/// Whether the delta changes nothing.
	pub fn is_empty(&self) -> bool {
		self.add.is_empty() && self.update.is_empty() && self.remove.is_empty()
	}
}

/// A filter a topology offers, such as showing unconnected nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopologyOption {
	/// Option id.
	pub id: String,
	/// Value used until the user picks one.
	pub default_value: String,
	/// Values to choose from.
	pub values: Vec<String>,
}

/// A view of the system, such as processes or hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topology {
	/// Topology id.
	pub id: String,
	/// Tab label.
	pub name: String,
	/// Filters this topology offers.
	#[serde(default)]
	pub options: Vec<TopologyOption>,
}

impl Topology {
	/// Every option at its default value.
	pub fn default_options(&self) -> TopologyOptions {
		self.options
			.iter()
			.map(|opt| (opt.id.clone(), opt.default_value.clone()))
			.collect()
	}
}

/// Option id to chosen value, for one topology.
pub type TopologyOptions = BTreeMap<String, String>;

/// Catalog entry for a metric some node in the current topology carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricOption {
	/// Metric id.
	pub id: String,
	/// Display name.
	pub label: String,
}

/// Contents of one details card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
	/// Node id.
	pub id: String,
	/// Card title.
	pub label: String,
	/// Key and value rows.
	#[serde(default)]
	pub rows: Vec<(String, String)>,
}

/// A terminal session opened on a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPipe {
	/// Pipe id.
	pub id: String,
	/// Node the terminal runs on.
	pub node_id: String,
	/// Raw TTY mode.
	#[serde(default)]
	pub raw: bool,
	/// The remote end closed the pipe.
	#[serde(default)]
	pub deleted: bool,
}

/// Progress of the last control sent to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
	/// Waiting for the control to finish.
	pub pending: bool,
	/// Why the control failed.
	pub error: Option<String>,
}
