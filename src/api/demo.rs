use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;

use super::ApiClient;
use crate::metrics::{MetricDescriptor, MetricFormat};
use crate::store::model::{Node, NodeDetails, NodesDelta, Topology, TopologyOption, TopologyOptions};
use crate::store::{Action, Store};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

struct MetricSpec {
	id: &'static str,
	label: &'static str,
	max: f64,
	format: MetricFormat,
}

const PROCESS_METRICS: &[MetricSpec] = &[
	MetricSpec {
		id: "process_cpu_usage_percent",
		label: "CPU",
		max: 100.0,
		format: MetricFormat::Percent,
	},
	MetricSpec {
		id: "process_memory_usage_bytes",
		label: "Memory",
		max: 2.0 * GIB,
		format: MetricFormat::Filesize,
	},
	MetricSpec {
		id: "open_files_count",
		label: "Open files",
		max: 1024.0,
		format: MetricFormat::Integer,
	},
];

const HOST_METRICS: &[MetricSpec] = &[
	MetricSpec {
		id: "host_cpu_usage_percent",
		label: "CPU",
		max: 100.0,
		format: MetricFormat::Percent,
	},
	MetricSpec {
		id: "host_mem_usage_bytes",
		label: "Memory",
		max: 16.0 * GIB,
		format: MetricFormat::Filesize,
	},
	MetricSpec {
		id: "load1",
		label: "Load (1m)",
		max: 4.0,
		format: MetricFormat::Number,
	},
];

fn toggle_option(id: &str, default_value: &str) -> TopologyOption {
	TopologyOption {
		id: id.into(),
		default_value: default_value.into(),
		values: vec!["show".into(), "hide".into()],
	}
}

pub fn sample_topologies() -> Vec<Topology> {
	vec![
		Topology {
			id: "processes".into(),
			name: "Processes".into(),
			options: vec![toggle_option("unconnected", "hide")],
		},
		Topology {
			id: "containers".into(),
			name: "Containers".into(),
			options: vec![toggle_option("system", "hide")],
		},
		Topology {
			id: "hosts".into(),
			name: "Hosts".into(),
			options: Vec::new(),
		},
	]
}

fn node_count(topology_id: &str, options: &TopologyOptions) -> usize {
	let shown = |key: &str| options.get(key).is_some_and(|v| v == "show");
	match topology_id {
		"processes" => 24 + if shown("unconnected") { 6 } else { 0 },
		"containers" => 12 + if shown("system") { 4 } else { 0 },
		_ => 6,
	}
}

/// Generate a sample topology (random tree) with metrics sampled at `tick`.
fn generate_sample_nodes(topology_id: &str, options: &TopologyOptions, tick: u64) -> Vec<Node> {
	let n = node_count(topology_id, options);
	let specs = if topology_id == "hosts" {
		HOST_METRICS
	} else {
		PROCESS_METRICS
	};
	// Unconnected processes trail the tree and have no edges.
	let connected = node_count(topology_id, &TopologyOptions::new());

	(0..n)
		.map(|i| {
			let adjacency = if i > 0 && i < connected {
				let target = (rand_simple(i) * (i as f64)) as usize;
				vec![format!("{topology_id}-{target}")]
			} else {
				Vec::new()
			};
			let metrics = specs
				.iter()
				.enumerate()
				// Containers carry no file counts.
				.filter(|(_, spec)| topology_id != "containers" || spec.id != "open_files_count")
				.map(|(m, spec)| MetricDescriptor {
					id: spec.id.into(),
					label: spec.label.into(),
					value: sample_value(i, m, tick).map(|v| v * spec.max),
					min: 0.0,
					max: spec.max,
					format: spec.format,
				})
				.collect();
			Node {
				id: format!("{topology_id}-{i}"),
				label: format!("{} {i}", node_kind(topology_id)),
				label_minor: Some(format!("pid {}", 1000 + i * 7)),
				metrics,
				adjacency,
			}
		})
		.collect()
}

fn node_kind(topology_id: &str) -> &'static str {
	match topology_id {
		"processes" => "proc",
		"containers" => "container",
		_ => "host",
	}
}

/// Fraction of the metric's range; every seventh node reports no sample.
fn sample_value(node: usize, metric: usize, tick: u64) -> Option<f64> {
	if (node + metric) % 7 == 6 {
		return None;
	}
	let base = rand_simple(node * 31 + metric * 7);
	let wobble = rand_simple(node * 13 + metric * 5 + tick as usize * 17) - 0.5;
	Some((base + 0.3 * wobble).clamp(0.0, 1.0))
}

/// In-process stand-in for the topology API and websocket.
pub struct DemoFeed {
	store: Store,
	tick: AtomicU64,
	fed: Mutex<Option<(String, TopologyOptions)>>,
}

impl DemoFeed {
	/// A feed dispatching into `store`.
	pub fn new(store: Store) -> Self {
		Self {
			store,
			tick: AtomicU64::new(0),
			fed: Mutex::new(None),
		}
	}

	/// Pushes one round of updates: the full node set when the topology or its
	/// options changed since the last round, otherwise fresh metric samples.
	pub fn tick(&self) {
		let state = self.store.state();
		let Some(topology_id) = state.current_topology_id() else {
			return;
		};
		let options = state.active_topology_options();
		let tick = self.tick.fetch_add(1, Ordering::Relaxed) + 1;

		let mut fed = self.fed.lock().unwrap_or_else(PoisonError::into_inner);
		let key = (topology_id.to_owned(), options);
		let delta = if fed.as_ref() != Some(&key) {
			info!("feeding topology {topology_id}");
			NodesDelta {
				add: generate_sample_nodes(topology_id, &key.1, tick),
				remove: state.nodes().keys().cloned().collect(),
				..NodesDelta::default()
			}
		} else {
			NodesDelta {
				update: generate_sample_nodes(topology_id, &key.1, tick),
				..NodesDelta::default()
			}
		};
		*fed = Some(key);
		drop(fed);

		if state.is_websocket_closed() {
			self.store.dispatch(Action::OpenWebsocket);
		}
		debug!(
			"delta +{} ~{} -{}",
			delta.add.len(),
			delta.update.len(),
			delta.remove.len()
		);
		self.store.dispatch(Action::ReceiveNodesDelta(delta));
	}
}

impl ApiClient for DemoFeed {
	fn get_topologies(&self, options: &TopologyOptions) {
		debug!("get_topologies {options:?}");
		self.store
			.dispatch(Action::ReceiveTopologies(sample_topologies()));
		self.tick();
	}

	fn get_api_details(&self) {
		self.store.dispatch(Action::ReceiveApiDetails {
			hostname: "demo.local".into(),
			version: env!("CARGO_PKG_VERSION").into(),
		});
	}

	fn get_node_details(&self, topology_id: &str, node_id: &str) {
		let state = self.store.state();
		let Some(node) = state.nodes().get(node_id) else {
			warn!("no node {node_id} in {topology_id}");
			return;
		};
		let mut rows = vec![("Topology".to_owned(), topology_id.to_owned())];
		rows.extend(node.label_minor.clone().map(|minor| ("Info".to_owned(), minor)));
		rows.extend(node.metrics.iter().map(|m| {
			let value = m.value.map(|v| m.format.format(v)).unwrap_or_else(|| "n/a".into());
			(m.label.clone(), value)
		}));
		rows.push(("Connections".into(), node.adjacency.len().to_string()));
		self.store.dispatch(Action::ReceiveNodeDetails(NodeDetails {
			id: node.id.clone(),
			label: node.label.clone(),
			rows,
		}));
	}
}

/// Drives [`DemoFeed::tick`] from a page timer.
pub fn start_live_updates(feed: Arc<DemoFeed>, interval_ms: i32) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let on_tick = Closure::<dyn FnMut()>::new(move || feed.tick());
	if let Err(err) = window.set_interval_with_callback_and_timeout_and_arguments_0(
		on_tick.as_ref().unchecked_ref(),
		interval_ms,
	) {
		warn!("could not start live updates: {err:?}");
	}
	on_tick.forget();
}
