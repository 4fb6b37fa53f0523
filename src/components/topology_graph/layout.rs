use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::controller::NodeView;

/// Frames the simulation keeps running after the node set changes.
const SETTLE_TICKS: u32 = 240;
const SEED_RADIUS: f64 = 120.0;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
	pub id: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn to_svg(self) -> String {
		format!("translate({:.2},{:.2}) scale({:.4})", self.x, self.y, self.k)
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What one animation frame draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutFrame {
	pub transform: ViewTransform,
	pub positions: HashMap<String, (f64, f64)>,
}

/// Node positions for the current topology, owned by the graph view.
pub struct TopologyLayout {
	graph: ForceGraph<NodeInfo, ()>,
	signature: Vec<(String, Vec<String>)>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	settle_ticks: u32,
	dirty: bool,
}

fn new_graph() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl TopologyLayout {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: new_graph(),
			signature: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			width,
			height,
			settle_ticks: 0,
			dirty: true,
		}
	}

	/// Rebuilds the simulation when the node set or its edges changed, keeping
	/// the positions of nodes that survive.
	pub fn sync(&mut self, nodes: &[NodeView], force: bool) {
		let signature: Vec<(String, Vec<String>)> = nodes
			.iter()
			.map(|n| (n.id.clone(), n.adjacency.clone()))
			.collect();
		if signature == self.signature && !force {
			return;
		}

		let previous = self.positions();
		let mut graph = new_graph();
		let mut id_to_idx: HashMap<&str, DefaultNodeIdx> = HashMap::new();

		for (i, node) in nodes.iter().enumerate() {
			let (x, y) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
				(SEED_RADIUS * angle.cos(), SEED_RADIUS * angle.sin())
			});
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
				},
			});
			id_to_idx.insert(&node.id, idx);
		}

		for node in nodes {
			for target in &node.adjacency {
				if let (Some(&src), Some(&tgt)) =
					(id_to_idx.get(node.id.as_str()), id_to_idx.get(target.as_str()))
				{
					graph.add_edge(src, tgt, EdgeData::default());
				}
			}
		}

		self.graph = graph;
		self.signature = signature;
		self.settle_ticks = SETTLE_TICKS;
		self.dirty = true;
	}

	pub fn positions(&self) -> HashMap<String, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		positions
	}

	pub fn frame(&self) -> LayoutFrame {
		LayoutFrame {
			transform: self.transform,
			positions: self.positions(),
		}
	}

	pub fn is_settled(&self) -> bool {
		self.settle_ticks == 0
	}

	/// Advances the simulation; returns whether anything visible changed
	/// since the last call.
	pub fn step(&mut self, dt: f32) -> bool {
		if self.settle_ticks > 0 {
			self.graph.update(dt);
			self.settle_ticks -= 1;
			self.dirty = true;
		}
		std::mem::take(&mut self.dirty)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
		self.dirty = true;
	}

	pub fn start_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			self.dirty = true;
		}
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms around the screen point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.dirty = true;
	}
}
