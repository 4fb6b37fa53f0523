//! Data-fetch collaborators. Responses arrive as store actions.

mod demo;

use std::sync::Arc;

pub use demo::{DemoFeed, start_live_updates};

use crate::store::model::TopologyOptions;

/// Shared handle to the API client, provided as context.
pub type SharedApi = Arc<dyn ApiClient + Send + Sync>;

/// Requests whose answers come back as store actions.
pub trait ApiClient {
	/// Fetches the topology list; answers with `ReceiveTopologies`.
	fn get_topologies(&self, options: &TopologyOptions);
	/// Fetches hostname and version; answers with `ReceiveApiDetails`.
	fn get_api_details(&self);
	/// Fetches the details of one node; answers with `ReceiveNodeDetails`.
	fn get_node_details(&self, topology_id: &str, node_id: &str);
}
