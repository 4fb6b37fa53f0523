use super::model::{ControlPipe, NodeDetails, NodesDelta, Topology};
use crate::router::RouteState;

/// Every way the store's state can change.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// The topology list arrived.
	ReceiveTopologies(Vec<Topology>),
	/// Switch to the topology with this id.
	ClickTopology(String),
	/// Set one option of the current topology.
	ChangeTopologyOption {
		/// Option id.
		option: String,
		/// Chosen value.
		value: String,
	},
	/// Restart the layout from scratch.
	ClickRelayout,
	/// A state route was read from the URL.
	RouteChanged(RouteState),

	/// Nodes were added, updated or removed by the feed.
	ReceiveNodesDelta(NodesDelta),
	/// Details for one node arrived.
	ReceiveNodeDetails(NodeDetails),
	/// Toggle selection of a node.
	ClickNode(String),
	/// Close the details card of a node.
	ClickCloseDetails(String),
	/// Pointer entered a node.
	EnterNode(String),
	/// Pointer left a node.
	LeaveNode(String),
	/// Escape: close the top overlay and clear highlights.
	HitEsc,

	/// Preview a metric, or none.
	SelectMetric(Option<String>),
	/// Pin a metric.
	LockMetric(String),
	/// Unpin the metric, keeping the current selection.
	UnlockMetric,
	/// Locks the metric `delta` steps away from the selected one.
	LockNextMetric(i32),

	/// Server identity arrived.
	ReceiveApiDetails {
		/// Host the API runs on.
		hostname: String,
		/// API version.
		version: String,
	},
	/// The update stream connected.
	OpenWebsocket,
	/// The update stream dropped.
	CloseWebsocket,
	/// A request to this URL failed.
	ReceiveError(String),
	/// Forget the last request error.
	ClearError,
	/// Timestamp in milliseconds since the epoch.
	PauseUpdates(f64),
	/// Apply buffered deltas and keep applying new ones.
	ResumeUpdates,

	/// A control was sent for this node.
	DoControl(String),
	/// The control on this node succeeded.
	DoControlSuccess(String),
	/// The control on a node failed.
	DoControlError {
		/// Node the control ran on.
		node_id: String,
		/// Failure message.
		error: String,
	},
	/// A terminal pipe was opened.
	ReceiveControlPipe(ControlPipe),
	/// Close the pipe with this id.
	ClosePipe(String),
}
