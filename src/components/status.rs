use leptos::prelude::*;

use crate::controller::RenderSnapshot;

fn status_text(s: &RenderSnapshot) -> (String, bool) {
	if let Some(url) = &s.error_url {
		return (format!("Cannot reach {url}"), true);
	}
	if !s.topologies_loaded {
		return ("Connecting to topology feed".into(), true);
	}
	if s.websocket_closed {
		return ("Trying to reconnect...".into(), true);
	}
	let name = s
		.current_topology
		.as_ref()
		.map(|t| t.name.as_str())
		.unwrap_or("topology");
	let edges: usize = s.nodes.iter().map(|n| n.adjacency.len()).sum();
	(
		format!("{} nodes, {edges} connections in {name}", s.nodes.len()),
		false,
	)
}

#[component]
pub fn Status(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let status = Memo::new(move |_| snapshot.with(status_text));
	view! {
		<div class=move || if status.get().1 { "status status-warning" } else { "status" }>
			{move || status.get().0}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn errors_take_precedence() {
		let snapshot = RenderSnapshot {
			error_url: Some("/api/topology".into()),
			topologies_loaded: true,
			..RenderSnapshot::default()
		};
		assert_eq!(status_text(&snapshot), ("Cannot reach /api/topology".into(), true));
	}

	#[test]
	fn connected_status_counts_nodes() {
		let snapshot = RenderSnapshot {
			topologies_loaded: true,
			..RenderSnapshot::default()
		};
		assert_eq!(
			status_text(&snapshot),
			("0 nodes, 0 connections in topology".into(), false)
		);
	}
}
