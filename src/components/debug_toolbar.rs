use leptos::prelude::*;
use log::warn;

use crate::controller::RenderSnapshot;

fn local_storage() -> Option<web_sys::Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

/// Whether the toolbar was left open in a previous session.
pub fn showing_debug_toolbar(key: &str) -> bool {
	local_storage()
		.and_then(|storage| storage.get_item(key).ok().flatten())
		.is_some_and(|value| value == "true")
}

pub fn set_debug_toolbar(key: &str, show: bool) {
	let Some(storage) = local_storage() else {
		return;
	};
	let result = if show {
		storage.set_item(key, "true")
	} else {
		storage.remove_item(key)
	};
	if let Err(e) = result {
		warn!("Could not persist debug toolbar state: {e:?}");
	}
}

fn summary(s: &RenderSnapshot) -> Vec<(&'static str, String)> {
	let edges: usize = s.nodes.iter().map(|n| n.adjacency.len()).sum();
	vec![
		("revision", s.revision.to_string()),
		("topology", s.current_topology_id.clone().unwrap_or_default()),
		("nodes", s.nodes.len().to_string()),
		("edges", edges.to_string()),
		("highlighted", s.highlighted_node_ids.len().to_string()),
		("metrics", s.available_canvas_metrics.len().to_string()),
		("selected metric", s.selected_metric.clone().unwrap_or_default()),
		("locked metric", s.locked_metric.clone().unwrap_or_default()),
		("paused", s.update_paused.to_string()),
	]
}

/// Overlay with store internals, toggled with the D key.
#[component]
pub fn DebugToolbar(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let rows = move || {
		snapshot
			.with(summary)
			.into_iter()
			.map(|(key, value)| {
				view! {
					<span class="debug-toolbar-item">
						<b>{key}</b>
						" "
						{value}
					</span>
				}
			})
			.collect_view()
	};

	view! { <div class="debug-toolbar">{rows}</div> }
}
