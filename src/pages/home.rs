use std::sync::Arc;

use leptos::ev;
use leptos::prelude::*;
use log::{info, warn};

use crate::api::SharedApi;
use crate::components::debug_toolbar::{DebugToolbar, set_debug_toolbar, showing_debug_toolbar};
use crate::components::details::{Details, TerminalBar};
use crate::components::footer::Footer;
use crate::components::metric_selector::MetricSelector;
use crate::components::status::Status;
use crate::components::topologies::{Topologies, TopologyOptions};
use crate::components::topology_graph::TopologyGraph;
use crate::config::AppConfig;
use crate::controller::{AppController, KeyInput, KeyOutcome, LayoutHints, RenderSnapshot};
use crate::router::HashRouter;
use crate::store::Store;

/// Topology view: mounts the controller and lays out the panels around the graph.
#[component]
pub fn Home() -> impl IntoView {
	let store = expect_context::<Store>();
	let api = expect_context::<SharedApi>();
	let config = expect_context::<AppConfig>();
	let router = HashRouter::new(store.clone(), api.clone());

	let snapshot = RwSignal::new(RenderSnapshot::derive(&store.state()));
	let debug_toolbar = RwSignal::new(showing_debug_toolbar(&config.debug_toolbar_storage_key));

	let controller = Arc::new(AppController::mount(store.clone(), &router, &*api, move |next| {
		snapshot.set(next)
	}));

	let (store_route, router_cleanup) = (store.clone(), router.clone());
	Effect::new(move |_| {
		snapshot.track();
		if let Err(err) = router.update_route(&store_route.state()) {
			warn!("could not update route: {err}");
		}
	});

	let controller_keys = controller.clone();
	let storage_key = config.debug_toolbar_storage_key.clone();
	let handle = window_event_listener(ev::keyup, move |ev| {
		if controller_keys.handle_key(&KeyInput::from_event(&ev)) == KeyOutcome::ToggleDebugToolbar {
			let show = !debug_toolbar.get_untracked();
			debug_toolbar.set(show);
			set_debug_toolbar(&storage_key, show);
			info!("debug toolbar {}", if show { "shown" } else { "hidden" });
		}
	});

	on_cleanup(move || {
		handle.remove();
		router_cleanup.stop();
		controller.unmount();
	});

	let nodes = Memo::new(move |_| snapshot.with(|s| s.nodes.clone()));
	let highlighted_edge_ids = Memo::new(move |_| snapshot.with(|s| s.highlighted_edge_ids.clone()));
	let force_relayout = Memo::new(move |_| snapshot.with(|s| s.force_relayout));
	let topology_id = Memo::new(move |_| snapshot.with(|s| s.current_topology_id.clone()));
	let hints = Memo::new(move |_| snapshot.with(|s| LayoutHints::new(s, &config)));
	let has_metrics = Memo::new(move |_| snapshot.with(|s| !s.available_canvas_metrics.is_empty()));

	view! {
		<div class="app">
			<Show when=move || debug_toolbar.get()>
				<DebugToolbar snapshot=snapshot />
			</Show>
			<Show when=move || snapshot.with(RenderSnapshot::showing_details)>
				<Details snapshot=snapshot />
			</Show>
			<Show when=move || snapshot.with(RenderSnapshot::showing_terminal)>
				<TerminalBar snapshot=snapshot />
			</Show>
			<div class="header">
				<div class="logo">"topology"</div>
				<Topologies snapshot=snapshot />
			</div>
			<TopologyGraph
				nodes=nodes
				highlighted_edge_ids=highlighted_edge_ids
				force_relayout=force_relayout
				hints=hints
				topology_id=topology_id
			/>
			<div class="sidebar">
				<Status snapshot=snapshot />
				<Show when=move || has_metrics.get()>
					<MetricSelector snapshot=snapshot />
				</Show>
				<TopologyOptions snapshot=snapshot />
			</div>
			<Footer snapshot=snapshot />
		</div>
	}
}
