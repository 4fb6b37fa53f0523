use leptos::prelude::*;

use crate::controller::RenderSnapshot;
use crate::store::{Action, Store};

#[component]
pub fn Topologies(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();

	let items = move || {
		snapshot.with(|s| {
			s.topologies
				.iter()
				.map(|topology| {
					let store = store.clone();
					let id = topology.id.clone();
					let class = if s.current_topology_id.as_ref() == Some(&topology.id) {
						"topologies-item topologies-item-active"
					} else {
						"topologies-item"
					};
					view! {
						<div class=class on:click=move |_| store.dispatch(Action::ClickTopology(id.clone()))>
							{topology.name.clone()}
						</div>
					}
				})
				.collect_view()
		})
	};

	view! { <div class="topologies">{items}</div> }
}

/// Value toggles for the current topology's options.
#[component]
pub fn TopologyOptions(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();

	let options = move || {
		snapshot.with(|s| {
			s.current_topology_options
				.iter()
				.map(|option| {
					let active = s
						.active_topology_options
						.get(&option.id)
						.unwrap_or(&option.default_value);
					let values = option
						.values
						.iter()
						.map(|value| {
							let store = store.clone();
							let (option_id, value_id) = (option.id.clone(), value.clone());
							let class = if value == active {
								"topology-option-action topology-option-action-selected"
							} else {
								"topology-option-action"
							};
							view! {
								<div
									class=class
									on:click=move |_| {
										store
											.dispatch(Action::ChangeTopologyOption {
												option: option_id.clone(),
												value: value_id.clone(),
											})
									}
								>
									{format!("{} {}", value, option.id)}
								</div>
							}
						})
						.collect_view();
					view! { <div class="topology-option">{values}</div> }
				})
				.collect_view()
		})
	};

	view! { <div class="topology-options">{options}</div> }
}
