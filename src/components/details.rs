use leptos::prelude::*;

use crate::controller::RenderSnapshot;
use crate::store::{Action, Store};

/// Side panel with the details of the selected node(s).
#[component]
pub fn Details(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();

	let cards = move || {
		snapshot.with(|s| {
			s.node_details
				.iter()
				.map(|details| {
					let store = store.clone();
					let id = details.id.clone();
					let status = s.control_status.get(&details.id).cloned().unwrap_or_default();
					let rows = details
						.rows
						.iter()
						.map(|(key, value)| {
							view! {
								<tr>
									<td class="details-row-key">{key.clone()}</td>
									<td class="details-row-value">{value.clone()}</td>
								</tr>
							}
						})
						.collect_view();
					view! {
						<div class="details-card">
							<div class="details-header">
								<span class="details-label">{details.label.clone()}</span>
								<span
									class="details-close"
									on:click=move |_| store.dispatch(Action::ClickCloseDetails(id.clone()))
								>
									"x"
								</span>
							</div>
							{status.pending.then(|| view! { <div class="details-pending">"Working..."</div> })}
							{status.error.map(|error| view! { <div class="details-error">{error}</div> })}
							<table class="details-rows">{rows}</table>
						</div>
					}
				})
				.collect_view()
		})
	};

	view! { <div class="details">{cards}</div> }
}

/// Bar for an open terminal pipe.
#[component]
pub fn TerminalBar(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();

	move || {
		snapshot.with(|s| s.control_pipe.clone()).map(|pipe| {
			let store = store.clone();
			let id = pipe.id.clone();
			view! {
				<div class="terminal-bar">
					<span>{format!("Terminal on {}", pipe.node_id)}</span>
					<span class="terminal-close" on:click=move |_| store.dispatch(Action::ClosePipe(id.clone()))>
						"close"
					</span>
				</div>
			}
		})
	}
}
