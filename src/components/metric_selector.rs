use leptos::prelude::*;

use crate::controller::RenderSnapshot;
use crate::store::{Action, Store};

/// Hovering previews a metric on the canvas, clicking pins it.
#[component]
pub fn MetricSelector(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();
	let store_leave = store.clone();

	let on_mouse_leave = move |_: web_sys::MouseEvent| {
		let locked = store_leave.state().locked_metric().map(str::to_owned);
		store_leave.dispatch(Action::SelectMetric(locked));
	};

	let actions = move || {
		snapshot.with(|s| {
			s.available_canvas_metrics
				.iter()
				.map(|metric| {
					let (store_enter, store_click) = (store.clone(), store.clone());
					let (enter_id, click_id) = (metric.id.clone(), metric.id.clone());
					let is_locked = s.locked_metric.as_deref() == Some(metric.id.as_str());
					let class = match (is_locked, s.selected_metric.as_deref() == Some(metric.id.as_str())) {
						(true, _) => "metric-selector-action metric-selector-action-locked",
						(false, true) => "metric-selector-action metric-selector-action-selected",
						_ => "metric-selector-action",
					};
					view! {
						<div
							class=class
							on:mouseenter=move |_| {
								store_enter.dispatch(Action::SelectMetric(Some(enter_id.clone())))
							}
							on:click=move |_| {
								if is_locked {
									store_click.dispatch(Action::UnlockMetric);
								} else {
									store_click.dispatch(Action::LockMetric(click_id.clone()));
								}
							}
						>
							{metric.label.clone()}
						</div>
					}
				})
				.collect_view()
		})
	};

	view! {
		<div class="metric-selector" on:mouseleave=on_mouse_leave>
			{actions}
		</div>
	}
}
