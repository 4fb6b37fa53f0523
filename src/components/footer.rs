use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::controller::RenderSnapshot;
use crate::store::{Action, Store};

#[component]
pub fn Footer(#[prop(into)] snapshot: Signal<RenderSnapshot>) -> impl IntoView {
	let store = expect_context::<Store>();
	let store_relayout = store.clone();

	let on_pause = move |_: web_sys::MouseEvent| {
		if store.state().is_update_paused() {
			store.dispatch(Action::ResumeUpdates);
		} else {
			store.dispatch(Action::PauseUpdates(js_sys::Date::now()));
		}
	};

	let version = move || {
		snapshot.with(|s| {
			if s.hostname.is_empty() {
				String::new()
			} else {
				format!("Version {} on {}", s.version, s.hostname)
			}
		})
	};
	let pause_label = move || {
		snapshot.with(|s| match s.update_paused_at {
			Some(at) => {
				let at = js_sys::Date::new(&JsValue::from_f64(at));
				format!("Paused at {}", String::from(at.to_locale_time_string("en-US")))
			}
			None => "Pause".into(),
		})
	};

	view! {
		<div class="footer">
			<span class="footer-version">{version}</span>
			<span class="footer-action" on:click=on_pause>{pause_label}</span>
			<span
				class="footer-action"
				on:click=move |_| store_relayout.dispatch(Action::ClickRelayout)
			>
				"Relayout"
			</span>
		</div>
	}
}
