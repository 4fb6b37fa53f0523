//! Topology canvas: a Leptos client-side app that draws a live topology graph
//! and encodes a chosen node metric as a fill level inside each node glyph.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};

// Modules
pub mod api;
pub mod charts;
mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod metrics;
mod pages;
pub mod router;
pub mod store;

use crate::api::{DemoFeed, SharedApi, start_live_updates};
use crate::config::AppConfig;
use crate::store::Store;

pub use crate::error::{Error, Result};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging(config: &AppConfig) {
	let level = config.log_level().unwrap_or_else(|err| {
		warn!("{err}");
		Level::Debug
	});
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("Logging initialized at {level}");
}

/// An app router which renders the topology view and handles 404's
#[component]
pub fn App(
	/// Runtime configuration, provided to every view as context.
	config: AppConfig,
) -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let store = Store::new();
	let feed = Arc::new(DemoFeed::new(store.clone()));
	start_live_updates(feed.clone(), config.feed_interval_ms);
	let api: SharedApi = feed;

	provide_context(store);
	provide_context(api);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Topology" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
