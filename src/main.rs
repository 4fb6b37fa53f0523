use leptos::mount::mount_to_body;
use leptos::prelude::*;
use topology_canvas::config::AppConfig;
use topology_canvas::{App, init_logging};

fn main() {
	let config = AppConfig::load();
	init_logging(&config);
	mount_to_body(move || view! { <App config=config.clone() /> })
}
