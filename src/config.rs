//! Runtime configuration, defaults overridable from a `<meta>` tag.

use std::str::FromStr;

use log::{Level, warn};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Name of the `<meta>` tag whose `content` holds a JSON config override.
pub const CONFIG_META_NAME: &str = "topology-config";

/// Layout, feed and logging settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
	/// Width reserved for the details panel while it is open.
	pub details_width: f64,
	/// Height reserved for the header above the graph.
	pub top_margin: f64,
	/// Base size every node glyph is scaled from.
	pub node_size: f64,
	/// Value label font size as a fraction of the node size.
	pub metric_font_scale: f64,
	/// Period of the demo feed's metric updates.
	pub feed_interval_ms: i32,
	/// `localStorage` key remembering the debug toolbar.
	pub debug_toolbar_storage_key: String,
	/// `log` level name, e.g. `info`.
	pub log_level: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			details_width: 450.0,
			top_margin: 100.0,
			node_size: 30.0,
			metric_font_scale: 0.19,
			feed_interval_ms: 2000,
			debug_toolbar_storage_key: "topologyDebugToolbar".into(),
			log_level: "debug".into(),
		}
	}
}

impl AppConfig {
	/// Parses a (possibly partial) JSON override.
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(Error::Config)
	}

	/// The configured level as a `log::Level`.
	pub fn log_level(&self) -> Result<Level> {
		Level::from_str(&self.log_level).map_err(|_| Error::LogLevel(self.log_level.clone()))
	}

	/// Reads the override from the document, falling back to defaults.
	pub fn load() -> Self {
		let Some(content) = read_meta_content(CONFIG_META_NAME) else {
			return Self::default();
		};
		Self::from_json(&content).unwrap_or_else(|err| {
			warn!("{err}, using default configuration");
			Self::default()
		})
	}
}

fn read_meta_content(name: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let meta = document
		.query_selector(&format!("meta[name=\"{name}\"]"))
		.ok()
		.flatten()?;
	meta.get_attribute("content")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config = AppConfig::from_json(r#"{"detailsWidth": 300, "logLevel": "info"}"#).unwrap();
		assert_eq!(config.details_width, 300.0);
		assert_eq!(config.top_margin, 100.0);
		assert_eq!(config.log_level().unwrap(), Level::Info);
	}

	#[test]
	fn malformed_json_is_a_config_error() {
		let err = AppConfig::from_json("{detailsWidth").unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn unknown_log_level_is_reported() {
		let config = AppConfig {
			log_level: "loud".into(),
			..AppConfig::default()
		};
		assert!(matches!(config.log_level(), Err(Error::LogLevel(level)) if level == "loud"));
	}
}
