//! Mapping of node metrics onto gauge fill, display text and color.

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};

/// How a metric's raw value is turned into display text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
	/// Two decimals.
	#[default]
	Number,
	/// Rounded to a whole number.
	Integer,
	/// One decimal and a `%` sign.
	Percent,
	/// A byte count in binary units.
	Filesize,
}

impl MetricFormat {
	/// Display text for a raw sample.
	pub fn format(self, value: f64) -> String {
		match self {
			MetricFormat::Number => format!("{value:.2}"),
			MetricFormat::Integer => format!("{:.0}", value.round()),
			MetricFormat::Percent => format!("{value:.1}%"),
			MetricFormat::Filesize => ByteSize::b(value.max(0.0).round() as u64).to_string_as(true),
		}
	}
}

/// One metric sample on a node, with the range it is drawn against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricDescriptor {
	/// Metric id, shared by every node that reports it.
	pub id: String,
	/// Display name.
	pub label: String,
	/// `None` means the feed has no sample for this node.
	pub value: Option<f64>,
	/// Value drawn as an empty gauge.
	pub min: f64,
	/// Value drawn as a full gauge.
	pub max: f64,
	/// How the value is displayed.
	#[serde(default)]
	pub format: MetricFormat,
}

/// Outcome of resolving a metric against a node's rendered size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricValue {
	/// Position of the value in its range, in `[0, 1]`.
	pub normalized: f64,
	/// Visible fill height, in the same units as the node size.
	pub height: f64,
	/// The raw sample, `None` when there is no data.
	pub value: Option<f64>,
	/// Display text, empty when there is no data.
	pub formatted_value: String,
}

/// Normalizes `value` into `[0, 1]` against `[min, max]`.
///
/// Degenerate or inverted ranges snap to the boundary: `1` once the value
/// reaches `max`, otherwise `0`.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
	if max > min {
		(value.clamp(min, max) - min) / (max - min)
	} else if value >= max {
		1.0
	} else {
		0.0
	}
}

/// Resolves a node's metric sample against its size.
///
/// A missing metric, a missing value and a non-finite value all resolve to
/// "no data": zero height and no text.
pub fn resolve_metric_value(metric: Option<&MetricDescriptor>, size: f64) -> MetricValue {
	let Some((metric, value)) = metric.and_then(|m| {
		m.value
			.filter(|v| v.is_finite())
			.map(|value| (m, value))
	}) else {
		return MetricValue::default();
	};

	let normalized = normalize(value, metric.min, metric.max);
	MetricValue {
		normalized,
		height: normalized * effective_size(size),
		value: Some(value),
		formatted_value: metric.format.format(value),
	}
}

/// Sizes that cannot be drawn collapse to zero.
pub fn effective_size(size: f64) -> f64 {
	if size.is_finite() && size > 0.0 {
		size
	} else {
		0.0
	}
}

/// Fill color for metrics without a dedicated color.
pub const DEFAULT_METRIC_COLOR: &str = "#4682b4";

const METRIC_COLORS: &[(&str, &str)] = &[
	("mem", "#4682b4"),
	("cpu", "#ff7f0e"),
	("files", "#9467bd"),
	("load", "#2ca02c"),
];

/// Fill color for a metric, keyed by the metric id.
pub fn metric_color(metric: Option<&MetricDescriptor>) -> &'static str {
	let Some(metric) = metric else {
		return DEFAULT_METRIC_COLOR;
	};
	let id = metric.id.to_ascii_lowercase();
	METRIC_COLORS
		.iter()
		.find(|(key, _)| id.contains(key))
		.map(|(_, color)| *color)
		.unwrap_or(DEFAULT_METRIC_COLOR)
}
