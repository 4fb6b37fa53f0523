//! Concentric layer geometry for square node glyphs.

use crate::metrics::effective_size;

/// Half-extent of the highlight ring, as a fraction of the node size.
pub const HIGHLIGHT_SCALE: f64 = 0.7;
/// Half-extent of the border layer.
pub const BORDER_SCALE: f64 = 0.5;
/// Corner scale of the border layer.
pub const BORDER_CORNER_SCALE: f64 = 0.5;
/// Half-extent of the shadow and metric fill layers.
pub const FILL_SCALE: f64 = 0.45;
/// Corner scale of the shadow and metric fill layers.
pub const FILL_CORNER_SCALE: f64 = 0.39;
/// Center dot radius, as a fraction of the node size.
pub const DOT_SCALE: f64 = 0.125;
/// Smallest center dot ever drawn.
pub const MIN_DOT_RADIUS: f64 = 2.0;

/// Corner rounding fractions applied on top of a layer's corner scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Corners {
	/// Horizontal corner radius fraction.
	pub rx: f64,
	/// Vertical corner radius fraction.
	pub ry: f64,
}

/// A square layer centered on the node origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayerGeometry {
	/// Layer width.
	pub width: f64,
	/// Layer height, always equal to the width.
	pub height: f64,
	/// Horizontal corner radius.
	pub rx: f64,
	/// Vertical corner radius.
	pub ry: f64,
	/// Left edge relative to the node center.
	pub x: f64,
	/// Top edge relative to the node center.
	pub y: f64,
}

/// Square layer spanning `2 * scale * size`, centered on the origin.
///
/// Corners use `corner_scale` when given, else `scale`.
pub fn layer_geometry(
	size: f64,
	scale: f64,
	corner_scale: Option<f64>,
	corners: Corners,
) -> LayerGeometry {
	let size = effective_size(size);
	let corner_scale = corner_scale.unwrap_or(scale);
	LayerGeometry {
		width: 2.0 * scale * size,
		height: 2.0 * scale * size,
		rx: corner_scale * size * corners.rx,
		ry: corner_scale * size * corners.ry,
		x: -scale * size,
		y: -scale * size,
	}
}

/// The window through which the metric fill layer is visible.
///
/// Its bottom edge sits at `size / 2` and it grows upwards with the fill
/// height, so the gauge fills from the bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipRegion {
	/// Always the full node size.
	pub width: f64,
	/// Fill height, clamped to the node size.
	pub height: f64,
	/// Left edge relative to the node center.
	pub x: f64,
	/// Top edge relative to the node center.
	pub y: f64,
}

/// Clip window for a gauge filled to `fill_height`.
pub fn clip_region(size: f64, fill_height: f64) -> ClipRegion {
	let size = effective_size(size);
	let height = fill_height.clamp(0.0, size);
	ClipRegion {
		width: size,
		height,
		x: -size * 0.5,
		y: size * 0.5 - height,
	}
}

/// Radius of the "no label" center dot.
pub fn dot_radius(size: f64) -> f64 {
	(effective_size(size) * DOT_SCALE).max(MIN_DOT_RADIUS)
}

/// What sits at the center of the glyph.
#[derive(Clone, Debug, PartialEq)]
pub enum CenterMark {
	/// Plain dot, drawn when no value label is shown.
	Dot {
		/// Dot radius.
		r: f64,
	},
	/// Formatted metric value.
	Label {
		/// Text to draw.
		text: String,
		/// Font size in px.
		font_size: f64,
	},
}

/// Every layer of one square glyph, outermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeGeometry {
	/// Ring drawn only while the node is highlighted.
	pub highlight: Option<LayerGeometry>,
	/// Outline in the node color.
	pub border: LayerGeometry,
	/// Backdrop behind the metric fill.
	pub shadow: LayerGeometry,
	/// Metric colored layer, visible through `clip`.
	pub metric_fill: LayerGeometry,
	/// Window exposing the filled part of the gauge.
	pub clip: ClipRegion,
	/// Dot or value label.
	pub center: CenterMark,
}

impl ShapeGeometry {
	/// Geometry of a square node; the center defaults to a dot.
	pub fn square(size: f64, corners: Corners, highlighted: bool, fill_height: f64) -> Self {
		Self {
			highlight: highlighted.then(|| layer_geometry(size, HIGHLIGHT_SCALE, None, corners)),
			border: layer_geometry(size, BORDER_SCALE, Some(BORDER_CORNER_SCALE), corners),
			shadow: layer_geometry(size, FILL_SCALE, Some(FILL_CORNER_SCALE), corners),
			metric_fill: layer_geometry(size, FILL_SCALE, Some(FILL_CORNER_SCALE), corners),
			clip: clip_region(size, fill_height),
			center: CenterMark::Dot {
				r: dot_radius(size),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layers_are_centered_squares() {
		let corners = Corners { rx: 0.2, ry: 0.3 };
		for size in [1.0, 7.5, 20.0, 64.0] {
			for scale in [HIGHLIGHT_SCALE, BORDER_SCALE, FILL_SCALE] {
				let layer = layer_geometry(size, scale, None, corners);
				assert_eq!(layer.width, layer.height);
				assert_eq!(layer.width, 2.0 * scale * size);
				assert_eq!(layer.x, -scale * size);
				assert_eq!(layer.y, layer.x);
			}
		}
	}

	#[test]
	fn corner_scale_overrides_layer_scale() {
		let corners = Corners { rx: 0.5, ry: 1.0 };
		let layer = layer_geometry(20.0, FILL_SCALE, Some(FILL_CORNER_SCALE), corners);
		assert!((layer.rx - 0.39 * 20.0 * 0.5).abs() < 1e-12);
		assert!((layer.ry - 0.39 * 20.0).abs() < 1e-12);

		let layer = layer_geometry(20.0, HIGHLIGHT_SCALE, None, corners);
		assert!((layer.ry - 0.7 * 20.0).abs() < 1e-12);
	}

	#[test]
	fn clip_grows_up_from_bottom_edge() {
		let clip = clip_region(20.0, 10.0);
		assert_eq!(clip.y + clip.height, 10.0);
		assert_eq!(clip.y, 0.0);
		assert_eq!(clip.x, -10.0);
		assert_eq!(clip.width, 20.0);

		let empty = clip_region(20.0, 0.0);
		assert_eq!(empty.height, 0.0);
		assert_eq!(empty.y, 10.0);
	}

	#[test]
	fn non_positive_sizes_never_go_negative() {
		for size in [0.0, -3.0, f64::NAN] {
			let shape = ShapeGeometry::square(size, Corners::default(), true, 5.0);
			assert_eq!(shape.border.width, 0.0);
			assert!(shape.clip.height >= 0.0);
			assert_eq!(shape.center, CenterMark::Dot { r: MIN_DOT_RADIUS });
		}
	}

	#[test]
	fn dot_radius_has_a_floor() {
		assert_eq!(dot_radius(8.0), 2.0);
		assert_eq!(dot_radius(40.0), 5.0);
	}

	#[test]
	fn highlight_ring_only_when_highlighted() {
		let plain = ShapeGeometry::square(20.0, Corners::default(), false, 0.0);
		assert!(plain.highlight.is_none());
		let lit = ShapeGeometry::square(20.0, Corners::default(), true, 0.0);
		let ring = lit.highlight.unwrap();
		assert!((ring.width - 28.0).abs() < 1e-9);
		assert!((ring.x + 14.0).abs() < 1e-9);
	}
}
