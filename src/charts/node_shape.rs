use std::fmt::Write;

use leptos::prelude::*;

use super::geometry::{CenterMark, ClipRegion, Corners, LayerGeometry, ShapeGeometry};
use super::{escape_xml, svg_number};
use crate::metrics::{MetricDescriptor, metric_color, resolve_metric_value};

/// Everything a node glyph depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShapeProps {
	/// Node id, also used to name the clip path.
	pub id: String,
	/// Rendered node size.
	pub size: f64,
	/// Border color.
	pub color: String,
	/// Whether the highlight ring and value label are shown.
	pub highlighted: bool,
	/// The node's sample of the selected metric.
	pub metric: Option<MetricDescriptor>,
	/// Corner rounding.
	pub corners: Corners,
	/// Label font size as a fraction of the node size.
	pub font_scale: f64,
}

/// A fully resolved square node glyph, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	/// Id of the `<clipPath>` bounding the metric fill.
	pub clip_id: String,
	/// Whether a metric value is present.
	pub has_metric: bool,
	/// Border color.
	pub color: String,
	/// Metric fill color.
	pub metric_color: &'static str,
	/// Layer geometry.
	pub shape: ShapeGeometry,
}

impl NodeGlyph {
	/// Resolves the metric and lays out every layer.
	pub fn build(props: &NodeShapeProps) -> Self {
		let resolved = resolve_metric_value(props.metric.as_ref(), props.size);
		let mut shape =
			ShapeGeometry::square(props.size, props.corners, props.highlighted, resolved.height);
		if props.highlighted && resolved.value.is_some() {
			shape.center = CenterMark::Label {
				text: resolved.formatted_value,
				font_size: props.size.max(0.0) * props.font_scale,
			};
		}

		Self {
			clip_id: format!("mask-{}", props.id),
			has_metric: resolved.value.is_some(),
			color: props.color.clone(),
			metric_color: metric_color(props.metric.as_ref()),
			shape,
		}
	}

	/// CSS class of the glyph group.
	pub fn class(&self) -> &'static str {
		if self.has_metric {
			"shape metrics"
		} else {
			"shape"
		}
	}

	/// `url(#...)` reference to the clip path.
	pub fn clip_url(&self) -> String {
		format!("url(#{})", self.clip_id)
	}

	/// Serializes the glyph as an SVG `<g>` centered on the origin.
	pub fn to_svg(&self) -> String {
		let mut svg = String::new();
		let _ = write!(svg, "<g class=\"{}\">", self.class());
		let _ = write!(
			svg,
			"<defs><clipPath id=\"{}\">{}</clipPath></defs>",
			escape_xml(&self.clip_id),
			clip_rect_svg(&self.shape.clip)
		);
		if let Some(layer) = &self.shape.highlight {
			svg.push_str(&layer_svg("highlighted", layer, ""));
		}
		svg.push_str(&layer_svg(
			"border",
			&self.shape.border,
			&format!(" stroke=\"{}\"", escape_xml(&self.color)),
		));
		svg.push_str(&layer_svg("shadow", &self.shape.shadow, ""));
		svg.push_str(&layer_svg(
			"metric-fill",
			&self.shape.metric_fill,
			&format!(
				" style=\"fill: {}\" clip-path=\"url(#{})\"",
				self.metric_color,
				escape_xml(&self.clip_id)
			),
		));
		match &self.shape.center {
			CenterMark::Label { text, font_size } => {
				let _ = write!(
					svg,
					"<text style=\"font-size: {}px\">{}</text>",
					svg_number(*font_size),
					escape_xml(text)
				);
			}
			CenterMark::Dot { r } => {
				let _ = write!(svg, "<circle class=\"node\" r=\"{}\"/>", svg_number(*r));
			}
		}
		svg.push_str("</g>");
		svg
	}
}

fn clip_rect_svg(clip: &ClipRegion) -> String {
	format!(
		"<rect width=\"{}\" height=\"{}\" x=\"{}\" y=\"{}\"/>",
		svg_number(clip.width),
		svg_number(clip.height),
		svg_number(clip.x),
		svg_number(clip.y)
	)
}

fn layer_svg(class: &str, layer: &LayerGeometry, extra: &str) -> String {
	format!(
		"<rect class=\"{class}\"{extra} width=\"{}\" height=\"{}\" rx=\"{}\" ry=\"{}\" x=\"{}\" y=\"{}\"/>",
		svg_number(layer.width),
		svg_number(layer.height),
		svg_number(layer.rx),
		svg_number(layer.ry),
		svg_number(layer.x),
		svg_number(layer.y)
	)
}

fn layer_rect(class: &'static str, layer: LayerGeometry) -> impl IntoView {
	view! {
		<rect
			class=class
			width=svg_number(layer.width)
			height=svg_number(layer.height)
			rx=svg_number(layer.rx)
			ry=svg_number(layer.ry)
			x=svg_number(layer.x)
			y=svg_number(layer.y)
		/>
	}
}

/// Square node glyph: border, shadow, clipped metric fill and a center mark.
#[component]
pub fn NodeShapeSquare(
	/// Glyph inputs.
	props: NodeShapeProps,
) -> impl IntoView {
	let glyph = NodeGlyph::build(&props);
	let NodeGlyph {
		clip_id,
		color,
		metric_color,
		shape,
		..
	} = glyph.clone();
	let clip = shape.clip;
	let border = shape.border;

	let center = match shape.center {
		CenterMark::Label { text, font_size } => view! {
			<text style=format!("font-size: {}px", svg_number(font_size))>{text}</text>
		}
		.into_any(),
		CenterMark::Dot { r } => view! { <circle class="node" r=svg_number(r) /> }.into_any(),
	};

	view! {
		<g class=glyph.class()>
			<defs>
				<clipPath id=clip_id>
					<rect
						width=svg_number(clip.width)
						height=svg_number(clip.height)
						x=svg_number(clip.x)
						y=svg_number(clip.y)
					/>
				</clipPath>
			</defs>
			{shape.highlight.map(|layer| layer_rect("highlighted", layer))}
			<rect
				class="border"
				stroke=color
				width=svg_number(border.width)
				height=svg_number(border.height)
				rx=svg_number(border.rx)
				ry=svg_number(border.ry)
				x=svg_number(border.x)
				y=svg_number(border.y)
			/>
			{layer_rect("shadow", shape.shadow)}
			<rect
				class="metric-fill"
				style=format!("fill: {metric_color}")
				clip-path=glyph.clip_url()
				width=svg_number(shape.metric_fill.width)
				height=svg_number(shape.metric_fill.height)
				rx=svg_number(shape.metric_fill.rx)
				ry=svg_number(shape.metric_fill.ry)
				x=svg_number(shape.metric_fill.x)
				y=svg_number(shape.metric_fill.y)
			/>
			{center}
		</g>
	}
}
