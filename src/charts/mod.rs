//! Node glyphs for the topology graph.

pub mod colors;
pub mod geometry;
mod node_shape;

pub use node_shape::{NodeGlyph, NodeShapeProps, NodeShapeSquare};

/// Formats a coordinate for SVG output without float noise.
pub fn svg_number(value: f64) -> String {
	if value == 0.0 || !value.is_finite() {
		return "0".into();
	}
	let text = format!("{value:.3}");
	let text = text.trim_end_matches('0').trim_end_matches('.');
	if text == "-0" { "0".into() } else { text.into() }
}

/// Escapes text for use in SVG markup.
pub fn escape_xml(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numbers_are_trimmed() {
		assert_eq!(svg_number(10.0), "10");
		assert_eq!(svg_number(-3.8000000000000003), "-3.8");
		assert_eq!(svg_number(-0.0001), "0");
		assert_eq!(svg_number(f64::NAN), "0");
	}

	#[test]
	fn xml_is_escaped() {
		assert_eq!(escape_xml("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
	}
}
