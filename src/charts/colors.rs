//! Node palette.

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Stable palette color for a node label, so a node keeps its color across
/// feed updates and reloads.
pub fn node_color(label: &str) -> &'static str {
	// FNV-1a
	let hash = label
		.bytes()
		.fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
			(hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
		});
	COLORS[(hash % COLORS.len() as u64) as usize]
}
