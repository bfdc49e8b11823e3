use super::{LayoutStrategy, PositionedNode, place};
use crate::graph::adapter::{FlowEdge, FlowNode};

/// Distance between neighbouring grid cells.
pub const CELL_SPACING: f64 = 150.0;

/// Smallest `c` with `c * c >= n`, i.e. `ceil(sqrt(n))` without float error.
pub fn grid_columns(n: usize) -> usize {
	let mut c = (n as f64).sqrt() as usize;
	while c * c < n {
		c += 1;
	}
	while c > 0 && (c - 1) * (c - 1) >= n {
		c -= 1;
	}
	c
}

/// Row-major square grid. Ignores edges.
#[derive(Clone, Debug)]
pub struct GridLayout {
	/// Cell size.
	pub spacing: f64,
}

impl Default for GridLayout {
	fn default() -> Self {
		Self {
			spacing: CELL_SPACING,
		}
	}
}

impl GridLayout {
	/// Coordinates for `n` cells, centred on the origin.
	pub fn coords(&self, n: usize) -> Vec<(f64, f64)> {
		let columns = grid_columns(n);
		if columns == 0 {
			return Vec::new();
		}
		let rows = n.div_ceil(columns);
		let (ox, oy) = (
			(columns - 1) as f64 * self.spacing / 2.0,
			(rows - 1) as f64 * self.spacing / 2.0,
		);
		(0..n)
			.map(|i| {
				let (row, col) = (i / columns, i % columns);
				(
					col as f64 * self.spacing - ox,
					row as f64 * self.spacing - oy,
				)
			})
			.collect()
	}
}

impl LayoutStrategy for GridLayout {
	fn layout(&self, nodes: &[FlowNode], _edges: &[FlowEdge]) -> Vec<PositionedNode> {
		place(nodes, self.coords(nodes.len()))
	}
}
