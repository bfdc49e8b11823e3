use std::collections::VecDeque;
use std::f64::consts::PI;

use super::{LayoutStrategy, PositionedNode, adjacency, edge_indices, place};
use crate::graph::adapter::{FlowEdge, FlowNode};

/// Concentric rings of BFS distance around the best-connected node.
#[derive(Clone, Debug)]
pub struct RadialLayout {
	/// Distance between consecutive rings.
	pub ring_spacing: f64,
}

impl Default for RadialLayout {
	fn default() -> Self {
		Self {
			ring_spacing: 160.0,
		}
	}
}

impl RadialLayout {
	/// Ring index of every node. Unreachable nodes share the outermost ring.
	pub fn rings(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<usize> {
		let n = nodes.len();
		if n == 0 {
			return Vec::new();
		}
		let adj = adjacency(n, &edge_indices(nodes, edges));
		// first node wins ties
		let centre = (0..n).fold(0, |best, i| if adj[i].len() > adj[best].len() { i } else { best });

		let mut ring: Vec<Option<usize>> = vec![None; n];
		ring[centre] = Some(0);
		let mut queue = VecDeque::from([centre]);
		while let Some(current) = queue.pop_front() {
			let d = ring[current].unwrap_or(0);
			for &next in &adj[current] {
				if ring[next].is_none() {
					ring[next] = Some(d + 1);
					queue.push_back(next);
				}
			}
		}

		let outer = ring.iter().flatten().max().copied().unwrap_or(0) + 1;
		ring.into_iter().map(|r| r.unwrap_or(outer)).collect()
	}
}

impl LayoutStrategy for RadialLayout {
	fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode> {
		let rings = self.rings(nodes, edges);
		let count = rings.iter().copied().max().map_or(0, |m| m + 1);
		let mut sizes = vec![0usize; count];
		for &r in &rings {
			sizes[r] += 1;
		}

		let mut slot = vec![0usize; count];
		let coords: Vec<_> = rings
			.iter()
			.map(|&r| {
				let i = slot[r];
				slot[r] += 1;
				if r == 0 {
					return (0.0, 0.0);
				}
				let angle = i as f64 * 2.0 * PI / sizes[r] as f64;
				let radius = r as f64 * self.ring_spacing;
				(radius * angle.cos(), radius * angle.sin())
			})
			.collect();
		place(nodes, coords)
	}
}
