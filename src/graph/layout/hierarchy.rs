use std::collections::VecDeque;

use super::{LayoutStrategy, PositionedNode, edge_indices, place};
use crate::graph::adapter::{FlowEdge, FlowNode};
use crate::graph::types::EdgeType;

/// Layered tree: roots on top, children one layer down per hop.
#[derive(Clone, Debug)]
pub struct HierarchyLayout {
	/// Horizontal gap between siblings.
	pub sibling_spacing: f64,
	/// Vertical gap between layers.
	pub layer_spacing: f64,
}

impl Default for HierarchyLayout {
	fn default() -> Self {
		Self {
			sibling_spacing: 140.0,
			layer_spacing: 120.0,
		}
	}
}

/// Orients an edge as `(parent, child)`.
fn parent_child(source: usize, target: usize, edge_type: &EdgeType) -> (usize, usize) {
	match edge_type {
		EdgeType::ChildOf | EdgeType::PartOf => (target, source),
		_ => (source, target),
	}
}

impl HierarchyLayout {
	/// Layer index of every node.
	///
	/// Roots are nodes without a parent, in input order. Nodes only reachable
	/// through a cycle are picked up as extra roots so every node gets a layer.
	pub fn layers(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<usize> {
		let n = nodes.len();
		let mut children = vec![Vec::new(); n];
		let mut has_parent = vec![false; n];
		for (src, tgt, e) in edge_indices(nodes, edges) {
			if src == tgt {
				continue;
			}
			let (parent, child) = parent_child(src, tgt, &edges[e].record.edge_type);
			children[parent].push(child);
			has_parent[child] = true;
		}

		let mut depth: Vec<Option<usize>> = vec![None; n];
		let mut queue = VecDeque::new();
		let roots = (0..n).filter(|&i| !has_parent[i]).chain(0..n);
		for root in roots {
			if depth[root].is_some() {
				continue;
			}
			depth[root] = Some(0);
			queue.push_back(root);
			while let Some(current) = queue.pop_front() {
				let d = depth[current].unwrap_or(0);
				for &child in &children[current] {
					if depth[child].is_none() {
						depth[child] = Some(d + 1);
						queue.push_back(child);
					}
				}
			}
		}
		depth.into_iter().map(|d| d.unwrap_or(0)).collect()
	}
}

impl LayoutStrategy for HierarchyLayout {
	fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode> {
		let layers = self.layers(nodes, edges);
		let count = layers.iter().copied().max().map_or(0, |m| m + 1);
		let mut widths = vec![0usize; count];
		for &l in &layers {
			widths[l] += 1;
		}

		let mut slot = vec![0usize; count];
		let coords: Vec<_> = layers
			.iter()
			.map(|&l| {
				let i = slot[l];
				slot[l] += 1;
				let offset = (widths[l] - 1) as f64 / 2.0;
				(
					(i as f64 - offset) * self.sibling_spacing,
					l as f64 * self.layer_spacing,
				)
			})
			.collect();
		place(nodes, coords)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::layout::test_support::{edge, nodes};

	#[test]
	fn children_sit_one_layer_below_parents() {
		// 0 contains 1 and 2, 3 is a child of 2
		let es = vec![
			edge(0, 1, EdgeType::Contains),
			edge(0, 2, EdgeType::Contains),
			edge(3, 2, EdgeType::ChildOf),
		];
		let layout = HierarchyLayout::default();
		assert_eq!(layout.layers(&nodes(4), &es), vec![0, 1, 1, 2]);

		let out = layout.layout(&nodes(4), &es);
		assert_eq!(out[0].x, 0.0);
		assert_eq!(out[1].y, out[2].y);
		assert_eq!(out[1].x, -out[2].x);
		assert!(out[3].y > out[2].y);
	}

	#[test]
	fn part_of_points_to_the_parent() {
		let es = vec![edge(1, 0, EdgeType::PartOf)];
		assert_eq!(HierarchyLayout::default().layers(&nodes(2), &es), vec![0, 1]);
	}

	#[test]
	fn cycles_still_get_layers() {
		let es = vec![
			edge(0, 1, EdgeType::ParentOf),
			edge(1, 2, EdgeType::ParentOf),
			edge(2, 0, EdgeType::ParentOf),
		];
		assert_eq!(HierarchyLayout::default().layers(&nodes(3), &es), vec![0, 1, 2]);
	}

	#[test]
	fn forests_share_the_top_layer() {
		let out = HierarchyLayout::default().layout(&nodes(3), &[]);
		assert!(out.iter().all(|p| p.y == 0.0));
		assert_eq!(out[0].x, -140.0);
		assert_eq!(out[2].x, 140.0);
	}
}
