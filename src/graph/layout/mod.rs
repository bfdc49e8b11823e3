//! Position assignment for adapted graphs.
//!
//! Each [`LayoutKind`] maps to one [`LayoutStrategy`]. Strategies take the
//! adapted node and edge lists and return the nodes, in the same order, with
//! world-space coordinates. None of them use randomness, so a graph always
//! lays out the same way.

mod force;
mod grid;
mod hierarchy;
mod radial;

use std::collections::HashMap;

pub use force::ForceLayout;
pub use grid::{CELL_SPACING, GridLayout, grid_columns};
pub use hierarchy::HierarchyLayout;
pub use radial::RadialLayout;

use super::adapter::{DisplayOptions, FlowEdge, FlowNode, adapt_edges, adapt_nodes};
use super::params::LayoutKind;
use super::types::GraphData;

/// A node with its position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// The adapted node.
	pub node: FlowNode,
	/// World-space x.
	pub x: f64,
	/// World-space y.
	pub y: f64,
}

/// Everything the canvas needs to draw one graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionedGraph {
	/// Positioned nodes, in backend order.
	pub nodes: Vec<PositionedNode>,
	/// Adapted edges, in backend order.
	pub edges: Vec<FlowEdge>,
	/// Flags the nodes were adapted with.
	pub options: DisplayOptions,
}

impl PositionedGraph {
	/// Returns true when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Replaces the annotation on the node with `id`.
	pub fn set_annotation(&mut self, id: &str, annotation: Option<String>) {
		if let Some(p) = self.nodes.iter_mut().find(|p| p.node.id == id) {
			p.node.record.annotation = annotation;
		}
	}
}

/// A layout algorithm.
pub trait LayoutStrategy {
	/// Positions `nodes`. The result has the same length and order.
	fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode>;
}

/// Returns the strategy for a layout kind.
pub fn strategy_for(kind: LayoutKind) -> Box<dyn LayoutStrategy> {
	match kind {
		LayoutKind::Force => Box::new(ForceLayout::default()),
		LayoutKind::Hierarchy => Box::new(HierarchyLayout::default()),
		LayoutKind::Radial => Box::new(RadialLayout::default()),
		LayoutKind::Grid => Box::new(GridLayout::default()),
	}
}

/// Positions `nodes` with the strategy for `kind`.
pub fn assign_layout(kind: LayoutKind, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode> {
	strategy_for(kind).layout(nodes, edges)
}

/// Adapts and lays out a fetched graph in one go.
pub fn build_view(data: &GraphData, options: DisplayOptions, kind: LayoutKind) -> PositionedGraph {
	let nodes = adapt_nodes(&data.nodes, options);
	let edges = adapt_edges(&data.edges);
	PositionedGraph {
		nodes: assign_layout(kind, &nodes, &edges),
		edges,
		options,
	}
}

/// Pairs each node with a position from `coords`.
fn place(nodes: &[FlowNode], coords: impl IntoIterator<Item = (f64, f64)>) -> Vec<PositionedNode> {
	nodes
		.iter()
		.zip(coords)
		.map(|(node, (x, y))| PositionedNode {
			node: node.clone(),
			x,
			y,
		})
		.collect()
}

/// Edges as index pairs into `nodes`, skipping any that do not resolve.
fn edge_indices(nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<(usize, usize, usize)> {
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	edges
		.iter()
		.enumerate()
		.filter_map(|(e, edge)| {
			Some((
				*index.get(edge.source.as_str())?,
				*index.get(edge.target.as_str())?,
				e,
			))
		})
		.collect()
}

/// Undirected adjacency lists in edge order, self-loops dropped.
fn adjacency(n: usize, pairs: &[(usize, usize, usize)]) -> Vec<Vec<usize>> {
	let mut adj = vec![Vec::new(); n];
	for &(a, b, _) in pairs {
		if a != b {
			adj[a].push(b);
			adj[b].push(a);
		}
	}
	adj
}

#[cfg(test)]
pub(crate) mod test_support {
	use std::collections::BTreeMap;

	use crate::graph::adapter::{DisplayOptions, FlowEdge, FlowNode, adapt_edge, adapt_node};
	use crate::graph::types::{EdgeType, GraphEdge, GraphNode, NodeType};

	pub fn nodes(n: usize) -> Vec<FlowNode> {
		(0..n)
			.map(|i| {
				adapt_node(
					&GraphNode {
						id: format!("n{i}"),
						label: format!("Node {i}"),
						node_type: NodeType::Character,
						image_url: None,
						properties: BTreeMap::new(),
						annotation: None,
					},
					DisplayOptions::default(),
				)
			})
			.collect()
	}

	pub fn edge(source: usize, target: usize, edge_type: EdgeType) -> FlowEdge {
		adapt_edge(&GraphEdge {
			id: format!("e{source}-{target}"),
			source: format!("n{source}"),
			target: format!("n{target}"),
			edge_type,
			label: None,
		})
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::test_support::{edge, nodes};
	use super::*;
	use crate::graph::types::EdgeType;

	#[test]
	fn every_strategy_keeps_order_and_count() {
		let ns = nodes(7);
		let es = vec![
			edge(0, 1, EdgeType::Contains),
			edge(1, 2, EdgeType::ParentOf),
			edge(3, 0, EdgeType::RelatedTo),
			edge(5, 6, EdgeType::Owns),
		];
		for kind in LayoutKind::ALL {
			let out = assign_layout(kind, &ns, &es);
			let ids: Vec<_> = out.iter().map(|p| p.node.id.as_str()).collect();
			let expected: Vec<_> = ns.iter().map(|n| n.id.as_str()).collect();
			assert_eq!(ids, expected, "{kind}");
			assert!(out.iter().all(|p| p.x.is_finite() && p.y.is_finite()), "{kind}");
		}
	}

	#[test]
	fn empty_input_gives_empty_output() {
		for kind in LayoutKind::ALL {
			assert!(assign_layout(kind, &[], &[]).is_empty(), "{kind}");
		}
		let view = build_view(&GraphData::default(), DisplayOptions::default(), LayoutKind::Force);
		assert!(view.is_empty());
		assert!(view.edges.is_empty());
	}

	#[test]
	fn dangling_edges_are_ignored_by_layouts() {
		let ns = nodes(2);
		let mut stray = edge(0, 1, EdgeType::Owns);
		stray.target = "missing".into();
		for kind in LayoutKind::ALL {
			assert_eq!(assign_layout(kind, &ns, &[stray.clone()]).len(), 2);
		}
	}

	#[test]
	fn set_annotation_touches_only_the_matching_node() {
		let mut graph = PositionedGraph {
			nodes: assign_layout(LayoutKind::Grid, &nodes(3), &[]),
			..PositionedGraph::default()
		};
		graph.set_annotation("n1", Some("secret door".into()));
		assert_eq!(graph.nodes[1].node.record.annotation.as_deref(), Some("secret door"));
		assert!(graph.nodes[0].node.record.annotation.is_none());
	}

	#[test]
	fn hiding_labels_keeps_edge_labels() {
		let ns = nodes(2);
		let data = GraphData {
			nodes: ns.iter().map(|n| n.record.clone()).collect(),
			edges: vec![edge(0, 1, EdgeType::Owns).record],
		};
		let options = DisplayOptions {
			show_labels: false,
			show_images: false,
		};
		let view = build_view(&data, options, LayoutKind::Grid);
		assert!(view.nodes.iter().all(|p| p.node.label.is_none()));
		assert_eq!(view.edges[0].label, "OWNS");
	}

	proptest! {
		#[test]
		fn pipeline_is_deterministic(n in 0usize..30, kind_idx in 0usize..4, labels in any::<bool>()) {
			let ns = nodes(n);
			let es: Vec<_> = (1..n).map(|i| edge(i, i / 2, EdgeType::PartOf)).collect();
			let kind = LayoutKind::ALL[kind_idx];
			let first = assign_layout(kind, &ns, &es);
			let second = assign_layout(kind, &ns, &es);
			prop_assert_eq!(first, second);
			let options = DisplayOptions { show_labels: labels, show_images: true };
			let data = GraphData {
				nodes: ns.iter().map(|n| n.record.clone()).collect(),
				edges: es.iter().map(|e| e.record.clone()).collect(),
			};
			prop_assert_eq!(build_view(&data, options, kind), build_view(&data, options, kind));
		}
	}
}
