//! Converts backend records into the render records the canvas draws.

use super::style::{edge_style, node_style};
use super::types::{EdgeType, GraphEdge, GraphNode};

/// Flags applied uniformly to every node of a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
	/// Draw node labels. Edge labels are always drawn.
	pub show_labels: bool,
	/// Draw node thumbnails.
	pub show_images: bool,
}

impl Default for DisplayOptions {
	fn default() -> Self {
		Self {
			show_labels: true,
			show_images: true,
		}
	}
}

/// A node ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowNode {
	/// Same as the backend id.
	pub id: String,
	/// `None` when labels are hidden.
	pub label: Option<String>,
	/// `None` when images are hidden or the node has none.
	pub image: Option<String>,
	/// Fill color.
	pub background: &'static str,
	/// Glyph drawn in the node.
	pub icon: &'static str,
	/// The record this was built from.
	pub record: GraphNode,
}

/// An edge ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowEdge {
	/// Same as the backend id.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Label or type name.
	pub label: String,
	/// Stroke color.
	pub stroke: &'static str,
	/// Drawn with a moving dash.
	pub animated: bool,
	/// The record this was built from.
	pub record: GraphEdge,
}

/// Adapts one node.
pub fn adapt_node(node: &GraphNode, options: DisplayOptions) -> FlowNode {
	let style = node_style(&node.node_type);
	FlowNode {
		id: node.id.clone(),
		label: options.show_labels.then(|| node.label.clone()),
		image: if options.show_images {
			node.image_url.clone()
		} else {
			None
		},
		background: style.color,
		icon: style.icon,
		record: node.clone(),
	}
}

/// Adapts one edge.
pub fn adapt_edge(edge: &GraphEdge) -> FlowEdge {
	FlowEdge {
		id: edge.id.clone(),
		source: edge.source.clone(),
		target: edge.target.clone(),
		label: edge.display_label().to_owned(),
		stroke: edge_style(&edge.edge_type).color,
		animated: edge.edge_type == EdgeType::RelatedTo,
		record: edge.clone(),
	}
}

/// Adapts every node, keeping order and count.
pub fn adapt_nodes(nodes: &[GraphNode], options: DisplayOptions) -> Vec<FlowNode> {
	nodes.iter().map(|n| adapt_node(n, options)).collect()
}

/// Adapts every edge, keeping order and count.
pub fn adapt_edges(edges: &[GraphEdge]) -> Vec<FlowEdge> {
	edges.iter().map(adapt_edge).collect()
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use proptest::prelude::*;

	use super::*;
	use crate::graph::style::DEFAULT_STYLE;
	use crate::graph::types::NodeType;

	fn node(id: &str, node_type: NodeType) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: format!("Label {id}"),
			node_type,
			image_url: Some(format!("/img/{id}.png")),
			properties: BTreeMap::new(),
			annotation: None,
		}
	}

	fn edge(id: &str, edge_type: EdgeType) -> GraphEdge {
		GraphEdge {
			id: id.into(),
			source: "a".into(),
			target: "b".into(),
			edge_type,
			label: None,
		}
	}

	#[test]
	fn display_flags_apply_to_every_node() {
		let nodes = vec![node("a", NodeType::World), node("b", NodeType::Item)];

		let hidden = adapt_nodes(
			&nodes,
			DisplayOptions {
				show_labels: false,
				show_images: false,
			},
		);
		assert!(hidden.iter().all(|n| n.label.is_none() && n.image.is_none()));

		let shown = adapt_nodes(&nodes, DisplayOptions::default());
		assert_eq!(shown[0].label.as_deref(), Some("Label a"));
		assert_eq!(shown[1].image.as_deref(), Some("/img/b.png"));
	}

	#[test]
	fn unknown_node_renders_gray_with_default_icon() {
		let flow = adapt_node(&node("n1", "unknowntype".parse().unwrap()), DisplayOptions::default());
		assert_eq!(flow.background, DEFAULT_STYLE.color);
		assert_eq!(flow.icon, DEFAULT_STYLE.icon);
	}

	#[test]
	fn only_related_to_is_animated() {
		for t in EdgeType::ALL {
			let animated = t == EdgeType::RelatedTo;
			assert_eq!(adapt_edge(&edge("e", t.clone())).animated, animated, "{t}");
		}
		assert!(!adapt_edge(&edge("e", EdgeType::Unknown("RIVAL_OF".into()))).animated);
	}

	#[test]
	fn edge_label_falls_back_to_type() {
		assert_eq!(adapt_edge(&edge("e", EdgeType::Owns)).label, "OWNS");
	}

	proptest! {
		#[test]
		fn adaptation_preserves_ids_and_order(
			ids in prop::collection::vec("[a-z0-9]{1,6}", 0..40),
			labels in any::<bool>(),
			images in any::<bool>(),
		) {
			let nodes: Vec<_> = ids.iter().map(|id| node(id, NodeType::Session)).collect();
			let out = adapt_nodes(&nodes, DisplayOptions { show_labels: labels, show_images: images });
			prop_assert_eq!(out.len(), nodes.len());
			let out_ids: Vec<_> = out.iter().map(|n| n.id.clone()).collect();
			prop_assert_eq!(out_ids, ids);
		}
	}
}
