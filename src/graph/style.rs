//! Static color/icon tables for node and edge types.

use super::types::{EdgeType, NodeType};

/// Visual style attached to a node or edge type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeStyle {
	/// CSS hex color.
	pub color: &'static str,
	/// Glyph drawn inside the node or next to the legend entry.
	pub icon: &'static str,
}

/// Fallback for anything missing from the tables.
pub const DEFAULT_STYLE: TypeStyle = TypeStyle {
	color: "#9e9e9e",
	icon: "●",
};

const NODE_STYLES: &[(NodeType, TypeStyle)] = &[
	(NodeType::World, TypeStyle { color: "#4caf50", icon: "🌍" }),
	(NodeType::Campaign, TypeStyle { color: "#2196f3", icon: "📜" }),
	(NodeType::Session, TypeStyle { color: "#ff9800", icon: "🎲" }),
	(NodeType::Character, TypeStyle { color: "#9c27b0", icon: "🧙" }),
	(NodeType::Location, TypeStyle { color: "#795548", icon: "📍" }),
	(NodeType::Item, TypeStyle { color: "#ffc107", icon: "🗡" }),
	(NodeType::Event, TypeStyle { color: "#f44336", icon: "⚡" }),
	(NodeType::Power, TypeStyle { color: "#00bcd4", icon: "✨" }),
];

const EDGE_STYLES: &[(EdgeType, TypeStyle)] = &[
	(EdgeType::PartOf, TypeStyle { color: "#90a4ae", icon: "⊂" }),
	(EdgeType::Contains, TypeStyle { color: "#78909c", icon: "⊃" }),
	(EdgeType::LocatedAt, TypeStyle { color: "#8d6e63", icon: "📍" }),
	(EdgeType::ParticipatedIn, TypeStyle { color: "#ffb74d", icon: "🎲" }),
	(EdgeType::RelatedTo, TypeStyle { color: "#ba68c8", icon: "↔" }),
	(EdgeType::ParentOf, TypeStyle { color: "#64b5f6", icon: "↓" }),
	(EdgeType::ChildOf, TypeStyle { color: "#4fc3f7", icon: "↑" }),
	(EdgeType::Owns, TypeStyle { color: "#ffd54f", icon: "🗝" }),
	(EdgeType::Created, TypeStyle { color: "#81c784", icon: "✎" }),
	(EdgeType::HasPower, TypeStyle { color: "#4dd0e1", icon: "✨" }),
	(EdgeType::OccurredAt, TypeStyle { color: "#e57373", icon: "⚡" }),
];

fn lookup<K: PartialEq>(table: &[(K, TypeStyle)], key: &K) -> TypeStyle {
	table
		.iter()
		.find(|(k, _)| k == key)
		.map(|(_, style)| *style)
		.unwrap_or(DEFAULT_STYLE)
}

/// Style for a node type. Unknown types get [`DEFAULT_STYLE`].
pub fn node_style(node_type: &NodeType) -> TypeStyle {
	lookup(NODE_STYLES, node_type)
}

/// Style for an edge type. Unknown types get [`DEFAULT_STYLE`].
pub fn edge_style(edge_type: &EdgeType) -> TypeStyle {
	lookup(EDGE_STYLES, edge_type)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_known_type_has_its_own_entry() {
		for t in NodeType::ALL {
			assert_ne!(node_style(&t), DEFAULT_STYLE, "{t}");
		}
		for t in EdgeType::ALL {
			assert_ne!(edge_style(&t), DEFAULT_STYLE, "{t}");
		}
	}

	#[test]
	fn unknown_types_fall_back_to_default() {
		let unknown: NodeType = "unknowntype".parse().unwrap();
		assert_eq!(node_style(&unknown), DEFAULT_STYLE);
		assert_eq!(node_style(&unknown).color, "#9e9e9e");
		assert_eq!(edge_style(&EdgeType::Unknown("FEUDS_WITH".into())), DEFAULT_STYLE);
	}

	#[test]
	fn character_is_purple() {
		assert_eq!(node_style(&NodeType::Character).color, "#9c27b0");
	}
}
