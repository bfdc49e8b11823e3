//! Wire records returned by the campaign backend's graph endpoints.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of entity a node stands for.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
	/// A game world.
	World,
	/// A campaign run inside a world.
	Campaign,
	/// One play session of a campaign.
	Session,
	/// A player or non-player character.
	Character,
	/// A place.
	Location,
	/// An object.
	Item,
	/// Something that happened.
	Event,
	/// An ability or spell.
	Power,
	/// Anything the backend sends that is not listed above, with its wire name.
	Unknown(String),
}

impl NodeType {
	/// Every known node type, in display order.
	pub const ALL: [NodeType; 8] = [
		NodeType::World,
		NodeType::Campaign,
		NodeType::Session,
		NodeType::Character,
		NodeType::Location,
		NodeType::Item,
		NodeType::Event,
		NodeType::Power,
	];

	/// Wire name, also used in query strings.
	pub fn as_str(&self) -> &str {
		match self {
			NodeType::World => "world",
			NodeType::Campaign => "campaign",
			NodeType::Session => "session",
			NodeType::Character => "character",
			NodeType::Location => "location",
			NodeType::Item => "item",
			NodeType::Event => "event",
			NodeType::Power => "power",
			NodeType::Unknown(raw) => raw,
		}
	}

	/// Human-readable label for controls and legends. Unknown types show
	/// their wire name.
	pub fn label(&self) -> &str {
		match self {
			NodeType::World => "World",
			NodeType::Campaign => "Campaign",
			NodeType::Session => "Session",
			NodeType::Character => "Character",
			NodeType::Location => "Location",
			NodeType::Item => "Item",
			NodeType::Event => "Event",
			NodeType::Power => "Power",
			NodeType::Unknown(raw) if raw.trim().is_empty() => "Other",
			NodeType::Unknown(raw) => raw,
		}
	}
}

impl FromStr for NodeType {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim().to_lowercase().as_str() {
			"world" => Self::World,
			"campaign" => Self::Campaign,
			"session" => Self::Session,
			"character" => Self::Character,
			"location" => Self::Location,
			"item" => Self::Item,
			"event" => Self::Event,
			"power" => Self::Power,
			_ => Self::Unknown(s.to_owned()),
		})
	}
}

impl From<String> for NodeType {
	fn from(s: String) -> Self {
		let Ok(t) = s.parse();
		t
	}
}

impl From<NodeType> for String {
	fn from(t: NodeType) -> Self {
		match t {
			NodeType::Unknown(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind of relationship an edge stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
	/// Source is a part of target.
	PartOf,
	/// Source contains target.
	Contains,
	/// Source is located at target.
	LocatedAt,
	/// Source took part in target.
	ParticipatedIn,
	/// Loose association.
	RelatedTo,
	/// Source is the parent of target.
	ParentOf,
	/// Source is a child of target.
	ChildOf,
	/// Source owns target.
	Owns,
	/// Source created target.
	Created,
	/// Source wields target.
	HasPower,
	/// Source happened at target.
	OccurredAt,
	/// Anything the backend sends that is not listed above, with its wire name.
	Unknown(String),
}

impl EdgeType {
	/// Every known edge type, in display order.
	pub const ALL: [EdgeType; 11] = [
		EdgeType::PartOf,
		EdgeType::Contains,
		EdgeType::LocatedAt,
		EdgeType::ParticipatedIn,
		EdgeType::RelatedTo,
		EdgeType::ParentOf,
		EdgeType::ChildOf,
		EdgeType::Owns,
		EdgeType::Created,
		EdgeType::HasPower,
		EdgeType::OccurredAt,
	];

	/// Wire name, also the default display label.
	pub fn as_str(&self) -> &str {
		match self {
			EdgeType::PartOf => "PART_OF",
			EdgeType::Contains => "CONTAINS",
			EdgeType::LocatedAt => "LOCATED_AT",
			EdgeType::ParticipatedIn => "PARTICIPATED_IN",
			EdgeType::RelatedTo => "RELATED_TO",
			EdgeType::ParentOf => "PARENT_OF",
			EdgeType::ChildOf => "CHILD_OF",
			EdgeType::Owns => "OWNS",
			EdgeType::Created => "CREATED",
			EdgeType::HasPower => "HAS_POWER",
			EdgeType::OccurredAt => "OCCURRED_AT",
			EdgeType::Unknown(raw) => raw,
		}
	}
}

impl FromStr for EdgeType {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.trim().to_uppercase().replace('-', "_").as_str() {
			"PART_OF" => Self::PartOf,
			"CONTAINS" => Self::Contains,
			"LOCATED_AT" => Self::LocatedAt,
			"PARTICIPATED_IN" => Self::ParticipatedIn,
			"RELATED_TO" => Self::RelatedTo,
			"PARENT_OF" => Self::ParentOf,
			"CHILD_OF" => Self::ChildOf,
			"OWNS" => Self::Owns,
			"CREATED" => Self::Created,
			"HAS_POWER" => Self::HasPower,
			"OCCURRED_AT" => Self::OccurredAt,
			_ => Self::Unknown(s.to_owned()),
		})
	}
}

impl From<String> for EdgeType {
	fn from(s: String) -> Self {
		let Ok(t) = s.parse();
		t
	}
}

impl From<EdgeType> for String {
	fn from(t: EdgeType) -> Self {
		match t {
			EdgeType::Unknown(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}

impl fmt::Display for EdgeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An entity in the relationship graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique within one response.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Entity kind.
	#[serde(rename = "type")]
	pub node_type: NodeType,
	/// Optional thumbnail.
	#[serde(default)]
	pub image_url: Option<String>,
	/// Backend-supplied attributes.
	#[serde(default)]
	pub properties: BTreeMap<String, serde_json::Value>,
	/// User note attached to the node.
	#[serde(default)]
	pub annotation: Option<String>,
}

/// A relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Opaque id.
	pub id: String,
	/// Id of the node the edge starts at.
	pub source: String,
	/// Id of the node the edge points to.
	pub target: String,
	/// Relationship kind.
	#[serde(rename = "type")]
	pub edge_type: EdgeType,
	/// Display text overriding the type name.
	#[serde(default)]
	pub label: Option<String>,
}

impl GraphEdge {
	/// The label to show, falling back to the type's wire name.
	pub fn display_label(&self) -> &str {
		self.label.as_deref().unwrap_or(self.edge_type.as_str())
	}
}

/// A node/edge set as returned by one graph request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Nodes, in backend order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Edges, in backend order.
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

/// Structural problems in a graph payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
	/// Two nodes share an id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
	/// An edge references a node that is not in the response.
	#[error("edge `{edge}` references missing node `{node}`")]
	DanglingEdge {
		/// Offending edge.
		edge: String,
		/// Id that could not be resolved.
		node: String,
	},
}

impl GraphData {
	/// Checks that node ids are unique and every edge endpoint resolves.
	pub fn validate(&self) -> Result<(), PayloadError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(PayloadError::DuplicateNode(node.id.clone()));
			}
		}
		for edge in &self.edges {
			for end in [&edge.source, &edge.target] {
				if !ids.contains(end.as_str()) {
					return Err(PayloadError::DanglingEdge {
						edge: edge.id.clone(),
						node: end.clone(),
					});
				}
			}
		}
		Ok(())
	}

	/// Returns true when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Replaces the annotation of the node with `id`. Returns false if absent.
	pub fn set_annotation(&mut self, id: &str, annotation: Option<String>) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.annotation = annotation;
				true
			}
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_backend_records() {
		let json = r#"{
			"nodes": [
				{"id": "w1", "label": "Eldoria", "type": "world", "imageUrl": "/img/w1.png",
				 "properties": {"era": "Third Age"}},
				{"id": "n1", "label": "Mystery", "type": "unknowntype", "annotation": "check later"}
			],
			"edges": [
				{"id": "e1", "source": "n1", "target": "w1", "type": "PART_OF"},
				{"id": "e2", "source": "w1", "target": "n1", "type": "SOMETHING_NEW", "label": "odd"}
			]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.nodes[0].node_type, NodeType::World);
		assert_eq!(data.nodes[0].image_url.as_deref(), Some("/img/w1.png"));
		assert_eq!(data.nodes[0].properties["era"], "Third Age");
		assert_eq!(data.nodes[1].node_type, NodeType::Unknown("unknowntype".into()));
		assert_eq!(data.nodes[1].annotation.as_deref(), Some("check later"));
		assert_eq!(data.edges[0].edge_type, EdgeType::PartOf);
		assert_eq!(data.edges[1].edge_type, EdgeType::Unknown("SOMETHING_NEW".into()));
		assert!(data.validate().is_ok());
	}

	#[test]
	fn edge_label_defaults_to_type() {
		let edge = GraphEdge {
			id: "e".into(),
			source: "a".into(),
			target: "b".into(),
			edge_type: EdgeType::LocatedAt,
			label: None,
		};
		assert_eq!(edge.display_label(), "LOCATED_AT");
		let edge = GraphEdge {
			label: Some("lives in".into()),
			..edge
		};
		assert_eq!(edge.display_label(), "lives in");
	}

	#[test]
	fn lenient_parsing_never_fails() {
		assert_eq!("Character".parse::<NodeType>().unwrap(), NodeType::Character);
		assert_eq!("dragon".parse::<NodeType>().unwrap(), NodeType::Unknown("dragon".into()));
		assert_eq!("has-power".parse::<EdgeType>().unwrap(), EdgeType::HasPower);
		assert_eq!("".parse::<EdgeType>().unwrap(), EdgeType::Unknown(String::new()));
	}

	#[test]
	fn unknown_types_survive_re_encoding() {
		let json = r#"{
			"nodes": [
				{"id": "d1", "label": "Smaug", "type": "dragon"},
				{"id": "w1", "label": "Eldoria", "type": "World"}
			],
			"edges": [{"id": "e1", "source": "d1", "target": "w1", "type": "HOARDS_IN"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].node_type.label(), "dragon");

		let value = serde_json::to_value(&data).unwrap();
		assert_eq!(value["nodes"][0]["type"], "dragon");
		assert_eq!(value["nodes"][1]["type"], "world");
		assert_eq!(value["edges"][0]["type"], "HOARDS_IN");

		let again: GraphData = serde_json::from_value(value).unwrap();
		assert_eq!(again, data);
	}

	#[test]
	fn validation_rejects_duplicates_and_dangling_edges() {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			node_type: NodeType::Item,
			image_url: None,
			properties: BTreeMap::new(),
			annotation: None,
		};
		let dup = GraphData {
			nodes: vec![node("a"), node("a")],
			edges: vec![],
		};
		assert_eq!(dup.validate(), Err(PayloadError::DuplicateNode("a".into())));

		let dangling = GraphData {
			nodes: vec![node("a")],
			edges: vec![GraphEdge {
				id: "e1".into(),
				source: "a".into(),
				target: "ghost".into(),
				edge_type: EdgeType::Owns,
				label: None,
			}],
		};
		assert_eq!(
			dangling.validate(),
			Err(PayloadError::DanglingEdge {
				edge: "e1".into(),
				node: "ghost".into()
			})
		);
	}

	#[test]
	fn set_annotation_updates_matching_node() {
		let mut data: GraphData =
			serde_json::from_str(r#"{"nodes":[{"id":"c1","label":"Ayla","type":"character"}]}"#)
				.unwrap();
		assert!(data.set_annotation("c1", Some("owes the guild".into())));
		assert_eq!(data.nodes[0].annotation.as_deref(), Some("owes the guild"));
		assert!(!data.set_annotation("zz", None));
	}
}
