//! Request shaping for graph fetches and parsing of the page query string.

use std::fmt;

use thiserror::Error;

use super::types::{EdgeType, NodeType};

/// Hops from the scope entity when the URL does not say otherwise.
pub const DEFAULT_DEPTH: u32 = 2;
/// Upper bound offered by the depth slider.
pub const MAX_DEPTH: u32 = 5;

/// The single entity whose neighbourhood is shown.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphScope {
	/// `worldId`
	World(String),
	/// `campaignId`
	Campaign(String),
	/// `sessionId`
	Session(String),
	/// `characterId`
	Character(String),
	/// `locationId`
	Location(String),
	/// `itemId`
	Item(String),
	/// `eventId`
	Event(String),
	/// `powerId`
	Power(String),
}

/// Query keys for each scope kind, in precedence order.
pub const SCOPE_KEYS: [&str; 8] = [
	"worldId",
	"campaignId",
	"sessionId",
	"characterId",
	"locationId",
	"itemId",
	"eventId",
	"powerId",
];

impl GraphScope {
	/// Builds the scope for a query key, e.g. `("worldId", "w1")`.
	pub fn from_key(key: &str, id: impl Into<String>) -> Option<Self> {
		let id = id.into();
		Some(match key {
			"worldId" => Self::World(id),
			"campaignId" => Self::Campaign(id),
			"sessionId" => Self::Session(id),
			"characterId" => Self::Character(id),
			"locationId" => Self::Location(id),
			"itemId" => Self::Item(id),
			"eventId" => Self::Event(id),
			"powerId" => Self::Power(id),
			_ => return None,
		})
	}

	/// Builds the scope for an entity of a known node type.
	pub fn for_node(node_type: &NodeType, id: impl Into<String>) -> Option<Self> {
		let id = id.into();
		Some(match node_type {
			NodeType::World => Self::World(id),
			NodeType::Campaign => Self::Campaign(id),
			NodeType::Session => Self::Session(id),
			NodeType::Character => Self::Character(id),
			NodeType::Location => Self::Location(id),
			NodeType::Item => Self::Item(id),
			NodeType::Event => Self::Event(id),
			NodeType::Power => Self::Power(id),
			NodeType::Unknown(_) => return None,
		})
	}

	/// The query key carrying this scope's id.
	pub fn key(&self) -> &'static str {
		match self {
			Self::World(_) => "worldId",
			Self::Campaign(_) => "campaignId",
			Self::Session(_) => "sessionId",
			Self::Character(_) => "characterId",
			Self::Location(_) => "locationId",
			Self::Item(_) => "itemId",
			Self::Event(_) => "eventId",
			Self::Power(_) => "powerId",
		}
	}

	/// The scope entity's id.
	pub fn id(&self) -> &str {
		match self {
			Self::World(id)
			| Self::Campaign(id)
			| Self::Session(id)
			| Self::Character(id)
			| Self::Location(id)
			| Self::Item(id)
			| Self::Event(id)
			| Self::Power(id) => id,
		}
	}
}

/// Layout algorithm requested for the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutKind {
	/// Spring/charge simulation.
	#[default]
	Force,
	/// Layered tree.
	Hierarchy,
	/// Rings around a centre node.
	Radial,
	/// Square grid.
	Grid,
}

impl LayoutKind {
	/// Every selectable layout.
	pub const ALL: [LayoutKind; 4] = [
		LayoutKind::Force,
		LayoutKind::Hierarchy,
		LayoutKind::Radial,
		LayoutKind::Grid,
	];

	/// Wire name.
	pub fn as_str(&self) -> &'static str {
		match self {
			LayoutKind::Force => "force",
			LayoutKind::Hierarchy => "hierarchy",
			LayoutKind::Radial => "radial",
			LayoutKind::Grid => "grid",
		}
	}

	/// Parses a wire name.
	pub fn parse(s: &str) -> Option<Self> {
		let wanted = s.trim().to_lowercase();
		Self::ALL.into_iter().find(|k| k.as_str() == wanted)
	}
}

impl fmt::Display for LayoutKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A query value the page could not use. The view still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamWarning {
	/// `depth` was not a positive integer.
	#[error("ignored depth `{0}`, expected a positive number")]
	InvalidDepth(String),
	/// `layout` was not a known layout.
	#[error("ignored layout `{0}`")]
	InvalidLayout(String),
	/// `includeImages` was not a boolean.
	#[error("ignored includeImages `{0}`, expected true or false")]
	InvalidFlag(String),
	/// An entry of `nodeTypes` was not a node type.
	#[error("ignored node type `{0}`")]
	UnknownNodeType(String),
	/// An entry of `edgeTypes` was not an edge type.
	#[error("ignored edge type `{0}`")]
	UnknownEdgeType(String),
	/// More than one scope id was given; the first one wins.
	#[error("several scope ids given, using `{0}`")]
	ConflictingScope(&'static str),
	/// A scope key was present but empty.
	#[error("ignored empty `{0}`")]
	EmptyScope(&'static str),
}

/// Parameters of one graph request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphQueryParams {
	/// Scope entity; `None` requests the unscoped mind map.
	pub scope: Option<GraphScope>,
	/// Traversal hops from the scope entity, at least 1.
	pub depth: u32,
	/// Node types to include; empty includes all.
	pub node_types: Vec<NodeType>,
	/// Edge types to include; empty includes all.
	pub edge_types: Vec<EdgeType>,
	/// Ask the backend for thumbnails.
	pub include_images: bool,
	/// Requested layout.
	pub layout: LayoutKind,
}

impl Default for GraphQueryParams {
	fn default() -> Self {
		Self {
			scope: None,
			depth: DEFAULT_DEPTH,
			node_types: Vec::new(),
			edge_types: Vec::new(),
			include_images: true,
			layout: LayoutKind::default(),
		}
	}
}

fn parse_flag(s: &str) -> Option<bool> {
	match s.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" => Some(true),
		"false" | "0" | "no" => Some(false),
		_ => None,
	}
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
	s.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl GraphQueryParams {
	/// Params scoped to one entity with default filters.
	pub fn scoped(scope: GraphScope) -> Self {
		Self {
			scope: Some(scope),
			..Self::default()
		}
	}

	/// Parses page query values looked up through `get`.
	///
	/// Malformed values are dropped in favour of defaults and reported as
	/// warnings, so callers can still render with whatever did parse.
	pub fn from_query(get: impl Fn(&str) -> Option<String>) -> (Self, Vec<ParamWarning>) {
		let mut params = Self::default();
		let mut warnings = Vec::new();

		for key in SCOPE_KEYS {
			let Some(value) = get(key) else {
				continue;
			};
			let value = value.trim();
			if value.is_empty() {
				warnings.push(ParamWarning::EmptyScope(key));
			} else if let Some(existing) = &params.scope {
				warnings.push(ParamWarning::ConflictingScope(existing.key()));
			} else {
				params.scope = GraphScope::from_key(key, value);
			}
		}

		if let Some(raw) = get("depth") {
			match raw.trim().parse::<u32>() {
				Ok(d) if d > 0 => params.depth = d,
				_ => warnings.push(ParamWarning::InvalidDepth(raw)),
			}
		}

		if let Some(raw) = get("nodeTypes") {
			for name in split_list(&raw) {
				let Ok(parsed) = name.parse::<NodeType>();
				match parsed {
					NodeType::Unknown(_) => warnings.push(ParamWarning::UnknownNodeType(name.to_owned())),
					t if !params.node_types.contains(&t) => params.node_types.push(t),
					_ => {}
				}
			}
		}

		if let Some(raw) = get("edgeTypes") {
			for name in split_list(&raw) {
				let Ok(parsed) = name.parse::<EdgeType>();
				match parsed {
					EdgeType::Unknown(_) => warnings.push(ParamWarning::UnknownEdgeType(name.to_owned())),
					t if !params.edge_types.contains(&t) => params.edge_types.push(t),
					_ => {}
				}
			}
		}

		if let Some(raw) = get("includeImages") {
			match parse_flag(&raw) {
				Some(flag) => params.include_images = flag,
				None => warnings.push(ParamWarning::InvalidFlag(raw)),
			}
		}

		if let Some(raw) = get("layout") {
			match LayoutKind::parse(&raw) {
				Some(kind) => params.layout = kind,
				None => warnings.push(ParamWarning::InvalidLayout(raw)),
			}
		}

		(params, warnings)
	}

	/// Query pairs sent to the backend, scope first.
	pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::with_capacity(6);
		if let Some(scope) = &self.scope {
			pairs.push((scope.key(), scope.id().to_owned()));
		}
		pairs.push(("depth", self.depth.max(1).to_string()));
		if !self.node_types.is_empty() {
			let joined: Vec<_> = self.node_types.iter().map(NodeType::as_str).collect();
			pairs.push(("nodeTypes", joined.join(",")));
		}
		if !self.edge_types.is_empty() {
			let joined: Vec<_> = self.edge_types.iter().map(EdgeType::as_str).collect();
			pairs.push(("edgeTypes", joined.join(",")));
		}
		pairs.push(("includeImages", self.include_images.to_string()));
		pairs.push(("layout", self.layout.as_str().to_owned()));
		pairs
	}

	/// Adds or removes a node type from the inclusion filter.
	pub fn toggle_node_type(&mut self, node_type: NodeType) {
		match self.node_types.iter().position(|t| *t == node_type) {
			Some(i) => {
				self.node_types.remove(i);
			}
			None => self.node_types.push(node_type),
		}
	}

	/// Adds or removes an edge type from the inclusion filter.
	pub fn toggle_edge_type(&mut self, edge_type: EdgeType) {
		match self.edge_types.iter().position(|t| *t == edge_type) {
			Some(i) => {
				self.edge_types.remove(i);
			}
			None => self.edge_types.push(edge_type),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn parse(pairs: &[(&str, &str)]) -> (GraphQueryParams, Vec<ParamWarning>) {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		GraphQueryParams::from_query(|k| map.get(k).cloned())
	}

	#[test]
	fn empty_query_gives_defaults() {
		let (params, warnings) = parse(&[]);
		assert_eq!(params, GraphQueryParams::default());
		assert!(warnings.is_empty());
	}

	#[test]
	fn parses_a_full_query() {
		let (params, warnings) = parse(&[
			("characterId", "c42"),
			("depth", "3"),
			("nodeTypes", "character, location,character"),
			("edgeTypes", "LOCATED_AT,related_to"),
			("includeImages", "false"),
			("layout", "Radial"),
		]);
		assert!(warnings.is_empty(), "{warnings:?}");
		assert_eq!(params.scope, Some(GraphScope::Character("c42".into())));
		assert_eq!(params.depth, 3);
		assert_eq!(params.node_types, vec![NodeType::Character, NodeType::Location]);
		assert_eq!(params.edge_types, vec![EdgeType::LocatedAt, EdgeType::RelatedTo]);
		assert!(!params.include_images);
		assert_eq!(params.layout, LayoutKind::Radial);
	}

	#[test]
	fn malformed_values_are_defaulted_with_warnings() {
		let (params, warnings) = parse(&[
			("worldId", "w1"),
			("depth", "0"),
			("nodeTypes", "world,dragon"),
			("includeImages", "maybe"),
			("layout", "spiral"),
		]);
		assert_eq!(params.scope, Some(GraphScope::World("w1".into())));
		assert_eq!(params.depth, DEFAULT_DEPTH);
		assert_eq!(params.node_types, vec![NodeType::World]);
		assert!(params.include_images);
		assert_eq!(params.layout, LayoutKind::Force);
		assert_eq!(
			warnings,
			vec![
				ParamWarning::InvalidDepth("0".into()),
				ParamWarning::UnknownNodeType("dragon".into()),
				ParamWarning::InvalidFlag("maybe".into()),
				ParamWarning::InvalidLayout("spiral".into()),
			]
		);
	}

	#[test]
	fn first_scope_wins_when_several_are_given() {
		let (params, warnings) = parse(&[("sessionId", "s1"), ("worldId", "w1"), ("itemId", "")]);
		assert_eq!(params.scope, Some(GraphScope::World("w1".into())));
		assert_eq!(
			warnings,
			vec![
				ParamWarning::ConflictingScope("worldId"),
				ParamWarning::EmptyScope("itemId"),
			]
		);
	}

	#[test]
	fn query_pairs_carry_exactly_one_scope() {
		let mut params = GraphQueryParams::scoped(GraphScope::World("w1".into()));
		params.depth = 2;
		let pairs = params.to_query_pairs();
		assert_eq!(pairs[0], ("worldId", "w1".to_string()));
		assert!(pairs.contains(&("depth", "2".to_string())));
		let scope_keys = pairs.iter().filter(|(k, _)| SCOPE_KEYS.contains(k)).count();
		assert_eq!(scope_keys, 1);
		assert!(!pairs.iter().any(|(k, _)| *k == "nodeTypes" || *k == "edgeTypes"));
	}

	#[test]
	fn toggling_filters() {
		let mut params = GraphQueryParams::default();
		params.toggle_node_type(NodeType::Item);
		params.toggle_edge_type(EdgeType::Owns);
		assert_eq!(params.node_types, vec![NodeType::Item]);
		params.toggle_node_type(NodeType::Item);
		assert!(params.node_types.is_empty());
		let pairs = params.to_query_pairs();
		assert_eq!(pairs[0], ("depth", "2".to_string()));
		assert_eq!(pairs[1], ("edgeTypes", "OWNS".to_string()));
	}

	#[test]
	fn scope_round_trips_through_node_type() {
		let scope = GraphScope::for_node(&NodeType::Power, "p9").unwrap();
		assert_eq!(scope.key(), "powerId");
		assert_eq!(scope.id(), "p9");
		assert!(GraphScope::for_node(&NodeType::Unknown("dragon".into()), "x").is_none());
	}
}
