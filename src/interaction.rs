//! View-independent interaction logic: click routing, load status, stale
//! response detection and the annotation editor.

use crate::api::encode_segment;
use crate::graph::{GraphData, GraphScope, NodeType};

/// Detail page for a node, or `None` when its type has no page.
pub fn detail_route(node_type: &NodeType, id: &str) -> Option<String> {
	let base = match node_type {
		NodeType::World => "worlds",
		NodeType::Campaign => "campaigns",
		NodeType::Session => "sessions",
		NodeType::Character => "characters",
		NodeType::Location => "locations",
		NodeType::Item => "items",
		NodeType::Event => "events",
		NodeType::Power => "powers",
		NodeType::Unknown(_) => return None,
	};
	Some(format!("/{}/{}", base, encode_segment(id)))
}

/// Mind map page scoped to `scope`, e.g. `/?characterId=c42`.
pub fn mind_map_route(scope: &GraphScope) -> String {
	let query = url::form_urlencoded::Serializer::new(String::new())
		.append_pair(scope.key(), scope.id())
		.finish();
	format!("/?{}", query)
}

/// Load status of one graph view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewStatus {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// A request is in flight.
	Loading,
	/// The last request succeeded.
	Ready,
	/// The last request failed; holds the user-facing message.
	Error(String),
}

/// Inputs to [`ViewStatus::next`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusEvent {
	/// Query params or display flags changed.
	ParamsChanged,
	/// The user asked for a reload.
	Refresh,
	/// The current request succeeded.
	Loaded,
	/// The current request failed.
	Failed(String),
}

impl ViewStatus {
	/// Applies `event`; events that make no sense in the current state leave
	/// it unchanged.
	pub fn next(&self, event: StatusEvent) -> ViewStatus {
		use StatusEvent::*;
		match (self, event) {
			(_, ParamsChanged | Refresh) => ViewStatus::Loading,
			(ViewStatus::Loading, Loaded) => ViewStatus::Ready,
			(ViewStatus::Loading, Failed(message)) => ViewStatus::Error(message),
			(current, _) => current.clone(),
		}
	}

	/// True while a request is in flight.
	pub fn is_loading(&self) -> bool {
		matches!(self, ViewStatus::Loading)
	}

	/// The error message, if any.
	pub fn error(&self) -> Option<&str> {
		match self {
			ViewStatus::Error(message) => Some(message),
			_ => None,
		}
	}
}

/// Numbers requests so late answers to superseded ones can be dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestTracker {
	latest: u64,
}

impl RequestTracker {
	/// Starts a new request and returns its ticket.
	pub fn begin(&mut self) -> u64 {
		self.latest += 1;
		self.latest
	}

	/// True when `ticket` belongs to the most recent request.
	pub fn is_current(&self, ticket: u64) -> bool {
		ticket == self.latest
	}
}

/// Text being edited for one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationDraft {
	/// Node the note belongs to.
	pub node_id: String,
	/// Node label, for the editor title.
	pub node_label: String,
	/// Current editor contents.
	pub text: String,
	/// Whether the node had a note when the editor opened.
	pub existing: bool,
}

/// What the editor asks the owner to persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotationCommand {
	/// Store `text` for `node_id`.
	Save {
		/// Node the note belongs to.
		node_id: String,
		/// New note.
		text: String,
	},
	/// Remove the note of `node_id`.
	Delete {
		/// Node the note belongs to.
		node_id: String,
	},
}

impl AnnotationCommand {
	/// Node the command touches.
	pub fn node_id(&self) -> &str {
		match self {
			AnnotationCommand::Save { node_id, .. } | AnnotationCommand::Delete { node_id } => node_id,
		}
	}

	/// The note the node ends up with.
	pub fn annotation(&self) -> Option<&str> {
		match self {
			AnnotationCommand::Save { text, .. } => Some(text.as_str()),
			AnnotationCommand::Delete { .. } => None,
		}
	}
}

/// A note change shown locally while the backend stores it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAnnotation {
	/// Node the note belongs to.
	pub node_id: String,
	/// Note before the change.
	pub previous: Option<String>,
	/// Note after the change.
	pub next: Option<String>,
}

impl PendingAnnotation {
	/// Applies `command` to `graph` and remembers what it replaced. `None`
	/// when the node is not in the graph.
	pub fn apply(command: &AnnotationCommand, graph: &mut GraphData) -> Option<Self> {
		let node = graph.nodes.iter_mut().find(|n| n.id == command.node_id())?;
		let next = command.annotation().map(str::to_owned);
		let previous = std::mem::replace(&mut node.annotation, next.clone());
		Some(Self {
			node_id: node.id.clone(),
			previous,
			next,
		})
	}

	/// Puts the previous note back after the backend refused the change.
	///
	/// Leaves the node alone if its note has moved on since (a later edit or
	/// a reload) and returns whether anything was restored.
	pub fn revert(&self, graph: &mut GraphData) -> bool {
		match graph.nodes.iter_mut().find(|n| n.id == self.node_id) {
			Some(node) if node.annotation == self.next => {
				node.annotation = self.previous.clone();
				true
			}
			_ => false,
		}
	}
}

/// Open/closed state of the annotation editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AnnotationEditor {
	/// No editor shown.
	#[default]
	Closed,
	/// Editing a draft.
	Open(AnnotationDraft),
}

impl AnnotationEditor {
	/// Opens the editor pre-filled with the node's current note.
	pub fn open(node_id: &str, node_label: &str, annotation: Option<&str>) -> Self {
		AnnotationEditor::Open(AnnotationDraft {
			node_id: node_id.to_owned(),
			node_label: node_label.to_owned(),
			text: annotation.unwrap_or_default().to_owned(),
			existing: annotation.is_some(),
		})
	}

	/// The draft, when open.
	pub fn draft(&self) -> Option<&AnnotationDraft> {
		match self {
			AnnotationEditor::Open(draft) => Some(draft),
			AnnotationEditor::Closed => None,
		}
	}

	/// Replaces the editor contents.
	pub fn edit(&mut self, text: impl Into<String>) {
		if let AnnotationEditor::Open(draft) = self {
			draft.text = text.into();
		}
	}

	/// Closes the editor and returns the save command.
	pub fn save(&mut self) -> Option<AnnotationCommand> {
		match std::mem::take(self) {
			AnnotationEditor::Open(draft) => Some(AnnotationCommand::Save {
				node_id: draft.node_id,
				text: draft.text,
			}),
			AnnotationEditor::Closed => None,
		}
	}

	/// Closes the editor and returns the delete command.
	pub fn delete(&mut self) -> Option<AnnotationCommand> {
		match std::mem::take(self) {
			AnnotationEditor::Open(draft) => Some(AnnotationCommand::Delete {
				node_id: draft.node_id,
			}),
			AnnotationEditor::Closed => None,
		}
	}

	/// Closes the editor without persisting anything.
	pub fn cancel(&mut self) {
		*self = AnnotationEditor::Closed;
	}
}
