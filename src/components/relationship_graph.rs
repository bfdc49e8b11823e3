use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use log::{debug, error, info, warn};

use super::annotation_editor::AnnotationEditorPanel;
use super::graph_controls::{GraphControls, GraphLegend, type_counts};
use super::mind_map::MindMapCanvas;
use crate::api::{ApiClient, LOAD_FAILED};
use crate::config::AppConfig;
use crate::graph::{
	DisplayOptions, FlowEdge, FlowNode, GraphData, GraphEdge, GraphQueryParams, PositionedGraph,
	build_view,
};
use crate::interaction::{
	AnnotationCommand, AnnotationEditor, PendingAnnotation, RequestTracker, StatusEvent,
	ViewStatus, detail_route,
};

/// Told whether the backend stored an annotation change. `false` puts the
/// previous note back.
pub type AnnotationDone = Arc<dyn Fn(bool) + Send + Sync>;

/// Which backend graph a view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphSource {
	/// `/graph` or `/graph/mind-map`, depending on scope.
	#[default]
	Relationships,
	/// `/graph/hierarchy`.
	Hierarchy,
}

/// Fetches, lays out and draws one relationship graph.
///
/// Every change to `params` or the display toggles (and every refresh)
/// starts a new request; answers to superseded requests are dropped. Node
/// clicks open the entity's page; right clicks open the annotation editor
/// when `on_save_annotation` is given. Note edits show at once and are
/// rolled back when the owner reports a failure.
#[component]
pub fn RelationshipGraph(
	params: RwSignal<GraphQueryParams>,
	#[prop(optional)] source: GraphSource,
	#[prop(optional)] on_edge_click: Option<Callback<GraphEdge>>,
	/// Persists `(node_id, text)`, then reports the outcome.
	#[prop(optional)]
	on_save_annotation: Option<Callback<(String, String, AnnotationDone)>>,
	/// Removes the note of a node, then reports the outcome.
	#[prop(optional)]
	on_delete_annotation: Option<Callback<(String, AnnotationDone)>>,
	#[prop(default = true)] fullscreen: bool,
) -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = ApiClient::new(&config.api_base_url);

	let data = RwSignal::new(Option::<GraphData>::None);
	let status = RwSignal::new(ViewStatus::Idle);
	let options = RwSignal::new(DisplayOptions::default());
	let refresh = RwSignal::new(0u32);
	let tracker = StoredValue::new(RequestTracker::default());
	let editor = RwSignal::new(AnnotationEditor::Closed);
	// last note change, patched into the canvas without a relayout
	let note = RwSignal::new(Option::<(String, Option<String>)>::None);

	Effect::new(move |prev: Option<u32>| {
		let count = refresh.get();
		let request = params.get();
		// display toggles re-run the whole chain too
		options.track();
		let event = if prev.is_some_and(|p| p != count) {
			StatusEvent::Refresh
		} else {
			StatusEvent::ParamsChanged
		};
		status.update(|s| *s = s.next(event));
		editor.set(AnnotationEditor::Closed);
		note.set(None);

		let Some(ticket) = tracker.try_update_value(|t| t.begin()) else {
			return count;
		};
		let client = client.clone();
		spawn_local(async move {
			let result = match source {
				GraphSource::Relationships => client.graph(&request).await,
				GraphSource::Hierarchy => client.hierarchy(&request).await,
			};
			// gone, or overtaken by a newer request
			if !tracker.try_with_value(|t| t.is_current(ticket)).unwrap_or(false) {
				debug!("dropping stale graph response #{}", ticket);
				return;
			}
			match result {
				Ok(graph) => {
					info!(
						"graph loaded: {} nodes, {} edges",
						graph.nodes.len(),
						graph.edges.len()
					);
					data.try_set(Some(graph));
					status.try_update(|s| *s = s.next(StatusEvent::Loaded));
				}
				Err(e) => {
					error!("graph request failed: {}", e);
					data.try_set(None);
					status.try_update(|s| *s = s.next(StatusEvent::Failed(LOAD_FAILED.into())));
				}
			}
		});
		count
	});

	let is_empty = Memo::new(move |_| data.with(|d| d.as_ref().is_none_or(GraphData::is_empty)));
	let view_data = Signal::derive(move || {
		let layout = params.with(|p| p.layout);
		data.with(|d| {
			d.as_ref()
				.map(|d| build_view(d, options.get(), layout))
				.unwrap_or_else(PositionedGraph::default)
		})
	});

	let navigate = use_navigate();
	let on_node_click = UnsyncCallback::new(move |node: FlowNode| {
		match detail_route(&node.record.node_type, &node.id) {
			Some(route) => navigate(&route, Default::default()),
			None => debug!("no page for node {} of type {}", node.id, node.record.node_type),
		}
	});

	// notes are only editable where the owner can persist them
	let can_annotate = on_save_annotation.is_some();
	let on_node_context = UnsyncCallback::new(move |node: FlowNode| {
		if !can_annotate {
			return;
		}
		editor.set(AnnotationEditor::open(
			&node.id,
			&node.record.label,
			node.record.annotation.as_deref(),
		));
	});

	let on_canvas_edge = UnsyncCallback::new(move |edge: FlowEdge| {
		if let Some(cb) = &on_edge_click {
			cb.run(edge.record);
		}
	});

	// annotation edits bypass `view_data`, which would rerun the layout
	let on_command = Callback::new(move |command: AnnotationCommand| {
		let pending = data
			.try_update_untracked(|d| d.as_mut().and_then(|d| PendingAnnotation::apply(&command, d)))
			.flatten();
		let Some(pending) = pending else {
			debug!("no node {} to annotate", command.node_id());
			return;
		};
		note.set(Some((pending.node_id.clone(), pending.next.clone())));

		let done: AnnotationDone = Arc::new(move |stored: bool| {
			if stored {
				return;
			}
			let reverted = data
				.try_update_untracked(|d| d.as_mut().is_some_and(|d| pending.revert(d)))
				.unwrap_or(false);
			if reverted {
				warn!("restoring the note on {}", pending.node_id);
				note.try_set(Some((pending.node_id.clone(), pending.previous.clone())));
			}
		});
		match command {
			AnnotationCommand::Save { node_id, text } => {
				if let Some(cb) = &on_save_annotation {
					cb.run((node_id, text, done));
				}
			}
			AnnotationCommand::Delete { node_id } => {
				if let Some(cb) = &on_delete_annotation {
					cb.run((node_id, done));
				}
			}
		}
	});

	let on_refresh = Callback::new(move |_: ()| refresh.update(|n| *n += 1));
	let show_depth = source == GraphSource::Relationships;

	view! {
		<div class="relationship-graph">
			{move || match status.get() {
				ViewStatus::Idle | ViewStatus::Loading => {
					view! { <div class="graph-status loading">"Loading graph..."</div> }.into_any()
				}
				ViewStatus::Error(message) => {
					view! {
						<div class="graph-status alert alert-error" role="alert">
							<p>{message}</p>
							<button on:click=move |_| on_refresh.run(())>"Retry"</button>
						</div>
					}
						.into_any()
				}
				ViewStatus::Ready if is_empty.get() => {
					view! { <div class="graph-status empty">"No relationships found."</div> }
						.into_any()
				}
				ViewStatus::Ready => {
					view! {
						<MindMapCanvas
							data=view_data
							fullscreen=fullscreen
							on_node_click=on_node_click
							on_edge_click=on_canvas_edge
							on_node_context=on_node_context
							annotations={ Signal::<Option<(String, Option<String>)>>::from(note) }
						/>
					}
						.into_any()
				}
			}}

			<GraphControls
				params=params
				options=options
				on_refresh=on_refresh
				show_depth=show_depth
			/>

			{move || {
				data.with(|d| {
					d.as_ref()
						.filter(|d| !d.is_empty())
						.map(|d| {
							view! {
								<GraphLegend counts=type_counts(d.nodes.iter().map(|n| n.node_type.clone())) />
							}
						})
				})
			}}

			<AnnotationEditorPanel editor=editor on_command=on_command />
		</div>
	}
}
