use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{error, info, warn};

use crate::api::ApiClient;
use crate::components::relationship_graph::{AnnotationDone, GraphSource, RelationshipGraph};
use crate::config::AppConfig;
use crate::graph::{GraphEdge, GraphQueryParams, LayoutKind, ParamWarning};

#[component]
fn EdgeDetails(edge: RwSignal<Option<GraphEdge>>) -> impl IntoView {
	move || {
		edge.get().map(|e| {
			view! {
				<aside class="edge-details">
					<h3>{e.display_label().to_owned()}</h3>
					<dl>
						<dt>"From"</dt>
						<dd>{e.source.clone()}</dd>
						<dt>"To"</dt>
						<dd>{e.target.clone()}</dd>
						<dt>"Type"</dt>
						<dd>{e.edge_type.to_string()}</dd>
					</dl>
					<button on:click=move |_| edge.set(None)>"Close"</button>
				</aside>
			}
		})
	}
}

/// Full-screen graph page driven by the URL query.
#[component]
pub(crate) fn GraphPage(
	source: GraphSource,
	title: &'static str,
	subtitle: &'static str,
) -> impl IntoView {
	let query = use_query_map();
	let config = use_context::<AppConfig>().unwrap_or_default();
	let client = ApiClient::new(&config.api_base_url);
	let save_error = RwSignal::new(Option::<String>::None);
	let selected_edge = RwSignal::new(Option::<GraphEdge>::None);

	let on_save_annotation = Callback::new({
		let client = client.clone();
		move |(node_id, text, done): (String, String, AnnotationDone)| {
			let client = client.clone();
			spawn_local(async move {
				let stored = match client.save_annotation(&node_id, &text).await {
					Ok(()) => {
						info!("saved annotation on {}", node_id);
						true
					}
					Err(e) => {
						error!("saving annotation on {} failed: {}", node_id, e);
						save_error.try_set(Some(format!("Could not save the note: {}", e)));
						false
					}
				};
				done(stored);
			});
		}
	});

	let on_delete_annotation = Callback::new(move |(node_id, done): (String, AnnotationDone)| {
		let client = client.clone();
		spawn_local(async move {
			let stored = match client.delete_annotation(&node_id).await {
				Ok(()) => {
					info!("deleted annotation on {}", node_id);
					true
				}
				Err(e) => {
					error!("deleting annotation on {} failed: {}", node_id, e);
					save_error.try_set(Some(format!("Could not delete the note: {}", e)));
					false
				}
			};
			done(stored);
		});
	});

	let on_edge_click = Callback::new(move |edge: GraphEdge| selected_edge.set(Some(edge)));

	// a new query means a new graph: rebuild the whole view
	let graph = move || {
		let (mut params, warnings, layout_missing) = query.with(|q| {
			let (params, warnings) = GraphQueryParams::from_query(|k| q.get(k));
			(params, warnings, q.get("layout").is_none())
		});
		for w in &warnings {
			warn!("query: {}", w);
		}
		if source == GraphSource::Hierarchy && layout_missing {
			params.layout = LayoutKind::Hierarchy;
		}
		selected_edge.set(None);
		view! {
			<Warnings warnings=warnings />
			<RelationshipGraph
				params=RwSignal::new(params)
				source=source
				on_edge_click=on_edge_click
				on_save_annotation=on_save_annotation
				on_delete_annotation=on_delete_annotation
			/>
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{graph}
				<div class="graph-overlay">
					<h1>{title}</h1>
					<p class="subtitle">{subtitle}</p>
					{move || {
						save_error
							.get()
							.map(|message| {
								view! {
									<p class="alert alert-error" on:click=move |_| save_error.set(None)>
										{message}
									</p>
								}
							})
					}}
				</div>
				<EdgeDetails edge=selected_edge />
			</div>
		</ErrorBoundary>
	}
}

#[component]
fn Warnings(warnings: Vec<ParamWarning>) -> impl IntoView {
	(!warnings.is_empty()).then(|| {
		view! {
			<ul class="param-warnings">
				{warnings.into_iter().map(|w| view! { <li>{w.to_string()}</li> }).collect_view()}
			</ul>
		}
	})
}

/// Mind map of the whole campaign, or of one entity when the query names it.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<GraphPage
			source=GraphSource::Relationships
			title="Campaign Mind Map"
			subtitle="Click a node to open it. Right-click to annotate. Drag to pan, scroll to zoom."
		/>
	}
}
