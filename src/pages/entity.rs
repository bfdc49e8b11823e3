use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::relationship_graph::RelationshipGraph;
use crate::graph::style::node_style;
use crate::graph::{GraphQueryParams, GraphScope, NodeType};
use crate::interaction::mind_map_route;

/// Landing page for one entity: its neighbourhood graph and a link to the
/// full mind map scoped to it.
#[component]
pub fn EntityDetail(kind: NodeType) -> impl IntoView {
	let params = use_params_map();
	let style = node_style(&kind);

	move || {
		let id = params.with(|p| p.get("id")).unwrap_or_default();
		let Some(scope) = GraphScope::for_node(&kind, id.clone()) else {
			return view! { <p>"Unknown entity type"</p> }.into_any();
		};
		let href = mind_map_route(&scope);

		view! {
			<div class="entity-detail">
				<header style=format!("border-color: {}", style.color)>
					<span class="entity-detail__icon">{style.icon}</span>
					<h1>{format!("{} {}", kind.label(), id)}</h1>
					<A href=href>"Open in mind map"</A>
				</header>
				<div class="entity-detail__graph">
					<RelationshipGraph
						params=RwSignal::new(GraphQueryParams::scoped(scope))
						fullscreen=false
					/>
				</div>
			</div>
		}
			.into_any()
	}
}
