use leptos::prelude::*;

use super::home::GraphPage;
use crate::components::relationship_graph::GraphSource;

/// Containment tree: worlds, their campaigns, sessions and so on.
#[component]
pub fn Hierarchy() -> impl IntoView {
	view! {
		<GraphPage
			source=GraphSource::Hierarchy
			title="Campaign Hierarchy"
			subtitle="Parents above children. Click a node to open it."
		/>
	}
}
