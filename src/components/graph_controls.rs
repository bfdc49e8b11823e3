//! Filter, layout and display controls shown over the graph, plus the legend.

use std::collections::BTreeMap;

use leptos::prelude::*;

use crate::graph::params::MAX_DEPTH;
use crate::graph::style::{edge_style, node_style};
use crate::graph::{DisplayOptions, EdgeType, GraphQueryParams, LayoutKind, NodeType};

#[component]
fn Checkbox(
	#[prop(into)] label: String,
	#[prop(into)] color: String,
	#[prop(into)] checked: Signal<bool>,
	on_toggle: Callback<()>,
) -> impl IntoView {
	view! {
		<label class="graph-controls__check">
			<input
				type="checkbox"
				prop:checked=move || checked.get()
				on:change=move |_| on_toggle.run(())
			/>
			<span class="graph-controls__swatch" style=format!("background-color: {}", color)></span>
			{label}
		</label>
	}
}

/// Depth, layout, type filters and display toggles.
///
/// Filter and layout edits land in `params`, display toggles in `options`.
/// The owner watches both.
#[component]
pub fn GraphControls(
	params: RwSignal<GraphQueryParams>,
	options: RwSignal<DisplayOptions>,
	on_refresh: Callback<()>,
	/// Hide the depth slider for views that ignore depth.
	#[prop(default = true)]
	show_depth: bool,
) -> impl IntoView {
	let on_depth = move |ev: leptos::ev::Event| {
		if let Ok(depth) = event_target_value(&ev).parse::<u32>() {
			params.update(|p| p.depth = depth.clamp(1, MAX_DEPTH));
		}
	};

	let on_layout = move |ev: leptos::ev::Event| {
		if let Some(layout) = LayoutKind::parse(&event_target_value(&ev)) {
			params.update(|p| p.layout = layout);
		}
	};

	let node_filters = NodeType::ALL
		.into_iter()
		.map(|t| {
			let (label, color) = (t.label().to_owned(), node_style(&t).color);
			let toggled = t.clone();
			view! {
				<Checkbox
					label=label
					color=color
					checked=Signal::derive(move || params.with(|p| p.node_types.contains(&t)))
					on_toggle=Callback::new(move |_: ()| {
						params.update(|p| p.toggle_node_type(toggled.clone()))
					})
				/>
			}
		})
		.collect_view();

	let edge_filters = EdgeType::ALL
		.into_iter()
		.map(|t| {
			let (label, color) = (t.as_str().to_owned(), edge_style(&t).color);
			let toggled = t.clone();
			view! {
				<Checkbox
					label=label
					color=color
					checked=Signal::derive(move || params.with(|p| p.edge_types.contains(&t)))
					on_toggle=Callback::new(move |_: ()| {
						params.update(|p| p.toggle_edge_type(toggled.clone()))
					})
				/>
			}
		})
		.collect_view();

	view! {
		<div class="graph-controls">
			<Show when=move || show_depth>
				<label class="graph-controls__row">
					{move || format!("Depth: {}", params.with(|p| p.depth))}
					<input
						type="range"
						min="1"
						max=MAX_DEPTH.to_string()
						prop:value=move || params.with(|p| p.depth.to_string())
						on:change=on_depth
					/>
				</label>
			</Show>

			<label class="graph-controls__row">
				"Layout"
				<select
					prop:value=move || params.with(|p| p.layout.as_str())
					on:change=on_layout
				>
					{LayoutKind::ALL
						.into_iter()
						.map(|l| view! { <option value=l.as_str()>{l.as_str()}</option> })
						.collect_view()}
				</select>
			</label>

			<details class="graph-controls__group">
				<summary>"Node types"</summary>
				{node_filters}
			</details>
			<details class="graph-controls__group">
				<summary>"Relationship types"</summary>
				{edge_filters}
			</details>

			<div class="graph-controls__row">
				<button
					class=move || if options.with(|o| o.show_labels) { "toggle active" } else { "toggle" }
					title="Toggle labels"
					on:click=move |_| options.update(|o| o.show_labels = !o.show_labels)
				>
					"Labels"
				</button>
				<button
					class=move || if options.with(|o| o.show_images) { "toggle active" } else { "toggle" }
					title="Toggle images"
					on:click=move |_| options.update(|o| o.show_images = !o.show_images)
				>
					"Images"
				</button>
				<button title="Refresh graph" on:click=move |_| on_refresh.run(())>
					"⟲"
				</button>
			</div>
		</div>
	}
}

/// Node counts per type, in legend order.
pub fn type_counts(types: impl IntoIterator<Item = NodeType>) -> BTreeMap<NodeType, usize> {
	let mut counts = BTreeMap::new();
	for t in types {
		*counts.entry(t).or_insert(0) += 1;
	}
	counts
}

/// Colour key for the node types present in the graph.
#[component]
pub fn GraphLegend(counts: BTreeMap<NodeType, usize>) -> impl IntoView {
	view! {
		<div class="graph-legend">
			<h3>"Entity types"</h3>
			{counts
				.into_iter()
				.map(|(t, count)| {
					let style = node_style(&t);
					view! {
						<div class="graph-legend__row">
							<span
								class="graph-legend__swatch"
								style=format!("background-color: {}", style.color)
							>
								{style.icon}
							</span>
							<span>{t.label().to_owned()}</span>
							<span class="graph-legend__count">{format!("({})", count)}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_follow_type_order() {
		let dragon = NodeType::Unknown("dragon".into());
		let counts = type_counts([
			NodeType::Item,
			dragon.clone(),
			NodeType::Character,
			NodeType::Item,
		]);
		let listed: Vec<_> = counts.into_iter().collect();
		assert_eq!(
			listed,
			vec![(NodeType::Character, 1), (NodeType::Item, 2), (dragon, 1)]
		);
	}
}
