use leptos::prelude::*;

use crate::interaction::{AnnotationCommand, AnnotationEditor};

/// Side panel for writing a note on one node. Hidden while the editor is
/// closed; save and delete hand the resulting command to `on_command`.
#[component]
pub fn AnnotationEditorPanel(
	editor: RwSignal<AnnotationEditor>,
	on_command: Callback<AnnotationCommand>,
) -> impl IntoView {
	let finish = move |command: Option<AnnotationCommand>| {
		if let Some(command) = command {
			on_command.run(command);
		}
	};

	view! {
		<Show when=move || editor.with(|e| e.draft().is_some())>
			<aside class="annotation-editor">
				<h3>
					{move || {
						editor
							.with(|e| e.draft().map(|d| format!("Note on {}", d.node_label)))
							.unwrap_or_default()
					}}
				</h3>
				<textarea
					rows="6"
					prop:value=move || {
						editor.with(|e| e.draft().map(|d| d.text.clone())).unwrap_or_default()
					}
					on:input=move |ev| {
						let text = event_target_value(&ev);
						editor.update(|e| e.edit(text));
					}
				/>
				<div class="annotation-editor__actions">
					<button on:click=move |_| finish(editor.try_update(|e| e.save()).flatten())>
						"Save"
					</button>
					<Show when=move || editor.with(|e| e.draft().is_some_and(|d| d.existing))>
						<button
							class="danger"
							on:click=move |_| finish(editor.try_update(|e| e.delete()).flatten())
						>
							"Delete"
						</button>
					</Show>
					<button on:click=move |_| editor.update(|e| e.cancel())>"Cancel"</button>
				</div>
			</aside>
		</Show>
	}
}
