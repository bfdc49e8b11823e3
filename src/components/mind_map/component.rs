use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render::{self, ImageCache};
use super::state::{MindMapState, PointerRelease};
use crate::graph::{FlowEdge, FlowNode, PositionedGraph};

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Browser hooks of one mounted canvas.
///
/// Dropping it cancels the pending animation frame, detaches the resize
/// listener and empties the shared slots, which breaks the frame closure's
/// reference to itself.
struct CanvasHooks {
	state: Shared<MindMapState>,
	animate: Shared<Closure<dyn FnMut()>>,
	resize: Shared<Closure<dyn FnMut()>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl CanvasHooks {
	fn new(state: Shared<MindMapState>) -> Self {
		Self {
			state,
			animate: Rc::new(RefCell::new(None)),
			resize: Rc::new(RefCell::new(None)),
			frame: Rc::new(Cell::new(None)),
		}
	}
}

impl Drop for CanvasHooks {
	fn drop(&mut self) {
		let frame = self.frame.take();
		let resize = self.resize.borrow_mut().take();
		let animate = self.animate.borrow_mut().take();
		self.state.borrow_mut().take();

		if frame.is_some() || resize.is_some() {
			if let Some(window) = web_sys::window() {
				if let Some(id) = frame {
					let _ = window.cancel_animation_frame(id);
				}
				if let Some(cb) = &resize {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		}
		drop(animate);
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas view of a positioned graph with drag, pan, zoom and hover
/// highlighting. Clicks are reported through the callbacks.
#[component]
pub fn MindMapCanvas(
	#[prop(into)] data: Signal<PositionedGraph>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_node_click: Option<UnsyncCallback<FlowNode>>,
	#[prop(optional)] on_edge_click: Option<UnsyncCallback<FlowEdge>>,
	#[prop(optional)] on_node_context: Option<UnsyncCallback<FlowNode>>,
	/// Latest `(node_id, note)` change to show without relaying out.
	#[prop(optional, into)]
	annotations: Option<Signal<Option<(String, Option<String>)>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared<MindMapState> = Rc::new(RefCell::new(None));
	let hooks = CanvasHooks::new(state.clone());
	let (animate_init, resize_cb_init, frame_init) =
		(hooks.animate.clone(), hooks.resize.clone(), hooks.frame.clone());
	// dropped when the owner is disposed, i.e. on unmount
	let _hooks = StoredValue::new_local(hooks);
	let state_init = state.clone();

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};

		if let Some(s) = state_init.borrow_mut().as_mut() {
			s.load(graph);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(MindMapState::new(graph, w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(s) = state_resize.borrow_mut().as_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_cb_init.borrow().as_ref() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, frame_anim) =
			(state_init.clone(), animate_init.clone(), frame_init.clone());
		let mut images = ImageCache::default();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(s) = state_anim.borrow_mut().as_mut() {
				s.tick(0.016);
				render::render(s, &mut images, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_anim.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	// note edits are patched in place so positions, zoom and pan survive
	if let Some(annotations) = annotations {
		let state_note = state.clone();
		Effect::new(move |_| {
			let Some((node_id, note)) = annotations.get() else {
				return;
			};
			if let Some(s) = state_note.borrow_mut().as_mut() {
				s.set_annotation(&node_id, note);
			}
		});
	}

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_md.borrow_mut().as_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_mm.borrow_mut().as_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let release = match state_mu.borrow_mut().as_mut() {
			Some(s) => s.pointer_up(x, y),
			None => return,
		};
		// the state borrow is released before handing control to the owner
		match release {
			PointerRelease::Node(node) => {
				if let Some(cb) = &on_node_click {
					cb.run(node);
				}
			}
			PointerRelease::Edge(edge) => {
				if let Some(cb) = &on_edge_click {
					cb.run(edge);
				}
			}
			PointerRelease::Nothing => {}
		}
	};

	let state_ctx = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		let Some(cb) = &on_node_context else {
			return;
		};
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		let node = state_ctx.borrow().as_ref().and_then(|s| {
			s.node_at_position(x, y)
				.map(|idx| s.graph.nodes[idx].node.clone())
		});
		if let Some(node) = node {
			ev.prevent_default();
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="mind-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:contextmenu=on_contextmenu
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{DisplayOptions, GraphData, LayoutKind, build_view};

	#[test]
	fn dropping_hooks_releases_the_canvas_state() {
		let data: GraphData = serde_json::from_str(
			r#"{"nodes": [{"id": "w1", "label": "Eldoria", "type": "world"}]}"#,
		)
		.unwrap();
		let graph = build_view(&data, DisplayOptions::default(), LayoutKind::Grid);
		let state: Shared<MindMapState> =
			Rc::new(RefCell::new(Some(MindMapState::new(graph, 800.0, 600.0))));

		let hooks = CanvasHooks::new(state.clone());
		let frame = hooks.frame.clone();
		drop(hooks);

		assert!(state.borrow().is_none());
		assert_eq!(frame.get(), None);
	}
}
