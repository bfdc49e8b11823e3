use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::{MindMapState, NODE_RADIUS};

const BACKGROUND: &str = "#1a1a2e";
const ANNOTATION_BADGE: &str = "#ffc107";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Node thumbnails keyed by URL, loaded on first use.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	/// The image for `url` once it has finished loading.
	fn ready(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			let img = HtmlImageElement::new().ok()?;
			img.set_src(url);
			self.images.insert(url.to_owned(), img);
		}
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

pub fn render(state: &MindMapState, images: &mut ImageCache, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, images, ctx);
	ctx.restore();
}

fn draw_edges(state: &MindMapState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for (edge, a, b) in state.resolved_edges() {
		let (n1, n2) = (&state.graph.nodes[a], &state.graph.nodes[b]);
		let (dx, dy) = (n2.x - n1.x, n2.y - n1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(a) && state.is_highlighted(b);
		// t=0: every edge at 0.6; t=1: highlighted at 0.9, the rest at 0.15
		let (alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.stroke);
		ctx.set_line_width(width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(n1.x + ux * NODE_RADIUS, n1.y + uy * NODE_RADIUS);
		ctx.line_to(
			n2.x - ux * (NODE_RADIUS + arrow_size),
			n2.y - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(edge.stroke);
		let (tip_x, tip_y) = (n2.x - ux * NODE_RADIUS, n2.y - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		// the label toggle only covers nodes
		ctx.set_fill_style_str("rgba(220, 220, 235, 0.9)");
		ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&edge.label, (n1.x + n2.x) / 2.0, (n1.y + n2.y) / 2.0 - 4.0 / k);
		ctx.set_text_align("start");
	}
	ctx.set_global_alpha(1.0);
}

fn draw_body(
	state: &MindMapState,
	idx: usize,
	radius: f64,
	images: &mut ImageCache,
	ctx: &CanvasRenderingContext2d,
) {
	let p = &state.graph.nodes[idx];
	let (x, y) = (p.x, p.y);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(p.node.background);
	ctx.fill();

	match p.node.image.as_deref().and_then(|url| images.ready(url)) {
		Some(img) => {
			ctx.save();
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius - 2.0, 0.0, 2.0 * PI);
			ctx.clip();
			let side = 2.0 * (radius - 2.0);
			let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
				img,
				x - side / 2.0,
				y - side / 2.0,
				side,
				side,
			);
			ctx.restore();
		}
		None => {
			ctx.set_fill_style_str("white");
			ctx.set_font(&format!("{}px sans-serif", radius));
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text(p.node.icon, x, y);
			ctx.set_text_align("start");
			ctx.set_text_baseline("alphabetic");
		}
	}

	if p.node.record.annotation.is_some() {
		ctx.begin_path();
		let _ = ctx.arc(
			x + radius * 0.7,
			y - radius * 0.7,
			radius * 0.25,
			0.0,
			2.0 * PI,
		);
		ctx.set_fill_style_str(ANNOTATION_BADGE);
		ctx.fill();
	}
}

fn draw_label(
	state: &MindMapState,
	idx: usize,
	radius: f64,
	color: &str,
	ctx: &CanvasRenderingContext2d,
) {
	let p = &state.graph.nodes[idx];
	if let Some(label) = &p.node.label {
		ctx.set_fill_style_str(color);
		ctx.set_font(&format!("{}px sans-serif", 11.0 / state.transform.k.max(0.5)));
		let _ = ctx.fill_text(label, p.x + radius + 3.0, p.y + 3.0);
	}
}

fn draw_nodes(state: &MindMapState, images: &mut ImageCache, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	for idx in 0..state.graph.nodes.len() {
		if has_highlight && state.is_highlighted(idx) {
			continue;
		}
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));
		ctx.set_global_alpha(alpha);
		draw_body(state, idx, radius, images, ctx);
		draw_label(state, idx, radius, "rgba(255, 255, 255, 0.8)", ctx);
		ctx.set_global_alpha(1.0);
	}

	if !has_highlight {
		return;
	}

	// highlighted nodes go on top
	for idx in 0..state.graph.nodes.len() {
		if !state.is_highlighted(idx) {
			continue;
		}
		let (x, y) = (state.graph.nodes[idx].x, state.graph.nodes[idx].y);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(NODE_RADIUS * (1.0 + 0.35 * t), NODE_RADIUS * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		} else {
			(NODE_RADIUS, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_body(state, idx, radius, images, ctx);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(state, idx, radius, "white", ctx);
	}
}
