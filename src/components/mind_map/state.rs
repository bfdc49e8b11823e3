use std::collections::{HashMap, HashSet};

use crate::graph::{FlowEdge, FlowNode, PositionedGraph};

pub const NODE_RADIUS: f64 = 18.0;
pub const HIT_RADIUS: f64 = 22.0;
pub const EDGE_HIT_DISTANCE: f64 = 6.0;
// pointer travel (screen px) below which a press counts as a click
const CLICK_SLOP: f64 = 4.0;
const FIT_PADDING: f64 = NODE_RADIUS * 3.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

/// What a released pointer amounted to.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerRelease {
	/// A drag, a pan, or a press on empty space.
	Nothing,
	/// A click on a node.
	Node(FlowNode),
	/// A click on an edge.
	Edge(FlowEdge),
}

pub struct MindMapState {
	pub graph: PositionedGraph,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	// endpoint indices per edge, `None` when an endpoint is missing
	edges: Vec<Option<(usize, usize)>>,
}

fn resolve_edges(graph: &PositionedGraph) -> Vec<Option<(usize, usize)>> {
	let index: HashMap<&str, usize> = graph
		.nodes
		.iter()
		.enumerate()
		.map(|(i, p)| (p.node.id.as_str(), i))
		.collect();
	graph
		.edges
		.iter()
		.map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
		.collect()
}

fn distance_to_segment(px: f64, py: f64, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < 1e-9 {
		0.0
	} else {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

impl MindMapState {
	pub fn new(graph: PositionedGraph, width: f64, height: f64) -> Self {
		let mut state = Self {
			edges: resolve_edges(&graph),
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		};
		state.fit_to_view();
		state
	}

	/// Swaps in a freshly fetched graph and resets interaction state.
	pub fn load(&mut self, graph: PositionedGraph) {
		self.edges = resolve_edges(&graph);
		self.graph = graph;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();
		self.fit_to_view();
	}

	/// Changes one node's note in place. Positions, zoom and pan stay put.
	pub fn set_annotation(&mut self, id: &str, annotation: Option<String>) {
		self.graph.set_annotation(id, annotation);
	}

	/// Centres the graph and zooms so every node is visible.
	pub fn fit_to_view(&mut self) {
		let mut nodes = self.graph.nodes.iter();
		let Some(first) = nodes.next() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};
		let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
		for p in nodes {
			min_x = min_x.min(p.x);
			min_y = min_y.min(p.y);
			max_x = max_x.max(p.x);
			max_y = max_y.max(p.y);
		}
		let (w, h) = (
			max_x - min_x + 2.0 * FIT_PADDING,
			max_y - min_y + 2.0 * FIT_PADDING,
		);
		let k = (self.width / w).min(self.height / h).clamp(0.1, 2.0);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// last drawn wins
		self.graph
			.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, p)| ((p.x - gx).powi(2) + (p.y - gy).powi(2)).sqrt() < HIT_RADIUS)
			.map(|(i, _)| i)
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.edges
			.iter()
			.enumerate()
			.filter_map(|(e, ends)| {
				let (a, b) = (*ends)?;
				let (na, nb) = (&self.graph.nodes[a], &self.graph.nodes[b]);
				let d = distance_to_segment(gx, gy, (na.x, na.y), (nb.x, nb.y));
				(d < EDGE_HIT_DISTANCE).then_some((e, d))
			})
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(e, _)| e)
	}

	/// Edges whose endpoints both resolved, with their indices.
	pub fn resolved_edges(&self) -> impl Iterator<Item = (&FlowEdge, usize, usize)> {
		self.graph
			.edges
			.iter()
			.zip(&self.edges)
			.filter_map(|(edge, ends)| ends.map(|(a, b)| (edge, a, b)))
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let p = &self.graph.nodes[idx];
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				node_start_x: p.x,
				node_start_y: p.y,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
				moved: false,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			if (x - self.drag.start_x).hypot(y - self.drag.start_y) > CLICK_SLOP {
				self.drag.moved = true;
			}
			if let (Some(idx), true) = (self.drag.node_idx, self.drag.moved) {
				let (dx, dy) = (
					(x - self.drag.start_x) / self.transform.k,
					(y - self.drag.start_y) / self.transform.k,
				);
				let p = &mut self.graph.nodes[idx];
				p.x = self.drag.node_start_x + dx;
				p.y = self.drag.node_start_y + dy;
			}
		} else if self.pan.active {
			if (x - self.pan.start_x).hypot(y - self.pan.start_y) > CLICK_SLOP {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self, x: f64, y: f64) -> PointerRelease {
		let release = if self.drag.active && !self.drag.moved {
			self.drag
				.node_idx
				.map(|idx| PointerRelease::Node(self.graph.nodes[idx].node.clone()))
				.unwrap_or(PointerRelease::Nothing)
		} else if self.pan.active && !self.pan.moved {
			self.edge_at_position(x, y)
				.map(|e| PointerRelease::Edge(self.graph.edges[e].clone()))
				.unwrap_or(PointerRelease::Nothing)
		} else {
			PointerRelease::Nothing
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		release
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.set_hover(None);
	}

	/// Zooms around the screen point `(x, y)`.
	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in self.edges.iter().flatten() {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{DisplayOptions, GraphData, LayoutKind, build_view};

	fn sample() -> PositionedGraph {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [
					{"id": "c42", "label": "Ayla", "type": "character"},
					{"id": "l1", "label": "Harbor", "type": "location"},
					{"id": "i1", "label": "Compass", "type": "item"}
				],
				"edges": [
					{"id": "e1", "source": "c42", "target": "l1", "type": "LOCATED_AT"},
					{"id": "e2", "source": "c42", "target": "i1", "type": "OWNS"}
				]
			}"#,
		)
		.unwrap();
		// grid: c42 (-75,-75), l1 (75,-75), i1 (-75,75)
		build_view(&data, DisplayOptions::default(), LayoutKind::Grid)
	}

	fn unit_state() -> MindMapState {
		let mut state = MindMapState::new(sample(), 800.0, 600.0);
		state.transform = ViewTransform {
			x: 400.0,
			y: 300.0,
			k: 1.0,
		};
		state
	}

	#[test]
	fn fit_centres_the_bounding_box() {
		let state = MindMapState::new(sample(), 800.0, 600.0);
		let (gx, gy) = state.screen_to_graph(400.0, 300.0);
		assert!(gx.abs() < 1e-9 && gy.abs() < 1e-9);
		assert!(state.transform.k > 0.1 && state.transform.k <= 2.0);
	}

	#[test]
	fn empty_graph_keeps_a_unit_transform() {
		let state = MindMapState::new(PositionedGraph::default(), 800.0, 600.0);
		assert_eq!(state.transform.k, 1.0);
		assert_eq!(state.node_at_position(400.0, 300.0), None);
		assert_eq!(state.edge_at_position(400.0, 300.0), None);
	}

	#[test]
	fn hit_testing_nodes_and_edges() {
		let state = unit_state();
		assert_eq!(state.node_at_position(400.0 - 75.0, 300.0 - 75.0), Some(0));
		assert_eq!(state.node_at_position(400.0, 300.0), None);
		// midpoint of c42 -> l1
		assert_eq!(state.edge_at_position(400.0, 300.0 - 75.0), Some(0));
		// midpoint of c42 -> i1
		assert_eq!(state.edge_at_position(400.0 - 75.0, 300.0), Some(1));
		assert_eq!(state.edge_at_position(400.0 + 60.0, 300.0 + 60.0), None);
	}

	#[test]
	fn press_and_release_on_a_node_is_a_click() {
		let mut state = unit_state();
		state.pointer_down(325.0, 225.0);
		state.pointer_move(326.0, 226.0);
		match state.pointer_up(326.0, 226.0) {
			PointerRelease::Node(node) => assert_eq!(node.id, "c42"),
			other => panic!("expected node click, got {other:?}"),
		}
	}

	#[test]
	fn dragging_moves_the_node_without_clicking() {
		let mut state = unit_state();
		state.pointer_down(325.0, 225.0);
		state.pointer_move(345.0, 245.0);
		assert_eq!(state.pointer_up(345.0, 245.0), PointerRelease::Nothing);
		assert_eq!((state.graph.nodes[0].x, state.graph.nodes[0].y), (-55.0, -55.0));
	}

	#[test]
	fn clicking_an_edge_reports_it() {
		let mut state = unit_state();
		state.pointer_down(400.0, 225.0);
		match state.pointer_up(400.0, 225.0) {
			PointerRelease::Edge(edge) => assert_eq!(edge.id, "e1"),
			other => panic!("expected edge click, got {other:?}"),
		}
	}

	#[test]
	fn panning_moves_the_view() {
		let mut state = unit_state();
		state.pointer_down(600.0, 500.0);
		state.pointer_move(650.0, 520.0);
		assert_eq!(state.pointer_up(650.0, 520.0), PointerRelease::Nothing);
		assert_eq!((state.transform.x, state.transform.y), (450.0, 320.0));
	}

	#[test]
	fn hover_collects_neighbours() {
		let mut state = unit_state();
		state.pointer_move(325.0, 225.0);
		assert_eq!(state.hover.node, Some(0));
		assert!(state.is_highlighted(1) && state.is_highlighted(2));

		state.pointer_move(325.0, 375.0);
		assert_eq!(state.hover.node, Some(2));
		assert!(state.is_highlighted(0));
		assert!(!state.is_highlighted(1));
	}

	#[test]
	fn highlight_fades_out_after_leaving() {
		let mut state = unit_state();
		state.set_hover(Some(0));
		for _ in 0..60 {
			state.tick(0.016);
		}
		assert!(state.hover.highlight_t > 0.5);
		state.pointer_leave();
		assert!(state.has_active_highlight());
		for _ in 0..600 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut state = unit_state();
		let before = state.screen_to_graph(500.0, 350.0);
		state.zoom(500.0, 350.0, -1.0);
		let after = state.screen_to_graph(500.0, 350.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!((state.transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn annotating_keeps_dragged_positions_and_zoom() {
		let mut state = unit_state();
		state.pointer_down(325.0, 225.0);
		state.pointer_move(375.0, 275.0);
		state.pointer_up(375.0, 275.0);
		state.zoom(400.0, 300.0, -1.0);
		let moved = (state.graph.nodes[0].x, state.graph.nodes[0].y);
		let transform = state.transform;
		assert_eq!(moved, (-25.0, -25.0));

		state.set_annotation("c42", Some("owes the guild".into()));
		assert_eq!(
			state.graph.nodes[0].node.record.annotation.as_deref(),
			Some("owes the guild")
		);
		assert_eq!((state.graph.nodes[0].x, state.graph.nodes[0].y), moved);
		assert_eq!(state.transform, transform);

		state.set_annotation("c42", None);
		assert!(state.graph.nodes[0].node.record.annotation.is_none());
		assert_eq!(state.transform, transform);
	}

	#[test]
	fn load_replaces_graph_and_resets_hover() {
		let mut state = unit_state();
		state.set_hover(Some(1));
		state.load(PositionedGraph::default());
		assert!(state.graph.is_empty());
		assert!(!state.has_active_highlight());
		assert_eq!(state.resolved_edges().count(), 0);
	}
}
