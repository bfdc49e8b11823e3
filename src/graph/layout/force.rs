use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::grid::GridLayout;
use super::{LayoutStrategy, PositionedNode, edge_indices, place};
use crate::graph::adapter::{FlowEdge, FlowNode};

/// Spring/charge simulation seeded from the grid.
///
/// The simulation runs a fixed number of steps up front so the result is a
/// plain position list like every other strategy.
#[derive(Clone, Debug)]
pub struct ForceLayout {
	/// Simulation steps.
	pub iterations: usize,
	/// Step length handed to the simulation.
	pub dt: f32,
	/// Grid the nodes start from.
	pub seed: GridLayout,
}

impl Default for ForceLayout {
	fn default() -> Self {
		Self {
			iterations: 300,
			dt: 0.016,
			seed: GridLayout { spacing: 60.0 },
		}
	}
}

fn parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl LayoutStrategy for ForceLayout {
	fn layout(&self, nodes: &[FlowNode], edges: &[FlowEdge]) -> Vec<PositionedNode> {
		if nodes.len() < 2 {
			return place(nodes, self.seed.coords(nodes.len()));
		}

		let mut graph: ForceGraph<usize, ()> = ForceGraph::new(parameters());
		let idx: Vec<_> = self
			.seed
			.coords(nodes.len())
			.into_iter()
			.enumerate()
			.map(|(i, (x, y))| {
				graph.add_node(NodeData {
					x: x as f32,
					y: y as f32,
					mass: 10.0,
					is_anchor: false,
					user_data: i,
				})
			})
			.collect();

		for (src, tgt, _) in edge_indices(nodes, edges) {
			if src != tgt {
				graph.add_edge(idx[src], idx[tgt], EdgeData::default());
			}
		}

		for _ in 0..self.iterations {
			graph.update(self.dt);
		}

		let mut coords = vec![(0.0, 0.0); nodes.len()];
		graph.visit_nodes(|node| {
			coords[node.data.user_data] = (node.x() as f64, node.y() as f64);
		});
		place(nodes, coords)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::layout::test_support::{edge, nodes};
	use crate::graph::types::EdgeType;

	fn distance(a: &PositionedNode, b: &PositionedNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn single_node_sits_at_origin() {
		let out = ForceLayout::default().layout(&nodes(1), &[]);
		assert_eq!((out[0].x, out[0].y), (0.0, 0.0));
	}

	#[test]
	fn unconnected_nodes_repel() {
		let layout = ForceLayout::default();
		let seeded = layout.seed.coords(2);
		let out = layout.layout(&nodes(2), &[]);
		let start = ((seeded[0].0 - seeded[1].0).powi(2) + (seeded[0].1 - seeded[1].1).powi(2)).sqrt();
		assert!(distance(&out[0], &out[1]) > start);
	}

	#[test]
	fn positions_are_finite_with_duplicate_and_self_edges() {
		let es = vec![
			edge(0, 1, EdgeType::Owns),
			edge(0, 1, EdgeType::Created),
			edge(2, 2, EdgeType::RelatedTo),
		];
		let out = ForceLayout::default().layout(&nodes(3), &es);
		assert!(out.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
	}
}
