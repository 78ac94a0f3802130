//! Force relaxation of the bundle graph's control points.
//!
//! The bundle graph is held in a [`force_graph::ForceGraph`] with airports as
//! anchors. Each step pulls the ends of every link together (zero rest
//! length), then applies a bounded many-body charge, and the whole step is
//! cooled by an alpha schedule so the layout settles.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData};
use log::info;

use super::bundle::BundleGraph;
use super::config::LayoutConfig;

/// Lifecycle of a [`Relaxation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
	/// Still stepping.
	Running,
	/// Alpha cooled below its threshold, or nothing was free to move.
	Converged,
	/// The iteration budget ran out first.
	Exhausted,
}

/// Emitted once, on the step that leaves [`LayoutStatus::Running`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutEvent {
	/// The layout stopped with the given status.
	Finished(LayoutStatus),
}

/// Alpha-cooled link and charge relaxation over a [`BundleGraph`].
pub struct Relaxation {
	graph: ForceGraph<usize, ()>,
	positions: Vec<(f64, f64)>,
	pinned: Vec<bool>,
	degree: Vec<usize>,
	config: LayoutConfig,
	alpha: f64,
	iterations: usize,
	status: LayoutStatus,
}

impl Relaxation {
	/// Builds the simulation graph. Control points get a tiny jitter so that
	/// coincident points can separate.
	pub fn new(bundle: &BundleGraph, config: &LayoutConfig) -> Self {
		let mut graph = ForceGraph::new(Default::default());
		let positions: Vec<(f64, f64)> = bundle
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (dx, dy) = if node.pinned { (0.0, 0.0) } else { jitter(i) };
				(node.x + dx, node.y + dy)
			})
			.collect();

		let handles: Vec<_> = bundle
			.nodes
			.iter()
			.zip(&positions)
			.enumerate()
			.map(|(i, (node, &(x, y)))| {
				graph.add_node(NodeData {
					x: x as f32,
					y: y as f32,
					mass: 1.0,
					is_anchor: node.pinned,
					user_data: i,
				})
			})
			.collect();
		let mut degree = vec![0; bundle.nodes.len()];
		for &(a, b) in &bundle.links {
			graph.add_edge(handles[a], handles[b], EdgeData::default());
			degree[a] += 1;
			degree[b] += 1;
		}

		Self {
			graph,
			positions,
			pinned: bundle.nodes.iter().map(|n| n.pinned).collect(),
			degree,
			config: config.clone(),
			alpha: 1.0,
			iterations: 0,
			status: LayoutStatus::Running,
		}
	}

	/// Current lifecycle state.
	pub fn status(&self) -> LayoutStatus {
		self.status
	}

	/// True until the layout converges or exhausts its budget.
	pub fn is_running(&self) -> bool {
		self.status == LayoutStatus::Running
	}

	/// Current cooling factor, starting at 1.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Steps taken so far.
	pub fn iterations(&self) -> usize {
		self.iterations
	}

	/// Number of simulated nodes, pinned ones included.
	pub fn node_count(&self) -> usize {
		self.positions.len()
	}

	/// Advances one tick and writes the new positions back into `bundle`.
	pub fn step(&mut self, bundle: &mut BundleGraph) -> Option<LayoutEvent> {
		if !self.is_running() {
			return None;
		}
		if self.pinned.iter().all(|&p| p) {
			return Some(self.finish(LayoutStatus::Converged));
		}

		let previous = &self.positions;
		let mut next = previous.clone();
		self.pull_links(&mut next, self.config.link_strength * self.alpha);
		apply_charge(
			&mut next,
			&self.pinned,
			self.config.charge_strength * self.alpha,
			self.config.distance_max,
		);
		for (i, p) in next.iter_mut().enumerate() {
			if self.pinned[i] || !p.0.is_finite() || !p.1.is_finite() {
				*p = previous[i];
			}
		}

		self.graph.visit_nodes_mut(|node| {
			let (x, y) = next[node.data.user_data];
			node.data.x = x as f32;
			node.data.y = y as f32;
		});
		for (node, &(x, y)) in bundle.nodes.iter_mut().zip(&next) {
			node.x = x;
			node.y = y;
		}
		self.positions = next;

		self.iterations += 1;
		self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			Some(self.finish(LayoutStatus::Converged))
		} else if self.iterations >= self.config.max_iterations {
			Some(self.finish(LayoutStatus::Exhausted))
		} else {
			None
		}
	}

	fn finish(&mut self, status: LayoutStatus) -> LayoutEvent {
		self.status = status;
		info!("layout complete after {} iterations", self.iterations);
		LayoutEvent::Finished(status)
	}

	/// Pulls the two ends of every link towards each other by `strength`
	/// times their separation. The move is split by degree so that busy
	/// nodes move less; pinned ends keep their share.
	fn pull_links(&self, positions: &mut [(f64, f64)], strength: f64) {
		if strength == 0.0 {
			return;
		}
		self.graph.visit_edges(|n1, n2, _| {
			let (s, t) = (n1.data.user_data, n2.data.user_data);
			let dx = (positions[t].0 - positions[s].0) * strength;
			let dy = (positions[t].1 - positions[s].1) * strength;
			let bias = self.degree[s] as f64 / (self.degree[s] + self.degree[t]) as f64;
			if !self.pinned[t] {
				positions[t].0 -= dx * bias;
				positions[t].1 -= dy * bias;
			}
			if !self.pinned[s] {
				positions[s].0 += dx * (1.0 - bias);
				positions[s].1 += dy * (1.0 - bias);
			}
		});
	}

	/// Steps until the layout stops.
	pub fn run(&mut self, bundle: &mut BundleGraph) -> LayoutStatus {
		while self.is_running() {
			self.step(bundle);
		}
		self.status
	}
}

/// Small deterministic offset so coincident control points can separate.
fn jitter(i: usize) -> (f64, f64) {
	let t = (i as f64 * 0.618_033_988_75).fract();
	(1e-3 * (t - 0.5), 1e-3 * (0.5 - (t * 7.0).fract()))
}

/// Many-body charge limited to pairs closer than `distance_max`.
///
/// Positive `strength` attracts. Each node moves at most halfway towards
/// (or away from) any single partner. Pinned nodes do not move.
pub fn apply_charge(positions: &mut [(f64, f64)], pinned: &[bool], strength: f64, distance_max: f64) {
	if strength == 0.0 || distance_max <= 0.0 {
		return;
	}
	let max2 = distance_max * distance_max;
	let cell = |(x, y): (f64, f64)| ((x / distance_max).floor() as i64, (y / distance_max).floor() as i64);

	let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
	for (i, &p) in positions.iter().enumerate() {
		if p.0.is_finite() && p.1.is_finite() {
			grid.entry(cell(p)).or_default().push(i);
		}
	}

	let snapshot = positions.to_vec();
	let mut delta = vec![(0.0, 0.0); positions.len()];
	for (&(cx, cy), members) in &grid {
		for &i in members {
			for ox in -1..=1 {
				for oy in -1..=1 {
					let Some(others) = grid.get(&(cx + ox, cy + oy)) else {
						continue;
					};
					for &j in others {
						if j <= i || (pinned[i] && pinned[j]) {
							continue;
						}
						let (dx, dy) = (snapshot[j].0 - snapshot[i].0, snapshot[j].1 - snapshot[i].1);
						let mut l2 = dx * dx + dy * dy;
						if l2 == 0.0 || l2 >= max2 {
							continue;
						}
						if l2 < 1.0 {
							l2 = l2.sqrt();
						}
						let w = (strength / l2).clamp(-0.5, 0.5);
						if !pinned[i] {
							delta[i].0 += dx * w;
							delta[i].1 += dy * w;
						}
						if !pinned[j] {
							delta[j].0 -= dx * w;
							delta[j].1 -= dy * w;
						}
					}
				}
			}
		}
	}

	for (p, d) in positions.iter_mut().zip(delta) {
		p.0 += d.0;
		p.1 += d.1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::route_map::bundle::{BundleNode, BundlePath};

	/// Two parallel three-segment routes, 8 px apart.
	fn parallel_routes() -> BundleGraph {
		let node = |x: f64, y: f64, pinned: bool| BundleNode { x, y, pinned };
		BundleGraph {
			nodes: vec![
				node(0.0, 0.0, true),
				node(300.0, 0.0, true),
				node(0.0, 8.0, true),
				node(300.0, 8.0, true),
				node(100.0, 0.0, false),
				node(200.0, 0.0, false),
				node(100.0, 8.0, false),
				node(200.0, 8.0, false),
			],
			links: vec![(0, 4), (4, 5), (5, 1), (2, 6), (6, 7), (7, 3)],
			paths: vec![
				BundlePath { origin: 0, nodes: vec![0, 4, 5, 1] },
				BundlePath { origin: 2, nodes: vec![2, 6, 7, 3] },
			],
			airport_count: 4,
		}
	}

	#[test]
	fn converges_once_alpha_cools() {
		let mut bundle = parallel_routes();
		let mut layout = Relaxation::new(&bundle, &LayoutConfig::default());
		assert_eq!(layout.node_count(), 8);
		assert!(layout.is_running());

		let mut finished = Vec::new();
		for _ in 0..1000 {
			if let Some(event) = layout.step(&mut bundle) {
				finished.push(event);
			}
		}
		assert_eq!(finished, [LayoutEvent::Finished(LayoutStatus::Converged)]);
		// 0.9^66 is the first power below 0.001.
		assert_eq!(layout.iterations(), 66);
		assert!(layout.alpha() < 0.001);
	}

	#[test]
	fn stops_when_the_iteration_budget_runs_out() {
		let mut bundle = parallel_routes();
		let config = LayoutConfig {
			max_iterations: 5,
			..LayoutConfig::default()
		};
		let mut layout = Relaxation::new(&bundle, &config);
		assert_eq!(layout.run(&mut bundle), LayoutStatus::Exhausted);
		assert_eq!(layout.iterations(), 5);

		let frozen = bundle.clone();
		assert_eq!(layout.step(&mut bundle), None);
		assert_eq!(bundle, frozen);
	}

	#[test]
	fn airports_stay_pinned_and_positions_stay_finite() {
		let mut bundle = parallel_routes();
		let before = bundle.clone();
		let mut layout = Relaxation::new(&bundle, &LayoutConfig::default());
		layout.run(&mut bundle);

		for (after, before) in bundle.nodes.iter().zip(&before.nodes) {
			assert!(after.x.is_finite() && after.y.is_finite());
			if before.pinned {
				assert_eq!((after.x, after.y), (before.x, before.y));
			}
		}
		assert_eq!(bundle.links, before.links);
		assert_eq!(bundle.paths, before.paths);
	}

	#[test]
	fn graph_without_control_points_finishes_on_first_step() {
		let mut bundle = parallel_routes();
		bundle.nodes.truncate(4);
		bundle.links = vec![(0, 1), (2, 3)];
		let mut layout = Relaxation::new(&bundle, &LayoutConfig::default());
		assert!(layout.is_running());

		let finished: Vec<_> = (0..100).filter_map(|_| layout.step(&mut bundle)).collect();
		assert_eq!(finished, [LayoutEvent::Finished(LayoutStatus::Converged)]);
		assert_eq!(layout.iterations(), 0);
	}

	fn link_length(bundle: &BundleGraph) -> f64 {
		bundle
			.links
			.iter()
			.map(|&(a, b)| {
				let (pa, pb) = (bundle.point(a), bundle.point(b));
				(pb.0 - pa.0).hypot(pb.1 - pa.1)
			})
			.sum()
	}

	#[test]
	fn links_straighten_a_bent_chain() {
		let node = |x: f64, y: f64, pinned: bool| BundleNode { x, y, pinned };
		let mut bundle = BundleGraph {
			nodes: vec![node(0.0, 0.0, true), node(100.0, 0.0, true), node(50.0, 40.0, false)],
			links: vec![(0, 2), (2, 1)],
			paths: vec![BundlePath { origin: 0, nodes: vec![0, 2, 1] }],
			airport_count: 2,
		};
		let before = link_length(&bundle);
		let config = LayoutConfig {
			charge_strength: 0.0,
			..LayoutConfig::default()
		};
		let mut layout = Relaxation::new(&bundle, &config);
		assert_eq!(layout.run(&mut bundle), LayoutStatus::Converged);

		let (x, y) = bundle.point(2);
		assert!((x - 50.0).abs() < 1.0, "x = {x}");
		assert!(y.abs() < 1.0, "y = {y}");
		assert!(link_length(&bundle) < before - 25.0);
		assert!((link_length(&bundle) - 100.0).abs() < 1.0);
	}

	#[test]
	fn parallel_routes_pull_closer() {
		let mut bundle = parallel_routes();
		let mut layout = Relaxation::new(&bundle, &LayoutConfig::default());
		layout.run(&mut bundle);

		for (a, b) in [(4, 6), (5, 7)] {
			let gap = bundle.point(b).1 - bundle.point(a).1;
			assert!(gap < 7.5, "gap between {a} and {b} is {gap}");
		}
	}

	#[test]
	fn positive_charge_pulls_close_nodes_together() {
		let mut positions = vec![(0.0, 0.0), (0.0, 10.0)];
		apply_charge(&mut positions, &[false, false], 10.0, 36.0);
		let gap = positions[1].1 - positions[0].1;
		assert!(gap < 10.0 && gap > 0.0);
		assert!((positions[0].1 + positions[1].1 - 10.0).abs() < 1e-12);
	}

	#[test]
	fn negative_charge_pushes_apart() {
		let mut positions = vec![(0.0, 0.0), (10.0, 0.0)];
		apply_charge(&mut positions, &[false, false], -10.0, 36.0);
		assert!(positions[1].0 - positions[0].0 > 10.0);
	}

	#[test]
	fn charge_ignores_far_pairs_and_pinned_nodes() {
		let mut far = vec![(0.0, 0.0), (100.0, 0.0)];
		apply_charge(&mut far, &[false, false], 10.0, 36.0);
		assert_eq!(far, [(0.0, 0.0), (100.0, 0.0)]);

		let mut pinned = vec![(0.0, 0.0), (0.0, 10.0)];
		apply_charge(&mut pinned, &[true, false], 10.0, 36.0);
		assert_eq!(pinned[0], (0.0, 0.0));
		assert!(pinned[1].1 < 10.0);
	}

	#[test]
	fn charge_crosses_grid_cells() {
		// 35 and 37 fall in different 36 px cells but are 2 px apart.
		let mut positions = vec![(35.0, 0.0), (37.0, 0.0)];
		apply_charge(&mut positions, &[false, false], 1.0, 36.0);
		assert!(positions[1].0 - positions[0].0 < 2.0);
	}
}
