//! Splits every route into a chain of control points for edge bundling.

use super::scale::LinearScale;
use super::types::Network;

/// A bundle graph vertex: an airport or a synthetic control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BundleNode {
	pub x: f64,
	pub y: f64,
	/// Airport nodes never move during relaxation.
	pub pinned: bool,
}

/// One route's ordered chain of node indices, airport to airport.
#[derive(Clone, Debug, PartialEq)]
pub struct BundlePath {
	/// Index of the originating airport (also its node index).
	pub origin: usize,
	pub nodes: Vec<usize>,
}

/// The first `airport_count` nodes are the airports, in network order;
/// everything after them is a synthetic control point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BundleGraph {
	pub nodes: Vec<BundleNode>,
	/// Consecutive node pairs along every path.
	pub links: Vec<(usize, usize)>,
	pub paths: Vec<BundlePath>,
	pub airport_count: usize,
}

impl BundleGraph {
	/// Current position of node `idx`.
	pub fn point(&self, idx: usize) -> (f64, f64) {
		let node = &self.nodes[idx];
		(node.x, node.y)
	}

	/// Current positions along `path`, ready for curve fitting.
	pub fn path_points(&self, path: &BundlePath) -> Vec<(f64, f64)> {
		path.nodes.iter().map(|&i| self.point(i)).collect()
	}
}

/// Number of interior control points for a route of projected length `length`.
///
/// Zero-length routes get none so they collapse to a single direct link.
pub fn segment_count(segments: &LinearScale, length: f64) -> usize {
	if length <= 0.0 {
		return 0;
	}
	segments.apply(length).round().max(0.0) as usize
}

/// Builds the bundle graph for `network`: airports first, then each route's
/// evenly spaced interior points, linked airport to airport.
pub fn generate_segments(network: &Network, segments: &LinearScale) -> BundleGraph {
	let mut bundle = BundleGraph {
		nodes: network
			.airports
			.iter()
			.map(|a| {
				let (x, y) = a.xy();
				BundleNode { x, y, pinned: true }
			})
			.collect(),
		airport_count: network.airports.len(),
		..BundleGraph::default()
	};

	for route in &network.routes {
		let (sx, sy) = bundle.point(route.source);
		let (tx, ty) = bundle.point(route.target);
		let total = segment_count(segments, (tx - sx).hypot(ty - sy));

		let xscale = LinearScale::new((0.0, (total + 1) as f64), (sx, tx));
		let yscale = LinearScale::new((0.0, (total + 1) as f64), (sy, ty));

		let mut local = Vec::with_capacity(total + 2);
		local.push(route.source);
		let mut source = route.source;
		for j in 1..=total {
			let target = bundle.nodes.len();
			bundle.nodes.push(BundleNode {
				x: xscale.apply(j as f64),
				y: yscale.apply(j as f64),
				pinned: false,
			});
			bundle.links.push((source, target));
			local.push(target);
			source = target;
		}
		bundle.links.push((source, route.target));
		local.push(route.target);

		bundle.paths.push(BundlePath {
			origin: route.source,
			nodes: local,
		});
	}

	bundle
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::route_map::types::{Airport, Route};

	fn airport(code: &str, x: f64, y: f64) -> Airport {
		Airport {
			code: code.into(),
			name: code.into(),
			city: code.into(),
			region: code.into(),
			longitude: 0.0,
			latitude: 0.0,
			position: Some((x, y)),
			outgoing: 1,
			incoming: 1,
		}
	}

	fn route(source: usize, target: usize) -> Route {
		Route {
			origin: String::new(),
			destination: String::new(),
			count: 1,
			source,
			target,
		}
	}

	fn segments() -> LinearScale {
		LinearScale::new((0.0, 1000.0), (1.0, 10.0))
	}

	#[test]
	fn interior_count_follows_the_segment_scale() {
		let network = Network {
			airports: vec![airport("A", 0.0, 0.0), airport("B", 600.0, 800.0)],
			routes: vec![route(0, 1)],
		};
		let bundle = generate_segments(&network, &segments());
		let total = segments().apply(1000.0).round() as usize;
		assert_eq!(total, 10);

		assert_eq!(bundle.nodes.len(), 2 + total);
		assert_eq!(bundle.links.len(), total + 1);
		let path = &bundle.paths[0];
		assert_eq!(path.nodes.len(), total + 2);
		assert_eq!(path.nodes.first(), Some(&0));
		assert_eq!(path.nodes.last(), Some(&1));
		assert_eq!(bundle.point(path.nodes[0]), (0.0, 0.0));
		assert_eq!(bundle.point(path.nodes[total + 1]), (600.0, 800.0));
	}

	#[test]
	fn interior_points_are_evenly_spaced_and_linked_in_order() {
		let network = Network {
			airports: vec![airport("A", 0.0, 0.0), airport("B", 300.0, 0.0)],
			routes: vec![route(0, 1)],
		};
		let bundle = generate_segments(&network, &segments());
		// 1 + 9 * 0.3 = 3.7 -> 4 interior points, spaced 300 / 5.
		let points = bundle.path_points(&bundle.paths[0]);
		assert_eq!(points.len(), 6);
		for (i, &(x, y)) in points.iter().enumerate() {
			assert!((x - 60.0 * i as f64).abs() < 1e-9);
			assert_eq!(y, 0.0);
		}

		let chain = &bundle.paths[0].nodes;
		let expected: Vec<(usize, usize)> = chain.windows(2).map(|w| (w[0], w[1])).collect();
		assert_eq!(bundle.links, expected);
		assert!(bundle.nodes[2..].iter().all(|n| !n.pinned));
		assert!(bundle.nodes[..2].iter().all(|n| n.pinned));
	}

	#[test]
	fn zero_length_route_is_a_single_direct_link() {
		let network = Network {
			airports: vec![airport("A", 50.0, 50.0), airport("B", 50.0, 50.0)],
			routes: vec![route(0, 1)],
		};
		let bundle = generate_segments(&network, &segments());
		assert_eq!(bundle.nodes.len(), 2);
		assert_eq!(bundle.links, [(0, 1)]);
		assert_eq!(bundle.paths[0].nodes, [0, 1]);
	}

	#[test]
	fn scale_rounding_to_zero_still_links_endpoints() {
		let network = Network {
			airports: vec![airport("A", 0.0, 0.0), airport("B", 10.0, 0.0)],
			routes: vec![route(0, 1)],
		};
		let flat = LinearScale::new((0.0, 1000.0), (0.0, 10.0));
		let bundle = generate_segments(&network, &flat);
		assert_eq!(bundle.links, [(0, 1)]);
		assert_eq!(bundle.nodes.len(), 2);
	}

	#[test]
	fn longer_routes_get_longer_chains() {
		let network = Network {
			airports: vec![
				airport("A", 0.0, 0.0),
				airport("B", 100.0, 0.0),
				airport("C", 900.0, 0.0),
			],
			routes: vec![route(0, 1), route(0, 2)],
		};
		let bundle = generate_segments(&network, &segments());
		assert!(bundle.paths[1].nodes.len() > bundle.paths[0].nodes.len());
		assert!(bundle.paths.iter().all(|p| p.origin == 0));
	}
}
