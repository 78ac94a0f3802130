use log::info;

use super::bundle::{self, BundleGraph};
use super::config::MapConfig;
use super::curve::{self, PathCommand};
use super::geo::Layer;
use super::interaction::{
	Highlights, InteractionState, RenderIndex, Tooltip, VisualDelta, tooltip_anchor,
};
use super::layout::{LayoutEvent, Relaxation};
use super::projection::Projection;
use super::scale::{LinearScale, SqrtScale};
use super::types::Network;
use super::voronoi::{self, Polygon};

/// Everything derived from the filtered airport network.
pub struct FlightLayer {
	pub network: Network,
	pub bubbles: SqrtScale,
	pub bundle: BundleGraph,
	pub layout: Relaxation,
	pub regions: Vec<Polygon>,
	pub index: RenderIndex,
	pub curves: Vec<Vec<PathCommand>>,
}

impl FlightLayer {
	/// Derives bubbles, regions, the bundle graph and its layout from `network`.
	pub fn new(network: Network, config: &MapConfig) -> Self {
		let extent = network
			.airports
			.iter()
			.map(|a| a.outgoing as f64)
			.fold(None, |acc: Option<(f64, f64)>, v| {
				Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
			})
			.unwrap_or((0.0, 0.0));
		let bubbles = SqrtScale::new(extent, config.bubble_radius);

		let sites: Vec<(f64, f64)> = network.airports.iter().map(|a| a.xy()).collect();
		let regions = voronoi::voronoi_cells(&sites, config.width, config.height);

		let segments = LinearScale::new((0.0, config.hypotenuse()), config.segment_range);
		let bundle = bundle::generate_segments(&network, &segments);
		info!(
			"bundled {} routes into {} nodes and {} links",
			bundle.paths.len(),
			bundle.nodes.len(),
			bundle.links.len()
		);
		let layout = Relaxation::new(&bundle, &config.layout);
		let index = RenderIndex::new(&bundle);

		let mut layer = Self {
			network,
			bubbles,
			bundle,
			layout,
			regions,
			index,
			curves: Vec::new(),
		};
		layer.recompute_curves();
		layer
	}

	/// Refits every route's curve to the current control points.
	pub fn recompute_curves(&mut self) {
		self.curves = self
			.bundle
			.paths
			.iter()
			.map(|path| curve::bundle_curve(&self.bundle.path_points(path), curve::BUNDLE_BETA))
			.collect();
	}

	pub fn bubble_radius(&self, airport: usize) -> f64 {
		self.bubbles.apply(self.network.airports[airport].outgoing as f64)
	}
}

/// All map state owned by the canvas component.
pub struct RouteMapState {
	pub config: MapConfig,
	pub projection: Projection,
	pub basemap: Layer,
	pub nine_lines: Layer,
	pub flights: Option<FlightLayer>,
	pub interaction: InteractionState,
	pub highlights: Highlights,
	pub width: f64,
	pub height: f64,
}

impl RouteMapState {
	/// Empty map; layers and flights arrive as their data loads.
	pub fn new(config: MapConfig) -> Self {
		Self {
			projection: config.projection(),
			width: config.width,
			height: config.height,
			config,
			basemap: Layer::new(),
			nine_lines: Layer::new(),
			flights: None,
			interaction: InteractionState::default(),
			highlights: Highlights::default(),
		}
	}

	/// Replaces the flight layer and clears any highlight.
	pub fn set_network(&mut self, network: Network) {
		self.interaction = InteractionState::default();
		self.highlights = Highlights::default();
		self.flights = Some(FlightLayer::new(network, &self.config));
	}

	/// One relaxation step, if the layout is still running.
	pub fn tick(&mut self) -> Option<LayoutEvent> {
		let flights = self.flights.as_mut()?;
		let event = flights.layout.step(&mut flights.bundle);
		if event.is_some() || flights.layout.is_running() {
			flights.recompute_curves();
		}
		event
	}

	/// Index of the airport whose region contains `(x, y)`.
	pub fn region_at(&self, x: f64, y: f64) -> Option<usize> {
		voronoi::cell_at(&self.flights.as_ref()?.regions, (x, y))
	}

	fn apply(&mut self, deltas: Vec<VisualDelta>) {
		self.highlights.apply(deltas);
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		let Some(flights) = &self.flights else {
			return;
		};
		let deltas = match self.region_at(x, y) {
			Some(region) => self.interaction.hover(region, &flights.index),
			None => self.interaction.leave(&flights.index),
		};
		self.apply(deltas);
	}

	pub fn pointer_left(&mut self) {
		if let Some(flights) = &self.flights {
			let deltas = self.interaction.leave(&flights.index);
			self.apply(deltas);
		}
	}

	pub fn double_clicked(&mut self, x: f64, y: f64) {
		if let Some(region) = self.region_at(x, y) {
			let deltas = self.interaction.toggle_pin(region);
			self.apply(deltas);
		}
	}

	/// Tooltip for the highlighted airport, given the rendered width of its text.
	pub fn tooltip(&self, text_width: impl Fn(&str) -> f64) -> Option<Tooltip> {
		let airport = self.highlights.tooltip?;
		let flights = self.flights.as_ref()?;
		let record = flights.network.airports.get(airport)?;
		let text = record.label();
		let (x, y) = record.xy();
		Some(Tooltip {
			airport,
			anchor: tooltip_anchor(x, text_width(&text), self.width),
			dy: -flights.bubble_radius(airport) - 4.0,
			text,
			x,
			y,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::route_map::layout::LayoutStatus;
	use crate::components::route_map::types::{Airport, Route};

	fn network() -> Network {
		let config = MapConfig::default();
		let projection = config.projection();
		let airport = |code: &str, lon: f64, lat: f64, outgoing: u64| Airport {
			code: code.into(),
			name: format!("{code} Airport"),
			city: format!("{code} City"),
			region: "Region".into(),
			longitude: lon,
			latitude: lat,
			position: projection.project(lon, lat),
			outgoing,
			incoming: 1,
		};
		let route = |source: usize, target: usize| Route {
			origin: String::new(),
			destination: String::new(),
			count: 1,
			source,
			target,
		};
		Network {
			airports: vec![
				airport("PEK", 116.58, 40.08, 9),
				airport("PVG", 121.80, 31.14, 4),
				airport("CAN", 113.30, 23.39, 1),
			],
			routes: vec![route(0, 1), route(0, 2), route(1, 0), route(2, 1)],
		}
	}

	fn loaded() -> RouteMapState {
		let mut state = RouteMapState::new(MapConfig::default());
		state.set_network(network());
		state
	}

	#[test]
	fn flight_layer_derives_everything_from_the_network() {
		let state = loaded();
		let flights = state.flights.as_ref().unwrap();
		assert_eq!(flights.regions.len(), 3);
		assert_eq!(flights.curves.len(), 4);
		assert_eq!(flights.bubbles.domain(), (1.0, 9.0));
		assert!((flights.bubble_radius(0) - 18.0).abs() < 1e-9);
		assert!((flights.bubble_radius(2) - 4.0).abs() < 1e-9);
		assert_eq!(flights.index.outgoing(0), [0, 1]);
	}

	#[test]
	fn ticking_runs_the_layout_to_completion() {
		let mut state = loaded();
		let mut events = Vec::new();
		for _ in 0..500 {
			events.extend(state.tick());
		}
		assert_eq!(events, [LayoutEvent::Finished(LayoutStatus::Converged)]);
		let flights = state.flights.as_ref().unwrap();
		assert!(!flights.layout.is_running());
		for (i, airport) in flights.network.airports.iter().enumerate() {
			assert_eq!(flights.bundle.point(i), airport.xy());
		}
	}

	#[test]
	fn hovering_an_airport_shows_its_tooltip() {
		let mut state = loaded();
		let (x, y) = state.flights.as_ref().unwrap().network.airports[0].xy();
		state.pointer_moved(x + 1.0, y + 1.0);

		assert!(state.highlights.bubbles.contains(&0));
		assert_eq!(state.highlights.flights.len(), 2);
		let tooltip = state.tooltip(|_| 80.0).unwrap();
		assert_eq!(tooltip.text, "PEK Airport, PEK City, Region");
		assert_eq!(tooltip.dy, -22.0);
		assert_eq!((tooltip.x, tooltip.y), (x, y));

		state.pointer_left();
		assert!(state.tooltip(|_| 80.0).is_none());
		assert!(state.highlights.flights.is_empty());
	}

	#[test]
	fn double_click_pins_the_region_under_the_pointer() {
		let mut state = loaded();
		let (x, y) = state.flights.as_ref().unwrap().network.airports[2].xy();
		state.double_clicked(x, y);
		assert!(state.highlights.outlines.contains(&2));
		state.double_clicked(x, y);
		assert!(state.highlights.outlines.is_empty());
	}

	#[test]
	fn interaction_before_data_arrives_is_ignored() {
		let mut state = RouteMapState::new(MapConfig::default());
		state.pointer_moved(10.0, 10.0);
		state.double_clicked(10.0, 10.0);
		assert_eq!(state.tick(), None);
		assert_eq!(state.highlights, Highlights::default());
	}
}
