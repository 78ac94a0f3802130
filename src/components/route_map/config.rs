use serde::Deserialize;

use super::projection::Projection;

/// Locations of the four inputs, relative to the page.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataUrls {
	pub basemap: String,
	pub nine_lines: String,
	pub airports: String,
	pub routes: String,
}

impl Default for DataUrls {
	fn default() -> Self {
		Self {
			basemap: "assets/data/china.geojson".into(),
			nine_lines: "assets/data/nine_lines.geojson".into(),
			airports: "assets/data/airports.csv".into(),
			routes: "assets/data/flights.csv".into(),
		}
	}
}

/// Knobs for the relaxation that curves the bundled routes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
	/// Many-body strength; positive values attract.
	pub charge_strength: f64,
	/// Pairs farther apart than this feel no charge.
	pub distance_max: f64,
	/// Fraction of a link's length closed per step at full alpha.
	pub link_strength: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	pub max_iterations: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			charge_strength: 10.0,
			distance_max: 36.0,
			link_strength: 0.7,
			alpha_decay: 0.1,
			alpha_min: 0.001,
			max_iterations: 300,
		}
	}
}

/// Everything the map needs to know before it loads any data.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
	pub width: f64,
	pub height: f64,
	/// Projection center as `(longitude, latitude)`.
	pub center: (f64, f64),
	pub scale: f64,
	pub precision: f64,
	/// Number of busiest airports kept after filtering.
	pub top_n: usize,
	pub bubble_radius: (f64, f64),
	pub segment_range: (f64, f64),
	pub layout: LayoutConfig,
	pub urls: DataUrls,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			width: 960.0,
			height: 600.0,
			center: (104.0, 35.0),
			scale: 700.0,
			precision: 0.1,
			top_n: 70,
			bubble_radius: (4.0, 18.0),
			segment_range: (1.0, 10.0),
			layout: LayoutConfig::default(),
			urls: DataUrls::default(),
		}
	}
}

impl MapConfig {
	/// Mercator projection centered on the drawing area.
	pub fn projection(&self) -> Projection {
		Projection::new(
			self.center,
			self.scale,
			(self.width / 2.0, self.height / 2.0),
			self.precision,
		)
	}

	/// Length of the drawing area's diagonal.
	pub fn hypotenuse(&self) -> f64 {
		self.width.hypot(self.height)
	}
}
