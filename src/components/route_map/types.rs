use serde::Deserialize;

/// One row of the airport table.
#[derive(Clone, Debug, Deserialize)]
pub struct AirportRecord {
	#[serde(alias = "iata")]
	pub code: String,
	pub name: String,
	pub city: String,
	#[serde(alias = "state")]
	pub region: String,
	pub longitude: f64,
	pub latitude: f64,
}

/// One row of the route table.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteRecord {
	pub origin: String,
	pub destination: String,
	pub count: u64,
}

/// An airport with its projected position and accumulated traffic.
#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
	pub code: String,
	pub name: String,
	pub city: String,
	pub region: String,
	pub longitude: f64,
	pub latitude: f64,
	/// Projected position; `None` when the coordinate could not be projected.
	pub position: Option<(f64, f64)>,
	/// Sum of route counts leaving this airport.
	pub outgoing: u64,
	/// Sum of route counts arriving here.
	pub incoming: u64,
}

impl Airport {
	/// Projected position, NaN when unprojectable.
	pub fn xy(&self) -> (f64, f64) {
		self.position.unwrap_or((f64::NAN, f64::NAN))
	}

	/// Tooltip text: `name, city, region`.
	pub fn label(&self) -> String {
		format!("{}, {}, {}", self.name, self.city, self.region)
	}
}

/// A route whose endpoints index into the airport slice it was resolved against.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
	pub origin: String,
	pub destination: String,
	pub count: u64,
	/// Index of the origin airport.
	pub source: usize,
	/// Index of the destination airport.
	pub target: usize,
}

/// Filtered airports and the routes between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Network {
	pub airports: Vec<Airport>,
	pub routes: Vec<Route>,
}
