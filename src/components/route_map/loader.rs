//! Airport/route table parsing, degree accumulation and filtering.

use std::collections::HashMap;

use log::info;

use super::error::{MapError, Result};
use super::projection::Projection;
use super::types::{Airport, AirportRecord, Network, Route, RouteRecord};

fn reader(text: &str) -> csv::Reader<&[u8]> {
	csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_reader(text.as_bytes())
}

/// Parses the airport table and projects every airport.
pub fn parse_airports(text: &str, projection: &Projection) -> Result<Vec<Airport>> {
	let mut airports = Vec::new();
	for record in reader(text).deserialize() {
		let record: AirportRecord = record?;
		airports.push(Airport {
			position: projection.project(record.longitude, record.latitude),
			code: record.code,
			name: record.name,
			city: record.city,
			region: record.region,
			longitude: record.longitude,
			latitude: record.latitude,
			outgoing: 0,
			incoming: 0,
		});
	}
	Ok(airports)
}

/// Parses the route table.
pub fn parse_routes(text: &str) -> Result<Vec<RouteRecord>> {
	reader(text)
		.deserialize()
		.map(|r| r.map_err(MapError::from))
		.collect()
}

fn index_by_code(airports: &[Airport]) -> HashMap<&str, usize> {
	airports
		.iter()
		.enumerate()
		.map(|(i, a)| (a.code.as_str(), i))
		.collect()
}

/// Resolves each route against `airports` and adds its count to the source's
/// outgoing and the target's incoming total.
///
/// Every route endpoint must exist in the airport table; the first unknown
/// code aborts with [`MapError::UnknownAirport`].
pub fn accumulate_degrees(airports: &mut [Airport], records: &[RouteRecord]) -> Result<Vec<Route>> {
	let routes = {
		let lookup = index_by_code(airports);
		let resolve = |code: &str| {
			lookup
				.get(code)
				.copied()
				.ok_or_else(|| MapError::UnknownAirport { code: code.to_owned() })
		};
		records
			.iter()
			.map(|record| -> Result<Route> {
				Ok(Route {
					origin: record.origin.clone(),
					destination: record.destination.clone(),
					count: record.count,
					source: resolve(&record.origin)?,
					target: resolve(&record.destination)?,
				})
			})
			.collect::<Result<Vec<_>>>()?
	};

	for route in &routes {
		airports[route.source].outgoing += route.count;
		airports[route.target].incoming += route.count;
	}
	Ok(routes)
}

/// Keeps the `top_n` busiest on-screen, connected airports and the routes
/// between them. Route indices are rewritten against the surviving airports.
pub fn filter_network(mut airports: Vec<Airport>, routes: Vec<Route>, top_n: usize) -> Network {
	let before = airports.len();
	airports.retain(|a| matches!(a.position, Some((x, y)) if x >= 0.0 && y >= 0.0));
	info!(" removed: {} airports out of bounds", before - airports.len());

	let before = airports.len();
	airports.retain(|a| a.outgoing > 0 && a.incoming > 0);
	info!(" removed: {} airports without flights", before - airports.len());

	airports.sort_by(|a, b| b.outgoing.cmp(&a.outgoing));
	let before = airports.len();
	airports.truncate(top_n);
	info!(
		" removed: {} airports with low outgoing degree",
		before - airports.len()
	);

	let before = routes.len();
	let routes: Vec<Route> = {
		let lookup = index_by_code(&airports);
		routes
			.into_iter()
			.filter_map(|route| {
				let source = *lookup.get(route.origin.as_str())?;
				let target = *lookup.get(route.destination.as_str())?;
				Some(Route {
					source,
					target,
					..route
				})
			})
			.collect()
	};
	info!(" removed: {} flights", before - routes.len());

	Network { airports, routes }
}

/// Runs the whole load pipeline over the two raw tables.
pub fn load_network(
	airports_csv: &str,
	routes_csv: &str,
	projection: &Projection,
	top_n: usize,
) -> Result<Network> {
	let mut airports = parse_airports(airports_csv, projection)?;
	let records = parse_routes(routes_csv)?;
	info!("airports: {}", airports.len());
	info!("flights: {}", records.len());

	let routes = accumulate_degrees(&mut airports, &records)?;
	Ok(filter_network(airports, routes, top_n))
}
