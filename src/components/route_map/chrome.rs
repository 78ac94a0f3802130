//! Geometry for the map furniture: north arrow, scale bar and legend.

use super::projection::Projection;
use super::scale::SqrtScale;

/// Distances labelled on the scale bar, in kilometres.
pub const SCALE_TICKS_KM: [f64; 3] = [0.0, 500.0, 1000.0];
pub const SCALE_BAR_HEIGHT: f64 = 8.0;
const MARGIN: f64 = 20.0;

/// Arrow outline (tip, right foot, notch, left foot) around `origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct NorthArrow {
	pub origin: (f64, f64),
	pub outline: [(f64, f64); 4],
	/// The filled right half: tip, right foot, notch.
	pub shaded: [(f64, f64); 3],
	pub label: (f64, f64),
}

pub fn north_arrow(width: f64) -> NorthArrow {
	let (height, base, dip) = (30.0, 20.0, 10.0);
	let top = (0.0, 0.0);
	let left = (-base / 2.0, height);
	let right = (base / 2.0, height);
	let notch = (0.0, height - dip);
	NorthArrow {
		origin: (width - 50.0, 50.0),
		outline: [top, right, notch, left],
		shaded: [top, right, notch],
		label: (0.0, -12.0),
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSegment {
	pub x: f64,
	pub width: f64,
	pub filled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBar {
	pub origin: (f64, f64),
	pub segments: Vec<ScaleSegment>,
	/// Tick position and text, left to right.
	pub labels: Vec<(f64, String)>,
}

/// Alternating black/white bar whose tick spacing follows the projection's
/// ground resolution at its reference latitude. Right-aligned near the
/// bottom-right corner.
pub fn scale_bar(projection: &Projection, width: f64, height: f64) -> ScaleBar {
	let km_per_pixel = projection.km_per_pixel();
	let ticks: Vec<f64> = SCALE_TICKS_KM.iter().map(|km| km / km_per_pixel).collect();
	let length = ticks.last().copied().unwrap_or_default();

	let segments = ticks
		.windows(2)
		.enumerate()
		.map(|(i, w)| ScaleSegment {
			x: w[0],
			width: w[1] - w[0],
			filled: i % 2 == 0,
		})
		.collect();

	let last = SCALE_TICKS_KM.len() - 1;
	let labels = SCALE_TICKS_KM
		.iter()
		.zip(&ticks)
		.enumerate()
		.map(|(i, (km, &x))| {
			let text = if i == last { format!("{km} km") } else { format!("{km}") };
			(x, text)
		})
		.collect();

	ScaleBar {
		origin: (width - MARGIN - length - 10.0, height - 40.0),
		segments,
		labels,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendBubble {
	pub center: (f64, f64),
	pub radius: f64,
	pub label: String,
}

/// Legend content in absolute canvas coordinates, anchored bottom-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
	pub airport_title: (f64, f64),
	pub bubbles: Vec<LegendBubble>,
	pub route_title: (f64, f64),
	/// Sample stroke from `route_line.0` to `route_line.1`.
	pub route_line: ((f64, f64), (f64, f64)),
	pub route_label: (f64, f64),
	pub height: f64,
}

pub const AIRPORT_LEGEND_TITLE: &str = "Airports (outgoing flights)";
pub const ROUTE_LEGEND_TITLE: &str = "Routes";
pub const ROUTE_LEGEND_LABEL: &str = "Flight path";

pub fn legend(bubbles: &SqrtScale, height: f64) -> Legend {
	let (min, max) = bubbles.domain();
	let mid = (min + max) / 2.0;
	let entries = [
		(min, format!("Few departures ({})", min.round())),
		(mid, format!("Some departures ({})", mid.round())),
		(max, format!("Many departures ({})", max.round())),
	];
	let max_radius = entries
		.iter()
		.map(|(v, _)| bubbles.apply(*v))
		.fold(0.0, f64::max);

	// Laid out top-down from a local origin, then shifted into place.
	let mut y = 10.0;
	let airport_title = (0.0, y);
	y += 5.0;
	let mut items = Vec::with_capacity(entries.len());
	for (value, label) in entries {
		items.push(LegendBubble {
			center: (max_radius, y + max_radius),
			radius: bubbles.apply(value),
			label,
		});
		y += max_radius * 2.0 + 5.0;
	}
	y += 15.0;
	let route_title = (0.0, y);
	y += 20.0;
	let route_line = ((0.0, y), (30.0, y));
	let route_label = (40.0, y);

	// Title text ascends roughly a line above its baseline.
	let top = -5.0;
	let legend_height = y + 7.0 - top;
	let dy = height - legend_height - MARGIN - top;
	let shift = |(x, y): (f64, f64)| (x + MARGIN, y + dy);

	Legend {
		airport_title: shift(airport_title),
		bubbles: items
			.into_iter()
			.map(|b| LegendBubble {
				center: shift(b.center),
				..b
			})
			.collect(),
		route_title: shift(route_title),
		route_line: (shift(route_line.0), shift(route_line.1)),
		route_label: shift(route_label),
		height: legend_height,
	}
}
