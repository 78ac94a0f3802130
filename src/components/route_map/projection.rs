use std::f64::consts::FRAC_PI_4;

/// Latitude where a square Mercator world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Mercator projection fixed at startup: geographic degrees in, canvas pixels out.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
	center: (f64, f64),
	scale: f64,
	translate: (f64, f64),
	precision: f64,
	center_y: f64,
}

impl Projection {
	pub fn new(center: (f64, f64), scale: f64, translate: (f64, f64), precision: f64) -> Self {
		Self {
			center,
			scale,
			translate,
			precision,
			center_y: mercator_y(center.1),
		}
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	/// Projects `(longitude, latitude)`, or `None` outside the valid domain.
	pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
		if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > MAX_LATITUDE {
			return None;
		}
		let x = self.translate.0 + self.scale * (lon - self.center.0).to_radians();
		let y = self.translate.1 - self.scale * (mercator_y(lat) - self.center_y);
		Some((x, y))
	}

	/// Projects a ring or polyline. Fails as a whole if any vertex fails.
	///
	/// Consecutive vertices that land within `precision` pixels of the last
	/// kept vertex are dropped; the final vertex is always kept.
	pub fn project_line(&self, coords: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
		let mut out: Vec<(f64, f64)> = Vec::with_capacity(coords.len());
		for (i, &(lon, lat)) in coords.iter().enumerate() {
			let p = self.project(lon, lat)?;
			let last = i + 1 == coords.len();
			match out.last() {
				Some(&(px, py)) if !last && (p.0 - px).hypot(p.1 - py) < self.precision => {}
				_ => out.push(p),
			}
		}
		Some(out)
	}

	/// Ground kilometres covered by one pixel at the reference latitude.
	///
	/// Mercator stretches by `1 / cos(lat)`, so the ground distance per pixel
	/// is `R * cos(lat) / scale`. A common shortcut divides by the cosine
	/// instead, which draws the 1000 km bar at roughly 90 px rather than 134.
	pub fn km_per_pixel(&self) -> f64 {
		const EARTH_RADIUS_M: f64 = 6_378_137.0;
		EARTH_RADIUS_M * self.center.1.to_radians().cos() / self.scale / 1000.0
	}
}

fn mercator_y(lat: f64) -> f64 {
	(FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}
