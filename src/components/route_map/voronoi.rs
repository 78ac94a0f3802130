//! Planar Voronoi cells for airport catchments, clipped to the drawing area.

pub type Polygon = Vec<(f64, f64)>;

/// Computes one cell per site, in site order.
///
/// Each cell starts as the bounding rectangle and is clipped by the
/// perpendicular bisector towards every other site. Sites at identical
/// positions share a cell.
pub fn voronoi_cells(sites: &[(f64, f64)], width: f64, height: f64) -> Vec<Polygon> {
	let bounds = vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
	sites
		.iter()
		.enumerate()
		.map(|(i, &(sx, sy))| {
			let mut cell = bounds.clone();
			for (j, &(ox, oy)) in sites.iter().enumerate() {
				if i == j || (ox == sx && oy == sy) || cell.is_empty() {
					continue;
				}
				// Keep points p with (o - s) . p <= (|o|^2 - |s|^2) / 2.
				let (nx, ny) = (ox - sx, oy - sy);
				let c = (ox * ox + oy * oy - sx * sx - sy * sy) / 2.0;
				cell = clip(&cell, nx, ny, c);
			}
			cell
		})
		.collect()
}

/// Sutherland-Hodgman against the half-plane `nx * x + ny * y <= c`.
fn clip(polygon: &[(f64, f64)], nx: f64, ny: f64, c: f64) -> Polygon {
	let inside = |p: (f64, f64)| nx * p.0 + ny * p.1 <= c;
	let crossing = |a: (f64, f64), b: (f64, f64)| {
		let fa = nx * a.0 + ny * a.1 - c;
		let fb = nx * b.0 + ny * b.1 - c;
		let t = fa / (fa - fb);
		(a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
	};

	let mut out = Vec::with_capacity(polygon.len() + 1);
	for (k, &current) in polygon.iter().enumerate() {
		let previous = polygon[(k + polygon.len() - 1) % polygon.len()];
		match (inside(previous), inside(current)) {
			(true, true) => out.push(current),
			(true, false) => out.push(crossing(previous, current)),
			(false, true) => {
				out.push(crossing(previous, current));
				out.push(current);
			}
			(false, false) => {}
		}
	}
	out
}

/// Even-odd point-in-polygon test.
pub fn contains(polygon: &[(f64, f64)], (x, y): (f64, f64)) -> bool {
	let mut inside = false;
	let n = polygon.len();
	for k in 0..n {
		let (xi, yi) = polygon[k];
		let (xj, yj) = polygon[(k + n - 1) % n];
		if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
			inside = !inside;
		}
	}
	inside
}

/// Index of the first cell containing `point`.
pub fn cell_at(cells: &[Polygon], point: (f64, f64)) -> Option<usize> {
	cells.iter().position(|cell| contains(cell, point))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn area(polygon: &[(f64, f64)]) -> f64 {
		let n = polygon.len();
		(0..n)
			.map(|k| {
				let (x0, y0) = polygon[k];
				let (x1, y1) = polygon[(k + 1) % n];
				x0 * y1 - x1 * y0
			})
			.sum::<f64>()
			.abs() / 2.0
	}

	#[test]
	fn two_sites_split_the_canvas_down_the_middle() {
		let cells = voronoi_cells(&[(25.0, 50.0), (75.0, 50.0)], 100.0, 100.0);
		assert_eq!(cells.len(), 2);
		assert!((area(&cells[0]) - 5000.0).abs() < 1e-9);
		assert!((area(&cells[1]) - 5000.0).abs() < 1e-9);
		assert!(cells[0].iter().all(|p| p.0 <= 50.0 + 1e-9));
		assert!(cells[1].iter().all(|p| p.0 >= 50.0 - 1e-9));
	}

	#[test]
	fn cells_partition_the_drawing_area() {
		let sites = [(10.0, 10.0), (80.0, 20.0), (50.0, 50.0), (20.0, 90.0), (90.0, 90.0)];
		let cells = voronoi_cells(&sites, 100.0, 100.0);
		let total: f64 = cells.iter().map(|c| area(c)).sum();
		assert!((total - 10_000.0).abs() < 1e-6);

		for (i, cell) in cells.iter().enumerate() {
			assert!(contains(cell, sites[i]));
			for &(x, y) in cell {
				assert!((-1e-9..=100.0 + 1e-9).contains(&x));
				assert!((-1e-9..=100.0 + 1e-9).contains(&y));
			}
		}
	}

	#[test]
	fn hit_testing_finds_the_nearest_site() {
		let sites = [(10.0, 10.0), (90.0, 10.0), (50.0, 90.0)];
		let cells = voronoi_cells(&sites, 100.0, 100.0);
		assert_eq!(cell_at(&cells, (15.0, 20.0)), Some(0));
		assert_eq!(cell_at(&cells, (85.0, 5.0)), Some(1));
		assert_eq!(cell_at(&cells, (50.0, 80.0)), Some(2));
		assert_eq!(cell_at(&cells, (150.0, 50.0)), None);
	}

	#[test]
	fn a_single_site_owns_everything() {
		let cells = voronoi_cells(&[(30.0, 30.0)], 200.0, 100.0);
		assert!((area(&cells[0]) - 20_000.0).abs() < 1e-9);
	}
}
