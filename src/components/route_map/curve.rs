//! Bundle spline: a straightened uniform B-spline through a control chain.

/// Straightening strength; 1.0 follows the control points, 0.0 is a line.
pub const BUNDLE_BETA: f64 = 0.85;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
	MoveTo(f64, f64),
	LineTo(f64, f64),
	BezierTo {
		c1: (f64, f64),
		c2: (f64, f64),
		to: (f64, f64),
	},
}

/// Converts control points into drawing commands.
///
/// Each point is first pulled towards the straight chord between the first
/// and last point by `1 - beta`, then the result is drawn as a cubic basis
/// spline that starts and ends exactly on the endpoints.
pub fn bundle_curve(points: &[(f64, f64)], beta: f64) -> Vec<PathCommand> {
	let Some((&(x0, y0), rest)) = points.split_first() else {
		return Vec::new();
	};
	if rest.is_empty() {
		return vec![PathCommand::MoveTo(x0, y0)];
	}

	let j = points.len() - 1;
	let (dx, dy) = (points[j].0 - x0, points[j].1 - y0);
	let straightened = points.iter().enumerate().map(|(i, &(x, y))| {
		let t = i as f64 / j as f64;
		(
			beta * x + (1.0 - beta) * (x0 + t * dx),
			beta * y + (1.0 - beta) * (y0 + t * dy),
		)
	});

	let mut basis = Basis::default();
	for p in straightened {
		basis.point(p);
	}
	basis.finish()
}

#[derive(Default)]
struct Basis {
	out: Vec<PathCommand>,
	p0: (f64, f64),
	p1: (f64, f64),
	seen: usize,
}

impl Basis {
	fn segment(&mut self, p: (f64, f64)) {
		let (p0, p1) = (self.p0, self.p1);
		self.out.push(PathCommand::BezierTo {
			c1: ((2.0 * p0.0 + p1.0) / 3.0, (2.0 * p0.1 + p1.1) / 3.0),
			c2: ((p0.0 + 2.0 * p1.0) / 3.0, (p0.1 + 2.0 * p1.1) / 3.0),
			to: ((p0.0 + 4.0 * p1.0 + p.0) / 6.0, (p0.1 + 4.0 * p1.1 + p.1) / 6.0),
		});
	}

	fn point(&mut self, p: (f64, f64)) {
		match self.seen {
			0 => self.out.push(PathCommand::MoveTo(p.0, p.1)),
			1 => {}
			2 => {
				let (p0, p1) = (self.p0, self.p1);
				self.out.push(PathCommand::LineTo(
					(5.0 * p0.0 + p1.0) / 6.0,
					(5.0 * p0.1 + p1.1) / 6.0,
				));
				self.segment(p);
			}
			_ => self.segment(p),
		}
		self.seen = (self.seen + 1).min(3);
		self.p0 = self.p1;
		self.p1 = p;
	}

	fn finish(mut self) -> Vec<PathCommand> {
		if self.seen == 3 {
			let p1 = self.p1;
			self.segment(p1);
		}
		if self.seen >= 2 {
			self.out.push(PathCommand::LineTo(self.p1.0, self.p1.1));
		}
		self.out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn end_point(cmd: &PathCommand) -> (f64, f64) {
		match *cmd {
			PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => (x, y),
			PathCommand::BezierTo { to, .. } => to,
		}
	}

	#[test]
	fn two_points_make_a_straight_line() {
		let cmds = bundle_curve(&[(0.0, 0.0), (10.0, 5.0)], BUNDLE_BETA);
		assert_eq!(cmds.len(), 2);
		assert_eq!(cmds[0], PathCommand::MoveTo(0.0, 0.0));
		let PathCommand::LineTo(x, y) = cmds[1] else {
			panic!("expected a line, got {:?}", cmds[1]);
		};
		assert!((x - 10.0).abs() < 1e-9 && (y - 5.0).abs() < 1e-9);
	}

	#[test]
	fn curve_starts_and_ends_on_the_endpoints() {
		let points = [(0.0, 0.0), (20.0, 30.0), (50.0, 35.0), (80.0, 10.0), (100.0, 0.0)];
		let cmds = bundle_curve(&points, BUNDLE_BETA);
		let (x, y) = end_point(&cmds[0]);
		assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
		let (x, y) = end_point(cmds.last().unwrap());
		assert!((x - 100.0).abs() < 1e-9 && y.abs() < 1e-9);
		// move, lead-in line, one segment per point after the second, closing line
		assert_eq!(cmds.len(), 1 + 1 + 3 + 1 + 1);
	}

	#[test]
	fn zero_beta_collapses_to_the_chord() {
		let points = [(0.0, 0.0), (10.0, 40.0), (20.0, -40.0), (30.0, 0.0)];
		for cmd in bundle_curve(&points, 0.0) {
			assert!(end_point(&cmd).1.abs() < 1e-9);
		}
	}

	#[test]
	fn degenerate_inputs() {
		assert!(bundle_curve(&[], BUNDLE_BETA).is_empty());
		assert_eq!(bundle_curve(&[(1.0, 2.0)], BUNDLE_BETA), [PathCommand::MoveTo(1.0, 2.0)]);
	}
}
