//! Continuous scales mapping a numeric domain onto a numeric range.

/// Maps `[d0, d1]` linearly onto `[r0, r1]`, extrapolating outside the domain.
/// Maps a domain linearly onto a range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	pub fn domain(&self) -> (f64, f64) {
		self.domain
	}

	pub fn range(&self) -> (f64, f64) {
		self.range
	}

	pub fn apply(&self, x: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		// A collapsed domain maps everything onto the middle of the range.
		let t = if d1 == d0 { 0.5 } else { (x - d0) / (d1 - d0) };
		r0 + t * (r1 - r0)
	}
}

/// Linear in the square root of the input, so areas track values.
/// Maps a domain onto a range through the square root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	domain: (f64, f64),
	inner: LinearScale,
}

impl SqrtScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self {
			domain,
			inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
		}
	}

	pub fn domain(&self) -> (f64, f64) {
		self.domain
	}

	pub fn range(&self) -> (f64, f64) {
		self.inner.range()
	}

	pub fn apply(&self, x: f64) -> f64 {
		self.inner.apply(signed_sqrt(x))
	}
}

fn signed_sqrt(x: f64) -> f64 {
	x.signum() * x.abs().sqrt()
}
