//! Hover and double-click state, expressed as pure visual deltas.

use std::collections::{HashMap, HashSet};

use super::bundle::BundleGraph;

/// Which drawn elements belong to which airport.
///
/// Airports are identified by their index in the filtered network; region
/// `i` and bubble `i` both belong to airport `i`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderIndex {
	pub flights: HashMap<usize, Vec<usize>>,
}

impl RenderIndex {
	pub fn new(bundle: &BundleGraph) -> Self {
		let mut flights: HashMap<usize, Vec<usize>> = HashMap::new();
		for (i, path) in bundle.paths.iter().enumerate() {
			flights.entry(path.origin).or_default().push(i);
		}
		Self { flights }
	}

	pub fn outgoing(&self, airport: usize) -> &[usize] {
		self.flights.get(&airport).map(Vec::as_slice).unwrap_or(&[])
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
	Start,
	#[default]
	Middle,
	End,
}

impl TextAnchor {
	/// Canvas `textAlign` value.
	pub fn as_align(self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::Middle => "center",
			Self::End => "end",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub airport: usize,
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub dy: f64,
	pub anchor: TextAnchor,
}

/// Picks a text anchor that keeps a centered label of `text_width` inside
/// `[0, width]`.
pub fn tooltip_anchor(x: f64, text_width: f64, width: f64) -> TextAnchor {
	let left = x - text_width / 2.0;
	if left <= 0.0 {
		TextAnchor::Start
	} else if left + text_width >= width {
		TextAnchor::End
	} else {
		TextAnchor::Middle
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum VisualDelta {
	Bubble { airport: usize, on: bool },
	Flights { paths: Vec<usize>, on: bool },
	Outline { region: usize, on: bool },
	ShowTooltip { airport: usize },
	HideTooltip,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
	pub hovered: Option<usize>,
	pub pinned: HashSet<usize>,
}

impl InteractionState {
	/// Pointer entered `region`. Leaves the previous region first.
	pub fn hover(&mut self, region: usize, index: &RenderIndex) -> Vec<VisualDelta> {
		if self.hovered == Some(region) {
			return Vec::new();
		}
		let mut deltas = self.leave(index);
		self.hovered = Some(region);
		deltas.extend([
			VisualDelta::Bubble { airport: region, on: true },
			VisualDelta::Flights {
				paths: index.outgoing(region).to_vec(),
				on: true,
			},
			VisualDelta::ShowTooltip { airport: region },
		]);
		deltas
	}

	/// Pointer left whatever region it was over.
	pub fn leave(&mut self, index: &RenderIndex) -> Vec<VisualDelta> {
		let Some(region) = self.hovered.take() else {
			return Vec::new();
		};
		vec![
			VisualDelta::Bubble { airport: region, on: false },
			VisualDelta::Flights {
				paths: index.outgoing(region).to_vec(),
				on: false,
			},
			VisualDelta::HideTooltip,
		]
	}

	/// Flips the persistent outline of `region` only.
	pub fn toggle_pin(&mut self, region: usize) -> Vec<VisualDelta> {
		let on = !self.pinned.remove(&region);
		if on {
			self.pinned.insert(region);
		}
		vec![VisualDelta::Outline { region, on }]
	}
}

/// Highlight flags the renderer draws from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlights {
	pub bubbles: HashSet<usize>,
	pub flights: HashSet<usize>,
	pub outlines: HashSet<usize>,
	pub tooltip: Option<usize>,
}

impl Highlights {
	pub fn apply(&mut self, deltas: impl IntoIterator<Item = VisualDelta>) {
		fn set(target: &mut HashSet<usize>, id: usize, on: bool) {
			if on {
				target.insert(id);
			} else {
				target.remove(&id);
			}
		}
		for delta in deltas {
			match delta {
				VisualDelta::Bubble { airport, on } => set(&mut self.bubbles, airport, on),
				VisualDelta::Flights { paths, on } => {
					for path in paths {
						set(&mut self.flights, path, on);
					}
				}
				VisualDelta::Outline { region, on } => set(&mut self.outlines, region, on),
				VisualDelta::ShowTooltip { airport } => self.tooltip = Some(airport),
				VisualDelta::HideTooltip => self.tooltip = None,
			}
		}
	}
}
