use thiserror::Error;

/// Fatal conditions that stop the map from drawing.
/// Everything that can stop the map from loading or drawing.
#[derive(Debug, Error)]
pub enum MapError {
	#[error("failed to parse CSV: {0}")]
	Csv(#[from] csv::Error),

	#[error("failed to parse GeoJSON: {0}")]
	Json(#[from] serde_json::Error),

	/// A route names an airport code missing from the airport table.
	#[error("route references unknown airport `{code}`")]
	UnknownAirport { code: String },

	#[error("failed to fetch {url}: {message}")]
	Fetch { url: String, message: String },

	#[error("drawing surface unavailable: {0}")]
	Surface(String),
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;
