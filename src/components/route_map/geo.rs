//! GeoJSON boundary layers projected onto the canvas.

use log::{debug, info};
use serde::Deserialize;

use super::error::Result;
use super::projection::Projection;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
	features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
	geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
	#[serde(rename = "type")]
	ty: String,
	#[serde(default)]
	coordinates: serde_json::Value,
}

/// One drawable feature. Polygon rings are closed when drawn; lines are not.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedFeature {
	pub parts: Vec<Vec<(f64, f64)>>,
	pub closed: bool,
}

pub type Layer = Vec<ProjectedFeature>;

fn coord_line(value: &serde_json::Value) -> Option<Vec<(f64, f64)>> {
	value
		.as_array()?
		.iter()
		.map(|p| {
			let p = p.as_array()?;
			Some((p.first()?.as_f64()?, p.get(1)?.as_f64()?))
		})
		.collect()
}

fn coord_lines(value: &serde_json::Value) -> Option<Vec<Vec<(f64, f64)>>> {
	value.as_array()?.iter().map(coord_line).collect()
}

/// Geographic parts of a geometry, or `None` for unsupported or malformed ones.
fn geometry_parts(geometry: &Geometry) -> Option<(Vec<Vec<(f64, f64)>>, bool)> {
	let coords = &geometry.coordinates;
	match geometry.ty.as_str() {
		"LineString" => Some((vec![coord_line(coords)?], false)),
		"MultiLineString" => Some((coord_lines(coords)?, false)),
		"Polygon" => Some((coord_lines(coords)?, true)),
		"MultiPolygon" => {
			let mut rings = Vec::new();
			for polygon in coords.as_array()? {
				rings.extend(coord_lines(polygon)?);
			}
			Some((rings, true))
		}
		_ => None,
	}
}

/// Parses a feature collection and projects it.
///
/// Features that cannot be projected are left out of the layer.
pub fn load_layer(json: &str, projection: &Projection) -> Result<Layer> {
	let collection: FeatureCollection = serde_json::from_str(json)?;
	let total = collection.features.len();

	let layer: Layer = collection
		.features
		.iter()
		.filter_map(|feature| {
			let (parts, closed) = geometry_parts(feature.geometry.as_ref()?)?;
			let parts = parts
				.iter()
				.map(|part| projection.project_line(part))
				.collect::<Option<Vec<_>>>();
			if parts.is_none() {
				debug!("skipping feature outside the projection");
			}
			Some(ProjectedFeature {
				parts: parts?,
				closed,
			})
		})
		.collect();

	info!("projected {} of {} features", layer.len(), total);
	Ok(layer)
}
