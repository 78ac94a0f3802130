//! Flight route map: loading, bundling, relaxation and canvas rendering.

pub mod bundle;
pub mod chrome;
mod component;
pub mod config;
pub mod curve;
pub mod error;
mod fetch;
pub mod geo;
pub mod interaction;
pub mod layout;
pub mod loader;
pub mod projection;
mod render;
pub mod scale;
pub mod state;
pub mod types;
pub mod voronoi;

pub use component::RouteMapCanvas;
pub use config::{DataUrls, LayoutConfig, MapConfig};
pub use error::MapError;
pub use types::{Airport, Network, Route};
