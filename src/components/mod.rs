//! Reusable view components.

pub mod route_map;
