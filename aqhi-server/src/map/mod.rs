//! Station map rendering.

mod render;
mod tier;

pub use render::{
    CircleMarker, DEFAULT_CENTER, DEFAULT_ZOOM, FILL_OPACITY, MapConfig, MapError, MapView,
    OSM_ATTRIBUTION, OSM_TILE_URL, TileLayer, format_aqhi, marker_radius, render_map,
    station_marker,
};
pub use tier::RiskTier;
