//! Map view construction.
//!
//! Turns station readings into the [`MapView`] the page hands to Leaflet:
//! a fixed viewport and tile layer, plus one circle per placeable station.

use askama::Template;
use serde::Serialize;
use tracing::trace;

use crate::aqhi::{Aqhi, StationReading};

use super::tier::RiskTier;

/// Downtown Edmonton.
pub const DEFAULT_CENTER: (f64, f64) = (53.5461, -113.4938);

pub const DEFAULT_ZOOM: u8 = 10;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Opacity of every marker's fill.
pub const FILL_OPACITY: f64 = 0.5;

/// Metres of radius per index point.
pub const METRES_PER_AQHI: f64 = 1000.0;

/// Errors from building a map view.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Popup markup failed to render
    #[error("popup template error: {0}")]
    Popup(#[from] askama::Error),
}

/// Base imagery for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    /// Leaflet URL template (`{s}`, `{z}`, `{x}`, `{y}` placeholders).
    pub url_template: String,
    /// Attribution markup shown in the map corner.
    pub attribution: String,
}

/// Fixed map settings. None of these depend on the station data.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Initial `(latitude, longitude)` of the viewport.
    pub center: (f64, f64),
    pub zoom: u8,
    pub tile_layer: TileLayer,
}

impl MapConfig {
    /// Create a config with a custom viewport and the default tile layer.
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        Self {
            center,
            zoom,
            ..Self::default()
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            tile_layer: TileLayer {
                url_template: OSM_TILE_URL.to_string(),
                attribution: OSM_ATTRIBUTION.to_string(),
            },
        }
    }
}

/// A filled circle for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub tier: RiskTier,
    /// Stroke colour.
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    /// Radius in metres.
    pub radius: f64,
    /// Markup shown when the marker is clicked.
    pub popup_html: String,
}

/// Everything the browser needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub markers: Vec<CircleMarker>,
}

/// Popup body for a station marker.
#[derive(Template)]
#[template(
    source = "<b>Site:</b> {{ site }}<br><b>AQHI:</b> {{ aqhi }}",
    ext = "html"
)]
struct PopupTemplate<'a> {
    site: &'a str,
    aqhi: String,
}

/// Format an index value the way it is shown to users.
///
/// Whole numbers drop the fractional part (`4`, not `4.0`). A reported
/// `null` is shown as `null`.
pub fn format_aqhi(value: Aqhi) -> String {
    match value {
        Aqhi::Value(v) => v.to_string(),
        Aqhi::Null => "null".to_string(),
        Aqhi::Missing => "unknown".to_string(),
    }
}

/// Marker radius in metres for an index value.
///
/// No validation: a zero or negative index yields a zero or negative
/// radius, and `null` or an absent index yields zero.
pub fn marker_radius(value: Aqhi) -> f64 {
    value.value().map_or(0.0, |v| v * METRES_PER_AQHI)
}

/// Build the marker for one reading, or `None` if it can't be placed.
pub fn station_marker(reading: &StationReading) -> Result<Option<CircleMarker>, MapError> {
    let Some((latitude, longitude)) = reading.position() else {
        trace!(site = %reading.site, "skipping station without coordinates");
        return Ok(None);
    };

    let tier = RiskTier::from_reading(reading.aqhi);
    let popup_html = PopupTemplate {
        site: &reading.site,
        aqhi: format_aqhi(reading.aqhi),
    }
    .render()?;

    Ok(Some(CircleMarker {
        latitude,
        longitude,
        tier,
        color: tier.color(),
        fill_color: tier.color(),
        fill_opacity: FILL_OPACITY,
        radius: marker_radius(reading.aqhi),
        popup_html,
    }))
}

/// Build the map view for a set of readings.
///
/// Readings missing either coordinate are skipped without error.
pub fn render_map(config: &MapConfig, readings: &[StationReading]) -> Result<MapView, MapError> {
    let mut markers = Vec::with_capacity(readings.len());
    for reading in readings {
        if let Some(marker) = station_marker(reading)? {
            markers.push(marker);
        }
    }

    Ok(MapView {
        center: config.center,
        zoom: config.zoom,
        tile_layer: config.tile_layer.clone(),
        markers,
    })
}
