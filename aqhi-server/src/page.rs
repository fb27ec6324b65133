//! Page assembly: fetch readings, draw the map, then make the QR code.
//!
//! The three steps run once per page load, strictly in that order. A
//! failure at any step stops the sequence, so a failed fetch leaves both
//! the map and the QR code unrendered.

use chrono::{DateTime, Local};
use tracing::{info, instrument};

use crate::aqhi::{AqhiError, StationSource};
use crate::map::{MapConfig, MapError, MapView, render_map};
use crate::qr::{QrError, QrImage, generate_qr};

/// Errors from any step of page assembly.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Fetching station readings failed
    #[error("could not load AQHI data: {0}")]
    Fetch(#[from] AqhiError),

    /// Building the map view failed
    #[error("could not draw map: {0}")]
    Map(#[from] MapError),

    /// Generating the QR code failed
    #[error("could not generate QR code: {0}")]
    Qr(#[from] QrError),
}

/// A fully assembled page.
#[derive(Debug, Clone)]
pub struct PageView {
    pub map: MapView,
    pub qr: QrImage,
    /// Number of readings the feed returned, placeable or not.
    pub station_count: usize,
    pub fetched_at: DateTime<Local>,
}

/// Run the fetch → map → QR sequence once.
///
/// `page_url` is encoded into the QR code verbatim.
#[instrument(skip(source, map_config))]
pub async fn build_page(
    source: &dyn StationSource,
    map_config: &MapConfig,
    page_url: &str,
) -> Result<PageView, PageError> {
    let readings = source.fetch_stations().await?;
    let fetched_at = Local::now();

    let map = render_map(map_config, &readings)?;
    let qr = generate_qr(page_url)?;

    info!(
        stations = readings.len(),
        markers = map.markers.len(),
        "assembled page"
    );

    Ok(PageView {
        map,
        qr,
        station_count: readings.len(),
        fetched_at,
    })
}

/// Run the fetch → map sequence once, without a QR code.
pub async fn build_map(
    source: &dyn StationSource,
    map_config: &MapConfig,
) -> Result<MapView, PageError> {
    let readings = source.fetch_stations().await?;
    Ok(render_map(map_config, &readings)?)
}
