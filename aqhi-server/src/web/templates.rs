//! Askama templates for the web frontend.

use askama::Template;

use crate::page::PageView;

/// Map page with the station map and the share QR code.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// `MapView` as JSON, read by `static/map.js`.
    pub map_json: String,
    /// `<img>` markup for the QR code.
    pub qr_img: String,
    /// URL encoded in the QR code.
    pub page_url: String,
    pub station_count: usize,
    pub marker_count: usize,
    /// Local time the readings were fetched, e.g. "14:05".
    pub updated_at: String,
}

impl IndexTemplate {
    /// Build the template from an assembled page.
    pub fn from_page(page: &PageView) -> Result<Self, serde_json::Error> {
        Ok(Self {
            map_json: serde_json::to_string(&page.map)?,
            qr_img: page.qr.img_tag(),
            page_url: page.qr.payload.clone(),
            station_count: page.station_count,
            marker_count: page.map.markers.len(),
            updated_at: page.fetched_at.format("%H:%M").to_string(),
        })
    }
}

/// Error page. The message lands in the `#status` element.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}
