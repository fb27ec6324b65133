//! Application state for the web layer.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::aqhi::StationSource;
use crate::map::MapConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Where station readings come from
    pub source: Arc<dyn StationSource>,

    /// Fixed map viewport and tile layer
    pub map: Arc<MapConfig>,

    /// Public base URL for QR payloads, if the server sits behind a proxy
    pub public_url: Option<Arc<str>>,

    /// Address the server is bound to; last-resort host for page URLs
    pub bind_addr: SocketAddr,
}

impl AppState {
    /// Create a new app state.
    pub fn new(source: impl StationSource + 'static, map: MapConfig, bind_addr: SocketAddr) -> Self {
        Self {
            source: Arc::new(source),
            map: Arc::new(map),
            public_url: None,
            bind_addr,
        }
    }

    /// Use a fixed public base URL (e.g. `https://aqhi.example.org`).
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.public_url = Some(Arc::from(url.trim_end_matches('/')));
        self
    }
}
