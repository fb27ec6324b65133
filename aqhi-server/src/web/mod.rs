//! Web layer for the AQHI map.
//!
//! Serves the map page, a JSON view of the map markers, and static assets.

mod routes;
mod state;
pub mod templates;

pub use routes::{AppError, create_router, page_url};
pub use state::AppState;
pub use templates::*;
