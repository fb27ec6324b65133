//! Alberta AQHI OData client.
//!
//! Fetches the current Air Quality Health Index readings for every
//! Alberta monitoring station in a single request. The endpoint returns
//! an OData envelope whose `value` array holds one entry per station.

mod client;
mod error;
mod types;

pub use client::{AqhiClient, AqhiConfig, DEFAULT_ENDPOINT, StationSource};
pub use error::AqhiError;
pub use types::{Aqhi, ODataResponse, StationReading};
