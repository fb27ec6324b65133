//! Alberta AQHI map server.
//!
//! Fetches current Air Quality Health Index readings for Alberta
//! monitoring stations, shows each station as a coloured circle on an
//! interactive map, and offers a QR code linking back to the page.

pub mod aqhi;
pub mod config;
pub mod map;
pub mod page;
pub mod qr;
pub mod web;
