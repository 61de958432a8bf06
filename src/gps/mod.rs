// src/gps/mod.rs
//! GPS fix sources and parsing

pub mod data;
pub mod gpsd;
pub mod nmea;
pub mod replay;
pub mod request;
pub mod source;

pub use data::GpsData;
pub use request::{LocationRequest, UpdateFilter};
pub use source::{spawn_source, FixEvent, FixSource};
