// src/trail/mod.rs
//! Trail drawing between consecutive location fixes

pub mod point;
pub mod tracker;

pub use point::GeoPoint;
pub use tracker::{LocationTrailTracker, TrackerState, TrailUpdate};
