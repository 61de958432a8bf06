// src/lib.rs
//! GPS Trail Library
//!
//! Follows a stream of location fixes and draws a trail segment between
//! every pair of consecutive fixes.

pub mod config;
pub mod error;
pub mod gps;
pub mod render;
pub mod session;
pub mod trail;

// Re-export main types for convenience
pub use error::{Result, TrailError};
pub use gps::{FixEvent, FixSource, LocationRequest};
pub use render::{RenderInstruction, RenderSink};
pub use session::{SessionOptions, SessionStats, TrailSession};
pub use trail::{GeoPoint, LocationTrailTracker, TrackerState, TrailUpdate};
