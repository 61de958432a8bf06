// src/gps/request.rs
//! Location update request: how often and how far apart fixes are delivered

use crate::trail::GeoPoint;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Desired update interval
pub const UPDATE_INTERVAL_MS: u64 = 10_000;
/// Fixes arriving faster than this are dropped
pub const FASTEST_INTERVAL_MS: u64 = 5_000;
/// Minimum movement between delivered fixes; zero delivers repeats
pub const SMALLEST_DISPLACEMENT_M: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub interval_ms: u64,
    pub fastest_interval_ms: u64,
    pub smallest_displacement_m: f64,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            interval_ms: UPDATE_INTERVAL_MS,
            fastest_interval_ms: FASTEST_INTERVAL_MS,
            smallest_displacement_m: SMALLEST_DISPLACEMENT_M,
        }
    }
}

impl LocationRequest {
    /// Also drop fixes closer than `meters` to the last delivered one
    pub fn with_smallest_displacement(mut self, meters: f64) -> Self {
        self.smallest_displacement_m = meters;
        self
    }

    /// Deliver every fix as soon as it arrives
    pub fn unthrottled() -> Self {
        Self {
            interval_ms: 0,
            fastest_interval_ms: 0,
            smallest_displacement_m: 0.0,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn fastest_interval(&self) -> Duration {
        Duration::from_millis(self.fastest_interval_ms)
    }
}

/// Applies a [`LocationRequest`] to a stream of raw fixes.
#[derive(Debug, Clone)]
pub struct UpdateFilter {
    request: LocationRequest,
    last_delivered: Option<(GeoPoint, Instant)>,
}

impl UpdateFilter {
    pub fn new(request: LocationRequest) -> Self {
        Self {
            request,
            last_delivered: None,
        }
    }

    /// Decide whether `fix`, observed at `now`, should be delivered. The first
    /// fix always is.
    pub fn admit(&mut self, fix: GeoPoint, now: Instant) -> bool {
        if let Some((last_point, last_time)) = self.last_delivered {
            if now.saturating_duration_since(last_time) < self.request.fastest_interval() {
                log::trace!("Dropping fix {}: faster than fastest interval", fix);
                return false;
            }
            if self.request.smallest_displacement_m > 0.0
                && last_point.distance_to(&fix) < self.request.smallest_displacement_m
            {
                log::trace!("Dropping fix {}: below minimum displacement", fix);
                return false;
            }
        }

        self.last_delivered = Some((fix, now));
        true
    }

    pub fn reset(&mut self) {
        self.last_delivered = None;
    }
}
