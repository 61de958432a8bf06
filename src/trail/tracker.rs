// src/trail/tracker.rs
//! Location trail tracker
//!
//! Every fix recenters the view on itself. Once a previous fix is known, a
//! segment is drawn from the new fix back to it, and the new fix then takes
//! its place. Only the immediately preceding fix is ever retained.

use super::point::GeoPoint;

/// What the caller should render after a fix has been processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailUpdate {
    /// Point to move and zoom the view to
    pub recenter: GeoPoint,
    /// `(new fix, previous fix)`, absent for the first fix
    pub segment: Option<(GeoPoint, GeoPoint)>,
}

/// Tracker state: `NoFixYet` when `last_fix` is `None`, `HasFix` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerState {
    pub last_fix: Option<GeoPoint>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition: consume the current state and a fix, return the next
    /// state together with the instructions for the renderer.
    pub fn on_fix_received(self, fix: GeoPoint) -> (TrackerState, TrailUpdate) {
        let update = TrailUpdate {
            recenter: fix,
            segment: self.last_fix.map(|previous| (fix, previous)),
        };
        let next = TrackerState { last_fix: Some(fix) };
        (next, update)
    }

    pub fn has_fix(&self) -> bool {
        self.last_fix.is_some()
    }
}

/// Stateful wrapper around [`TrackerState`] for event-driven callers.
#[derive(Debug, Clone, Default)]
pub struct LocationTrailTracker {
    state: TrackerState,
}

impl LocationTrailTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_fix_received(&mut self, fix: GeoPoint) -> TrailUpdate {
        let (next, update) = self.state.on_fix_received(fix);
        self.state = next;
        update
    }

    pub fn last_fix(&self) -> Option<GeoPoint> {
        self.state.last_fix
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Forget the previous fix; the next fix starts a new trail.
    pub fn reset(&mut self) {
        self.state = TrackerState::new();
    }
}
