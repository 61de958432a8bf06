// src/session.rs
//! Trail session: feeds fix events through the tracker into a render sink

use crate::{
    error::Result,
    gps::FixEvent,
    render::{RenderInstruction, RenderSink, DEFAULT_ZOOM},
    trail::{GeoPoint, LocationTrailTracker, TrailUpdate},
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::mpsc, time::timeout};

pub const LOCATION_CHANGED_MESSAGE: &str = "Location Changed";

const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub fixes: usize,
    pub segments_drawn: usize,
    /// Updates the sink could not show because it was not ready
    pub skipped_renders: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub zoom: f32,
    pub notify_on_fix: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            notify_on_fix: true,
        }
    }
}

/// Owns the tracker and the sink it draws into.
pub struct TrailSession<S: RenderSink> {
    tracker: LocationTrailTracker,
    sink: S,
    options: SessionOptions,
    stats: SessionStats,
}

impl<S: RenderSink> TrailSession<S> {
    pub fn new(sink: S, options: SessionOptions) -> Self {
        Self {
            tracker: LocationTrailTracker::new(),
            sink,
            options,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn last_fix(&self) -> Option<GeoPoint> {
        self.tracker.last_fix()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// React to one event from the fix source.
    pub fn handle_event(&mut self, event: FixEvent) -> Result<Option<TrailUpdate>> {
        match event {
            FixEvent::Connected { last_known } => {
                log::info!("Source connected, getting last location...");
                match last_known {
                    Some(fix) => self.process_fix(fix).map(Some),
                    None => {
                        log::info!("No last known location");
                        Ok(None)
                    }
                }
            }
            FixEvent::Fix(fix) => {
                if self.options.notify_on_fix {
                    self.sink.apply(RenderInstruction::Notify {
                        message: LOCATION_CHANGED_MESSAGE.to_string(),
                    })?;
                }
                self.process_fix(fix).map(Some)
            }
            FixEvent::Disconnected => {
                log::info!("Source disconnected after {} fixes", self.stats.fixes);
                self.tracker.reset();
                Ok(None)
            }
        }
    }

    /// The tracker always advances; the sink only hears about it when ready.
    fn process_fix(&mut self, fix: GeoPoint) -> Result<TrailUpdate> {
        let update = self.tracker.on_fix_received(fix);
        self.stats.fixes += 1;

        if let Some((current, previous)) = update.segment {
            log::debug!("Current {} last {}", current, previous);
        }

        if !self.sink.is_ready() {
            log::debug!("Renderer not ready, skipping draw for {}", fix);
            self.stats.skipped_renders += 1;
            return Ok(update);
        }

        self.sink.apply(RenderInstruction::Recenter {
            point: update.recenter,
            zoom: self.options.zoom,
        })?;

        if let Some((from, to)) = update.segment {
            self.sink.apply(RenderInstruction::DrawSegment { from, to })?;
            self.stats.segments_drawn += 1;
        }

        Ok(update)
    }

    /// Drain events until the source closes the channel or `running` clears.
    pub async fn run(
        &mut self,
        mut events: mpsc::Receiver<FixEvent>,
        running: Arc<AtomicBool>,
    ) -> Result<SessionStats> {
        while running.load(Ordering::Relaxed) {
            match timeout(SHUTDOWN_POLL, events.recv()).await {
                Ok(Some(event)) => {
                    self.handle_event(event)?;
                }
                Ok(None) => break,
                Err(_) => continue, // re-check the running flag
            }
        }
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records instructions; readiness can be toggled.
    #[derive(Default)]
    struct RecordingSink {
        ready: bool,
        applied: Vec<RenderInstruction>,
    }

    impl RecordingSink {
        fn ready() -> Self {
            Self { ready: true, applied: Vec::new() }
        }

        fn segments(&self) -> Vec<(GeoPoint, GeoPoint)> {
            self.applied
                .iter()
                .filter_map(|i| match i {
                    RenderInstruction::DrawSegment { from, to } => Some((*from, *to)),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSink for RecordingSink {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn apply(&mut self, instruction: RenderInstruction) -> Result<()> {
            self.applied.push(instruction);
            Ok(())
        }
    }

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon)
    }

    fn quiet() -> SessionOptions {
        SessionOptions { notify_on_fix: false, ..SessionOptions::default() }
    }

    #[test]
    fn test_first_and_second_fix() {
        let mut session = TrailSession::new(RecordingSink::ready(), quiet());

        session.handle_event(FixEvent::Fix(p(37.0, -122.0))).unwrap();
        session.handle_event(FixEvent::Fix(p(37.1, -122.1))).unwrap();

        assert_eq!(
            session.sink().applied,
            vec![
                RenderInstruction::Recenter { point: p(37.0, -122.0), zoom: 15.0 },
                RenderInstruction::Recenter { point: p(37.1, -122.1), zoom: 15.0 },
                RenderInstruction::DrawSegment { from: p(37.1, -122.1), to: p(37.0, -122.0) },
            ]
        );
        assert_eq!(session.stats().segments_drawn, 1);
    }

    #[test]
    fn test_last_known_fix_seeds_trail_without_notice() {
        let mut session = TrailSession::new(RecordingSink::ready(), SessionOptions::default());

        let update = session
            .handle_event(FixEvent::Connected { last_known: Some(p(1.0, 1.0)) })
            .unwrap()
            .unwrap();
        assert_eq!(update.segment, None);

        session.handle_event(FixEvent::Fix(p(2.0, 2.0))).unwrap();

        let applied = &session.sink().applied;
        assert_eq!(applied[0], RenderInstruction::Recenter { point: p(1.0, 1.0), zoom: 15.0 });
        assert_eq!(
            applied[1],
            RenderInstruction::Notify { message: "Location Changed".to_string() }
        );
        assert_eq!(session.sink().segments(), vec![(p(2.0, 2.0), p(1.0, 1.0))]);
    }

    #[test]
    fn test_connect_without_last_known_draws_nothing() {
        let mut session = TrailSession::new(RecordingSink::ready(), quiet());

        let update = session.handle_event(FixEvent::Connected { last_known: None }).unwrap();

        assert_eq!(update, None);
        assert!(session.sink().applied.is_empty());
        assert_eq!(session.last_fix(), None);
    }

    #[test]
    fn test_not_ready_sink_still_advances_state() {
        let mut session = TrailSession::new(RecordingSink::default(), quiet());

        session.handle_event(FixEvent::Fix(p(5.0, 5.0))).unwrap();
        assert!(session.sink().applied.is_empty());
        assert_eq!(session.last_fix(), Some(p(5.0, 5.0)));

        session.sink_mut().ready = true;
        session.handle_event(FixEvent::Fix(p(6.0, 6.0))).unwrap();

        assert_eq!(session.sink().segments(), vec![(p(6.0, 6.0), p(5.0, 5.0))]);
        assert_eq!(session.stats().skipped_renders, 1);
    }

    #[test]
    fn test_disconnect_resets_trail() {
        let mut session = TrailSession::new(RecordingSink::ready(), quiet());

        session.handle_event(FixEvent::Fix(p(1.0, 1.0))).unwrap();
        session.handle_event(FixEvent::Disconnected).unwrap();
        assert_eq!(session.last_fix(), None);

        let update = session.handle_event(FixEvent::Fix(p(2.0, 2.0))).unwrap().unwrap();
        assert_eq!(update.segment, None);
        assert!(session.sink().segments().is_empty());
    }

    #[test]
    fn test_repeated_fix_draws_zero_length_segment() {
        let mut session = TrailSession::new(RecordingSink::ready(), quiet());

        session.handle_event(FixEvent::Fix(p(3.0, 3.0))).unwrap();
        session.handle_event(FixEvent::Fix(p(3.0, 3.0))).unwrap();

        assert_eq!(session.sink().segments(), vec![(p(3.0, 3.0), p(3.0, 3.0))]);
    }

    #[tokio::test]
    async fn test_run_drains_channel() {
        let (tx, rx) = mpsc::channel(16);
        let running = Arc::new(AtomicBool::new(true));
        let points: Vec<GeoPoint> = (0..5).map(|i| p(i as f64, i as f64)).collect();

        tx.send(FixEvent::Connected { last_known: None }).await.unwrap();
        for &point in &points {
            tx.send(FixEvent::Fix(point)).await.unwrap();
        }
        tx.send(FixEvent::Disconnected).await.unwrap();
        drop(tx);

        let mut session = TrailSession::new(RecordingSink::ready(), quiet());
        let stats = session.run(rx, running).await.unwrap();

        assert_eq!(stats.fixes, 5);
        assert_eq!(stats.segments_drawn, 4);
        let segments = session.sink().segments();
        for (i, (from, to)) in segments.iter().enumerate() {
            assert_eq!(*from, points[i + 1]);
            assert_eq!(*to, points[i]);
        }
    }

    #[tokio::test]
    async fn test_run_stops_when_not_running() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(FixEvent::Fix(p(1.0, 1.0))).await.unwrap();
        let running = Arc::new(AtomicBool::new(false));

        let mut session = TrailSession::new(RecordingSink::ready(), quiet());
        let stats = session.run(rx, running).await.unwrap();

        assert_eq!(stats.fixes, 0);
    }
}
