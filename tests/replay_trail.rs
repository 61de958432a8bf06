// tests/replay_trail.rs
//! Replay a recorded log through a session into the JSON sink

use gps_trail::{
    gps::{spawn_source, FixSource, LocationRequest},
    render::json::JsonSink,
    GeoPoint, RenderInstruction, SessionOptions, TrailSession,
};
use std::{
    path::PathBuf,
    sync::{atomic::AtomicBool, Arc},
    time::Duration,
};

const DRIVE: &str = "\
# three fixes heading north-west
$GPGGA,120000,3700.000,N,12200.000,W,1,08,0.9,10.0,M,0.0,M,,*56
$GPGSV,1,1,01,01,40,083,46*44
$GPGGA,120005,3706.000,N,12206.000,W,1,08,0.9,10.0,M,0.0,M,,*53
$GPGGA,120010,3712.000,N,12212.000,W,1,08,0.9,10.0,M,0.0,M,,*57
";

fn write_log(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gps-trail-{}-{}.nmea", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn read_instructions(output: Vec<u8>) -> Vec<RenderInstruction> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_replay_draws_one_segment_per_consecutive_pair() {
    let path = write_log("drive", DRIVE);
    let running = Arc::new(AtomicBool::new(true));
    let source = FixSource::Replay { path: path.clone(), pace: Some(Duration::ZERO) };

    let events = spawn_source(source, LocationRequest::default(), Arc::clone(&running))
        .await
        .unwrap();
    let mut session = TrailSession::new(JsonSink::new(Vec::new()), SessionOptions::default());
    let stats = session.run(events, running).await.unwrap();

    assert_eq!(stats.fixes, 3);
    assert_eq!(stats.segments_drawn, 2);

    let instructions = read_instructions(session.into_sink().into_inner());
    let segments: Vec<(GeoPoint, GeoPoint)> = instructions
        .iter()
        .filter_map(|i| match i {
            RenderInstruction::DrawSegment { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    let recenters = instructions
        .iter()
        .filter(|i| matches!(i, RenderInstruction::Recenter { .. }))
        .count();
    let notices = instructions
        .iter()
        .filter(|i| matches!(i, RenderInstruction::Notify { .. }))
        .count();

    assert_eq!(recenters, 3);
    // the seeded last-known fix is not announced
    assert_eq!(notices, 2);
    assert_eq!(segments.len(), 2);

    let (from, to) = segments[0];
    assert!((from.latitude - 37.1).abs() < 1e-9 && (from.longitude + 122.1).abs() < 1e-9);
    assert!((to.latitude - 37.0).abs() < 1e-9 && (to.longitude + 122.0).abs() < 1e-9);
    assert_eq!(segments[1].1, segments[0].0);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_single_fix_draws_no_segment() {
    let path = write_log(
        "single",
        "$GPGGA,120000,3700.000,N,12200.000,W,1,08,0.9,10.0,M,0.0,M,,*56\n",
    );
    let running = Arc::new(AtomicBool::new(true));
    let source = FixSource::Replay { path: path.clone(), pace: Some(Duration::ZERO) };

    let events = spawn_source(source, LocationRequest::unthrottled(), Arc::clone(&running))
        .await
        .unwrap();
    let mut session = TrailSession::new(JsonSink::new(Vec::new()), SessionOptions::default());
    let stats = session.run(events, running).await.unwrap();

    assert_eq!(stats.fixes, 1);
    assert_eq!(stats.segments_drawn, 0);
    // disconnect at end of log clears the trail
    assert_eq!(session.last_fix(), None);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_repeated_fix_draws_zero_length_segment_with_default_request() {
    let path = write_log(
        "repeat",
        concat!(
            "$GPGGA,120000,3700.000,N,12200.000,W,1,08,0.9,10.0,M,0.0,M,,*56\n",
            "$GPGGA,120000,3700.000,N,12200.000,W,1,08,0.9,10.0,M,0.0,M,,*56\n",
        ),
    );
    let running = Arc::new(AtomicBool::new(true));
    let source = FixSource::Replay { path: path.clone(), pace: Some(Duration::ZERO) };

    let events = spawn_source(source, LocationRequest::default(), Arc::clone(&running))
        .await
        .unwrap();
    let mut session = TrailSession::new(JsonSink::new(Vec::new()), SessionOptions::default());
    let stats = session.run(events, running).await.unwrap();

    assert_eq!(stats.fixes, 2);
    assert_eq!(stats.segments_drawn, 1);

    let instructions = read_instructions(session.into_sink().into_inner());
    let same = GeoPoint::new(37.0, -122.0);
    assert!(instructions.contains(&RenderInstruction::DrawSegment { from: same, to: same }));

    let _ = std::fs::remove_file(path);
}
