// src/gps/replay.rs
//! Replay of recorded fix logs
//!
//! A log holds one NMEA sentence or gpsd JSON object per line. Blank lines
//! and lines starting with `#` are skipped. The first fix in the file is
//! reported as the source's last known fix on connect.

use super::{
    data::GpsData,
    request::{LocationRequest, UpdateFilter},
    source::{parse_line, FixEvent, LineFormat},
};
use crate::error::{Result, TrailError};
use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::sleep,
};

pub async fn open_replay(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .await
        .map_err(|e| TrailError::Connection(format!("Failed to open replay file {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

/// Stream a recorded log.
///
/// Fixes are spaced `pace` apart in wall time, or by the request interval
/// when no pace is given. The update filter always sees them one request
/// interval apart, so a fast replay is filtered like a live session.
pub async fn run_replay<R>(
    reader: R,
    pace: Option<Duration>,
    tx: mpsc::Sender<FixEvent>,
    request: LocationRequest,
    running: Arc<AtomicBool>,
) where
    R: AsyncBufRead + Unpin,
{
    let pace = pace.unwrap_or_else(|| request.interval());
    let mut filter = UpdateFilter::new(request);
    let mut clock = Instant::now();
    let mut data = GpsData::new();

    let mut lines = reader.lines();
    let mut connected = false;
    let mut line_number = 0usize;

    while running.load(Ordering::Relaxed) {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Error reading replay file: {}", e);
                break;
            }
        };
        line_number += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fix = match parse_line(LineFormat::Auto, &mut data, line) {
            Ok(Some(fix)) => fix,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("Skipping replay line {}: {}", line_number, e);
                continue;
            }
        };

        let admitted = filter.admit(fix, clock);
        clock += request.interval();
        if !admitted {
            continue;
        }

        let event = if connected {
            if !pace.is_zero() {
                sleep(pace).await;
            }
            FixEvent::Fix(fix)
        } else {
            connected = true;
            FixEvent::Connected { last_known: Some(fix) }
        };

        if tx.send(event).await.is_err() {
            return;
        }
    }

    if !connected {
        log::warn!("Replay contained no usable fixes");
        if tx.send(FixEvent::Connected { last_known: None }).await.is_err() {
            return;
        }
    }

    let _ = tx.send(FixEvent::Disconnected).await;
}
