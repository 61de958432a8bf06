// src/gps/source.rs
//! Fix sources: connect to a receiver and turn its output into fix events

use super::{data::GpsData, gpsd, nmea, replay, request::{LocationRequest, UpdateFilter}};
use crate::{
    error::{Result, TrailError},
    trail::GeoPoint,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_serial::SerialPortBuilderExt;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Where fixes come from
#[derive(Debug, Clone)]
pub enum FixSource {
    Serial { port: String, baudrate: u32 },
    Gpsd { host: String, port: u16 },
    /// Recorded NMEA or gpsd JSON log; `pace` overrides the delay between fixes
    Replay { path: PathBuf, pace: Option<Duration> },
}

impl FixSource {
    pub fn label(&self) -> &'static str {
        match self {
            FixSource::Serial { .. } => "serial",
            FixSource::Gpsd { .. } => "gpsd",
            FixSource::Replay { .. } => "replay",
        }
    }
}

/// Events delivered by a fix source over one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixEvent {
    /// The source is up; carries its last known fix when it has one
    Connected { last_known: Option<GeoPoint> },
    Fix(GeoPoint),
    Disconnected,
}

/// Line encoding of a fix stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Nmea,
    GpsdJson,
    /// Decide per line: `$` is NMEA, `{` is gpsd JSON
    Auto,
}

/// Parse one line in the given format, updating `data`.
pub fn parse_line(format: LineFormat, data: &mut GpsData, line: &str) -> Result<Option<GeoPoint>> {
    match format {
        LineFormat::Nmea => nmea::parse_nmea_sentence(data, line),
        LineFormat::GpsdJson => gpsd::parse_gpsd_json(data, line),
        LineFormat::Auto => {
            if line.starts_with('$') {
                nmea::parse_nmea_sentence(data, line)
            } else if line.starts_with('{') {
                gpsd::parse_gpsd_json(data, line)
            } else {
                Err(TrailError::Parse(format!("Unrecognised line: {}", line)))
            }
        }
    }
}

/// Connect to `source` and start a task streaming its events.
///
/// Connection failures are returned here. Once the task is running, read
/// and parse errors are logged and never reach the receiver; the stream
/// always ends with [`FixEvent::Disconnected`].
pub async fn spawn_source(
    source: FixSource,
    request: LocationRequest,
    running: Arc<AtomicBool>,
) -> Result<mpsc::Receiver<FixEvent>> {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    match source {
        FixSource::Serial { port, baudrate } => {
            log::info!("Connecting to GPS on {} at {} baud...", port, baudrate);

            let serial = tokio_serial::new(&port, baudrate)
                .timeout(Duration::from_millis(1000))
                .open_native_async()
                .map_err(|e| TrailError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

            log::info!("Connected to {}", port);
            tokio::spawn(run_live(
                BufReader::new(serial),
                LineFormat::Nmea,
                "Serial GPS",
                tx,
                request,
                running,
            ));
        }
        FixSource::Gpsd { host, port } => {
            log::info!("Connecting to gpsd at {}:{}...", host, port);

            let reader = gpsd::connect_gpsd(&host, port).await?;

            log::info!("Connected to gpsd at {}:{}", host, port);
            tokio::spawn(run_live(reader, LineFormat::GpsdJson, "gpsd", tx, request, running));
        }
        FixSource::Replay { path, pace } => {
            let reader = replay::open_replay(&path).await?;

            log::info!("Replaying fixes from {}", path.display());
            tokio::spawn(replay::run_replay(reader, pace, tx, request, running));
        }
    }

    Ok(rx)
}

/// Stream fixes from a live receiver until EOF, a read error, or shutdown.
async fn run_live<R>(
    mut reader: R,
    format: LineFormat,
    source_name: &'static str,
    tx: mpsc::Sender<FixEvent>,
    request: LocationRequest,
    running: Arc<AtomicBool>,
) where
    R: AsyncBufRead + Unpin,
{
    // Live receivers have no stored position to offer on connect
    if tx.send(FixEvent::Connected { last_known: None }).await.is_err() {
        return;
    }

    let mut data = GpsData::new();
    let mut filter = UpdateFilter::new(request);
    let mut line = String::new();

    while running.load(Ordering::Relaxed) {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                log::info!("{} stream closed", source_name);
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_line(format, &mut data, line) {
                    Ok(Some(fix)) if filter.admit(fix, Instant::now()) => {
                        log::debug!("{} fix {} ({})", source_name, fix, data.get_fix_description());
                        if tx.send(FixEvent::Fix(fix)).await.is_err() {
                            return;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping {} line: {}", source_name, e),
                }
            }
            Err(e) => {
                log::error!("Error reading from {}: {}", source_name, e);
                break;
            }
        }
    }

    let _ = tx.send(FixEvent::Disconnected).await;
}

/// List available serial ports
pub fn list_serial_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| TrailError::Other(format!("Failed to list serial ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|port| format!("{} - {:?}", port.port_name, port.port_type))
        .collect())
}
