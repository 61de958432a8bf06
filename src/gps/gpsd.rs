// src/gps/gpsd.rs
//! GPSD client implementation

use super::data::GpsData;
use crate::error::{Result, TrailError};
use crate::trail::GeoPoint;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::TcpStream,
};

#[derive(Debug, Deserialize)]
struct GpsdMessage {
    class: String,
    #[serde(flatten)]
    data: HashMap<String, serde_json::Value>,
}

/// Connect to a gpsd daemon and return a stream reader
pub async fn connect_gpsd(host: &str, port: u16) -> Result<BufReader<TcpStream>> {
    let mut stream = TcpStream::connect(format!("{}:{}", host, port))
        .await
        .map_err(|e| TrailError::Connection(format!("Failed to connect to gpsd at {}:{}: {}", host, port, e)))?;

    // Send WATCH command to start receiving JSON data
    let watch_cmd = "?WATCH={\"enable\":true,\"json\":true}\n";
    stream
        .write_all(watch_cmd.as_bytes())
        .await
        .map_err(|e| TrailError::Connection(format!("Failed to send WATCH command: {}", e)))?;

    Ok(BufReader::new(stream))
}

/// Parse a single line of gpsd JSON data.
///
/// Returns the position when the line is a TPV report with at least a 2D fix.
pub fn parse_gpsd_json(data: &mut GpsData, line: &str) -> Result<Option<GeoPoint>> {
    let msg: GpsdMessage = serde_json::from_str(line)
        .map_err(|e| TrailError::Parse(format!("Failed to parse gpsd JSON: {}", e)))?;

    let fix = match msg.class.as_str() {
        "TPV" => parse_tpv_message(data, &msg.data),
        "VERSION" => {
            log_version_message(&msg.data);
            None
        }
        "DEVICES" => {
            log_devices_message(&msg.data);
            None
        }
        _ => None,
    };

    Ok(fix)
}

/// Parse TPV (Time Position Velocity) message
fn parse_tpv_message(
    data: &mut GpsData,
    msg_data: &HashMap<String, serde_json::Value>,
) -> Option<GeoPoint> {
    if let Some(mode) = msg_data.get("mode").and_then(|v| v.as_u64()) {
        data.mode = Some(mode as u8);
    }

    // mode 0/1 = no fix
    if data.mode.unwrap_or(0) < 2 {
        return None;
    }

    let lat = msg_data.get("lat").and_then(|v| v.as_f64())?;
    let lon = msg_data.get("lon").and_then(|v| v.as_f64())?;
    data.latitude = Some(lat);
    data.longitude = Some(lon);

    Some(GeoPoint::new(lat, lon))
}

fn log_version_message(msg_data: &HashMap<String, serde_json::Value>) {
    if let Some(version) = msg_data.get("release").and_then(|v| v.as_str()) {
        log::info!("Connected to gpsd version: {}", version);
    }
}

fn log_devices_message(msg_data: &HashMap<String, serde_json::Value>) {
    if let Some(devices) = msg_data.get("devices").and_then(|v| v.as_array()) {
        log::info!("gpsd managing {} device(s)", devices.len());
        for device in devices {
            if let Some(path) = device.get("path").and_then(|v| v.as_str()) {
                log::debug!("  Device: {}", path);
            }
        }
    }
}
