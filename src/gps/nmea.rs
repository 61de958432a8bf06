// src/gps/nmea.rs
//! NMEA sentence parsing

use super::data::GpsData;
use crate::error::{Result, TrailError};
use crate::trail::GeoPoint;

/// Parse a single NMEA sentence and update GPS data.
///
/// Returns the reported position when the sentence is a position report
/// carrying a valid fix (GGA with quality > 0, RMC with status `A`).
/// Other sentence types are ignored.
pub fn parse_nmea_sentence(data: &mut GpsData, line: &str) -> Result<Option<GeoPoint>> {
    let body = verify_checksum(line)?;
    let parts: Vec<&str> = body.split(',').collect();

    // Any talker: $GP, $GN, $GL, $GA, $BD, ...
    if !line.starts_with('$') {
        return Ok(None);
    }
    match line.get(3..6) {
        Some("GGA") => Ok(parse_gpgga(data, &parts)),
        Some("RMC") => Ok(parse_gprmc(data, &parts)),
        _ => Ok(None),
    }
}

/// Check the trailing `*hh` checksum if there is one and return the sentence
/// without it.
fn verify_checksum(line: &str) -> Result<&str> {
    let Some((body, checksum)) = line.split_once('*') else {
        return Ok(line);
    };

    let expected = u8::from_str_radix(checksum.trim(), 16)
        .map_err(|_| TrailError::Parse(format!("Bad NMEA checksum field: {}", checksum)))?;
    let actual = body
        .trim_start_matches('$')
        .bytes()
        .fold(0u8, |acc, b| acc ^ b);

    if actual != expected {
        return Err(TrailError::Parse(format!(
            "NMEA checksum mismatch: expected {:02X}, got {:02X}",
            expected, actual
        )));
    }

    Ok(body)
}

/// Convert `ddmm.mmmm` / `dddmm.mmmm` plus hemisphere to decimal degrees
fn parse_coordinate(value: &str, hemisphere: &str, negative: &str) -> Option<f64> {
    if value.is_empty() || hemisphere.is_empty() {
        return None;
    }
    let raw = value.parse::<f64>().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;
    Some(if hemisphere == negative { -decimal } else { decimal })
}

/// Parse GPGGA (Global Positioning System Fix Data) sentence
fn parse_gpgga(data: &mut GpsData, parts: &[&str]) -> Option<GeoPoint> {
    if parts.len() < 7 {
        return None;
    }

    // Fix quality (field 6)
    data.fix_quality = parts[6].parse::<u8>().ok();
    if data.fix_quality.unwrap_or(0) == 0 {
        return None;
    }

    // Latitude (fields 2 and 3), longitude (fields 4 and 5)
    let latitude = parse_coordinate(parts[2], parts[3], "S")?;
    let longitude = parse_coordinate(parts[4], parts[5], "W")?;
    data.latitude = Some(latitude);
    data.longitude = Some(longitude);

    Some(GeoPoint::new(latitude, longitude))
}

/// Parse GPRMC (Recommended Minimum Course) sentence
fn parse_gprmc(data: &mut GpsData, parts: &[&str]) -> Option<GeoPoint> {
    if parts.len() < 7 {
        return None;
    }

    // Status (field 2): A = active, V = void
    if parts[2] != "A" {
        return None;
    }

    let latitude = parse_coordinate(parts[3], parts[4], "S")?;
    let longitude = parse_coordinate(parts[5], parts[6], "W")?;
    data.latitude = Some(latitude);
    data.longitude = Some(longitude);

    Some(GeoPoint::new(latitude, longitude))
}
