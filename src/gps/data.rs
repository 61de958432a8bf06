// src/gps/data.rs
//! Position data accumulated from receiver messages

use crate::trail::GeoPoint;

/// Latest position report from a receiver, merged across sentence types.
#[derive(Debug, Clone, Default)]
pub struct GpsData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fix_quality: Option<u8>, // NMEA GGA quality indicator
    pub mode: Option<u8>,        // gpsd TPV mode
}

impl GpsData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the data carries a position at all
    pub fn has_fix(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Current position as a trail point
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }

    /// Get fix type description
    pub fn get_fix_description(&self) -> String {
        if let Some(quality) = self.fix_quality {
            match quality {
                0 => "No fix".to_string(),
                1 => "GPS".to_string(),
                2 => "DGPS".to_string(),
                3 => "PPS".to_string(),
                4 => "RTK".to_string(),
                5 => "Float RTK".to_string(),
                6 => "Estimated".to_string(),
                7 => "Manual".to_string(),
                8 => "Simulation".to_string(),
                _ => format!("Unknown ({})", quality),
            }
        } else if let Some(m) = self.mode {
            match m {
                1 => "No fix".to_string(),
                2 => "2D fix".to_string(),
                3 => "3D fix".to_string(),
                _ => format!("Mode {}", m),
            }
        } else {
            "Unknown".to_string()
        }
    }
}
