// src/config.rs
//! Configuration stored as JSON in the user's config directory

use crate::{
    error::{Result, TrailError},
    gps::{FixSource, LocationRequest},
    render::DEFAULT_ZOOM,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub source_type: String, // "serial", "gpsd", "replay"
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub gpsd_host: Option<String>,
    pub gpsd_port: Option<u16>,
    pub replay_path: Option<PathBuf>,
    pub replay_pace_ms: Option<u64>,
    pub request: LocationRequest,
    pub zoom: f32,
    pub notify_on_fix: bool,
    pub output: String, // "terminal", "json"
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl TrailConfig {
    /// Get platform-specific default configuration
    pub fn platform_default() -> Self {
        Self {
            source_type: "gpsd".to_string(),
            serial_port: None,
            serial_baudrate: Some(9600),
            gpsd_host: Some("localhost".to_string()),
            gpsd_port: Some(2947),
            replay_path: None,
            replay_pace_ms: None,
            request: LocationRequest::default(),
            zoom: DEFAULT_ZOOM,
            notify_on_fix: true,
            output: "terminal".to_string(),
        }
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists yet
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::platform_default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrailError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| TrailError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrailError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| TrailError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// `$HOME/.config/gps-trail/config.json`, or `%APPDATA%\gps-trail\config.json`
    pub fn get_config_path() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            return Ok(PathBuf::from(home).join(".config").join("gps-trail").join("config.json"));
        }
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Ok(PathBuf::from(appdata).join("gps-trail").join("config.json"));
        }
        Err(TrailError::Config("Neither HOME nor APPDATA is set".to_string()))
    }

    /// Update configuration with new source settings
    pub fn update_source(&mut self, source_type: &str) {
        self.source_type = source_type.to_string();
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    /// Update gpsd settings
    pub fn update_gpsd(&mut self, host: String, port: u16) {
        self.source_type = "gpsd".to_string();
        self.gpsd_host = Some(host);
        self.gpsd_port = Some(port);
    }

    /// Update replay settings
    pub fn update_replay(&mut self, path: PathBuf, pace_ms: Option<u64>) {
        self.source_type = "replay".to_string();
        self.replay_path = Some(path);
        self.replay_pace_ms = pace_ms;
    }

    /// Build the fix source this configuration describes
    pub fn fix_source(&self) -> Result<FixSource> {
        match self.source_type.as_str() {
            "serial" => {
                let port = self
                    .serial_port
                    .clone()
                    .ok_or_else(|| TrailError::Config("Serial source needs a port".to_string()))?;
                Ok(FixSource::Serial {
                    port,
                    baudrate: self.serial_baudrate.unwrap_or(9600),
                })
            }
            "gpsd" => Ok(FixSource::Gpsd {
                host: self.gpsd_host.clone().unwrap_or_else(|| "localhost".to_string()),
                port: self.gpsd_port.unwrap_or(2947),
            }),
            "replay" => {
                let path = self
                    .replay_path
                    .clone()
                    .ok_or_else(|| TrailError::Config("Replay source needs a file".to_string()))?;
                Ok(FixSource::Replay {
                    path,
                    pace: self.replay_pace_ms.map(Duration::from_millis),
                })
            }
            other => Err(TrailError::Config(format!("Unknown source type: {}", other))),
        }
    }
}
