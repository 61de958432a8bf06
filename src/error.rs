// src/error.rs
//! Error types for the trail tracker

use std::fmt;

pub type Result<T> = std::result::Result<T, TrailError>;

#[derive(Debug)]
pub enum TrailError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    Parse(String),
    Config(String),
    Other(String),
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::Io(e) => write!(f, "IO error: {}", e),
            TrailError::Serial(e) => write!(f, "Serial error: {}", e),
            TrailError::Json(e) => write!(f, "JSON error: {}", e),
            TrailError::Connection(msg) => write!(f, "Connection error: {}", msg),
            TrailError::Parse(msg) => write!(f, "Parse error: {}", msg),
            TrailError::Config(msg) => write!(f, "Config error: {}", msg),
            TrailError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for TrailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrailError::Io(e) => Some(e),
            TrailError::Serial(e) => Some(e),
            TrailError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TrailError {
    fn from(error: std::io::Error) -> Self {
        TrailError::Io(error)
    }
}

impl From<tokio_serial::Error> for TrailError {
    fn from(error: tokio_serial::Error) -> Self {
        TrailError::Serial(error)
    }
}

impl From<serde_json::Error> for TrailError {
    fn from(error: serde_json::Error) -> Self {
        TrailError::Json(error)
    }
}
