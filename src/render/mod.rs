// src/render/mod.rs
//! Render sinks for trail instructions

pub mod json;
pub mod terminal;

use crate::{error::Result, trail::GeoPoint};
use serde::{Deserialize, Serialize};

/// Zoom level used for every recenter
pub const DEFAULT_ZOOM: f32 = 15.0;

/// A fire-and-forget drawing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderInstruction {
    Recenter { point: GeoPoint, zoom: f32 },
    DrawSegment { from: GeoPoint, to: GeoPoint },
    Notify { message: String },
}

/// Trait for anything that can show the trail
pub trait RenderSink {
    /// Whether the map is loaded and can take recenter and segment requests.
    /// Notifications are delivered regardless.
    fn is_ready(&self) -> bool {
        true
    }

    fn apply(&mut self, instruction: RenderInstruction) -> Result<()>;
}
