// src/render/json.rs
//! JSON-lines render sink

use super::{RenderInstruction, RenderSink};
use crate::error::Result;
use std::io::Write;

/// Writes one JSON object per instruction, flushing after each line.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn apply(&mut self, instruction: RenderInstruction) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &instruction)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
