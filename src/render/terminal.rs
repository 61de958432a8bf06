// src/render/terminal.rs
//! Terminal-based trail view

use super::{RenderInstruction, RenderSink};
use crate::{
    error::{Result, TrailError},
    trail::GeoPoint,
};
use chrono::{DateTime, Utc};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::io::{self, Write};

/// Redraws a status panel after every instruction.
pub struct TerminalSink<W: Write> {
    out: W,
    started: bool,
    center: Option<(GeoPoint, f32)>,
    last_segment: Option<(GeoPoint, GeoPoint)>,
    segments: usize,
    distance_m: f64,
    notice: Option<(DateTime<Utc>, String)>,
    source_label: String,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout(source_label: &str) -> Self {
        Self::new(io::stdout(), source_label)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, source_label: &str) -> Self {
        Self {
            out,
            started: false,
            center: None,
            last_segment: None,
            segments: 0,
            distance_m: 0.0,
            notice: None,
            source_label: source_label.to_string(),
        }
    }

    /// Take over the terminal. Until this is called the view is not ready
    /// and map instructions are skipped by the session.
    pub fn start(&mut self) -> Result<()> {
        execute!(self.out, Hide, DisableLineWrap).map_err(TrailError::Io)?;
        self.started = true;
        self.redraw()
    }

    /// Give the terminal back
    pub fn finish(&mut self) -> Result<()> {
        if self.started {
            execute!(self.out, Show, EnableLineWrap).map_err(TrailError::Io)?;
            self.started = false;
        }
        writeln!(self.out, "\nShutting down...")?;
        Ok(())
    }

    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Total length of the drawn trail in meters
    pub fn trail_distance(&self) -> f64 {
        self.distance_m
    }

    fn redraw(&mut self) -> Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0)).map_err(TrailError::Io)?;

        execute!(
            self.out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print(format!("GPS Trail - following {} fixes", self.source_label)),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        )
        .map_err(TrailError::Io)?;

        self.render_view_section()?;
        self.render_trail_section()?;
        self.render_notice_section()?;

        execute!(
            self.out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        )
        .map_err(TrailError::Io)?;

        self.out.flush().map_err(TrailError::Io)
    }

    fn render_view_section(&mut self) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Yellow),
            Print("VIEW:\n"),
            ResetColor
        )
        .map_err(TrailError::Io)?;

        let (center, zoom) = match self.center {
            Some((point, zoom)) => (point.to_string(), format!("{:.0}", zoom)),
            None => ("Waiting for location".to_string(), "-".to_string()),
        };
        execute!(
            self.out,
            Print(format!("  Center: {}\n", center)),
            Print(format!("  Zoom:   {}\n\n", zoom))
        )
        .map_err(TrailError::Io)?;

        Ok(())
    }

    fn render_trail_section(&mut self) -> Result<()> {
        execute!(
            self.out,
            SetForegroundColor(Color::Cyan),
            Print("TRAIL:\n"),
            ResetColor
        )
        .map_err(TrailError::Io)?;

        execute!(
            self.out,
            Print(format!("  Segments: {:>8}\n", self.segments)),
            Print(format!("  Distance: {:>8.1} m\n", self.distance_m))
        )
        .map_err(TrailError::Io)?;

        if let Some((from, to)) = self.last_segment {
            execute!(self.out, Print(format!("  Last:     {} -> {}\n", to, from)))
                .map_err(TrailError::Io)?;
        }

        execute!(self.out, Print("\n")).map_err(TrailError::Io)?;
        Ok(())
    }

    fn render_notice_section(&mut self) -> Result<()> {
        if let Some((at, message)) = &self.notice {
            let line = format!("  [{}] {}\n\n", at.format("%H:%M:%S UTC"), message);
            execute!(
                self.out,
                SetForegroundColor(Color::Magenta),
                Print(line),
                ResetColor
            )
            .map_err(TrailError::Io)?;
        }
        Ok(())
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn is_ready(&self) -> bool {
        self.started
    }

    fn apply(&mut self, instruction: RenderInstruction) -> Result<()> {
        match instruction {
            RenderInstruction::Recenter { point, zoom } => {
                self.center = Some((point, zoom));
            }
            RenderInstruction::DrawSegment { from, to } => {
                self.segments += 1;
                self.distance_m += from.distance_to(&to);
                self.last_segment = Some((from, to));
            }
            RenderInstruction::Notify { message } => {
                self.notice = Some((Utc::now(), message));
            }
        }

        if self.started {
            self.redraw()?;
        }
        Ok(())
    }
}
