// src/main.rs
//! GPS Trail - follow a GPS receiver and draw the trail between fixes

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use gps_trail::{
    config::TrailConfig,
    gps::{self, source::list_serial_ports},
    render::{json::JsonSink, terminal::TerminalSink},
    RenderSink, SessionOptions, SessionStats, TrailSession,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    Serial,
    Gpsd,
    Replay,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputKind {
    Terminal,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "gps-trail")]
#[command(about = "Follow a GPS receiver and draw a trail between consecutive fixes", long_about = None)]
struct Args {
    /// Fix source (defaults to the configured one)
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Serial port for NMEA receivers
    #[arg(long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// gpsd host
    #[arg(long)]
    host: Option<String>,

    /// gpsd port
    #[arg(long)]
    gpsd_port: Option<u16>,

    /// Recorded NMEA or gpsd JSON log to replay
    #[arg(long)]
    file: Option<PathBuf>,

    /// Delay between replayed fixes in milliseconds
    #[arg(long)]
    pace_ms: Option<u64>,

    /// How to show the trail
    #[arg(long, value_enum)]
    output: Option<OutputKind>,

    /// Zoom level for recentering
    #[arg(long)]
    zoom: Option<f32>,

    /// Deliver every fix regardless of interval and displacement
    #[arg(long)]
    unthrottled: bool,

    /// Drop fixes closer than this many meters to the last delivered one
    #[arg(long)]
    min_displacement: Option<f64>,

    /// Don't show a notice for every location change
    #[arg(long)]
    no_notify: bool,

    /// Only log warnings and errors
    #[arg(long, short)]
    quiet: bool,

    /// List serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings as the new defaults
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn apply_to(&self, config: &mut TrailConfig) {
        if let Some(port) = &self.port {
            config.update_serial(port.clone(), self.baud.or(config.serial_baudrate).unwrap_or(9600));
        } else if let Some(baud) = self.baud {
            config.serial_baudrate = Some(baud);
        }
        if self.host.is_some() || self.gpsd_port.is_some() {
            let host = self
                .host
                .clone()
                .or_else(|| config.gpsd_host.clone())
                .unwrap_or_else(|| "localhost".to_string());
            let port = self.gpsd_port.or(config.gpsd_port).unwrap_or(2947);
            config.update_gpsd(host, port);
        }
        if let Some(file) = &self.file {
            config.update_replay(file.clone(), self.pace_ms.or(config.replay_pace_ms));
        } else if let Some(pace) = self.pace_ms {
            config.replay_pace_ms = Some(pace);
        }
        // An explicit source wins over the one implied by other flags
        match self.source {
            Some(SourceKind::Serial) => config.update_source("serial"),
            Some(SourceKind::Gpsd) => config.update_source("gpsd"),
            Some(SourceKind::Replay) => config.update_source("replay"),
            None => {}
        }
        match self.output {
            Some(OutputKind::Terminal) => config.output = "terminal".to_string(),
            Some(OutputKind::Json) => config.output = "json".to_string(),
            None => {}
        }
        if let Some(zoom) = self.zoom {
            config.zoom = zoom;
        }
        if self.unthrottled {
            config.request = gps::LocationRequest::unthrottled();
        }
        if let Some(meters) = self.min_displacement {
            config.request = config.request.with_smallest_displacement(meters);
        }
        if self.no_notify {
            config.notify_on_fix = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = TrailConfig::load();
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    args.apply_to(&mut config);

    let default_level = default_log_level(args.quiet, &config.output);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = &loaded {
        log::warn!("{}, using defaults", e);
    }

    if args.list_ports {
        let ports = list_serial_ports()?;
        if ports.is_empty() {
            println!("No serial ports found.");
        } else {
            println!("Available serial ports:");
            for port in ports {
                println!("  {}", port);
            }
        }
        return Ok(());
    }

    if args.save_config {
        config.save().context("saving configuration")?;
    }

    let source = config.fix_source().context("selecting fix source")?;
    log::info!("Using {} source", source.label());

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    let options = SessionOptions {
        zoom: config.zoom,
        notify_on_fix: config.notify_on_fix,
    };
    let source_label = source.label();
    let events = gps::spawn_source(source, config.request, Arc::clone(&running))
        .await
        .context("connecting to fix source")?;

    let stats = match config.output.as_str() {
        "terminal" => {
            let mut sink = TerminalSink::stdout(source_label);
            sink.start()?;
            let mut session = TrailSession::new(sink, options);
            let result = session.run(events, running).await;
            session.sink_mut().finish()?;
            result?
        }
        "json" => run_session(JsonSink::stdout(), options, events, running).await?,
        other => bail!("unknown output type: {}", other),
    };

    log::info!(
        "Processed {} fixes, drew {} segments",
        stats.fixes,
        stats.segments_drawn
    );
    Ok(())
}

async fn run_session<S: RenderSink>(
    sink: S,
    options: SessionOptions,
    events: tokio::sync::mpsc::Receiver<gps::FixEvent>,
    running: Arc<AtomicBool>,
) -> gps_trail::Result<SessionStats> {
    let mut session = TrailSession::new(sink, options);
    session.run(events, running).await
}

/// The terminal view redraws the whole screen, so only warnings get through
/// unless RUST_LOG says otherwise.
fn default_log_level(quiet: bool, output: &str) -> &'static str {
    if quiet || output == "terminal" {
        "warn"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_output_logs_warnings_only() {
        assert_eq!(default_log_level(false, "terminal"), "warn");
        assert_eq!(default_log_level(false, "json"), "info");
        assert_eq!(default_log_level(true, "json"), "warn");
    }

    #[test]
    fn test_min_displacement_flag() {
        let args = Args::try_parse_from(["gps-trail", "--min-displacement", "5"]).unwrap();
        let mut config = TrailConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.request.smallest_displacement_m, 5.0);
        assert_eq!(config.request.fastest_interval_ms, 5_000);
    }

    #[test]
    fn test_output_flag_selects_json() {
        let args = Args::try_parse_from(["gps-trail", "--output", "json"]).unwrap();
        let mut config = TrailConfig::default();
        args.apply_to(&mut config);
        assert_eq!(default_log_level(args.quiet, &config.output), "info");
    }
}
