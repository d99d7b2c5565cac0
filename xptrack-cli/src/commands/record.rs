//! Record command - capture a flight and save it as KML.
//!
//! Listens for X-Plane data output until Ctrl+C, then writes the recorded
//! flight track, special placemarks and flight data to a KML file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::Args;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use xptrack::config::ConfigFile;
use xptrack::session::{RecordingStats, Session};
use xptrack::telemetry::{TelemetryReceiver, TelemetryReceiverConfig};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Label used in the document name when `--name` is not given.
pub const DEFAULT_FLIGHT_NAME: &str = "X-Plane";

/// Arguments for the record command.
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// KML file to write (default: <output dir>/flightlog-<timestamp>.kml)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Flight label used in the document name
    #[arg(long, default_value = DEFAULT_FLIGHT_NAME)]
    pub name: String,

    /// UDP port to listen on (overrides telemetry.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Run the record command.
pub fn run(args: RecordArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("record");
    let config = runner.config();

    let mut receiver_config = config.telemetry.receiver_config();
    if let Some(port) = args.port {
        receiver_config.port = port;
    }

    let output = args.output.unwrap_or_else(|| {
        default_output_path(&config.output.resolved_directory(), Local::now())
    });

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || {
        handler_token.cancel();
    })
    .map_err(|e| CliError::SignalHandler(e.to_string()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let stats = runtime.block_on(record(
        config,
        receiver_config,
        &args.name,
        &output,
        shutdown,
    ))?;

    println!();
    println!("Flight log saved: {}", output.display());
    println!("  Events:        {}", stats.events);
    println!("  Segments:      {}", stats.segments);
    println!("  Data points:   {}", stats.data_points);
    Ok(())
}

/// Record until `shutdown` fires or the receiver stops, then save.
async fn record(
    config: &ConfigFile,
    receiver_config: TelemetryReceiverConfig,
    label: &str,
    output: &Path,
    shutdown: CancellationToken,
) -> Result<RecordingStats, CliError> {
    let port = receiver_config.port;
    let (events_tx, events_rx) = mpsc::channel(config.telemetry.channel_capacity);
    let receiver_cancel = shutdown.child_token();
    let mut receiver =
        TelemetryReceiver::new(receiver_config, events_tx, receiver_cancel.clone()).start();

    let mut session = Session::new(config.track.track_config());
    session.start(events_rx)?;

    println!("Recording X-Plane data output on UDP port {}", port);
    println!("Press Ctrl+C to stop and save.");

    let receiver_finished = tokio::select! {
        _ = shutdown.cancelled() => {
            info!("Stop requested");
            None
        }
        joined = &mut receiver => Some(joined),
    };

    let stats = session.stop().await.unwrap_or_default();
    receiver_cancel.cancel();

    let joined = match receiver_finished {
        Some(joined) => joined,
        None => receiver.await,
    };
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e.into()),
        Err(e) => warn!(error = %e, "Telemetry receiver task failed"),
    }

    session.save(label, output).await?;
    Ok(stats)
}

/// Default KML path for a recording saved at `now`.
pub fn default_output_path(directory: &Path, now: DateTime<Local>) -> PathBuf {
    directory.join(format!("flightlog-{}.kml", now.format("%Y%m%d-%H%M%S")))
}
