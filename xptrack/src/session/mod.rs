//! Recording session control.
//!
//! A [`Session`] owns at most one recording at a time. Starting a recording
//! creates a fresh document tree, snapshot and cancellation token and spawns
//! a single consumer task that reads telemetry events in order:
//!
//! ```text
//! TelemetryReceiver ──mpsc──► consumer task ──► Recorder ──► DocumentTree
//!                                  ▲
//!                      stop() ─────┘ (CancellationToken)
//! ```
//!
//! The consumer stops on cancellation without draining buffered events, or
//! when every sender of the channel has been dropped. The tree can only be
//! saved once the consumer has stopped.

mod recorder;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::document::export::document_name;
use crate::document::{write_kml, DocumentTree, ExportError, FolderKey, Placemark};
use crate::telemetry::TelemetryEvent;
use crate::track::TrackConfig;

pub use recorder::{Recorder, RecordingStats};

/// Errors from session control operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A recording is already running.
    #[error("a recording is already in progress")]
    AlreadyActive,

    /// The tree cannot be saved while it is still being written.
    #[error("cannot save while recording, stop the recording first")]
    StillRecording,

    /// No recording has been started yet.
    #[error("no recording has been started")]
    NotStarted,

    /// Writing the flight log failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

struct Recording {
    started_at: DateTime<Local>,
    tree: Arc<Mutex<DocumentTree>>,
    cancellation: CancellationToken,
    consumer: Option<JoinHandle<RecordingStats>>,
}

/// Start/stop/save surface for flight recordings.
pub struct Session {
    config: TrackConfig,
    recording: Option<Recording>,
}

impl Session {
    /// Create an idle session that records with the given track policies.
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            recording: None,
        }
    }

    /// Track policies used for new recordings.
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// True while a consumer task is running.
    pub fn is_recording(&self) -> bool {
        self.recording
            .as_ref()
            .and_then(|r| r.consumer.as_ref())
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start time of the current or last recording.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.recording.as_ref().map(|r| r.started_at)
    }

    /// Start a new recording that consumes `events_rx`.
    ///
    /// Discards the tree of any previous, stopped recording. Must be called
    /// from within a Tokio runtime.
    pub fn start(&mut self, events_rx: mpsc::Receiver<TelemetryEvent>) -> Result<(), SessionError> {
        if self.is_recording() {
            return Err(SessionError::AlreadyActive);
        }

        let started_at = Local::now();
        let tree = Arc::new(Mutex::new(DocumentTree::new(started_at)));
        let cancellation = CancellationToken::new();
        let recorder = Recorder::new(&self.config);

        let consumer = tokio::spawn(consume(
            events_rx,
            Arc::clone(&tree),
            cancellation.clone(),
            recorder,
        ));

        info!(
            started_at = %started_at,
            tolerance = self.config.simplify_tolerance,
            vertical_rate = %self.config.vertical_rate_source,
            data_altitude = %self.config.data_altitude,
            "Recording started"
        );

        self.recording = Some(Recording {
            started_at,
            tree,
            cancellation,
            consumer: Some(consumer),
        });
        Ok(())
    }

    /// Stop the current recording and wait for its consumer to exit.
    ///
    /// Returns the recording's counters, or `None` if nothing was running.
    pub async fn stop(&mut self) -> Option<RecordingStats> {
        let recording = self.recording.as_mut()?;
        let Some(consumer) = recording.consumer.take() else {
            debug!("Stop requested with no active recording");
            return None;
        };

        recording.cancellation.cancel();
        match consumer.await {
            Ok(stats) => {
                info!(
                    events = stats.events,
                    segments = stats.segments,
                    data_points = stats.data_points,
                    "Recording stopped"
                );
                Some(stats)
            }
            Err(e) => {
                error!(error = %e, "Recording consumer task failed");
                None
            }
        }
    }

    /// Write the recorded flight log to `path`.
    ///
    /// The document is named `Flightlog <label> <start time>`.
    pub async fn save(&self, label: &str, path: &Path) -> Result<(), SessionError> {
        let recording = self.recording.as_ref().ok_or(SessionError::NotStarted)?;
        if self.is_recording() {
            return Err(SessionError::StillRecording);
        }

        let tree = recording.tree.lock().await;
        let name = document_name(label, recording.started_at);
        write_kml(&tree, &name, path)?;
        Ok(())
    }

    /// Append a special placemark to the current or last recording.
    ///
    /// Allowed while recording; the placemark lands in the Special folder
    /// of the live tree.
    pub async fn add_special_placemark(&self, placemark: Placemark) -> Result<(), SessionError> {
        let recording = self.recording.as_ref().ok_or(SessionError::NotStarted)?;
        let mut tree = recording.tree.lock().await;
        debug!(name = ?placemark.name, "Adding special placemark");
        tree.add_placemark(FolderKey::Special, placemark);
        Ok(())
    }

    /// Copy of the current or last recording's document tree.
    pub async fn document(&self) -> Option<DocumentTree> {
        let recording = self.recording.as_ref()?;
        let tree = recording.tree.lock().await;
        Some(tree.clone())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(recording) = &self.recording {
            recording.cancellation.cancel();
        }
    }
}

async fn consume(
    mut events_rx: mpsc::Receiver<TelemetryEvent>,
    tree: Arc<Mutex<DocumentTree>>,
    cancellation: CancellationToken,
    mut recorder: Recorder,
) -> RecordingStats {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Recording cancelled");
                break;
            }
            event = events_rx.recv() => match event {
                Some(event) => event,
                None => {
                    info!("Telemetry channel closed, recording ended");
                    break;
                }
            },
        };

        let mut tree = tree.lock().await;
        recorder.handle(&event, &mut tree);
    }

    recorder.stats()
}
