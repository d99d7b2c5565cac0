//! xptrack - X-Plane flight recorder
//!
//! This library turns the UDP data output of the X-Plane flight simulator
//! into a KML flight log: a flight track split into ground and airborne
//! segments, plus a simplified track of annotated data points.
//!
//! # Pipeline
//!
//! ```text
//! X-Plane ──UDP──► TelemetryReceiver ──mpsc──► Session consumer
//!                                                  │
//!                       StatusAggregator ◄─────────┤
//!                       TrackSegmenter   ◄─────────┤ position events
//!                       DataTrackBuilder ◄─────────┘ when complete
//!                                │
//!                                ▼
//!                          DocumentTree ──► KML file
//! ```
//!
//! # High-Level API
//!
//! ```ignore
//! use xptrack::session::Session;
//! use xptrack::telemetry::{TelemetryReceiver, TelemetryReceiverConfig};
//! use xptrack::track::TrackConfig;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(256);
//! let cancel = CancellationToken::new();
//! TelemetryReceiver::new(TelemetryReceiverConfig::default(), tx, cancel.clone()).start();
//!
//! let mut session = Session::new(TrackConfig::default());
//! session.start(rx)?;
//! // ... fly ...
//! session.stop().await;
//! session.save("KPDX-KSEA", Path::new("flight.kml")).await?;
//! ```

pub mod config;
pub mod document;
pub mod geometry;
pub mod logging;
pub mod session;
pub mod status;
pub mod telemetry;
pub mod track;

/// Version of the xptrack library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
