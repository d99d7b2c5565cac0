//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::geometry::DistanceMetric;
use crate::status::VerticalRateSource;
use crate::telemetry::TelemetryReceiverConfig;
use crate::track::{DataAltitude, TrackConfig};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// X-Plane data output settings
    pub telemetry: TelemetrySettings,
    /// Track building policies
    pub track: TrackSettings,
    /// Logging settings
    pub logging: LoggingSettings,
    /// Where saved flight logs go
    pub output: OutputSettings,
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySettings {
    /// UDP port X-Plane sends data output to
    pub port: u16,
    /// Capacity of the event queue between receiver and recorder
    pub channel_capacity: usize,
}

/// Track configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSettings {
    /// RDP tolerance for the flight-data track
    pub simplify_tolerance: f64,
    /// Fixed altitude of ground segments
    pub ground_altitude: f64,
    /// Where vertical rate comes from
    pub vertical_rate_source: VerticalRateSource,
    /// Altitude reference for flight-data points
    pub data_altitude: DataAltitude,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Directory for saved flight logs; the working directory when unset
    pub directory: Option<PathBuf>,
}

impl TelemetrySettings {
    /// Receiver configuration for these settings.
    pub fn receiver_config(&self) -> TelemetryReceiverConfig {
        TelemetryReceiverConfig {
            port: self.port,
            ..Default::default()
        }
    }
}

impl TrackSettings {
    /// Track policies for a new recording.
    pub fn track_config(&self) -> TrackConfig {
        TrackConfig {
            simplify_tolerance: self.simplify_tolerance,
            ground_altitude: self.ground_altitude,
            vertical_rate_source: self.vertical_rate_source,
            data_altitude: self.data_altitude,
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl OutputSettings {
    /// Directory saved flight logs are written to.
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
