//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::document::DEFAULT_GROUND_ALTITUDE;
use crate::geometry::DEFAULT_SIMPLIFY_TOLERANCE;
use crate::status::VerticalRateSource;
use crate::track::DataAltitude;

pub use crate::telemetry::DEFAULT_TELEMETRY_PORT;

/// Default capacity of the telemetry event queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "xptrack.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            telemetry: TelemetrySettings {
                port: DEFAULT_TELEMETRY_PORT,
                channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            },
            track: TrackSettings {
                simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
                ground_altitude: DEFAULT_GROUND_ALTITUDE,
                vertical_rate_source: VerticalRateSource::AngularRate,
                data_altitude: DataAltitude::Msl,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
            output: OutputSettings { directory: None },
        }
    }
}
