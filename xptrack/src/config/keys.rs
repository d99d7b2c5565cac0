//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, with
//! validation via value specifications. The INI parser goes through the
//! same setters, so a value accepted by `xptrack config set` is always one
//! the config file accepts.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use super::settings::ConfigFile;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    // Telemetry settings
    TelemetryPort,
    TelemetryChannelCapacity,

    // Track settings
    TrackSimplifyTolerance,
    TrackGroundAltitude,
    TrackVerticalRateSource,
    TrackDataAltitude,

    // Logging settings
    LoggingFile,

    // Output settings
    OutputDirectory,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Full key name (e.g., "track.simplify_tolerance").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::TelemetryPort => "telemetry.port",
            ConfigKey::TelemetryChannelCapacity => "telemetry.channel_capacity",
            ConfigKey::TrackSimplifyTolerance => "track.simplify_tolerance",
            ConfigKey::TrackGroundAltitude => "track.ground_altitude",
            ConfigKey::TrackVerticalRateSource => "track.vertical_rate_source",
            ConfigKey::TrackDataAltitude => "track.data_altitude",
            ConfigKey::LoggingFile => "logging.file",
            ConfigKey::OutputDirectory => "output.directory",
        }
    }

    /// Get the section name (e.g., "track").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "simplify_tolerance").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::TelemetryPort => config.telemetry.port.to_string(),
            ConfigKey::TelemetryChannelCapacity => config.telemetry.channel_capacity.to_string(),
            ConfigKey::TrackSimplifyTolerance => config.track.simplify_tolerance.to_string(),
            ConfigKey::TrackGroundAltitude => config.track.ground_altitude.to_string(),
            ConfigKey::TrackVerticalRateSource => config.track.vertical_rate_source.to_string(),
            ConfigKey::TrackDataAltitude => config.track.data_altitude.to_string(),
            ConfigKey::LoggingFile => path_to_display(&config.logging.file),
            ConfigKey::OutputDirectory => config
                .output
                .directory
                .as_deref()
                .map(path_to_display)
                .unwrap_or_default(),
        }
    }

    /// Set the value in a config file.
    ///
    /// Validates the value according to the key's specification before setting.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        let invalid = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };

        match self {
            ConfigKey::TelemetryPort => {
                config.telemetry.port = value.parse().map_err(|_| invalid(PORT_REASON.into()))?
            }
            ConfigKey::TelemetryChannelCapacity => {
                config.telemetry.channel_capacity =
                    value.parse().map_err(|_| invalid(INTEGER_REASON.into()))?
            }
            ConfigKey::TrackSimplifyTolerance => {
                config.track.simplify_tolerance =
                    value.parse().map_err(|_| invalid(NUMBER_REASON.into()))?
            }
            ConfigKey::TrackGroundAltitude => {
                config.track.ground_altitude =
                    value.parse().map_err(|_| invalid(NUMBER_REASON.into()))?
            }
            ConfigKey::TrackVerticalRateSource => {
                config.track.vertical_rate_source = value.parse().map_err(invalid)?
            }
            ConfigKey::TrackDataAltitude => {
                config.track.data_altitude = value.parse().map_err(invalid)?
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value),
            ConfigKey::OutputDirectory => config.output.directory = optional_path(value),
        }
        Ok(())
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value)
            .map_err(|reason| ConfigKeyError::ValidationFailed {
                key: self.name().to_string(),
                reason,
            })
    }

    /// Get the validation specification for this key.
    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::TelemetryPort => Box::new(PortSpec),
            ConfigKey::TelemetryChannelCapacity => Box::new(PositiveIntegerSpec),
            ConfigKey::TrackSimplifyTolerance => Box::new(PositiveNumberSpec),
            ConfigKey::TrackGroundAltitude => Box::new(FiniteNumberSpec),
            ConfigKey::TrackVerticalRateSource => Box::new(OneOfSpec::new(&["angular", "vvi"])),
            ConfigKey::TrackDataAltitude => Box::new(OneOfSpec::new(&["msl", "agl"])),
            ConfigKey::LoggingFile => Box::new(PathSpec),
            ConfigKey::OutputDirectory => Box::new(AnyStringSpec),
        }
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::TelemetryPort,
            ConfigKey::TelemetryChannelCapacity,
            ConfigKey::TrackSimplifyTolerance,
            ConfigKey::TrackGroundAltitude,
            ConfigKey::TrackVerticalRateSource,
            ConfigKey::TrackDataAltitude,
            ConfigKey::LoggingFile,
            ConfigKey::OutputDirectory,
        ]
    }
}

const PORT_REASON: &str = "must be a port number between 1 and 65535";
const INTEGER_REASON: &str = "must be a positive integer";
const NUMBER_REASON: &str = "must be a finite number";

// ============================================================================
// Value Specifications
// ============================================================================

/// Trait for value validation specifications.
trait ValueSpecification {
    /// Check if the value satisfies this specification.
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Specification that accepts any string value.
struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Specification that requires the value to be one of a set of options.
struct OneOfSpec {
    options: &'static [&'static str],
}

impl OneOfSpec {
    fn new(options: &'static [&'static str]) -> Self {
        Self { options }
    }
}

impl ValueSpecification for OneOfSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.trim().to_lowercase();
        if self.options.iter().any(|opt| *opt == lower) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.options.join(", ")))
        }
    }
}

/// Specification for a non-zero UDP port.
struct PortSpec;

impl ValueSpecification for PortSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(()),
            _ => Err(PORT_REASON.to_string()),
        }
    }
}

/// Specification for an integer greater than zero.
struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<usize>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(INTEGER_REASON.to_string()),
        }
    }
}

/// Specification for a finite number greater than zero.
struct PositiveNumberSpec;

impl ValueSpecification for PositiveNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
            _ => Err("must be a positive number".to_string()),
        }
    }
}

/// Specification for any finite number.
struct FiniteNumberSpec;

impl ValueSpecification for FiniteNumberSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(()),
            _ => Err(NUMBER_REASON.to_string()),
        }
    }
}

/// Specification for a required path.
struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err("path cannot be empty".to_string())
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert path to display string, collapsing home dir to ~.
pub(super) fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Convert empty string to None, non-empty to Some path with tilde expansion.
fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(expand_tilde(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::VerticalRateSource;

    #[test]
    fn test_config_key_parsing() {
        assert_eq!(
            "track.simplify_tolerance".parse::<ConfigKey>().unwrap(),
            ConfigKey::TrackSimplifyTolerance
        );
        // Case insensitive
        assert_eq!(
            "TELEMETRY.PORT".parse::<ConfigKey>().unwrap(),
            ConfigKey::TelemetryPort
        );
        assert!("invalid.key".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_key_name_parts() {
        assert_eq!(ConfigKey::TrackDataAltitude.section(), "track");
        assert_eq!(ConfigKey::TrackDataAltitude.key_name(), "data_altitude");
        assert_eq!(ConfigKey::LoggingFile.section(), "logging");
        assert_eq!(ConfigKey::LoggingFile.key_name(), "file");
    }

    #[test]
    fn test_get_value() {
        let config = ConfigFile::default();

        assert_eq!(ConfigKey::TelemetryPort.get(&config), "49005");
        assert_eq!(ConfigKey::TrackSimplifyTolerance.get(&config), "5");
        assert_eq!(ConfigKey::TrackVerticalRateSource.get(&config), "angular");
        assert_eq!(ConfigKey::TrackDataAltitude.get(&config), "msl");
        assert_eq!(ConfigKey::OutputDirectory.get(&config), "");
    }

    #[test]
    fn test_set_value() {
        let mut config = ConfigFile::default();

        ConfigKey::TelemetryPort.set(&mut config, "49010").unwrap();
        assert_eq!(config.telemetry.port, 49010);

        ConfigKey::TrackVerticalRateSource
            .set(&mut config, "VVI")
            .unwrap();
        assert_eq!(
            config.track.vertical_rate_source,
            VerticalRateSource::VerticalSpeed
        );

        ConfigKey::OutputDirectory.set(&mut config, "/tmp/logs").unwrap();
        assert_eq!(config.output.directory, Some(PathBuf::from("/tmp/logs")));

        ConfigKey::OutputDirectory.set(&mut config, "").unwrap();
        assert!(config.output.directory.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(ConfigKey::TelemetryPort.validate("0").is_err());
        assert!(ConfigKey::TelemetryPort.validate("abc").is_err());
        assert!(ConfigKey::TelemetryChannelCapacity.validate("0").is_err());
        assert!(ConfigKey::TrackSimplifyTolerance.validate("0").is_err());
        assert!(ConfigKey::TrackSimplifyTolerance.validate("NaN").is_err());
        assert!(ConfigKey::TrackGroundAltitude.validate("-3.5").is_ok());
        assert!(ConfigKey::TrackDataAltitude.validate("baro").is_err());
        assert!(ConfigKey::LoggingFile.validate("  ").is_err());
    }

    #[test]
    fn test_failed_set_leaves_config_unchanged() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::TrackSimplifyTolerance
            .set(&mut config, "-2")
            .is_err());
        assert_eq!(config, ConfigFile::default());
    }
}
