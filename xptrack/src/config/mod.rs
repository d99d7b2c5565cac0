//! Configuration for xptrack, stored in `~/.xptrack/config.ini`.
//!
//! - [`ConfigFile`] - all settings, with defaults for anything not in the file
//! - [`ConfigKey`] - get and set single values by `section.key` name
//!
//! # Example
//!
//! ```
//! use xptrack::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.telemetry.port, 49005);
//! assert_eq!(config.track.track_config().simplify_tolerance, 5.0);
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::*;
