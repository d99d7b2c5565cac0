//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! Starts from `ConfigFile::default()` and overlays every known key found in
//! the INI. Unknown sections and keys are ignored.

use ini::Ini;

use super::file::ConfigFileError;
use super::keys::{ConfigKey, ConfigKeyError};
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    for key in ConfigKey::all() {
        let Some(section) = ini.section(Some(key.section())) else {
            continue;
        };
        let Some(value) = section.get(key.key_name()) else {
            continue;
        };

        key.set(&mut config, value.trim())
            .map_err(|e| ConfigFileError::InvalidValue {
                section: key.section().to_string(),
                key: key.key_name().to_string(),
                value: value.to_string(),
                reason: match e {
                    ConfigKeyError::ValidationFailed { reason, .. } => reason,
                    other => other.to_string(),
                },
            })?;
    }

    Ok(config)
}
