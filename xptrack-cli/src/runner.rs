//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging for long-running
//! commands.

use crate::error::CliError;
use tracing::info;
use xptrack::config::ConfigFile;
use xptrack::logging::{init_logging, LoggingGuard};

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled so log lines do not
    /// interleave with the recorder's status output.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging(&config.logging.file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("xptrack v{}", xptrack::VERSION);
        info!("xptrack CLI: {} command", command);
    }
}
