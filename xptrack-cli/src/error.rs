//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use xptrack::config::ConfigFileError;
use xptrack::session::SessionError;
use xptrack::telemetry::TelemetryError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to install the Ctrl+C handler
    SignalHandler(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Telemetry receiver failed
    Telemetry(TelemetryError),
    /// Recording session error
    Session(SessionError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Telemetry(TelemetryError::SocketBind { port, .. }) = self {
            eprintln!();
            eprintln!("Common issues:");
            eprintln!("  1. Another program is already listening on UDP port {}", port);
            eprintln!("  2. Choose another port with --port or 'xptrack config set telemetry.port'");
            eprintln!("     and point X-Plane's data output (Settings > Data Output) at it");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::SignalHandler(msg) => write!(f, "Failed to install Ctrl+C handler: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Telemetry(e) => write!(f, "Telemetry error: {}", e),
            CliError::Session(e) => write!(f, "Recording error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Telemetry(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        CliError::Session(e)
    }
}

impl From<TelemetryError> for CliError {
    fn from(e: TelemetryError) -> Self {
        CliError::Telemetry(e)
    }
}
