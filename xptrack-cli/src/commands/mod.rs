//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (get, set, list, path)
//! - [`init`] - Configuration initialization
//! - [`record`] - Record a flight and save it as KML

pub mod config;
pub mod init;
pub mod record;
