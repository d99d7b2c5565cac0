//! Init command - create the configuration file.

use xptrack::config::ConfigFile;

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let (path, created) = ConfigFile::ensure_exists()?;

    if created {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
    }
    println!();
    println!("Edit this file to customize xptrack settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
