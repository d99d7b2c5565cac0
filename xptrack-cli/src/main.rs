//! xptrack CLI - Command-line interface
//!
//! Records X-Plane UDP data output into a KML flight log and manages the
//! recorder's configuration file.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::record::RecordArgs;

#[derive(Debug, Parser)]
#[command(name = "xptrack")]
#[command(version = xptrack::VERSION)]
#[command(about = "Record X-Plane flights as Google Earth KML tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Record a flight until Ctrl+C, then save it as KML
    Record(RecordArgs),

    /// Create the configuration file with default settings
    Init,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Record(args) => commands::record::run(args),
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
