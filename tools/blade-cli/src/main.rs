//! bladesave - Infinity Blade save editor toolkit
//!
//! # Commands
//!
//! - `bladesave dump` - Decode a save file to JSON
//! - `bladesave pack` - Encode edited JSON back into a save file
//! - `bladesave inspect` - Print the header and top-level properties
//! - `bladesave verify` - Check that a save survives a full round trip
//!
//! # Usage
//!
//! ```bash
//! # Save.bin -> Save.json
//! bladesave dump Save.bin
//!
//! # Save.json -> Save.new.bin, copying the header of the original
//! bladesave pack Save.json --template Save.bin -o Save.new.bin
//!
//! # No original at hand
//! bladesave pack Save.json --title ib3
//! ```
//!
//! # Config (config.toml)
//!
//! ```toml
//! default_title = "ib3"
//! pretty_json = true
//! output_dir = "/home/me/saves/out"
//! max_input_bytes = 67108864
//! ```

mod config;
mod dump;
mod inspect;
mod pack;
mod paths;
mod verify;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// bladesave - Infinity Blade save editor toolkit
#[derive(Parser)]
#[command(name = "bladesave")]
#[command(about = "Dump and repack Infinity Blade save files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every property as it is read or written
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a save file to JSON
    Dump(dump::DumpArgs),

    /// Encode JSON back into a save file
    Pack(pack::PackArgs),

    /// Print the header and top-level properties of a save
    Inspect(inspect::InspectArgs),

    /// Decode, re-encode and compare a save with itself
    Verify(verify::VerifyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dump(args) => dump::execute(args, &config),
        Commands::Pack(args) => pack::execute(args, &config),
        Commands::Inspect(args) => inspect::execute(args, &config),
        Commands::Verify(args) => verify::execute(args, &config),
    }
}
