//! Dump command - decode a save file to JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use blade_save::{SaveFile, Title};
use clap::Args;

use crate::config::Config;
use crate::paths;

/// Arguments for the dump command
#[derive(Args)]
pub struct DumpArgs {
    /// Save file to decode
    pub input: PathBuf,

    /// Output JSON file (`-` for stdout, default: input name with .json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Title to decode as instead of detecting it from the header
    #[arg(long)]
    pub title: Option<Title>,

    /// Write compact JSON regardless of the config
    #[arg(long)]
    pub compact: bool,
}

/// Execute the dump command
pub fn execute(args: DumpArgs, config: &Config) -> Result<()> {
    let bytes = paths::read_input(&args.input, config)?;
    let save = SaveFile::parse(&bytes, args.title, None)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    tracing::info!(
        "Decoded {} save with {} properties",
        save.title,
        save.properties.len()
    );

    let mut json = save.to_json(config.pretty_json && !args.compact)?;
    json.push('\n');

    let output = paths::output_path(&args.input, args.output.as_deref(), "json", config)?;
    paths::write_output(output.as_deref(), json.as_bytes())
}
