//! Pack command - encode edited JSON back into a save file
//!
//! The header comes from the original save (`--template`) when one is given,
//! otherwise from the defaults of `--title` or the configured title.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blade_save::{SaveFile, SaveHeader, Title};
use clap::Args;

use crate::config::Config;
use crate::paths;

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// JSON file produced by `dump`
    pub input: PathBuf,

    /// Output save file (`-` for stdout, default: input name with .bin)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Original save whose header is reused
    #[arg(long, conflicts_with = "title")]
    pub template: Option<PathBuf>,

    /// Title to encode for when there is no template
    #[arg(long)]
    pub title: Option<Title>,
}

/// Execute the pack command
pub fn execute(args: PackArgs, config: &Config) -> Result<()> {
    let (header, title) = match &args.template {
        Some(template) => {
            let bytes = paths::read_input(template, config)?;
            let header = SaveHeader::parse(&bytes)
                .with_context(|| format!("Invalid template {}", template.display()))?;
            (header, None)
        }
        None => {
            let title = match args.title {
                Some(title) => title,
                None => config.default_title()?,
            };
            (SaveHeader::default_for(title), Some(title))
        }
    };

    let bytes = paths::read_input(&args.input, config)?;
    let text = std::str::from_utf8(&bytes)
        .with_context(|| format!("{} is not UTF-8 text", args.input.display()))?;
    let save = SaveFile::from_json(text, header, title)
        .with_context(|| format!("Failed to encode {}", args.input.display()))?;
    let encoded = save
        .to_bytes(None)
        .context("Encrypted saves need a payload cipher, which this tool does not ship")?;
    tracing::info!(
        "Encoded {} properties for {}",
        save.properties.len(),
        save.title
    );

    let output = paths::output_path(&args.input, args.output.as_deref(), "bin", config)?;
    paths::write_output(output.as_deref(), &encoded)
}
