//! Verify command - decode, re-encode and compare a save with itself

use std::path::PathBuf;

use anyhow::Result;
use blade_save::{Title, verify_round_trip};
use clap::Args;

use crate::config::Config;
use crate::paths;

/// Arguments for the verify command
#[derive(Args)]
pub struct VerifyArgs {
    /// Save files to verify
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Title to decode as instead of detecting it from the header
    #[arg(long)]
    pub title: Option<Title>,
}

/// Execute the verify command
pub fn execute(args: VerifyArgs, config: &Config) -> Result<()> {
    let mut failures = 0usize;
    for input in &args.inputs {
        let result = paths::read_input(input, config)
            .and_then(|bytes| Ok(verify_round_trip(&bytes, args.title, None)?));
        match result {
            Ok(report) if report.is_identical() => {
                println!(
                    "OK    {} ({}, {} properties, {} bytes)",
                    input.display(),
                    report.title,
                    report.properties,
                    report.original_len
                );
            }
            Ok(report) => {
                failures += 1;
                println!(
                    "DIFF  {} (first difference at offset {}, {} -> {} bytes)",
                    input.display(),
                    report.first_difference.unwrap_or_default(),
                    report.original_len,
                    report.rewritten_len
                );
            }
            Err(err) => {
                failures += 1;
                println!("FAIL  {}: {:#}", input.display(), err);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} saves did not round-trip", failures, args.inputs.len());
    }
    Ok(())
}
