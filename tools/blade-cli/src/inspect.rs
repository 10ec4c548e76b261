//! Inspect command - print the header and top-level properties of a save

use std::path::PathBuf;

use anyhow::{Context, Result};
use blade_save::{PropertyValue, SaveFile, SaveHeader, Title, tag_size};
use clap::Args;

use crate::config::Config;
use crate::paths;

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// Save file to inspect
    pub input: PathBuf,

    /// Title to decode as instead of detecting it from the header
    #[arg(long)]
    pub title: Option<Title>,
}

/// Execute the inspect command
pub fn execute(args: InspectArgs, config: &Config) -> Result<()> {
    let bytes = paths::read_input(&args.input, config)?;
    let header = SaveHeader::parse(&bytes)?;

    println!("=== {} ===", args.input.display());
    println!("  Size:      {} bytes", bytes.len());
    println!("  Version:   0x{:08X}", header.version);
    println!("  Magic:     0x{:08X}", header.magic);
    println!("  Encrypted: {}", header.is_encrypted());

    if header.is_encrypted() {
        match header.encrypted_title() {
            Some(title) => println!("  Title:     {title} family (payload not decoded)"),
            None => println!("  Title:     unknown"),
        }
        return Ok(());
    }

    let save = SaveFile::parse(&bytes, args.title, None)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    println!("  Title:     {}", save.title);
    println!("  Properties ({}):", save.properties.len());
    for property in &save.properties {
        println!(
            "    {:<32} {:<16} {:>8} bytes{}",
            property.name(),
            property.tag.kind.type_name(),
            tag_size(property),
            summary(&property.value)
        );
    }
    Ok(())
}

fn summary(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Array(array) => format!("  [{} x {:?}]", array.len(), array.element()),
        PropertyValue::Struct(value) => format!("  {{{} fields}}", value.fields.len()),
        _ => String::new(),
    }
}
