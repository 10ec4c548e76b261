//! Input and output file handling shared by the commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;

/// Read an input file, honoring the configured size cap
pub fn read_input(path: &Path, config: &Config) -> Result<Vec<u8>> {
    Ok(blade_save::fs::read_file_with_limit(path, config.max_input_bytes)?)
}

/// Where a command writes its result.
///
/// `-o` wins; otherwise the input name with `extension`, placed in the
/// configured output directory or next to the input. `-o -` means stdout.
pub fn output_path(
    input: &Path,
    explicit: Option<&Path>,
    extension: &str,
    config: &Config,
) -> Result<Option<PathBuf>> {
    if explicit == Some(Path::new("-")) {
        return Ok(None);
    }
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let file_name = input
                .file_name()
                .with_context(|| format!("Input has no file name: {}", input.display()))?;
            let renamed = Path::new(file_name).with_extension(extension);
            match &config.output_dir {
                Some(dir) => dir.join(renamed),
                None => input.with_file_name(renamed),
            }
        }
    };

    if is_same_file(input, &path) {
        anyhow::bail!(
            "Refusing to overwrite the input file {}; pass -o to choose another output",
            input.display()
        );
    }
    Ok(Some(path))
}

/// Write command output atomically, or to stdout
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            blade_save::fs::write_atomic(path, bytes)?;
            println!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(bytes)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
