use crate::cli::SeqArgs;
use crate::error::{CliError, Result};
use anyhow::anyhow;
use pdboverlay::workflows::sequence::{format_chain_sequence, read_chain_sequences};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: SeqArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_sequences(&args.inputs, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Nothing is printed unless every path names an existing file.
fn write_sequences(paths: &[PathBuf], out: &mut impl Write) -> Result<()> {
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(CliError::FileParsing {
            path: missing.clone(),
            source: anyhow!("no such file"),
        });
    }
    for path in paths {
        info!("Reading sequences from {:?}", path);
        let chains = read_chain_sequences(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        writeln!(out, "File: {}", path.display())?;
        for chain in &chains {
            writeln!(out, "{}", format_chain_sequence(chain))?;
        }
    }
    Ok(())
}
