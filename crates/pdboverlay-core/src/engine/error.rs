use thiserror::Error;

use super::config::ConfigError;
use super::tools::ToolError;
use crate::core::alignment::AlignmentError;
use crate::core::io::pdb::PdbError;
use crate::workflows::split::SplitError;
use std::path::PathBuf;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No input structures given")]
    NoInputs,

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Failed to read structure '{}': {source}", path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Model splitting failed: {0}")]
    Split(#[from] SplitError),

    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("{tool} exited with {}: {stderr}", status.map_or("a signal".to_string(), |c| format!("status {}", c)))]
    ToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} did not produce expected output: {}", join_paths(missing))]
    MissingOutput { tool: String, missing: Vec<PathBuf> },

    #[error("No previous run found: manifest {} does not exist", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
