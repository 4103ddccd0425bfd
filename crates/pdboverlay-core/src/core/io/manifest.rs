use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FIRST_MODEL_FLAG: &str = "first-model";

/// What a completed overlay run needs to be replayed: the original inputs and whether
/// only their first model was used.
///
/// The first line holds the space-separated input paths; paths containing whitespace do
/// not survive the round trip. A following `first-model` line records the model choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub inputs: Vec<PathBuf>,
    pub first_model_only: bool,
}

impl Manifest {
    pub fn new(inputs: Vec<PathBuf>, first_model_only: bool) -> Self {
        Self {
            inputs,
            first_model_only,
        }
    }

    pub fn to_line(&self) -> String {
        self.inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn parse(content: &str) -> Self {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());
        let inputs = lines
            .next()
            .map(|l| l.split_whitespace().map(PathBuf::from).collect())
            .unwrap_or_default();
        let first_model_only = lines.any(|l| l.trim() == FIRST_MODEL_FLAG);
        Self {
            inputs,
            first_model_only,
        }
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut content = format!("{}\n", self.to_line());
        if self.first_model_only {
            content.push_str(FIRST_MODEL_FLAG);
            content.push('\n');
        }
        fs::write(path, content)
    }
}
