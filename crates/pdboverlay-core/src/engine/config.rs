use super::tools::ExternalTool;
use crate::core::alignment::rescale::TargetRange;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub aligner: ExternalTool,
    pub superposer: ExternalTool,
    pub viewer: ExternalTool,
    /// Prefix the superposer puts in front of each input file name it writes back.
    pub superposed_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub work_dir: PathBuf,
    pub first_model_only: bool,
    pub show_viewer: bool,
    pub coverage_threshold: f64,
    pub bfactor_range: TargetRange,
    pub tools: ToolsConfig,
}

#[derive(Default)]
pub struct OverlayConfigBuilder {
    work_dir: Option<PathBuf>,
    first_model_only: Option<bool>,
    show_viewer: Option<bool>,
    coverage_threshold: Option<f64>,
    bfactor_range: Option<TargetRange>,
    aligner: Option<ExternalTool>,
    superposer: Option<ExternalTool>,
    viewer: Option<ExternalTool>,
    superposed_prefix: Option<String>,
}

impl OverlayConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn work_dir(mut self, path: PathBuf) -> Self {
        self.work_dir = Some(path);
        self
    }
    pub fn first_model_only(mut self, enabled: bool) -> Self {
        self.first_model_only = Some(enabled);
        self
    }
    pub fn show_viewer(mut self, enabled: bool) -> Self {
        self.show_viewer = Some(enabled);
        self
    }
    pub fn coverage_threshold(mut self, threshold: f64) -> Self {
        self.coverage_threshold = Some(threshold);
        self
    }
    pub fn bfactor_range(mut self, range: TargetRange) -> Self {
        self.bfactor_range = Some(range);
        self
    }
    pub fn aligner(mut self, tool: ExternalTool) -> Self {
        self.aligner = Some(tool);
        self
    }
    pub fn superposer(mut self, tool: ExternalTool) -> Self {
        self.superposer = Some(tool);
        self
    }
    pub fn viewer(mut self, tool: ExternalTool) -> Self {
        self.viewer = Some(tool);
        self
    }
    pub fn superposed_prefix(mut self, prefix: &str) -> Self {
        self.superposed_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(self) -> Result<OverlayConfig, ConfigError> {
        let coverage_threshold = self
            .coverage_threshold
            .ok_or(ConfigError::MissingParameter("coverage_threshold"))?;
        if !(coverage_threshold > 0.0 && coverage_threshold <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "coverage_threshold",
                reason: format!("{} is not within (0, 1]", coverage_threshold),
            });
        }
        let bfactor_range = self
            .bfactor_range
            .ok_or(ConfigError::MissingParameter("bfactor_range"))?;
        if !(bfactor_range.min < bfactor_range.max) {
            return Err(ConfigError::InvalidParameter {
                name: "bfactor_range",
                reason: format!(
                    "minimum {} must be below maximum {}",
                    bfactor_range.min, bfactor_range.max
                ),
            });
        }

        let tools = ToolsConfig {
            aligner: self
                .aligner
                .ok_or(ConfigError::MissingParameter("aligner"))?,
            superposer: self
                .superposer
                .ok_or(ConfigError::MissingParameter("superposer"))?,
            viewer: self.viewer.ok_or(ConfigError::MissingParameter("viewer"))?,
            superposed_prefix: self
                .superposed_prefix
                .ok_or(ConfigError::MissingParameter("superposed_prefix"))?,
        };
        Ok(OverlayConfig {
            work_dir: self
                .work_dir
                .ok_or(ConfigError::MissingParameter("work_dir"))?,
            first_model_only: self.first_model_only.unwrap_or(false),
            show_viewer: self.show_viewer.unwrap_or(true),
            coverage_threshold,
            bfactor_range,
            tools,
        })
    }
}
