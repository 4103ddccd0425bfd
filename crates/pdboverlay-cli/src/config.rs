pub mod defaults;

use crate::cli::OverlayArgs;
use crate::error::{CliError, Result};
use defaults::{DefaultsConfig, ToolDefaults};
use directories::ProjectDirs;
use pdboverlay::core::alignment::rescale::TargetRange;
use pdboverlay::engine::config::{OverlayConfig, OverlayConfigBuilder};
use pdboverlay::engine::tools::ExternalTool;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialToolConfig {
    program: Option<String>,
    args: Option<Vec<String>>,
    #[serde(rename = "output-prefix")]
    output_prefix: Option<String>,
}

impl PartialToolConfig {
    fn resolve(self, name: &str, defaults: &ToolDefaults) -> ExternalTool {
        ExternalTool {
            name: name.to_string(),
            program: self.program.unwrap_or_else(|| defaults.program.to_string()),
            args: self
                .args
                .unwrap_or_else(|| defaults.args.iter().map(|a| a.to_string()).collect()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialToolsConfig {
    aligner: Option<PartialToolConfig>,
    superposer: Option<PartialToolConfig>,
    viewer: Option<PartialToolConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialOverlayConfig {
    #[serde(rename = "work-dir")]
    work_dir: Option<PathBuf>,
    #[serde(rename = "coverage-threshold")]
    coverage_threshold: Option<f64>,
    #[serde(rename = "bfactor-range")]
    bfactor_range: Option<[f64; 2]>,
    tools: Option<PartialToolsConfig>,
}

/// `config.toml` in the per-user configuration directory, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "pdboverlay", "pdboverlay")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl PartialOverlayConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `explicit` if given, else the per-user config file if it exists, else nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::Argument(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => {
                info!("Using configuration file {:?}", path);
                Self::from_file(&path)
            }
            _ => {
                debug!("No configuration file found; using built-in defaults.");
                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli(self, args: &OverlayArgs) -> Result<OverlayConfig> {
        let defaults = DefaultsConfig::default();
        let tools = self.tools.unwrap_or_default();

        let superposer = tools.superposer.unwrap_or_default();
        let superposed_prefix = superposer
            .output_prefix
            .clone()
            .unwrap_or_else(|| defaults.superposed_prefix.to_string());
        for (section, tool) in [("aligner", &tools.aligner), ("viewer", &tools.viewer)] {
            if tool.as_ref().is_some_and(|t| t.output_prefix.is_some()) {
                return Err(CliError::Config(format!(
                    "`output-prefix` is only valid in [tools.superposer], not [tools.{}]",
                    section
                )));
            }
        }

        let [min, max] = self.bfactor_range.unwrap_or(defaults.bfactor_range);
        let work_dir = args
            .work_dir
            .clone()
            .or(self.work_dir)
            .unwrap_or_else(|| PathBuf::from(defaults.work_dir));

        OverlayConfigBuilder::new()
            .work_dir(work_dir)
            .first_model_only(args.first_model)
            .show_viewer(!args.no_view)
            .coverage_threshold(
                self.coverage_threshold
                    .unwrap_or(defaults.coverage_threshold),
            )
            .bfactor_range(TargetRange::new(min, max))
            .aligner(
                tools
                    .aligner
                    .unwrap_or_default()
                    .resolve("aligner", &defaults.aligner),
            )
            .superposer(superposer.resolve("superposer", &defaults.superposer))
            .viewer(
                tools
                    .viewer
                    .unwrap_or_default()
                    .resolve("viewer", &defaults.viewer),
            )
            .superposed_prefix(&superposed_prefix)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn overlay_args(extra: &[&str]) -> OverlayArgs {
        let mut argv = vec!["pdboverlay", "overlay", "a.pdb"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Overlay(args) => args,
            _ => panic!("Expected 'overlay' subcommand"),
        }
    }

    fn parse(content: &str) -> Result<PartialOverlayConfig> {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        PartialOverlayConfig::from_file(&path)
    }

    #[test]
    fn empty_config_yields_defaults() {
        let config = PartialOverlayConfig::default()
            .merge_with_cli(&overlay_args(&[]))
            .unwrap();

        assert_eq!(config.work_dir, PathBuf::from("overlay-work"));
        assert_eq!(config.coverage_threshold, 0.75);
        assert_eq!(config.bfactor_range, TargetRange::new(0.0, 100.0));
        assert!(config.show_viewer);
        assert!(!config.first_model_only);
        assert_eq!(config.tools.aligner.program, "muscle");
        assert_eq!(
            config.tools.aligner.args,
            vec!["-in", "{input}", "-out", "{output}", "-clw"]
        );
        assert_eq!(config.tools.superposer.program, "theseus");
        assert_eq!(config.tools.superposed_prefix, "theseus_");
        assert_eq!(config.tools.viewer.args, vec!["{script}"]);
    }

    #[test]
    fn file_values_override_defaults() {
        let partial = parse(
            r#"
            work-dir = "runs/overlay"
            coverage-threshold = 0.5
            bfactor-range = [10.0, 50.0]

            [tools.superposer]
            program = "/opt/theseus/bin/theseus"
            output-prefix = "fit_"

            [tools.viewer]
            program = "pymol"
            args = ["-q", "{script}"]
            "#,
        )
        .unwrap();
        let config = partial.merge_with_cli(&overlay_args(&[])).unwrap();

        assert_eq!(config.work_dir, PathBuf::from("runs/overlay"));
        assert_eq!(config.coverage_threshold, 0.5);
        assert_eq!(config.bfactor_range, TargetRange::new(10.0, 50.0));
        assert_eq!(config.tools.superposer.program, "/opt/theseus/bin/theseus");
        assert_eq!(
            config.tools.superposer.args,
            vec!["-A", "{alignment}", "-M", "{map}", "{structures}"]
        );
        assert_eq!(config.tools.superposed_prefix, "fit_");
        assert_eq!(config.tools.viewer.args, vec!["-q", "{script}"]);
        assert_eq!(config.tools.aligner.program, "muscle");
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let partial = parse("work-dir = \"from-file\"\n").unwrap();
        let config = partial
            .merge_with_cli(&overlay_args(&["--work-dir", "from-cli", "--no-view", "--first-model"]))
            .unwrap();

        assert_eq!(config.work_dir, PathBuf::from("from-cli"));
        assert!(!config.show_viewer);
        assert!(config.first_model_only);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse("coverage = 0.5\n");
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn output_prefix_outside_superposer_is_rejected() {
        let partial = parse("[tools.aligner]\noutput-prefix = \"x_\"\n").unwrap();
        let result = partial.merge_with_cli(&overlay_args(&[]));
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("tools.aligner")));
    }

    #[test]
    fn invalid_threshold_is_a_config_error() {
        let partial = parse("coverage-threshold = 1.5\n").unwrap();
        let result = partial.merge_with_cli(&overlay_args(&[]));
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("coverage_threshold")));
    }

    #[test]
    fn explicit_missing_config_file_is_an_argument_error() {
        let dir = tempdir().unwrap();
        let result = PartialOverlayConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
