use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "PDBOverlay Developers",
    version,
    about = "PDBOverlay CLI - Overlay protein structure models by sequence alignment and superposition, and color residues by their deviation from the mean structure.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress display
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Align, superpose and annotate structure models with per-residue deviations.
    /// Without input paths, re-opens the previous run found in the work directory.
    Overlay(OverlayArgs),
    /// Print the one-letter sequence of every chain in the given structure files.
    Seq(SeqArgs),
}

/// Arguments for the `overlay` subcommand.
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Structure files to overlay. Multi-model files are split into one file per model.
    #[arg(value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Use only the first model of each multi-model input.
    #[arg(long)]
    pub first_model: bool,

    /// Write the visualization script without launching the viewer.
    #[arg(long)]
    pub no_view: bool,

    /// Directory for intermediate and result files, overriding the config file.
    #[arg(short, long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Remove split model files left over from an earlier run before starting.
    #[arg(long)]
    pub force: bool,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `seq` subcommand.
#[derive(Args, Debug)]
pub struct SeqArgs {
    /// Structure files to read.
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_accepts_paths_and_flags() {
        let cli = Cli::parse_from([
            "pdboverlay",
            "-vv",
            "overlay",
            "a.pdb",
            "b.pdb",
            "--first-model",
            "--no-view",
            "--work-dir",
            "out",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Overlay(args) = cli.command else {
            panic!("Expected 'overlay' subcommand");
        };
        assert_eq!(args.inputs, vec![PathBuf::from("a.pdb"), PathBuf::from("b.pdb")]);
        assert!(args.first_model);
        assert!(args.no_view);
        assert!(!args.force);
        assert_eq!(args.work_dir, Some(PathBuf::from("out")));
        assert!(args.config.is_none());
    }

    #[test]
    fn overlay_without_paths_is_accepted_for_replay() {
        let cli = Cli::parse_from(["pdboverlay", "overlay"]);
        let Commands::Overlay(args) = cli.command else {
            panic!("Expected 'overlay' subcommand");
        };
        assert!(args.inputs.is_empty());
    }

    #[test]
    fn seq_requires_at_least_one_path() {
        assert!(Cli::try_parse_from(["pdboverlay", "seq"]).is_err());
        let cli = Cli::parse_from(["pdboverlay", "seq", "x.pdb", "--log-file", "run.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdboverlay", "-q", "-v", "seq", "x.pdb"]).is_err());
    }
}
