use crate::cli::OverlayArgs;
use crate::config::PartialOverlayConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pdboverlay::engine::config::OverlayConfig;
use pdboverlay::engine::progress::ProgressReporter;
use pdboverlay::workflows::{self, overlay::OverlayResult, split::planned_outputs};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

pub fn run(args: OverlayArgs, quiet: bool) -> Result<()> {
    let partial_config = PartialOverlayConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    debug!("Effective configuration: {:?}", config);

    let progress_handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    if args.inputs.is_empty() {
        info!(
            "No input paths given; replaying the run recorded in {}",
            config.work_dir.display()
        );
        let result = workflows::overlay::replay(&config, &reporter)?;
        print_summary(&result);
        return Ok(());
    }

    if args.force {
        remove_stale_outputs(&args.inputs, &config)?;
    }

    println!("Overlaying {} structure file(s)...", args.inputs.len());
    let result = workflows::overlay::run(&args.inputs, &config, &reporter)?;
    print_summary(&result);
    Ok(())
}

/// Deletes split model files an earlier run left in the work directory.
///
/// Inputs that do not exist or hold no models are skipped here; the workflow reports them.
fn remove_stale_outputs(inputs: &[PathBuf], config: &OverlayConfig) -> Result<()> {
    for input in inputs.iter().filter(|p| p.is_file()) {
        let Ok(targets) = planned_outputs(input, &config.work_dir, config.first_model_only) else {
            continue;
        };
        for target in targets.iter().filter(|t| t.exists()) {
            info!("--force specified, removing {:?}", target);
            fs::remove_file(target)?;
        }
    }
    Ok(())
}

fn print_summary(result: &OverlayResult) {
    match result.max_deviation {
        Some(max) => println!(
            "✓ Annotated {} structure(s); largest deviation from the mean: {:.2} Å",
            result.annotated.len(),
            max
        ),
        None => println!(
            "✓ Reopened {} annotated structure(s) from the previous run",
            result.annotated.len()
        ),
    }
    for path in &result.annotated {
        println!("  {}", path.display());
    }
    if result.viewer_launched {
        println!("Viewer closed.");
    } else {
        println!("Visualization script written to: {}", result.script.display());
    }
}
