use crate::core::alignment::columns::column_means;
use crate::core::alignment::deviation::residue_deviations;
use crate::core::alignment::rescale::rescale_deviations;
use crate::core::alignment::{AlignedStructure, AlignmentError};
use crate::core::io::aln::Alignment;
use crate::core::io::fasta::{SequenceRecord, write_fasta, write_structure_map};
use crate::core::io::manifest::Manifest;
use crate::core::io::pdb::PdbFile;
use crate::core::io::script::{ScriptObject, write_pymol_script};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::engine::config::OverlayConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tools::{ExternalTool, ToolArguments, ToolOutcome};
use crate::workflows::split::{planned_outputs, split_models};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const SEQUENCES_FILE: &str = "sequences.fasta";
pub const STRUCTURE_MAP_FILE: &str = "structures.map";
pub const ALIGNMENT_FILE: &str = "alignment.aln";
pub const SCRIPT_FILE: &str = "overlay.pml";
pub const MANIFEST_FILE: &str = "overlay.manifest";
pub const ANNOTATED_PREFIX: &str = "overlay-";

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayResult {
    /// Deviation-annotated structures, one per split model.
    pub annotated: Vec<PathBuf>,
    pub script: PathBuf,
    /// Largest deviation before rescaling, in Å; `None` for a replayed run.
    pub max_deviation: Option<f64>,
    pub viewer_launched: bool,
}

/// A split model as it moves through the pipeline.
#[derive(Debug, Clone)]
struct ModelEntry {
    file_name: String,
    sequence_id: String,
}

impl ModelEntry {
    fn annotated_name(&self) -> String {
        format!("{}{}", ANNOTATED_PREFIX, self.file_name)
    }
}

#[instrument(skip_all, name = "overlay_workflow")]
pub fn run(
    inputs: &[PathBuf],
    config: &OverlayConfig,
    reporter: &ProgressReporter,
) -> Result<OverlayResult, EngineError> {
    if inputs.is_empty() {
        return Err(EngineError::NoInputs);
    }
    validate_inputs(inputs)?;
    let work_dir = config.work_dir.as_path();
    fs::create_dir_all(work_dir)?;
    info!(
        "Overlaying {} input file(s) in {}",
        inputs.len(),
        work_dir.display()
    );

    let split_files = reporter.phase("Splitting models", || {
        split_inputs(inputs, config, reporter)
    })?;
    let entries = model_entries(&split_files);

    reporter.phase("Aligning sequences", || {
        write_sequences(work_dir, &split_files, &entries)?;
        let args = ToolArguments::new()
            .with("input", SEQUENCES_FILE)
            .with("output", ALIGNMENT_FILE);
        run_tool(
            &config.tools.aligner,
            work_dir,
            &args,
            &[PathBuf::from(ALIGNMENT_FILE)],
        )
    })?;

    let alignment = Alignment::read_clustal_path(work_dir.join(ALIGNMENT_FILE))?;
    alignment.width()?;
    for entry in &entries {
        if alignment.row(&entry.sequence_id).is_none() {
            return Err(AlignmentError::MissingRow(entry.sequence_id.clone()).into());
        }
    }

    reporter.phase("Superposing structures", || {
        let args = ToolArguments::new()
            .with("alignment", ALIGNMENT_FILE)
            .with("map", STRUCTURE_MAP_FILE)
            .with_structures(entries.iter().map(|e| e.file_name.clone()).collect());
        let expected: Vec<PathBuf> = entries
            .iter()
            .map(|e| superposed_name(config, e).into())
            .collect();
        run_tool(&config.tools.superposer, work_dir, &args, &expected)
    })?;

    let (annotated, max_deviation) = reporter.phase("Computing deviations", || {
        annotate_structures(work_dir, config, &entries, &alignment, reporter)
    })?;

    write_script(work_dir, config, &entries)?;
    Manifest::new(inputs.to_vec(), config.first_model_only)
        .write_to_path(work_dir.join(MANIFEST_FILE))?;

    let viewer_launched = launch_viewer(work_dir, config)?;
    info!(
        "Overlay complete: {} annotated structure(s), maximum deviation {:.2} Å",
        annotated.len(),
        max_deviation
    );
    Ok(OverlayResult {
        annotated,
        script: work_dir.join(SCRIPT_FILE),
        max_deviation: Some(max_deviation),
        viewer_launched,
    })
}

/// Re-opens the results of the last completed run in the work directory.
///
/// The inputs and model choice recorded in the manifest only determine the annotated file
/// names; nothing is split, aligned or superposed again. The script is regenerated and the viewer is
/// launched unless disabled.
#[instrument(skip_all, name = "overlay_replay")]
pub fn replay(
    config: &OverlayConfig,
    reporter: &ProgressReporter,
) -> Result<OverlayResult, EngineError> {
    let work_dir = config.work_dir.as_path();
    let manifest_path = work_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(EngineError::ManifestNotFound(manifest_path));
    }
    let manifest = Manifest::read_from_path(&manifest_path)?;
    if manifest.inputs.is_empty() {
        return Err(EngineError::NoInputs);
    }
    validate_inputs(&manifest.inputs)?;
    reporter.report(Progress::Message(format!(
        "Replaying overlay of {} input file(s)",
        manifest.inputs.len()
    )));

    let mut split_files = Vec::new();
    for input in &manifest.inputs {
        for planned in planned_outputs(input, work_dir, manifest.first_model_only)? {
            if !split_files.contains(&planned) {
                split_files.push(planned);
            }
        }
    }
    let entries = model_entries(&split_files);

    let annotated: Vec<PathBuf> = entries
        .iter()
        .map(|e| work_dir.join(e.annotated_name()))
        .collect();
    let missing: Vec<PathBuf> = annotated.iter().filter(|p| !p.is_file()).cloned().collect();
    if !missing.is_empty() {
        return Err(EngineError::MissingOutput {
            tool: "previous overlay run".to_string(),
            missing,
        });
    }

    write_script(work_dir, config, &entries)?;
    let viewer_launched = launch_viewer(work_dir, config)?;
    Ok(OverlayResult {
        annotated,
        script: work_dir.join(SCRIPT_FILE),
        max_deviation: None,
        viewer_launched,
    })
}

fn validate_inputs(inputs: &[PathBuf]) -> Result<(), EngineError> {
    match inputs.iter().find(|p| !p.is_file()) {
        Some(missing) => Err(EngineError::MissingInput(missing.clone())),
        None => Ok(()),
    }
}

fn split_inputs(
    inputs: &[PathBuf],
    config: &OverlayConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: inputs.len() as u64,
    });
    let mut split_files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        for file in split_models(input, &config.work_dir, config.first_model_only)? {
            if split_files.contains(&file) {
                warn!("{} was produced twice; using it once", file.display());
                continue;
            }
            split_files.push(file);
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    info!("{} model file(s) ready", split_files.len());
    Ok(split_files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn model_entries(split_files: &[PathBuf]) -> Vec<ModelEntry> {
    let file_names: Vec<String> = split_files.iter().map(|p| file_name_of(p)).collect();
    sequence_ids(&file_names)
        .into_iter()
        .zip(file_names)
        .map(|(sequence_id, file_name)| ModelEntry {
            file_name,
            sequence_id,
        })
        .collect()
}

/// Sequence identifiers for the aligner, derived from file stems.
///
/// Characters other than ASCII alphanumerics, `-` and `_` become `_`; repeated identifiers
/// get a `_2`, `_3`, ... suffix.
pub fn sequence_ids(file_names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    file_names
        .iter()
        .map(|name| {
            let stem = Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut base: String = stem
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            if base.is_empty() {
                base.push_str("structure");
            }
            let mut id = base.clone();
            let mut n = 2;
            while !seen.insert(id.clone()) {
                id = format!("{}_{}", base, n);
                n += 1;
            }
            id
        })
        .collect()
}

fn load_structure(path: &Path) -> Result<Structure, EngineError> {
    PdbFile::read_from_path(path).map_err(|source| EngineError::Structure {
        path: path.to_path_buf(),
        source,
    })
}

fn write_sequences(
    work_dir: &Path,
    split_files: &[PathBuf],
    entries: &[ModelEntry],
) -> Result<(), EngineError> {
    let mut records = Vec::with_capacity(entries.len());
    for (path, entry) in split_files.iter().zip(entries) {
        let sequence = load_structure(path)?.sequence();
        if sequence.is_empty() {
            warn!("{} has no residues with a known sequence", entry.file_name);
        }
        records.push(SequenceRecord::new(&entry.sequence_id, &sequence));
    }
    let map: Vec<(String, String)> = entries
        .iter()
        .map(|e| (e.file_name.clone(), e.sequence_id.clone()))
        .collect();

    let mut fasta = BufWriter::new(File::create(work_dir.join(SEQUENCES_FILE))?);
    write_fasta(&records, &mut fasta)?;
    fasta.flush()?;
    let mut map_file = BufWriter::new(File::create(work_dir.join(STRUCTURE_MAP_FILE))?);
    write_structure_map(&map, &mut map_file)?;
    map_file.flush()?;
    debug!("Wrote {} sequence record(s)", records.len());
    Ok(())
}

fn superposed_name(config: &OverlayConfig, entry: &ModelEntry) -> String {
    format!("{}{}", config.tools.superposed_prefix, entry.file_name)
}

fn annotate_structures(
    work_dir: &Path,
    config: &OverlayConfig,
    entries: &[ModelEntry],
    alignment: &Alignment,
    reporter: &ProgressReporter,
) -> Result<(Vec<PathBuf>, f64), EngineError> {
    let mut aligned = Vec::with_capacity(entries.len());
    for entry in entries {
        let structure = load_structure(&work_dir.join(superposed_name(config, entry)))?;
        let row = alignment
            .row(&entry.sequence_id)
            .ok_or_else(|| AlignmentError::MissingRow(entry.sequence_id.clone()))?;
        aligned.push(AlignedStructure::new(&entry.sequence_id, structure, row)?);
    }

    let means = column_means(&aligned, config.coverage_threshold)?;
    let mut deviations: Vec<Vec<Option<f64>>> = aligned
        .iter()
        .map(|a| residue_deviations(a, &means))
        .collect();
    let max_deviation = rescale_deviations(&mut deviations, &config.bfactor_range);
    debug!("Maximum deviation before rescaling: {:.3}", max_deviation);

    reporter.report(Progress::TaskStart {
        total_steps: entries.len() as u64,
    });
    let mut annotated = Vec::with_capacity(entries.len());
    for ((mut structure, values), entry) in aligned.into_iter().zip(deviations).zip(entries) {
        structure.structure.set_residue_b_factors(&values);
        let path = work_dir.join(entry.annotated_name());
        PdbFile::write_to_path(&structure.structure, &path).map_err(|source| {
            EngineError::Structure {
                path: path.clone(),
                source,
            }
        })?;
        annotated.push(path);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    Ok((annotated, max_deviation))
}

fn write_script(
    work_dir: &Path,
    config: &OverlayConfig,
    entries: &[ModelEntry],
) -> Result<(), EngineError> {
    let objects: Vec<ScriptObject> = entries
        .iter()
        .map(|e| ScriptObject {
            path: PathBuf::from(e.annotated_name()),
            name: e.sequence_id.clone(),
        })
        .collect();
    let mut writer = BufWriter::new(File::create(work_dir.join(SCRIPT_FILE))?);
    write_pymol_script(&objects, &config.bfactor_range, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn launch_viewer(work_dir: &Path, config: &OverlayConfig) -> Result<bool, EngineError> {
    if !config.show_viewer {
        info!("Viewer disabled; script left at {}", work_dir.join(SCRIPT_FILE).display());
        return Ok(false);
    }
    let args = ToolArguments::new().with("script", SCRIPT_FILE);
    run_tool(&config.tools.viewer, work_dir, &args, &[])?;
    Ok(true)
}

fn run_tool(
    tool: &ExternalTool,
    work_dir: &Path,
    args: &ToolArguments,
    expected_outputs: &[PathBuf],
) -> Result<(), EngineError> {
    match tool.run(work_dir, args, expected_outputs)? {
        ToolOutcome::Success => Ok(()),
        ToolOutcome::ToolFailure { status, stderr } => Err(EngineError::ToolFailed {
            tool: tool.name.clone(),
            status,
            stderr,
        }),
        ToolOutcome::MissingOutput { missing } => Err(EngineError::MissingOutput {
            tool: tool.name.clone(),
            missing,
        }),
    }
}
