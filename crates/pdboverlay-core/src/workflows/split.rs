use crate::core::io::pdb::{PdbError, PdbFile, read_models};
use crate::core::models::atom::Atom;
use crate::core::utils::identifiers::{is_cognate, parent_residue_name};
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No atom records found in '{}'", .0.display())]
    NoModels(PathBuf),
    #[error("Refusing to overwrite '{}', which holds different content", .0.display())]
    OutputExists(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SplitError + '_ {
    move |source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_all_models(input: &Path) -> Result<Vec<Vec<Atom>>, SplitError> {
    let file = fs::File::open(input).map_err(io_error(input))?;
    read_models(&mut BufReader::new(file)).map_err(|e| match e {
        PdbError::Io(source) => SplitError::Io {
            path: input.to_path_buf(),
            source,
        },
    })
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string())
}

/// Output file names for an input holding `model_count` models.
///
/// A single emitted model keeps the plain `<stem>.pdb` name; several models are numbered
/// `<stem>-1.pdb`, `<stem>-2.pdb`, ...
pub fn model_file_names(input: &Path, model_count: usize, first_model_only: bool) -> Vec<String> {
    let stem = file_stem(input);
    if model_count <= 1 || first_model_only {
        vec![format!("{}.pdb", stem)]
    } else {
        (1..=model_count)
            .map(|i| format!("{}-{}.pdb", stem, i))
            .collect()
    }
}

/// The files [`split_models`] writes for `input`, without writing them.
pub fn planned_outputs(
    input: &Path,
    out_dir: &Path,
    first_model_only: bool,
) -> Result<Vec<PathBuf>, SplitError> {
    let models = read_all_models(input)?;
    if models.is_empty() {
        return Err(SplitError::NoModels(input.to_path_buf()));
    }
    Ok(model_file_names(input, models.len(), first_model_only)
        .into_iter()
        .map(|name| out_dir.join(name))
        .collect())
}

fn write_unless_identical(path: &Path, content: &[u8]) -> Result<(), SplitError> {
    if path.exists() {
        let existing = fs::read(path).map_err(io_error(path))?;
        if existing == content {
            debug!("{:?} is already up to date", path);
            return Ok(());
        }
        return Err(SplitError::OutputExists(path.to_path_buf()));
    }
    fs::write(path, content).map_err(io_error(path))
}

fn normalized_model_bytes(model: Vec<Atom>, target: &Path) -> Result<Vec<u8>, SplitError> {
    let mut renamed = 0;
    let atoms: Vec<Atom> = model
        .into_iter()
        .map(|mut atom| {
            if is_cognate(&atom.res_name) {
                renamed += 1;
                atom.res_name = parent_residue_name(&atom.res_name).to_string();
            }
            atom
        })
        .collect();
    if renamed > 0 {
        debug!("Renamed {} cognate atom record(s) for {:?}", renamed, target);
    }
    let mut buffer = Vec::new();
    PdbFile::write_atoms(&atoms, &mut buffer).map_err(|e| match e {
        PdbError::Io(source) => SplitError::Io {
            path: target.to_path_buf(),
            source,
        },
    })?;
    Ok(buffer)
}

/// Splits a structure file into one file per model inside `out_dir`.
///
/// An input with a single model is copied byte-for-byte. Otherwise each model is written
/// with cognate residue names replaced by their parent name; with `first_model_only`
/// only the first model is written. Existing outputs with identical content are kept;
/// differing ones are never overwritten.
///
/// # Errors
///
/// Fails if the input has no atom records, an output exists with different content, or
/// on any I/O error.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn split_models(
    input: &Path,
    out_dir: &Path,
    first_model_only: bool,
) -> Result<Vec<PathBuf>, SplitError> {
    let mut models = read_all_models(input)?;
    if models.is_empty() {
        return Err(SplitError::NoModels(input.to_path_buf()));
    }
    let names = model_file_names(input, models.len(), first_model_only);

    if models.len() == 1 {
        let target = out_dir.join(&names[0]);
        let original = fs::read(input).map_err(io_error(input))?;
        write_unless_identical(&target, &original)?;
        info!("Copied single-model file to {:?}", target);
        return Ok(vec![target]);
    }

    if first_model_only {
        models.truncate(1);
    }
    info!("Splitting {} model(s)", models.len());

    let mut outputs = Vec::with_capacity(models.len());
    for (model, name) in models.into_iter().zip(names) {
        let target = out_dir.join(name);
        write_unless_identical(&target, &normalized_model_bytes(model, &target)?)?;
        outputs.push(target);
    }
    Ok(outputs)
}
