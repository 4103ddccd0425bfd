use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::path::Path;
use tracing::debug;

pub const SEQUENCE_LINE_WIDTH: usize = 50;

/// The one-letter sequence of one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSequence {
    pub chain_id: char,
    /// Number of residues in the chain, including those without a one-letter code.
    pub residue_count: usize,
    pub sequence: String,
}

/// Per-chain sequences in order of first chain appearance.
///
/// Cognate residues resolve to their parent's letter; unknown residues are left out of
/// the sequence but still counted.
pub fn chain_sequences(structure: &Structure) -> Vec<ChainSequence> {
    structure
        .chains()
        .into_iter()
        .map(|chain| ChainSequence {
            chain_id: chain.id,
            residue_count: chain.residues.len(),
            sequence: chain.sequence(),
        })
        .collect()
}

pub fn read_chain_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<ChainSequence>, PdbError> {
    let structure = PdbFile::read_from_path(path.as_ref())?;
    debug!(
        "{} residue(s) read from {}",
        structure.residue_count(),
        path.as_ref().display()
    );
    Ok(chain_sequences(&structure))
}

/// Formats one chain as `<chain>:<count> <sequence>`.
///
/// The count is right-aligned in five columns. The sequence wraps every
/// [`SEQUENCE_LINE_WIDTH`] letters; continuation lines are indented to where the sequence
/// starts. A blank chain identifier is shown as `-`.
pub fn format_chain_sequence(chain: &ChainSequence) -> String {
    let label = if chain.chain_id == ' ' {
        '-'
    } else {
        chain.chain_id
    };
    let prefix = format!("{}:{:>5} ", label, chain.residue_count);
    let indent = " ".repeat(prefix.len());

    let letters: Vec<char> = chain.sequence.chars().collect();
    if letters.is_empty() {
        return prefix.trim_end().to_string();
    }
    letters
        .chunks(SEQUENCE_LINE_WIDTH)
        .enumerate()
        .map(|(i, chunk)| {
            let lead = if i == 0 { &prefix } else { &indent };
            format!("{}{}", lead, chunk.iter().collect::<String>())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
