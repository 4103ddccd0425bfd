//! Translation of a multiple sequence alignment back onto structure residues.
//!
//! An alignment row is first turned into a [`residue_map::ResidueMap`]; the maps of all
//! structures then drive the per-column mean positions ([`columns`]), the per-residue
//! deviations from those means ([`deviation`]), and the final rescaling for colouring
//! ([`rescale`]).

pub mod columns;
pub mod deviation;
pub mod rescale;
pub mod residue_map;

use crate::core::models::structure::Structure;
use residue_map::ResidueMap;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Alignment is empty")]
    Empty,
    #[error("Alignment row '{id}' has {found} columns, expected {expected}")]
    RaggedAlignment {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Alignment has no row for sequence '{0}'")]
    MissingRow(String),
    #[error(
        "Alignment row '{id}' holds {aligned} residues but the structure sequence has {sequence}"
    )]
    LengthMismatch {
        id: String,
        aligned: usize,
        sequence: usize,
    },
}

/// A structure paired with its alignment row and the residue map derived from it.
#[derive(Debug, Clone)]
pub struct AlignedStructure {
    pub id: String,
    pub structure: Structure,
    pub row: Vec<char>,
    pub map: ResidueMap,
}

impl AlignedStructure {
    /// Builds the residue map for `row` and resolves it against `structure`.
    ///
    /// # Errors
    ///
    /// Fails if the row is empty or if its residue count differs from the length of the
    /// structure's sequence.
    pub fn new(id: &str, structure: Structure, row: &str) -> Result<Self, AlignmentError> {
        let sequence = structure.sequence_residue_indices();
        let raw = ResidueMap::from_row(row)?;
        let map = raw
            .resolve(&sequence)
            .ok_or_else(|| AlignmentError::LengthMismatch {
                id: id.to_string(),
                aligned: raw.residue_count(),
                sequence: sequence.len(),
            })?;
        Ok(Self {
            id: id.to_string(),
            structure,
            row: row.chars().collect(),
            map,
        })
    }

    pub fn width(&self) -> usize {
        self.row.len()
    }

    /// The aligned character at `column`, `None` past the end of the row.
    pub fn aligned_char(&self, column: usize) -> Option<char> {
        self.row.get(column).copied()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::Structure;
    use nalgebra::Point3;

    /// Builds a structure with one Cα per residue at the given positions.
    pub fn ca_structure(residues: &[(&str, [f64; 3])]) -> Structure {
        residues
            .iter()
            .enumerate()
            .map(|(i, (name, [x, y, z]))| {
                Atom::new("CA", name, 'A', i as i32 + 1, Point3::new(*x, *y, *z))
            })
            .collect()
    }
}
