use super::AlignmentError;
use crate::core::utils::identifiers::GAP;

/// Maps each alignment column to a residue index, or `None` for a gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueMap {
    entries: Vec<Option<usize>>,
}

impl ResidueMap {
    /// Builds the map by counting non-gap characters from the left.
    ///
    /// Entry `i` is the number of non-gap characters before column `i` when column `i` is
    /// itself a non-gap, so the values address positions in the ungapped sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError::Empty`] for an empty row.
    pub fn from_row(row: &str) -> Result<Self, AlignmentError> {
        if row.is_empty() {
            return Err(AlignmentError::Empty);
        }
        let mut count = 0;
        let entries = row
            .chars()
            .map(|c| {
                if c == GAP {
                    None
                } else {
                    count += 1;
                    Some(count - 1)
                }
            })
            .collect();
        Ok(Self { entries })
    }

    /// Rewrites sequence positions as residue indices through `residue_indices`.
    ///
    /// Returns `None` unless the map covers exactly `residue_indices.len()` positions.
    pub fn resolve(&self, residue_indices: &[usize]) -> Option<Self> {
        if self.residue_count() != residue_indices.len() {
            return None;
        }
        let entries = self
            .entries
            .iter()
            .map(|entry| entry.map(|pos| residue_indices[pos]))
            .collect();
        Some(Self { entries })
    }

    pub fn entries(&self) -> &[Option<usize>] {
        &self.entries
    }

    pub fn get(&self, column: usize) -> Option<usize> {
        self.entries.get(column).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.entries.iter().copied()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of columns that map to a residue.
    pub fn residue_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}
