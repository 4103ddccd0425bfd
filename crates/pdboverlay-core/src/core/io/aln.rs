use crate::core::alignment::AlignmentError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const HEADER_WORDS: [&str; 2] = ["CLUSTAL", "MUSCLE"];

/// A multiple sequence alignment keyed by sequence identifier.
///
/// Rows keep the order in which identifiers first appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    rows: Vec<(String, String)>,
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `segment` to the row of `id`, creating the row if needed.
    pub fn extend_row(&mut self, id: &str, segment: &str) {
        match self.rows.iter_mut().find(|(row_id, _)| row_id == id) {
            Some((_, row)) => row.push_str(segment),
            None => self.rows.push((id.to_string(), segment.to_string())),
        }
    }

    pub fn row(&self, id: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, row)| row.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns shared by every row.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError::Empty`] for an alignment without rows or columns and
    /// [`AlignmentError::RaggedAlignment`] when rows differ in length.
    pub fn width(&self) -> Result<usize, AlignmentError> {
        let mut rows = self.rows.iter();
        let (_, first) = rows.next().ok_or(AlignmentError::Empty)?;
        let width = first.chars().count();
        if width == 0 {
            return Err(AlignmentError::Empty);
        }
        for (id, row) in rows {
            let len = row.chars().count();
            if len != width {
                return Err(AlignmentError::RaggedAlignment {
                    expected: width,
                    found: len,
                    id: id.clone(),
                });
            }
        }
        Ok(width)
    }

    /// Reads a Clustal-style alignment.
    ///
    /// Blank lines and indented lines (conservation markup) are skipped, as is a first
    /// line starting with the word `CLUSTAL` or `MUSCLE`. Every other line is `<id> <segment> [residue count]`; segments are
    /// concatenated per identifier.
    pub fn read_clustal(reader: &mut impl BufRead) -> Result<Self, AlignmentError> {
        let mut alignment = Self::new();
        let mut first_line = true;
        for line_res in reader.lines() {
            let line = line_res?;
            if line.trim().is_empty() {
                continue;
            }
            let is_header = first_line && is_header_line(&line);
            first_line = false;
            if is_header || line.starts_with(char::is_whitespace) {
                continue;
            }
            let mut tokens = line.split_whitespace();
            if let (Some(id), Some(segment)) = (tokens.next(), tokens.next()) {
                alignment.extend_row(id, segment);
            }
        }
        Ok(alignment)
    }

    pub fn read_clustal_path<P: AsRef<Path>>(path: P) -> Result<Self, AlignmentError> {
        let file = File::open(path)?;
        Self::read_clustal(&mut BufReader::new(file))
    }
}

fn is_header_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| HEADER_WORDS.contains(&word))
}
