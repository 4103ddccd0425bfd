use std::io::{self, Write};

const FASTA_LINE_WIDTH: usize = 60;

/// A named sequence written to the aligner's input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(id: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            sequence: sequence.to_string(),
        }
    }
}

pub fn write_fasta(records: &[SequenceRecord], writer: &mut impl Write) -> io::Result<()> {
    for record in records {
        writeln!(writer, ">{}", record.id)?;
        let chars: Vec<char> = record.sequence.chars().collect();
        for chunk in chars.chunks(FASTA_LINE_WIDTH) {
            writeln!(writer, "{}", chunk.iter().collect::<String>())?;
        }
    }
    Ok(())
}

/// Writes the structure-to-sequence mapping consumed by the superposer.
///
/// One `<structure file> <sequence id>` pair per line.
pub fn write_structure_map(
    entries: &[(String, String)],
    writer: &mut impl Write,
) -> io::Result<()> {
    for (file_name, id) in entries {
        writeln!(writer, "{} {}", file_name, id)?;
    }
    Ok(())
}
