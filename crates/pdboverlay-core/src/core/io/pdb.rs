use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, RecordKind};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

const END_OF_MODEL: &str = "ENDMDL";
const END_OF_FILE: &str = "END";

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn char_at(line: &str, index: usize) -> char {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

/// Parses one `ATOM`/`HETATM` line.
///
/// Returns `None` for any other record type and for atom records whose residue number or
/// coordinates do not parse; such lines are skipped by every reader in this crate.
/// Occupancy and temperature factor fall back to `1.0` and `0.0` when absent.
pub fn parse_atom_record(line: &str) -> Option<Atom> {
    let kind = RecordKind::from_str(slice_and_trim(line, 0, 6)).ok()?;

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return None;
    }
    let res_seq: i32 = slice_and_trim(line, 22, 26).parse().ok()?;
    let x: f64 = slice_and_trim(line, 30, 38).parse().ok()?;
    let y: f64 = slice_and_trim(line, 38, 46).parse().ok()?;
    let z: f64 = slice_and_trim(line, 46, 54).parse().ok()?;
    let occupancy = slice_and_trim(line, 54, 60).parse().unwrap_or(1.0);
    let b_factor = slice_and_trim(line, 60, 66).parse().unwrap_or(0.0);

    Some(Atom {
        kind,
        serial: slice_and_trim(line, 6, 11).to_string(),
        name: name.to_string(),
        alt_loc: char_at(line, 16),
        res_name: slice_and_trim(line, 17, 21).to_string(),
        chain_id: char_at(line, 21),
        res_seq,
        insertion_code: char_at(line, 26),
        position: Point3::new(x, y, z),
        occupancy,
        b_factor,
        element: slice_and_trim(line, 76, 78).to_string(),
        charge: slice_and_trim(line, 78, 80).to_string(),
    })
}

/// Formats an atom as a fixed-width coordinate record.
pub fn format_atom_record(atom: &Atom) -> String {
    // Names shorter than four characters start in column 14 unless they begin with a digit.
    let name = if atom.name.len() >= 4 || atom.name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{:<4}", atom.name)
    } else {
        format!(" {:<3}", atom.name)
    };
    let line = format!(
        "{:<6}{:>5} {}{}{:<4}{}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:<2}",
        atom.kind.as_str(),
        atom.serial,
        name,
        atom.alt_loc,
        atom.res_name,
        atom.chain_id,
        atom.res_seq,
        atom.insertion_code,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.b_factor,
        atom.element,
        atom.charge,
    );
    line.trim_end().to_string()
}

/// Reads every model of a structure file as separate atom lists.
///
/// Models are delimited by `ENDMDL`; reading stops at `END`. Models without any atom
/// records are dropped, so a file with no `ENDMDL` yields at most one model.
pub fn read_models(reader: &mut impl BufRead) -> Result<Vec<Vec<Atom>>, PdbError> {
    let mut models = Vec::new();
    let mut current = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let record_type = slice_and_trim(&line, 0, 6);
        match record_type {
            "ATOM" | "HETATM" => match parse_atom_record(&line) {
                Some(atom) => current.push(atom),
                None => trace!("Skipping malformed atom record on line {}", line_num + 1),
            },
            END_OF_MODEL => {
                if !current.is_empty() {
                    models.push(std::mem::take(&mut current));
                }
            }
            END_OF_FILE => break,
            _ => {}
        }
    }
    if !current.is_empty() {
        models.push(current);
    }
    Ok(models)
}

pub struct PdbFile;

impl PdbFile {
    pub fn write_atoms<'a>(
        atoms: impl IntoIterator<Item = &'a Atom>,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        for atom in atoms {
            writeln!(writer, "{}", format_atom_record(atom))?;
        }
        writeln!(writer, "{}", END_OF_FILE)?;
        Ok(())
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    /// Reads the first model of the file.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let models = read_models(reader)?;
        Ok(models.into_iter().next().unwrap_or_default().into_iter().collect())
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        Self::write_atoms(structure.atoms(), writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const N_LINE: &str =
        "ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N";
    const CA_LINE: &str =
        "ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00 12.50           C";
    const GLY_LINE: &str =
        "ATOM      3  CA  GLY A   2      13.050   6.300  -5.000  1.00  0.00           C";
    const HOH_LINE: &str =
        "HETATM    4  O   HOH W   1       1.000   2.000   3.000  1.00  0.00           O";

    fn read(text: &str) -> Structure {
        PdbFile::read_from(&mut Cursor::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn parse_atom_record_reads_fixed_width_fields() {
        let atom = parse_atom_record(CA_LINE).unwrap();
        assert_eq!(atom.kind, RecordKind::Atom);
        assert_eq!(atom.serial, "2");
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.res_name, "ALA");
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.res_seq, 1);
        assert_eq!(atom.insertion_code, ' ');
        assert_eq!(atom.position, Point3::new(11.639, 6.071, -5.147));
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.b_factor, 12.5);
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn parse_atom_record_reads_hetatm_records() {
        let atom = parse_atom_record(HOH_LINE).unwrap();
        assert_eq!(atom.kind, RecordKind::Hetatm);
        assert_eq!(atom.res_name, "HOH");
        assert_eq!(atom.chain_id, 'W');
    }

    #[test]
    fn parse_atom_record_defaults_missing_trailing_fields() {
        let short = &CA_LINE[..54];
        let atom = parse_atom_record(short).unwrap();
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.b_factor, 0.0);
        assert!(atom.element.is_empty());
    }

    #[test]
    fn parse_atom_record_rejects_malformed_and_foreign_lines() {
        assert!(parse_atom_record("REMARK   1 nothing to see").is_none());
        assert!(parse_atom_record("ATOM      2  CA  ALA A   1      11.6").is_none());
        let bad_coord = CA_LINE.replace("11.639", "xx.xxx");
        assert!(parse_atom_record(&bad_coord).is_none());
        assert!(parse_atom_record("").is_none());
    }

    #[test]
    fn format_atom_record_reproduces_standard_layout() {
        let atom = parse_atom_record(N_LINE).unwrap();
        assert_eq!(format_atom_record(&atom), N_LINE);
        let atom = parse_atom_record(CA_LINE).unwrap();
        assert_eq!(format_atom_record(&atom), CA_LINE);
    }

    #[test]
    fn format_atom_record_left_aligns_four_character_names() {
        let mut atom = parse_atom_record(CA_LINE).unwrap();
        atom.name = "HD21".to_string();
        assert_eq!(&format_atom_record(&atom)[12..16], "HD21");
        atom.name = "1HB".to_string();
        assert_eq!(&format_atom_record(&atom)[12..16], "1HB ");
    }

    #[test]
    fn read_from_skips_unrelated_and_malformed_lines() {
        let text = format!(
            "HEADER    TEST\nREMARK garbage\n{}\nATOM   bad line\n{}\n{}\nEND\n",
            N_LINE, CA_LINE, GLY_LINE
        );
        let structure = read(&text);
        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.atom_count(), 3);
        assert_eq!(structure.sequence(), "AG");
    }

    #[test]
    fn read_models_splits_on_end_of_model_and_drops_empty_models() {
        let text = format!(
            "MODEL        1\n{}\nENDMDL\nMODEL        2\nENDMDL\nMODEL        3\n{}\n{}\nENDMDL\nEND\n",
            N_LINE, CA_LINE, GLY_LINE
        );
        let models = read_models(&mut Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].len(), 1);
        assert_eq!(models[1].len(), 2);
    }

    #[test]
    fn read_from_uses_first_model_only() {
        let text = format!("{}\nENDMDL\n{}\nENDMDL\n", CA_LINE, GLY_LINE);
        let structure = read(&text);
        assert_eq!(structure.residue_count(), 1);
        assert_eq!(structure.residues()[0].name, "ALA");
    }

    #[test]
    fn write_then_read_preserves_annotations() {
        let mut structure = read(&format!("{}\n{}\n{}\n", N_LINE, CA_LINE, GLY_LINE));
        structure.set_residue_b_factors(&[Some(3.25), None]);

        let mut buffer = Vec::new();
        PdbFile::write_to(&structure, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("END\n"));

        let reread = read(&text);
        let b: Vec<f64> = reread.atoms().map(|a| a.b_factor).collect();
        assert_eq!(b, vec![3.25, 3.25, -1.0]);
    }
}
