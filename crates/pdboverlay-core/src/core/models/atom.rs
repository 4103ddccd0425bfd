use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// The record type an atom was read from.
///
/// Only the two coordinate-carrying record types are modelled; every other line of a
/// structure file is ignored by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    /// Standard polymer atom (`ATOM`).
    #[default]
    Atom,
    /// Heterogen atom such as a ligand, ion or water (`HETATM`).
    Hetatm,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Atom => "ATOM",
            RecordKind::Hetatm => "HETATM",
        }
    }
}

impl FromStr for RecordKind {
    type Err = ();

    /// Parses the trimmed record name found in columns 1-6.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(RecordKind::Atom),
            "HETATM" => Ok(RecordKind::Hetatm),
            _ => Err(()),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One coordinate record of a structure file.
///
/// All fixed-width fields are retained so that a structure can be written back without
/// losing information. Text fields are stored trimmed; `alt_loc`, `chain_id` and
/// `insertion_code` are `' '` when blank in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Whether the atom came from an `ATOM` or `HETATM` record.
    pub kind: RecordKind,
    /// Atom serial number exactly as written in the source file.
    pub serial: String,
    /// The name of the atom (e.g., "CA", "N", "OXT").
    pub name: String,
    /// Alternate location indicator.
    pub alt_loc: char,
    /// Residue name (e.g., "ALA", "HSD").
    pub res_name: String,
    /// Chain identifier.
    pub chain_id: char,
    /// Residue sequence number.
    pub res_seq: i32,
    /// Residue insertion code.
    pub insertion_code: char,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy, 1.0 when absent from the record.
    pub occupancy: f64,
    /// Temperature factor; also used as the per-residue annotation slot.
    pub b_factor: f64,
    /// Element symbol, possibly empty.
    pub element: String,
    /// Formal charge text, possibly empty.
    pub charge: String,
}

impl Atom {
    /// Creates an `ATOM` record with blank optional fields.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name.
    /// * `res_name` - The residue name the atom belongs to.
    /// * `chain_id` - The chain identifier.
    /// * `res_seq` - The residue sequence number.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        name: &str,
        res_name: &str,
        chain_id: char,
        res_seq: i32,
        position: Point3<f64>,
    ) -> Self {
        Self {
            kind: RecordKind::Atom,
            serial: String::new(),
            name: name.to_string(),
            alt_loc: ' ',
            res_name: res_name.to_string(),
            chain_id,
            res_seq,
            insertion_code: ' ',
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            element: String::new(),
            charge: String::new(),
        }
    }

    /// Returns `true` if this atom and `other` belong to the same residue instance.
    pub fn same_residue_as(&self, other: &Atom) -> bool {
        self.chain_id == other.chain_id
            && self.res_seq == other.res_seq
            && self.insertion_code == other.insertion_code
            && self.res_name == other.res_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new("CA", "ALA", 'A', 7, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.kind, RecordKind::Atom);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.res_name, "ALA");
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.res_seq, 7);
        assert_eq!(atom.alt_loc, ' ');
        assert_eq!(atom.insertion_code, ' ');
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.b_factor, 0.0);
        assert!(atom.serial.is_empty());
    }

    #[test]
    fn record_kind_parses_known_records_only() {
        assert_eq!(RecordKind::from_str("ATOM"), Ok(RecordKind::Atom));
        assert_eq!(RecordKind::from_str("HETATM"), Ok(RecordKind::Hetatm));
        assert_eq!(RecordKind::from_str("ATOM  "), Ok(RecordKind::Atom));
        assert_eq!(RecordKind::from_str("ANISOU"), Err(()));
        assert_eq!(RecordKind::from_str("atom"), Err(()));
    }

    #[test]
    fn record_kind_displays_record_name() {
        assert_eq!(RecordKind::Atom.to_string(), "ATOM");
        assert_eq!(RecordKind::Hetatm.to_string(), "HETATM");
    }

    #[test]
    fn same_residue_compares_residue_identity_fields() {
        let a = Atom::new("N", "GLY", 'A', 1, Point3::origin());
        let b = Atom::new("CA", "GLY", 'A', 1, Point3::origin());
        let mut c = b.clone();
        c.insertion_code = 'A';
        let d = Atom::new("CA", "GLY", 'B', 1, Point3::origin());

        assert!(a.same_residue_as(&b));
        assert!(!a.same_residue_as(&c));
        assert!(!a.same_residue_as(&d));
    }
}
