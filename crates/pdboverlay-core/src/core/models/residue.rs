use super::atom::Atom;
use crate::core::utils::identifiers::{ALPHA_CARBON, one_letter_code};
use nalgebra::Point3;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,                      // Residue name as found in the file (e.g., "ALA", "HSD")
    pub chain_id: char,                    // Chain identifier, ' ' when blank
    pub number: i32,                       // Residue sequence number from source file
    pub insertion_code: char,              // Insertion code, ' ' when blank
    atoms: Vec<Atom>,                      // Atoms in file order
    atom_name_map: HashMap<String, usize>, // First atom index for each atom name
}

impl Residue {
    pub fn new(name: &str, chain_id: char, number: i32, insertion_code: char) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            number,
            insertion_code,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn from_atom(atom: &Atom) -> Self {
        Self::new(&atom.res_name, atom.chain_id, atom.res_seq, atom.insertion_code)
    }

    // Alternate locations share a name; lookups resolve to the first one.
    pub(crate) fn add_atom(&mut self, atom: Atom) {
        let index = self.atoms.len();
        self.atom_name_map.entry(atom.name.clone()).or_insert(index);
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atom_name_map.get(name).map(|&i| &self.atoms[i])
    }

    pub fn position(&self, atom_name: &str) -> Option<Point3<f64>> {
        self.atom(atom_name).map(|a| a.position)
    }

    pub fn alpha_carbon(&self) -> Option<Point3<f64>> {
        self.position(ALPHA_CARBON)
    }

    /// One-letter amino-acid code, `None` for residues outside the standard twenty.
    pub fn one_letter_code(&self) -> Option<char> {
        one_letter_code(&self.name)
    }

    /// Writes the same temperature factor onto every atom of the residue.
    pub fn set_b_factor(&mut self, value: f64) {
        for atom in &mut self.atoms {
            atom.b_factor = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, x: f64) -> Atom {
        Atom::new(name, "SER", 'A', 3, Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::new("GLY", 'B', 10, ' ');
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, 'B');
        assert_eq!(residue.number, 10);
        assert!(residue.atoms().is_empty());
        assert!(residue.atom("CA").is_none());
    }

    #[test]
    fn from_atom_copies_residue_identity() {
        let mut first = atom("N", 0.0);
        first.insertion_code = 'B';
        let residue = Residue::from_atom(&first);
        assert_eq!(residue.name, "SER");
        assert_eq!(residue.chain_id, 'A');
        assert_eq!(residue.number, 3);
        assert_eq!(residue.insertion_code, 'B');
    }

    #[test]
    fn add_atom_maps_names_to_positions() {
        let mut residue = Residue::new("SER", 'A', 3, ' ');
        residue.add_atom(atom("N", 0.0));
        residue.add_atom(atom("CA", 1.0));
        residue.add_atom(atom("OG", 2.0));

        assert_eq!(residue.atoms().len(), 3);
        assert_eq!(residue.position("OG"), Some(Point3::new(2.0, 0.0, 0.0)));
        assert_eq!(residue.alpha_carbon(), Some(Point3::new(1.0, 0.0, 0.0)));
        assert!(residue.position("CB").is_none());
    }

    #[test]
    fn duplicate_atom_names_resolve_to_first_occurrence() {
        let mut residue = Residue::new("SER", 'A', 3, ' ');
        let mut alt_a = atom("CA", 1.0);
        alt_a.alt_loc = 'A';
        let mut alt_b = atom("CA", 5.0);
        alt_b.alt_loc = 'B';
        residue.add_atom(alt_a);
        residue.add_atom(alt_b);

        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.atom("CA").unwrap().alt_loc, 'A');
    }

    #[test]
    fn residue_without_alpha_carbon_has_no_representative_position() {
        let mut residue = Residue::new("HOH", 'W', 1, ' ');
        residue.add_atom(Atom::new("O", "HOH", 'W', 1, Point3::origin()));
        assert!(residue.alpha_carbon().is_none());
        assert!(residue.one_letter_code().is_none());
    }

    #[test]
    fn set_b_factor_updates_every_atom() {
        let mut residue = Residue::new("SER", 'A', 3, ' ');
        residue.add_atom(atom("N", 0.0));
        residue.add_atom(atom("CA", 1.0));
        residue.set_b_factor(-1.0);
        assert!(residue.atoms().iter().all(|a| a.b_factor == -1.0));
    }
}
