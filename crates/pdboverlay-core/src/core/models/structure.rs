use super::atom::Atom;
use super::residue::Residue;

/// Temperature factor written for residues that carry no computed annotation.
pub const UNSET_B_FACTOR: f64 = -1.0;

/// A single model of a protein structure as an ordered list of residues.
///
/// Residue order follows the source file and never changes after construction; alignment
/// residue maps and deviation vectors are indexed by position in this list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    residues: Vec<Residue>,
}

/// A borrowed view of all residues sharing one chain identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainView<'a> {
    pub id: char,
    pub residues: Vec<&'a Residue>,
}

impl ChainView<'_> {
    /// One-letter sequence of the chain, skipping residues without a known code.
    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .filter_map(|r| r.one_letter_code())
            .collect()
    }
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.atoms().iter())
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms().len()).sum()
    }

    /// Groups residues by chain identifier, in order of first appearance.
    ///
    /// A chain whose residues are interrupted by another chain in the file is still
    /// reported once, with all of its residues in file order.
    pub fn chains(&self) -> Vec<ChainView<'_>> {
        let mut chains: Vec<ChainView<'_>> = Vec::new();
        for residue in &self.residues {
            match chains.iter_mut().find(|c| c.id == residue.chain_id) {
                Some(chain) => chain.residues.push(residue),
                None => chains.push(ChainView {
                    id: residue.chain_id,
                    residues: vec![residue],
                }),
            }
        }
        chains
    }

    /// One-letter sequence over the whole structure, skipping unknown residues.
    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .filter_map(|r| r.one_letter_code())
            .collect()
    }

    /// Residue indices of the characters of [`Structure::sequence`], in order.
    pub fn sequence_residue_indices(&self) -> Vec<usize> {
        self.residues
            .iter()
            .enumerate()
            .filter(|(_, r)| r.one_letter_code().is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Stores one annotation per residue in the temperature-factor field.
    ///
    /// `None` entries, and residues past the end of `values`, receive [`UNSET_B_FACTOR`].
    pub fn set_residue_b_factors(&mut self, values: &[Option<f64>]) {
        for (i, residue) in self.residues.iter_mut().enumerate() {
            let value = values.get(i).copied().flatten().unwrap_or(UNSET_B_FACTOR);
            residue.set_b_factor(value);
        }
    }
}

impl FromIterator<Atom> for Structure {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        let mut builder = StructureBuilder::new();
        for atom in iter {
            builder.add_atom(atom);
        }
        builder.build()
    }
}

#[derive(Debug, Default)]
pub struct StructureBuilder {
    structure: Structure,
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom, opening a new residue whenever the residue identity changes.
    pub fn add_atom(&mut self, atom: Atom) -> &mut Self {
        let residues = &mut self.structure.residues;
        let continues_residue = residues
            .last()
            .and_then(|r| r.atoms().first())
            .is_some_and(|first| first.same_residue_as(&atom));
        if !continues_residue {
            residues.push(Residue::from_atom(&atom));
        }
        if let Some(residue) = residues.last_mut() {
            residue.add_atom(atom);
        }
        self
    }

    pub fn build(self) -> Structure {
        self.structure
    }
}
