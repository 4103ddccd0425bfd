use super::{AlignedStructure, AlignmentError};
use crate::core::utils::geometry::centroid;
use nalgebra::Point3;
use tracing::debug;

/// Fraction of structures that must contribute before a column mean is defined.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.75;

/// Cα position a structure contributes at `column`, if any.
///
/// A structure contributes only when the column maps to one of its residues, that
/// residue's one-letter code equals the aligned character, and the residue has a Cα.
pub fn column_contribution(aligned: &AlignedStructure, column: usize) -> Option<Point3<f64>> {
    let residue = aligned.structure.residue(aligned.map.get(column)?)?;
    if residue.one_letter_code()? != aligned.aligned_char(column)? {
        return None;
    }
    residue.alpha_carbon()
}

/// Computes the mean Cα position of every alignment column.
///
/// A column's mean is defined only when at least `coverage_threshold` of all structures
/// contribute a position (see [`column_contribution`]); otherwise it is `None`.
///
/// # Errors
///
/// Returns [`AlignmentError::Empty`] without structures and
/// [`AlignmentError::RaggedAlignment`] if the rows differ in width.
pub fn column_means(
    structures: &[AlignedStructure],
    coverage_threshold: f64,
) -> Result<Vec<Option<Point3<f64>>>, AlignmentError> {
    let first = structures.first().ok_or(AlignmentError::Empty)?;
    let width = first.width();
    if let Some(ragged) = structures.iter().find(|s| s.width() != width) {
        return Err(AlignmentError::RaggedAlignment {
            id: ragged.id.clone(),
            expected: width,
            found: ragged.width(),
        });
    }

    let required = coverage_threshold * structures.len() as f64;
    let means: Vec<Option<Point3<f64>>> = (0..width)
        .map(|column| {
            let points: Vec<Point3<f64>> = structures
                .iter()
                .filter_map(|s| column_contribution(s, column))
                .collect();
            if points.len() as f64 >= required {
                centroid(&points)
            } else {
                None
            }
        })
        .collect();

    debug!(
        "{} of {} columns have a defined mean position",
        means.iter().filter(|m| m.is_some()).count(),
        width
    );
    Ok(means)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::test_support::ca_structure;

    fn aligned(id: &str, residues: &[(&str, [f64; 3])], row: &str) -> AlignedStructure {
        AlignedStructure::new(id, ca_structure(residues), row).unwrap()
    }

    #[test]
    fn full_coverage_column_is_the_arithmetic_mean() {
        let structures = vec![
            aligned("a", &[("GLY", [0.0, 0.0, 0.0])], "G"),
            aligned("b", &[("GLY", [2.0, 0.0, 0.0])], "G"),
            aligned("c", &[("GLY", [2.0, 4.0, 0.0])], "G"),
            aligned("d", &[("GLY", [0.0, 4.0, 8.0])], "G"),
        ];
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();
        assert_eq!(means, vec![Some(Point3::new(1.0, 2.0, 2.0))]);
    }

    #[test]
    fn half_coverage_column_is_undefined() {
        let structures = vec![
            aligned("a", &[("GLY", [0.0; 3]), ("ALA", [1.0; 3])], "GA"),
            aligned("b", &[("GLY", [0.0; 3]), ("ALA", [1.0; 3])], "GA"),
            aligned("c", &[("GLY", [0.0; 3])], "G-"),
            aligned("d", &[("GLY", [0.0; 3])], "G-"),
        ];
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();
        assert!(means[0].is_some());
        assert!(means[1].is_none());
    }

    #[test]
    fn three_of_four_meets_the_threshold() {
        let structures = vec![
            aligned("a", &[("ALA", [0.0; 3])], "A"),
            aligned("b", &[("ALA", [3.0; 3])], "A"),
            aligned("c", &[("ALA", [6.0; 3])], "A"),
            aligned("d", &[], "-"),
        ];
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();
        assert_eq!(means, vec![Some(Point3::new(3.0, 3.0, 3.0))]);
    }

    #[test]
    fn mismatched_letter_does_not_contribute() {
        let mut b = aligned("b", &[("GLY", [4.0, 0.0, 0.0])], "G");
        b.row = vec!['A'];
        let structures = vec![aligned("a", &[("GLY", [0.0; 3])], "G"), b];

        assert!(column_contribution(&structures[1], 0).is_none());
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();
        assert!(means[0].is_none());
    }

    #[test]
    fn example_alignment_column_with_matching_cysteines_is_eligible() {
        let structures = vec![
            aligned(
                "a",
                &[("ALA", [0.0; 3]), ("CYS", [1.0, 0.0, 0.0]), ("ASP", [0.0; 3])],
                "AC-D",
            ),
            aligned(
                "b",
                &[("CYS", [3.0, 0.0, 0.0]), ("VAL", [0.0; 3]), ("ASP", [2.0; 3])],
                "-CVD",
            ),
        ];
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();

        assert_eq!(means.len(), 4);
        assert!(means[0].is_none());
        assert_eq!(means[1], Some(Point3::new(2.0, 0.0, 0.0)));
        assert!(means[2].is_none());
        assert_eq!(means[3], Some(Point3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn residue_without_alpha_carbon_does_not_contribute() {
        use crate::core::models::atom::Atom;
        let structure: crate::core::models::structure::Structure =
            vec![Atom::new("CB", "ALA", 'A', 1, Point3::origin())]
                .into_iter()
                .collect();
        let without_ca = AlignedStructure::new("x", structure, "A").unwrap();
        assert!(column_contribution(&without_ca, 0).is_none());
    }

    #[test]
    fn column_means_validates_input() {
        assert!(matches!(column_means(&[], 0.75), Err(AlignmentError::Empty)));

        let structures = vec![
            aligned("a", &[("ALA", [0.0; 3])], "A"),
            aligned("b", &[("ALA", [0.0; 3])], "A-"),
        ];
        assert!(matches!(
            column_means(&structures, 0.75),
            Err(AlignmentError::RaggedAlignment { expected: 1, found: 2, .. })
        ));
    }
}
