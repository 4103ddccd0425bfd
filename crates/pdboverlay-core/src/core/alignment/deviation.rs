use super::AlignedStructure;
use nalgebra::{Point3, distance};

/// Distance of each residue's Cα from the mean position of its alignment column.
///
/// The result holds one entry per residue of the structure. Residues that no column maps
/// to, whose column has no defined mean, or that lack a Cα stay `None`.
pub fn residue_deviations(
    aligned: &AlignedStructure,
    column_means: &[Option<Point3<f64>>],
) -> Vec<Option<f64>> {
    let mut deviations = vec![None; aligned.structure.residue_count()];
    for (column, entry) in aligned.map.iter().enumerate() {
        let Some(residue_index) = entry else {
            continue;
        };
        let Some(Some(mean)) = column_means.get(column) else {
            continue;
        };
        let Some(ca) = aligned
            .structure
            .residue(residue_index)
            .and_then(|r| r.alpha_carbon())
        else {
            continue;
        };
        deviations[residue_index] = Some(distance(&ca, mean));
    }
    deviations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::columns::{DEFAULT_COVERAGE_THRESHOLD, column_means};
    use crate::core::alignment::test_support::ca_structure;

    #[test]
    fn deviation_is_distance_to_column_mean() {
        let structures = vec![
            AlignedStructure::new("a", ca_structure(&[("GLY", [0.0, 0.0, 0.0])]), "G").unwrap(),
            AlignedStructure::new("b", ca_structure(&[("GLY", [6.0, 8.0, 0.0])]), "G").unwrap(),
        ];
        let means = column_means(&structures, DEFAULT_COVERAGE_THRESHOLD).unwrap();

        assert_eq!(residue_deviations(&structures[0], &means), vec![Some(5.0)]);
        assert_eq!(residue_deviations(&structures[1], &means), vec![Some(5.0)]);
    }

    #[test]
    fn uncovered_residue_stays_unset() {
        // The HOH residue is never addressed by a column.
        let structure = ca_structure(&[("ALA", [1.0, 0.0, 0.0]), ("HOH", [9.0; 3])]);
        let aligned = AlignedStructure::new("a", structure, "A").unwrap();
        let means = vec![Some(Point3::new(0.0, 0.0, 0.0))];

        assert_eq!(residue_deviations(&aligned, &means), vec![Some(1.0), None]);
    }

    #[test]
    fn undefined_column_mean_leaves_residue_unset() {
        let structure = ca_structure(&[("ALA", [1.0, 0.0, 0.0]), ("CYS", [2.0, 0.0, 0.0])]);
        let aligned = AlignedStructure::new("a", structure, "AC").unwrap();
        let means = vec![None, Some(Point3::new(2.0, 0.0, 0.0))];

        assert_eq!(residue_deviations(&aligned, &means), vec![None, Some(0.0)]);
    }

    #[test]
    fn deviation_is_indexed_by_residue_not_column() {
        let structure = ca_structure(&[("ALA", [0.0; 3]), ("CYS", [0.0, 3.0, 4.0])]);
        let aligned = AlignedStructure::new("a", structure, "--A--C").unwrap();
        let means = vec![None, None, Some(Point3::origin()), None, None, Some(Point3::origin())];

        let deviations = residue_deviations(&aligned, &means);
        assert_eq!(deviations.len(), 2);
        assert_eq!(deviations, vec![Some(0.0), Some(5.0)]);
    }
}
