/// Closed interval deviation values are mapped onto for colouring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

impl TargetRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for TargetRange {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Linearly maps every defined deviation from `[0, observed max]` onto `range`.
///
/// Unset entries stay `None`. Returns the observed maximum before rescaling, `0.0` when no
/// deviation is defined. With an observed maximum of zero every defined value becomes
/// `range.min`.
pub fn rescale_deviations(deviations: &mut [Vec<Option<f64>>], range: &TargetRange) -> f64 {
    let observed_max = deviations
        .iter()
        .flatten()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max);

    for value in deviations.iter_mut().flatten().flatten() {
        *value = if observed_max > 0.0 {
            range.min + range.span() * (*value / observed_max)
        } else {
            range.min
        };
    }
    observed_max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_maps_maximum_to_top_of_range() {
        let mut deviations = vec![vec![Some(1.0), None, Some(4.0)], vec![Some(2.0)]];
        let max = rescale_deviations(&mut deviations, &TargetRange::default());

        assert_eq!(max, 4.0);
        assert_eq!(deviations, vec![vec![Some(25.0), None, Some(100.0)], vec![Some(50.0)]]);
    }

    #[test]
    fn rescale_respects_range_offset() {
        let mut deviations = vec![vec![Some(0.0), Some(2.0)]];
        rescale_deviations(&mut deviations, &TargetRange::new(10.0, 20.0));
        assert_eq!(deviations, vec![vec![Some(10.0), Some(20.0)]]);
    }

    #[test]
    fn rescale_with_zero_maximum_collapses_to_minimum() {
        let mut deviations = vec![vec![Some(0.0), None]];
        let max = rescale_deviations(&mut deviations, &TargetRange::new(5.0, 10.0));
        assert_eq!(max, 0.0);
        assert_eq!(deviations, vec![vec![Some(5.0), None]]);
    }

    #[test]
    fn rescale_of_unset_only_reports_zero() {
        let mut deviations = vec![vec![None, None]];
        assert_eq!(rescale_deviations(&mut deviations, &TargetRange::default()), 0.0);
        assert_eq!(deviations, vec![vec![None, None]]);
    }
}
