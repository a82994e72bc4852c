use statrs::function::erf::erfc;

use crate::contingency::ContingencyTable;

/// Pearson chi-square statistic with its p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    /// Test statistic, always non-negative.
    pub chi2: f64,
    /// Upper-tail probability of `chi2` under one degree of freedom, in `[0, 1]`.
    pub p_value: f64,
}

/// Result of testing a single contingency table.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum TestOutcome {
    /// The table has a zero cell and the test was not computed.
    Degenerate,
    /// The test was computed.
    Computed(ChiSquare),
}

impl TestOutcome {
    /// Returns the computed statistic, or `None` for a degenerate table.
    #[must_use]
    pub fn computed(self) -> Option<ChiSquare> {
        match self {
            Self::Degenerate => None,
            Self::Computed(result) => Some(result),
        }
    }
}

/// Chi-square test of independence for 2×2 tables (one degree of freedom).
///
/// Tables containing a zero cell are reported as [`TestOutcome::Degenerate`]
/// instead of being tested, because their expected frequencies can vanish.
///
/// The continuity correction is disabled by default.
///
/// # Examples
///
/// ```
/// use covistat_stats::{contingency::ContingencyTable, independence::ChiSquareTest};
///
/// let test = ChiSquareTest::new();
///
/// let outcome = test.test(&ContingencyTable::new([[10, 5], [8, 12]]));
/// let result = outcome.computed().unwrap();
/// assert!((result.chi2 - 224_000.0 / 91_800.0).abs() < 1e-9);
/// assert!(result.p_value > 0.1 && result.p_value < 0.15);
///
/// let outcome = test.test(&ContingencyTable::new([[0, 5], [8, 12]]));
/// assert!(outcome.is_degenerate());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChiSquareTest {
    continuity_correction: bool,
}

impl ChiSquareTest {
    /// Creates a test without continuity correction.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            continuity_correction: false,
        }
    }

    /// Enables or disables Yates' continuity correction.
    ///
    /// With the correction, each `|O - E|` is reduced by 0.5 (but not below
    /// zero) before squaring.
    #[must_use]
    pub const fn with_continuity_correction(mut self, enabled: bool) -> Self {
        self.continuity_correction = enabled;
        self
    }

    #[must_use]
    pub const fn continuity_correction(&self) -> bool {
        self.continuity_correction
    }

    /// Runs the test on `table`.
    #[must_use]
    pub fn test(&self, table: &ContingencyTable) -> TestOutcome {
        if table.has_zero_cell() {
            return TestOutcome::Degenerate;
        }
        let chi2 = self.statistic(table);
        TestOutcome::Computed(ChiSquare {
            chi2,
            p_value: chi_square_1df_sf(chi2),
        })
    }

    #[expect(clippy::cast_precision_loss)]
    fn statistic(&self, table: &ContingencyTable) -> f64 {
        let observed = table.cells();
        let expected = table.expected();
        let mut chi2 = 0.0;
        for (observed_row, expected_row) in observed.iter().zip(&expected) {
            for (&o, &e) in observed_row.iter().zip(expected_row) {
                let mut diff = (o as f64 - e).abs();
                if self.continuity_correction {
                    diff = (diff - 0.5).max(0.0);
                }
                chi2 += diff * diff / e;
            }
        }
        chi2
    }
}

/// Survival function of the chi-square distribution with one degree of freedom.
///
/// For `k = 1`, `P(X > x) = erfc(sqrt(x / 2))`.
fn chi_square_1df_sf(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    erfc((x / 2.0).sqrt()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn computed(test: ChiSquareTest, cells: [[u64; 2]; 2]) -> ChiSquare {
        test.test(&ContingencyTable::new(cells))
            .computed()
            .expect("table has no zero cell")
    }

    #[test]
    fn test_matches_closed_form() {
        // chi2 = N (ad - bc)^2 / (r1 r2 c1 c2)
        let result = computed(ChiSquareTest::new(), [[10, 5], [8, 12]]);
        let closed_form = 35.0 * 80.0_f64.powi(2) / (15.0 * 20.0 * 18.0 * 17.0);
        assert!((result.chi2 - closed_form).abs() < 1e-9);
        assert!((result.p_value - 0.1183).abs() < 1e-3);
    }

    #[test]
    fn test_independent_table_has_zero_statistic() {
        let result = computed(ChiSquareTest::new(), [[10, 20], [30, 60]]);
        assert!(result.chi2.abs() < 1e-9);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_critical_value() {
        // The 5% critical value of chi-square with 1 df is 3.841.
        assert!((chi_square_1df_sf(3.841_458_820_694_124) - 0.05).abs() < 1e-6);
        assert!((chi_square_1df_sf(0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_strong_association_is_significant() {
        let result = computed(ChiSquareTest::new(), [[90, 10], [10, 90]]);
        assert!(result.chi2 > 100.0);
        assert!(result.p_value < 1e-6);
    }

    #[test]
    fn test_continuity_correction_reduces_statistic() {
        let cells = [[10, 5], [8, 12]];
        let plain = computed(ChiSquareTest::new(), cells);
        let corrected = computed(ChiSquareTest::new().with_continuity_correction(true), cells);
        assert!(corrected.chi2 < plain.chi2);
        assert!(corrected.p_value > plain.p_value);

        // |ad - bc| = 80, N = 35: corrected chi2 = N (|ad - bc| - N/2)^2 / (r1 r2 c1 c2)
        let closed_form = 35.0 * (80.0_f64 - 17.5).powi(2) / (15.0 * 20.0 * 18.0 * 17.0);
        assert!((corrected.chi2 - closed_form).abs() < 1e-9);
    }

    #[test]
    fn test_continuity_correction_floors_at_zero() {
        let corrected = computed(
            ChiSquareTest::new().with_continuity_correction(true),
            [[10, 11], [10, 10]],
        );
        assert!(corrected.chi2.abs() < 1e-12);
    }

    #[test]
    fn test_zero_cells_are_degenerate() {
        let test = ChiSquareTest::new();
        for cells in [
            [[0, 1], [1, 1]],
            [[1, 0], [1, 1]],
            [[1, 1], [0, 1]],
            [[1, 1], [1, 0]],
            [[0, 0], [0, 0]],
        ] {
            assert!(test.test(&ContingencyTable::new(cells)).is_degenerate());
        }
    }

    #[test]
    fn test_statistic_and_p_value_ranges() {
        let test = ChiSquareTest::new();
        for a in 1..6 {
            for b in 1..6 {
                for c in 1..6 {
                    for d in [1, 7, 50] {
                        let result = computed(test, [[a, b], [c, d]]);
                        assert!(result.chi2 >= 0.0);
                        assert!((0.0..=1.0).contains(&result.p_value));
                    }
                }
            }
        }
    }
}
