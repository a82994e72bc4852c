//! Attribute-versus-outcome comparison
//!
//! This module drives the whole analysis for one (dependent, independent)
//! attribute pair: it enumerates the observed values of both attributes,
//! cross-tabulates every combination, tests it for independence and collects
//! the results in an [`AnalysisReport`].
//!
//! # Value Order
//!
//! Values are enumerated in **first-seen order**: the order in which they first
//! appear while scanning the aggregate rows from the start. Null values are not
//! part of the domain. Results are emitted with the dependent value as the
//! outer loop and the independent value as the inner loop, so the same input
//! always yields the same sequence.
//!
//! # Degenerate Pairs
//!
//! A pair is skipped when no case matches the dependent value or when its
//! contingency table contains a zero cell. Each skip is logged as a warning
//! and recorded in [`AnalysisReport::skipped`].
//!
//! # Examples
//!
//! ```
//! use covistat_analysis::{
//!     aggregate::analyze,
//!     attribute::Attribute,
//!     record::{AgeGroup, CaseAggregate, InfectionStatus},
//! };
//!
//! let row = |sex: &str, infection_status, count| CaseAggregate {
//!     age_group: AgeGroup::Unknown,
//!     sex: Some(sex.to_owned()),
//!     nationality: None,
//!     infection_status,
//!     count,
//! };
//! let aggregates = [
//!     row("M", InfectionStatus::Infected, 10),
//!     row("M", InfectionStatus::Recovered, 5),
//!     row("F", InfectionStatus::Infected, 8),
//!     row("F", InfectionStatus::Recovered, 12),
//! ];
//!
//! let report = analyze(&aggregates, Attribute::Sex, Attribute::InfectionStatus)?;
//! assert_eq!(report.results.len(), 4);
//!
//! let first = &report.results[0];
//! assert_eq!((first.value.as_str(), first.outcome.as_str()), ("M", "infected"));
//! assert!((first.proportion - 10.0 / 15.0).abs() < 1e-12);
//! # Ok::<(), covistat_analysis::error::AnalysisError>(())
//! ```

use std::collections::HashSet;

use covistat_stats::independence::{ChiSquareTest, TestOutcome};
use serde::{Deserialize, Serialize};

use crate::{
    attribute::Attribute,
    contingency::build_contingency_table,
    error::{AnalysisError, DegenerateTable},
    record::CaseAggregate,
};

/// Test result for one (dependent value, independent value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The dependent variable.
    pub column: Attribute,
    /// Value of the dependent variable.
    pub value: String,
    /// Value of the independent variable.
    pub outcome: String,
    pub chi2: f64,
    pub p_value: f64,
    /// Share of the cases with `value` that have `outcome`, in `[0, 1]`.
    pub proportion: f64,
}

impl AnalysisResult {
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// A pair that was excluded from the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPair {
    pub value: String,
    pub outcome: String,
    pub reason: DegenerateTable,
}

/// All results of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub dependent: Attribute,
    pub independent: Attribute,
    /// Observed dependent values, in enumeration order.
    pub dependent_values: Vec<String>,
    /// Observed independent values, in enumeration order.
    pub independent_values: Vec<String>,
    /// Results for all non-degenerate pairs, dependent value major.
    pub results: Vec<AnalysisResult>,
    /// Degenerate pairs, in enumeration order.
    pub skipped: Vec<SkippedPair>,
}

impl AnalysisReport {
    /// Looks up the result for a pair, if it was not skipped.
    #[must_use]
    pub fn result(&self, value: &str, outcome: &str) -> Option<&AnalysisResult> {
        self.results
            .iter()
            .find(|result| result.value == value && result.outcome == outcome)
    }

    /// Number of (dependent value, independent value) pairs considered.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.dependent_values.len() * self.independent_values.len()
    }
}

/// Runs the chi-square comparison for attribute pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    test: ChiSquareTest,
}

impl Analyzer {
    #[must_use]
    pub const fn new(test: ChiSquareTest) -> Self {
        Self { test }
    }

    #[must_use]
    pub const fn test(&self) -> &ChiSquareTest {
        &self.test
    }

    /// Compares every observed `dependent` value against every observed
    /// `independent` value.
    ///
    /// # Errors
    ///
    /// Returns an error if both attributes are the same, or if case counts
    /// overflow while tabulating.
    pub fn analyze(
        &self,
        aggregates: &[CaseAggregate],
        dependent: Attribute,
        independent: Attribute,
    ) -> Result<AnalysisReport, AnalysisError> {
        if dependent == independent {
            return Err(AnalysisError::IdenticalAttributes {
                attribute: dependent,
            });
        }

        let dependent_values = distinct_values(aggregates, dependent);
        let independent_values = distinct_values(aggregates, independent);

        let mut results = vec![];
        let mut skipped = vec![];
        for value in &dependent_values {
            for outcome in &independent_values {
                let table =
                    build_contingency_table(aggregates, dependent, value, independent, outcome)?;

                let reason = if table.row_totals()[0] == 0 {
                    Some(DegenerateTable::ZeroDependentTotal)
                } else {
                    match self.test.test(&table) {
                        TestOutcome::Degenerate => Some(DegenerateTable::ZeroCell),
                        TestOutcome::Computed(chi_square) => {
                            let proportion = proportion(table.both_match(), table.row_totals()[0]);
                            log::debug!(
                                "[d:{value},i:{outcome}] table={:?} chi2={:.4} p={:.4} proportion={proportion:.4}",
                                table.cells(),
                                chi_square.chi2,
                                chi_square.p_value,
                            );
                            results.push(AnalysisResult {
                                column: dependent,
                                value: value.clone(),
                                outcome: outcome.clone(),
                                chi2: chi_square.chi2,
                                p_value: chi_square.p_value,
                                proportion,
                            });
                            None
                        }
                    }
                };

                if let Some(reason) = reason {
                    log::warn!(
                        "Contingency table [d:{value},i:{outcome}] {reason} and cannot be analyzed; skipped"
                    );
                    skipped.push(SkippedPair {
                        value: value.clone(),
                        outcome: outcome.clone(),
                        reason,
                    });
                }
            }
        }

        log::info!(
            "Analyzed {dependent} vs {independent}: {} of {} pairs tested, {} skipped",
            results.len(),
            dependent_values.len() * independent_values.len(),
            skipped.len(),
        );

        Ok(AnalysisReport {
            dependent,
            independent,
            dependent_values,
            independent_values,
            results,
            skipped,
        })
    }
}

/// Runs [`Analyzer::analyze`] with the default chi-square test.
///
/// # Errors
///
/// See [`Analyzer::analyze`].
pub fn analyze(
    aggregates: &[CaseAggregate],
    dependent: Attribute,
    independent: Attribute,
) -> Result<AnalysisReport, AnalysisError> {
    Analyzer::default().analyze(aggregates, dependent, independent)
}

/// Returns the non-null values of `attribute` in first-seen order.
#[must_use]
pub fn distinct_values(aggregates: &[CaseAggregate], attribute: Attribute) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = vec![];
    let mut null_rows = 0_usize;
    for row in aggregates {
        match row.value(attribute) {
            Some(value) => {
                if seen.insert(value) {
                    values.push(value.to_owned());
                }
            }
            None => null_rows += 1,
        }
    }
    if null_rows > 0 {
        log::debug!("{null_rows} aggregate rows have no {attribute} value");
    }
    values
}

#[expect(clippy::cast_precision_loss)]
fn proportion(matching: u64, total: u64) -> f64 {
    debug_assert!(total > 0 && matching <= total);
    matching as f64 / total as f64
}
