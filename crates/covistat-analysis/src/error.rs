use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;

/// Error that aborts an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("dependent and independent variables must differ (both are '{attribute}')")]
    IdenticalAttributes { attribute: Attribute },
    #[display("case count overflow while tabulating [d:{value},i:{outcome}]")]
    CountOverflow { value: String, outcome: String },
}

/// Reason a (dependent value, independent value) pair cannot be tested.
///
/// This is recoverable: the pair is skipped and the analysis continues.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateTable {
    /// No case matches the dependent value, so its proportion is undefined.
    #[display("has no cases for the dependent value")]
    ZeroDependentTotal,
    /// The contingency table contains a zero cell.
    #[display("contains zeroes")]
    ZeroCell,
}
