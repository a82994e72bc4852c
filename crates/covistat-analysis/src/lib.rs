//! Association analysis between case demographics and outcomes
//!
//! This crate determines whether a categorical case attribute (age group, sex,
//! nationality) is statistically associated with another (typically the
//! infection outcome), value by value.
//!
//! # Overview
//!
//! The analysis consumes pre-grouped case counts and proceeds in three steps:
//!
//! 1. **Enumerate Values** ([`aggregate::distinct_values`]): Collect the observed
//!    values of both attributes in first-seen order
//! 2. **Cross-Tabulate** ([`contingency::build_contingency_table`]): Build one 2×2
//!    table per (dependent value, independent value) pair
//! 3. **Test and Collect** ([`aggregate::Analyzer`]): Run a chi-square test of
//!    independence on each table, skip degenerate tables, and record the share
//!    of cases with the outcome
//!
//! ```text
//! CaseAggregate rows
//!     ↓
//! for each dependent value × independent value
//!     ↓
//! ContingencyTable ──(zero cell / zero total)──→ SkippedPair
//!     ↓
//! ChiSquareTest
//!     ↓
//! AnalysisResult (chi2, p-value, proportion)
//!     ↓
//! AnalysisReport
//! ```
//!
//! Raw per-case rows can be bucketed and grouped with [`classify`] before the
//! analysis. Column identifiers are turned into display labels with
//! [`label::format_label`].
//!
//! # Examples
//!
//! ```
//! use covistat_analysis::{
//!     aggregate::Analyzer,
//!     attribute::Attribute,
//!     classify::{CaseRecord, group_case_records},
//! };
//! use covistat_stats::independence::ChiSquareTest;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let records: Vec<CaseRecord> = serde_json::from_str(
//!     r#"[
//!         {"age": 34, "sex": "M", "nationality": "India", "current_status": "recovered"},
//!         {"age": 71, "sex": "F", "nationality": "India", "current_status": "deceased"}
//!     ]"#,
//! )?;
//! let aggregates = group_case_records(&records);
//!
//! let analyzer = Analyzer::new(ChiSquareTest::new());
//! let report = analyzer.analyze(&aggregates, Attribute::Sex, Attribute::InfectionStatus)?;
//!
//! for result in &report.results {
//!     println!(
//!         "{} / {}: chi2={:.3} p={:.3} proportion={:.2}",
//!         result.value, result.outcome, result.chi2, result.p_value, result.proportion
//!     );
//! }
//! for skipped in &report.skipped {
//!     println!("[d:{},i:{}] {}", skipped.value, skipped.outcome, skipped.reason);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod attribute;
pub mod classify;
pub mod contingency;
pub mod error;
pub mod label;
pub mod record;
