//! Statistical primitives for categorical case data.
//!
//! This crate provides the numerical building blocks used by the case analysis:
//!
//! - **Contingency tables**: 2×2 cross-tabulations of case counts
//! - **Independence testing**: Pearson chi-square test with one degree of freedom
//!
//! # Modules
//!
//! - [`contingency`]: The 2×2 [`ContingencyTable`](contingency::ContingencyTable) type
//! - [`independence`]: The [`ChiSquareTest`](independence::ChiSquareTest) and its outcome
//!
//! # Examples
//!
//! ## Testing a table
//!
//! ```
//! use covistat_stats::{
//!     contingency::ContingencyTable,
//!     independence::{ChiSquareTest, TestOutcome},
//! };
//!
//! let table = ContingencyTable::new([[10, 5], [8, 12]]);
//! match ChiSquareTest::new().test(&table) {
//!     TestOutcome::Computed(result) => {
//!         assert!(result.chi2 >= 0.0);
//!         assert!((0.0..=1.0).contains(&result.p_value));
//!     }
//!     TestOutcome::Degenerate => unreachable!("no zero cell"),
//! }
//! ```
//!
//! ## Degenerate tables
//!
//! ```
//! use covistat_stats::{contingency::ContingencyTable, independence::ChiSquareTest};
//!
//! let table = ContingencyTable::new([[10, 0], [8, 12]]);
//! assert!(ChiSquareTest::new().test(&table).is_degenerate());
//! ```

pub mod contingency;
pub mod independence;
