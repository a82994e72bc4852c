use covistat_stats::contingency::ContingencyTable;

use crate::{attribute::Attribute, error::AnalysisError, record::CaseAggregate};

/// Cross-tabulates case counts for one (dependent value, independent value) pair.
///
/// Each aggregate row falls into exactly one cell depending on whether its
/// `dependent` attribute equals `dependent_value` and whether its `independent`
/// attribute equals `independent_value`; its `count` is added to that cell.
/// Null attribute values never match. Values absent from the data are not
/// rejected: they simply produce an empty row or column.
///
/// # Errors
///
/// Returns [`AnalysisError::CountOverflow`] if the total case count exceeds
/// `u64::MAX`.
///
/// # Examples
///
/// ```
/// use covistat_analysis::{
///     attribute::Attribute,
///     contingency::build_contingency_table,
///     record::{AgeGroup, CaseAggregate, InfectionStatus},
/// };
///
/// let row = |sex: &str, infection_status, count| CaseAggregate {
///     age_group: AgeGroup::Unknown,
///     sex: Some(sex.to_owned()),
///     nationality: None,
///     infection_status,
///     count,
/// };
/// let aggregates = [
///     row("M", InfectionStatus::Infected, 10),
///     row("M", InfectionStatus::Recovered, 5),
///     row("F", InfectionStatus::Infected, 8),
///     row("F", InfectionStatus::Recovered, 12),
/// ];
///
/// let table = build_contingency_table(
///     &aggregates,
///     Attribute::Sex,
///     "M",
///     Attribute::InfectionStatus,
///     "infected",
/// )?;
/// assert_eq!(table.cells(), [[10, 5], [8, 12]]);
/// # Ok::<(), covistat_analysis::error::AnalysisError>(())
/// ```
pub fn build_contingency_table(
    aggregates: &[CaseAggregate],
    dependent: Attribute,
    dependent_value: &str,
    independent: Attribute,
    independent_value: &str,
) -> Result<ContingencyTable, AnalysisError> {
    aggregates
        .iter()
        .try_fold(ContingencyTable::default(), |table, row| {
            let dependent_matches = row.value(dependent) == Some(dependent_value);
            let independent_matches = row.value(independent) == Some(independent_value);
            table.checked_add(dependent_matches, independent_matches, row.count)
        })
        .ok_or_else(|| AnalysisError::CountOverflow {
            value: dependent_value.to_owned(),
            outcome: independent_value.to_owned(),
        })
}
