//! Raw case classification and grouping
//!
//! Data sources that only have per-case rows use this module to bucket them
//! and group them into [`CaseAggregate`]s the same way the case database query
//! does. The analysis itself never re-groups rows.
//!
//! # Buckets
//!
//! | Age            | Bucket    |
//! |----------------|-----------|
//! | 0 to 17        | `0-17`    |
//! | 18 to 25       | `18-25`   |
//! | 26 to 35       | `26-35`   |
//! | 36 to 50       | `36-50`   |
//! | 51 to 65       | `51-65`   |
//! | above 65       | `65+`     |
//! | anything else  | `unknown` |
//!
//! | Current status                                   | Outcome     |
//! |--------------------------------------------------|-------------|
//! | `admitted`, `isolated`, `quarantined`, `in hospital` | `infected`  |
//! | `dead`, `deceased`, `died`                        | `deceased`  |
//! | `recovered`                                       | `recovered` |
//! | anything else                                     | `unknown`   |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{AgeGroup, CaseAggregate, InfectionStatus, nullable};

/// A single, ungrouped case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(deserialize_with = "nullable")]
    pub age: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub sex: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub nationality: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub current_status: Option<String>,
}

impl AgeGroup {
    /// Buckets an age in years. Bucket bounds are inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use covistat_analysis::record::AgeGroup;
    ///
    /// assert_eq!(AgeGroup::from_age(Some(17.0)), AgeGroup::UpTo17);
    /// assert_eq!(AgeGroup::from_age(Some(65.0)), AgeGroup::From51To65);
    /// assert_eq!(AgeGroup::from_age(Some(66.0)), AgeGroup::Over65);
    /// assert_eq!(AgeGroup::from_age(None), AgeGroup::Unknown);
    /// ```
    #[must_use]
    pub fn from_age(age: Option<f64>) -> Self {
        const BUCKETS: [(f64, f64, AgeGroup); 5] = [
            (0.0, 17.0, AgeGroup::UpTo17),
            (18.0, 25.0, AgeGroup::From18To25),
            (26.0, 35.0, AgeGroup::From26To35),
            (36.0, 50.0, AgeGroup::From36To50),
            (51.0, 65.0, AgeGroup::From51To65),
        ];

        let Some(age) = age else {
            return Self::Unknown;
        };
        if let Some(&(_, _, group)) = BUCKETS
            .iter()
            .find(|(low, high, _)| (*low..=*high).contains(&age))
        {
            return group;
        }
        if age > 65.0 {
            Self::Over65
        } else {
            Self::Unknown
        }
    }
}

impl InfectionStatus {
    /// Maps a free-text case status to an outcome.
    ///
    /// Matching ignores ASCII case and trailing whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use covistat_analysis::record::InfectionStatus;
    ///
    /// assert_eq!(
    ///     InfectionStatus::from_current_status(Some("In Hospital")),
    ///     InfectionStatus::Infected
    /// );
    /// assert_eq!(
    ///     InfectionStatus::from_current_status(Some("died")),
    ///     InfectionStatus::Deceased
    /// );
    /// assert_eq!(
    ///     InfectionStatus::from_current_status(Some("migrated")),
    ///     InfectionStatus::Unknown
    /// );
    /// ```
    #[must_use]
    pub fn from_current_status(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return Self::Unknown;
        };
        match status.trim_end().to_ascii_lowercase().as_str() {
            "admitted" | "isolated" | "quarantined" | "in hospital" => Self::Infected,
            "dead" | "deceased" | "died" => Self::Deceased,
            "recovered" => Self::Recovered,
            _ => Self::Unknown,
        }
    }
}

/// Buckets and groups raw case records into aggregates.
///
/// The result holds one row per distinct (age group, sex, nationality,
/// infection status), ordered by those keys with null values first.
#[must_use]
pub fn group_case_records<'a, I>(records: I) -> Vec<CaseAggregate>
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    type Key = (AgeGroup, Option<String>, Option<String>, InfectionStatus);

    let mut groups = BTreeMap::<Key, u64>::new();
    for record in records {
        let key = (
            AgeGroup::from_age(record.age),
            record.sex.clone(),
            record.nationality.clone(),
            InfectionStatus::from_current_status(record.current_status.as_deref()),
        );
        *groups.entry(key).or_default() += 1;
    }

    groups
        .into_iter()
        .map(
            |((age_group, sex, nationality, infection_status), count)| CaseAggregate {
                age_group,
                sex,
                nationality,
                infection_status,
                count,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: Option<f64>, sex: Option<&str>, status: &str) -> CaseRecord {
        CaseRecord {
            age,
            sex: sex.map(str::to_owned),
            nationality: Some("India".to_owned()),
            current_status: Some(status.to_owned()),
        }
    }

    #[test]
    fn test_age_bucket_bounds() {
        let cases = [
            (0.0, AgeGroup::UpTo17),
            (17.0, AgeGroup::UpTo17),
            (18.0, AgeGroup::From18To25),
            (25.0, AgeGroup::From18To25),
            (26.0, AgeGroup::From26To35),
            (35.0, AgeGroup::From26To35),
            (36.0, AgeGroup::From36To50),
            (50.0, AgeGroup::From36To50),
            (51.0, AgeGroup::From51To65),
            (65.0, AgeGroup::From51To65),
            (65.5, AgeGroup::Over65),
            (101.0, AgeGroup::Over65),
        ];
        for (age, expected) in cases {
            assert_eq!(AgeGroup::from_age(Some(age)), expected, "age {age}");
        }
    }

    #[test]
    fn test_ages_outside_buckets_are_unknown() {
        assert_eq!(AgeGroup::from_age(Some(-1.0)), AgeGroup::Unknown);
        assert_eq!(AgeGroup::from_age(Some(17.5)), AgeGroup::Unknown);
        assert_eq!(AgeGroup::from_age(Some(f64::NAN)), AgeGroup::Unknown);
        assert_eq!(AgeGroup::from_age(None), AgeGroup::Unknown);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            ("admitted", InfectionStatus::Infected),
            ("isolated", InfectionStatus::Infected),
            ("Quarantined", InfectionStatus::Infected),
            ("in hospital  ", InfectionStatus::Infected),
            ("dead", InfectionStatus::Deceased),
            ("DECEASED", InfectionStatus::Deceased),
            ("died", InfectionStatus::Deceased),
            ("recovered", InfectionStatus::Recovered),
            ("  recovered", InfectionStatus::Unknown),
            ("migrated", InfectionStatus::Unknown),
        ];
        for (status, expected) in cases {
            assert_eq!(
                InfectionStatus::from_current_status(Some(status)),
                expected,
                "status {status:?}"
            );
        }
        assert_eq!(
            InfectionStatus::from_current_status(None),
            InfectionStatus::Unknown
        );
    }

    #[test]
    fn test_grouping_counts_and_orders_rows() {
        let records = [
            record(Some(30.0), Some("M"), "recovered"),
            record(Some(20.0), Some("F"), "isolated"),
            record(Some(31.0), Some("M"), "recovered"),
            record(Some(20.0), None, "isolated"),
            record(Some(22.0), Some("F"), "admitted"),
        ];
        let aggregates = group_case_records(&records);

        let summary = aggregates
            .iter()
            .map(|row| {
                (
                    row.age_group,
                    row.sex.as_deref(),
                    row.infection_status,
                    row.count,
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            [
                (AgeGroup::From18To25, None, InfectionStatus::Infected, 1),
                (AgeGroup::From18To25, Some("F"), InfectionStatus::Infected, 2),
                (AgeGroup::From26To35, Some("M"), InfectionStatus::Recovered, 2),
            ]
        );
        let total = aggregates.iter().map(|row| row.count).sum::<u64>();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_grouping_empty_input() {
        assert!(group_case_records(&Vec::<CaseRecord>::new()).is_empty());
    }

    #[test]
    fn test_parse_raw_record() {
        let record: CaseRecord = serde_json::from_str(
            r#"{"age":null,"sex":"M","nationality":null,"current_status":"Hospitalized"}"#,
        )
        .unwrap();
        assert_eq!(record.age, None);
        assert_eq!(
            InfectionStatus::from_current_status(record.current_status.as_deref()),
            InfectionStatus::Unknown
        );
    }
}
