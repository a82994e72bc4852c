//! Case aggregate records
//!
//! A [`CaseAggregate`] is one pre-grouped row delivered by the case data
//! source: a distinct combination of the four categorical attributes together
//! with the number of cases sharing it.
//!
//! # Serialization
//!
//! Rows are read from and written to JSON with the source's column names:
//!
//! ```json
//! {
//!   "age_group": "26-35",
//!   "sex": "M",
//!   "nationality": "India",
//!   "infection_status": "recovered",
//!   "count": 12
//! }
//! ```
//!
//! All five columns must be present. `sex` and `nationality` may be `null`;
//! `count` may be an integer or a decimal string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::attribute::Attribute;

/// Age bucket of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "0-17")]
    UpTo17,
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-50")]
    From36To50,
    #[serde(rename = "51-65")]
    From51To65,
    #[serde(rename = "65+")]
    Over65,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AgeGroup {
    pub const ALL: [Self; 7] = [
        Self::UpTo17,
        Self::From18To25,
        Self::From26To35,
        Self::From36To50,
        Self::From51To65,
        Self::Over65,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpTo17 => "0-17",
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To50 => "36-50",
            Self::From51To65 => "51-65",
            Self::Over65 => "65+",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Outcome status of a case.
///
/// Variants are declared in the lexical order of their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfectionStatus {
    Deceased,
    Infected,
    Recovered,
    Unknown,
}

impl InfectionStatus {
    pub const ALL: [Self; 4] = [
        Self::Deceased,
        Self::Infected,
        Self::Recovered,
        Self::Unknown,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deceased => "deceased",
            Self::Infected => "infected",
            Self::Recovered => "recovered",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InfectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Number of cases sharing one combination of attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseAggregate {
    pub age_group: AgeGroup,
    #[serde(deserialize_with = "nullable")]
    pub sex: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub nationality: Option<String>,
    pub infection_status: InfectionStatus,
    #[serde(deserialize_with = "case_count")]
    pub count: u64,
}

impl CaseAggregate {
    /// Returns the value of `attribute` for this row, or `None` if it is null.
    #[must_use]
    pub fn value(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::AgeGroup => Some(self.age_group.as_str()),
            Attribute::Sex => self.sex.as_deref(),
            Attribute::Nationality => self.nationality.as_deref(),
            Attribute::InfectionStatus => Some(self.infection_status.as_str()),
        }
    }
}

/// Deserializes a nullable column that must still be present.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn case_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Integer(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Integer(count) => Ok(count),
        Count::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid case count '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<CaseAggregate, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_parse_complete_row() {
        let row = parse(
            r#"{"age_group":"65+","sex":"F","nationality":"India","infection_status":"deceased","count":3}"#,
        )
        .unwrap();
        assert_eq!(row.age_group, AgeGroup::Over65);
        assert_eq!(row.value(Attribute::Sex), Some("F"));
        assert_eq!(row.value(Attribute::Nationality), Some("India"));
        assert_eq!(row.value(Attribute::InfectionStatus), Some("deceased"));
        assert_eq!(row.value(Attribute::AgeGroup), Some("65+"));
        assert_eq!(row.count, 3);
    }

    #[test]
    fn test_null_values_are_kept_as_none() {
        let row = parse(
            r#"{"age_group":"unknown","sex":null,"nationality":null,"infection_status":"unknown","count":"7"}"#,
        )
        .unwrap();
        assert_eq!(row.value(Attribute::Sex), None);
        assert_eq!(row.value(Attribute::Nationality), None);
        assert_eq!(row.count, 7);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let err = parse(r#"{"age_group":"0-17","nationality":"X","infection_status":"infected","count":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("sex"), "{err}");
    }

    #[test]
    fn test_out_of_domain_buckets_are_rejected() {
        assert!(parse(r#"{"age_group":"17-20","sex":"M","nationality":"X","infection_status":"infected","count":1}"#).is_err());
        assert!(parse(r#"{"age_group":"0-17","sex":"M","nationality":"X","infection_status":"dead","count":1}"#).is_err());
    }

    #[test]
    fn test_invalid_counts_are_rejected() {
        assert!(parse(r#"{"age_group":"0-17","sex":"M","nationality":"X","infection_status":"infected","count":-1}"#).is_err());
        assert!(parse(r#"{"age_group":"0-17","sex":"M","nationality":"X","infection_status":"infected","count":"many"}"#).is_err());
    }

    #[test]
    fn test_serialized_names_match_display() {
        for group in AgeGroup::ALL {
            assert_eq!(
                serde_json::to_value(group).unwrap(),
                serde_json::Value::from(group.to_string())
            );
        }
        for status in InfectionStatus::ALL {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::from(status.to_string())
            );
        }
    }
}
