//! Categorical case attributes
//!
//! Every case aggregate carries four categorical columns. [`Attribute`] names
//! one of them so the analysis can cross-tabulate any pair.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::label::format_label;

/// A categorical column of the case data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    AgeGroup,
    Sex,
    Nationality,
    InfectionStatus,
}

impl Attribute {
    pub const ALL: [Self; 4] = [
        Self::AgeGroup,
        Self::Sex,
        Self::Nationality,
        Self::InfectionStatus,
    ];

    /// Snake-case column identifier, as used by the data source.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AgeGroup => "age_group",
            Self::Sex => "sex",
            Self::Nationality => "nationality",
            Self::InfectionStatus => "infection_status",
        }
    }

    /// Human-readable column label (e.g. `"Age Group"`).
    #[must_use]
    pub fn label(self) -> String {
        format_label(self.id())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "unknown attribute '{name}' (expected one of: age_group, sex, nationality, infection_status)"
)]
pub struct ParseAttributeError {
    name: String,
}

impl FromStr for Attribute {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.id() == s)
            .ok_or_else(|| ParseAttributeError { name: s.to_owned() })
    }
}
