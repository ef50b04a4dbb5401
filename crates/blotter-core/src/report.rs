//! Aggregate reporting types.

use serde::{Deserialize, Serialize};

use crate::{Result, ValidationError};

/// A record table that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
  Subjects,
  Incidents,
}

/// A categorical column that records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColumn {
  SubjectGender,
  IncidentCategory,
  IncidentLocation,
  IncidentOfficer,
}

impl GroupColumn {
  pub fn table(self) -> Table {
    match self {
      Self::SubjectGender => Table::Subjects,
      Self::IncidentCategory | Self::IncidentLocation | Self::IncidentOfficer => {
        Table::Incidents
      }
    }
  }

  /// Parse the short names used by the HTTP API.
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "gender" => Ok(Self::SubjectGender),
      "category" => Ok(Self::IncidentCategory),
      "location" => Ok(Self::IncidentLocation),
      "officer" => Ok(Self::IncidentOfficer),
      other => Err(ValidationError::UnknownColumn(other.to_owned())),
    }
  }
}

/// Number of records sharing one value of a [`GroupColumn`].
/// `category` is `None` for the bucket of records with no value at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
  pub category: Option<String>,
  pub count:    u64,
}

/// Headline numbers for the reports page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
  pub total_subjects:        u64,
  pub total_incidents:       u64,
  pub incidents_by_category: Vec<CategoryCount>,
}
