//! Incidents: recorded offences, optionally linked to a subject.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, ValidationError, subject::SubjectId};

/// Store-assigned identifier of an incident.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IncidentId(pub i64);

impl fmt::Display for IncidentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

/// A stored incident row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub id:          IncidentId,
  pub title:       Option<String>,
  /// Crime type, e.g. "Theft". The grouping key for reports.
  pub category:    Option<String>,
  pub description: Option<String>,
  pub occurred_on: Option<NaiveDate>,
  pub location:    Option<String>,
  /// Not a foreign key: the referenced subject may not exist.
  pub subject_id:  Option<SubjectId>,
  /// Officer in charge.
  pub officer:     Option<String>,
  pub created_at:  DateTime<Utc>,
}

impl Incident {
  /// Title if one was given, otherwise the category.
  pub fn headline(&self) -> &str {
    self
      .title
      .as_deref()
      .filter(|t| !t.trim().is_empty())
      .or(self.category.as_deref())
      .unwrap_or_default()
  }
}

/// Input to [`crate::store::RecordStore::create_incident`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIncident {
  pub title:       Option<String>,
  pub category:    String,
  pub description: Option<String>,
  pub occurred_on: Option<NaiveDate>,
  pub location:    Option<String>,
  pub subject_id:  Option<SubjectId>,
  pub officer:     Option<String>,
}

impl NewIncident {
  pub fn new(category: impl Into<String>) -> Self {
    Self { category: category.into(), ..Default::default() }
  }

  /// An incident must at least carry a non-blank category.
  pub fn validate(&self) -> Result<()> {
    if self.category.trim().is_empty() {
      return Err(ValidationError::Required("category"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn incident(title: Option<&str>, category: Option<&str>) -> Incident {
    Incident {
      id:          IncidentId(1),
      title:       title.map(str::to_owned),
      category:    category.map(str::to_owned),
      description: None,
      occurred_on: None,
      location:    None,
      subject_id:  None,
      officer:     None,
      created_at:  Utc::now(),
    }
  }

  #[test]
  fn headline_falls_back_to_category() {
    assert_eq!(incident(Some("Shop raid"), Some("Theft")).headline(), "Shop raid");
    assert_eq!(incident(Some(" "), Some("Theft")).headline(), "Theft");
    assert_eq!(incident(None, None).headline(), "");
  }

  #[test]
  fn blank_category_is_rejected() {
    assert_eq!(
      NewIncident::new("").validate(),
      Err(ValidationError::Required("category"))
    );
  }
}
