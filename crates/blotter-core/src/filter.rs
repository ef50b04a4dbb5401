//! Filter specifications for listing queries.
//!
//! These are plain data; backends turn them into queries. Every option is
//! optional and an empty filter means "all rows, most recent first".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Result, ValidationError, subject::SubjectId};

// ─── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
    ValidationError::InvalidDate { field, value: value.to_owned() }
  })
}

/// Parse an optional date, treating blank text as absent.
pub fn parse_optional_date(
  field: &'static str,
  value: Option<&str>,
) -> Result<Option<NaiveDate>> {
  match value.map(str::trim) {
    None | Some("") => Ok(None),
    Some(v) => parse_date(field, v).map(Some),
  }
}

/// Normalise a categorical selection: blank and `All` mean "no filter".
pub fn categorical(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Normalise a substring pattern: blank means "no filter".
pub fn pattern(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

// ─── DateRange ───────────────────────────────────────────────────────────────

/// An inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: NaiveDate,
  pub to:   NaiveDate,
}

impl DateRange {
  pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
    if from > to {
      return Err(ValidationError::InvertedRange {
        from: from.to_string(),
        to:   to.to_string(),
      });
    }
    Ok(Self { from, to })
  }

  /// A range applies only when both bounds are present.
  pub fn from_bounds(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
  ) -> Result<Option<Self>> {
    match (from, to) {
      (Some(from), Some(to)) => Self::new(from, to).map(Some),
      _ => Ok(None),
    }
  }
}

// ─── Subject filter ──────────────────────────────────────────────────────────

/// Parameters for [`crate::store::RecordStore::list_subjects`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
  /// Case-insensitive substring of the subject's name.
  pub name_pattern:  Option<String>,
  /// Exact gender match.
  pub gender:        Option<String>,
  pub date_of_birth: Option<DateRange>,
}

// ─── Incident filter ─────────────────────────────────────────────────────────

/// Parameters for [`crate::store::RecordStore::list_incidents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
  /// Case-insensitive substring of the category, description or title.
  pub text_pattern: Option<String>,
  /// Exact category match.
  pub category:     Option<String>,
  pub occurred:     Option<DateRange>,
  /// Only incidents linked to this subject.
  pub subject_id:   Option<SubjectId>,
}
