//! Filter query construction.
//!
//! A [`SelectQuery`] is a base `SELECT ... WHERE 1=1` plus an ordered list of
//! static SQL clauses and the values bound to their `?` placeholders. Caller
//! text only ever travels as a bound value.

use blotter_core::filter::{DateRange, IncidentFilter, SubjectFilter};
use rusqlite::types::Value;

use crate::encode::{INCIDENT_COLUMNS, SUBJECT_COLUMNS, encode_date};

/// Every listing is newest first. `julianday` reads both RFC 3339 and
/// `CURRENT_TIMESTAMP` text as instants; unreadable or missing times sort
/// last. `id` breaks ties.
const ORDER_BY: &str = "ORDER BY julianday(created_at) DESC, id DESC";

#[derive(Debug, Clone)]
pub struct SelectQuery {
  table:   &'static str,
  columns: &'static str,
  clauses: Vec<&'static str>,
  params:  Vec<Value>,
}

impl SelectQuery {
  pub fn new(table: &'static str, columns: &'static str) -> Self {
    Self { table, columns, clauses: Vec::new(), params: Vec::new() }
  }

  /// Append `clause`, binding `params` to its placeholders in order.
  pub fn and(
    &mut self,
    clause: &'static str,
    params: impl IntoIterator<Item = Value>,
  ) -> &mut Self {
    self.clauses.push(clause);
    self.params.extend(params);
    debug_assert_eq!(
      self.clauses.iter().map(|c| c.matches('?').count()).sum::<usize>(),
      self.params.len(),
      "placeholder count does not match bound parameters",
    );
    self
  }

  pub fn sql(&self) -> String {
    let mut sql =
      format!("SELECT {} FROM {} WHERE 1=1", self.columns, self.table);
    for clause in &self.clauses {
      sql.push_str(" AND ");
      sql.push_str(clause);
    }
    sql.push(' ');
    sql.push_str(ORDER_BY);
    sql
  }

  pub fn into_parts(self) -> (String, Vec<Value>) {
    let sql = self.sql();
    (sql, self.params)
  }
}

/// Build a `LIKE` pattern matching `text` anywhere, with the wildcard
/// characters in `text` escaped (`ESCAPE '\'`). The pattern is lowercased to
/// pair with [`crate::schema::FOLD_CASE`] on the column side.
pub fn contains_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for ch in text.to_lowercase().chars() {
    if matches!(ch, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

fn text(s: impl Into<String>) -> Value { Value::Text(s.into()) }

fn date_bounds(range: &DateRange) -> [Value; 2] {
  [text(encode_date(range.from)), text(encode_date(range.to))]
}

/// Query for [`blotter_core::store::RecordStore::list_subjects`].
pub fn subjects(filter: &SubjectFilter) -> SelectQuery {
  let mut q = SelectQuery::new("subjects", SUBJECT_COLUMNS);
  if let Some(name) = &filter.name_pattern {
    q.and("fold_case(name) LIKE ? ESCAPE '\\'", [text(contains_pattern(name))]);
  }
  if let Some(gender) = &filter.gender {
    q.and("gender = ?", [text(gender.as_str())]);
  }
  if let Some(range) = &filter.date_of_birth {
    q.and("date(dob) BETWEEN date(?) AND date(?)", date_bounds(range));
  }
  q
}

/// Query for [`blotter_core::store::RecordStore::list_incidents`].
pub fn incidents(filter: &IncidentFilter) -> SelectQuery {
  let mut q = SelectQuery::new("incidents", INCIDENT_COLUMNS);
  if let Some(pattern) = &filter.text_pattern {
    let p = contains_pattern(pattern);
    q.and(
      "(fold_case(crime_type) LIKE ? ESCAPE '\\' \
       OR fold_case(description) LIKE ? ESCAPE '\\' \
       OR fold_case(title) LIKE ? ESCAPE '\\')",
      [text(p.as_str()), text(p.as_str()), text(p)],
    );
  }
  if let Some(category) = &filter.category {
    q.and("crime_type = ?", [text(category.as_str())]);
  }
  if let Some(range) = &filter.occurred {
    q.and("date(occurred_on) BETWEEN date(?) AND date(?)", date_bounds(range));
  }
  if let Some(subject_id) = filter.subject_id {
    q.and("subject_id = ?", [Value::Integer(subject_id.0)]);
  }
  q
}

#[cfg(test)]
mod tests {
  use blotter_core::subject::SubjectId;
  use chrono::NaiveDate;

  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn empty_filter_selects_everything_newest_first() {
    let (sql, params) = subjects(&SubjectFilter::default()).into_parts();
    assert_eq!(
      sql,
      format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE 1=1 {ORDER_BY}")
    );
    assert!(params.is_empty());
  }

  #[test]
  fn clauses_follow_option_order() {
    let filter = SubjectFilter {
      name_pattern:  Some("an".into()),
      gender:        Some("Female".into()),
      date_of_birth: Some(DateRange::new(d(1980, 1, 1), d(1999, 12, 31)).unwrap()),
    };
    let (sql, params) = subjects(&filter).into_parts();

    let name   = sql.find("name LIKE").unwrap();
    let gender = sql.find("gender = ?").unwrap();
    let dob    = sql.find("date(dob)").unwrap();
    assert!(name < gender && gender < dob, "{sql}");
    assert!(sql.ends_with(ORDER_BY));

    assert_eq!(params, vec![
      Value::Text("%an%".into()),
      Value::Text("Female".into()),
      Value::Text("1980-01-01".into()),
      Value::Text("1999-12-31".into()),
    ]);
  }

  #[test]
  fn caller_text_is_never_interpolated() {
    let filter = SubjectFilter {
      name_pattern: Some("'; DROP TABLE subjects; --".into()),
      ..Default::default()
    };
    let (sql, params) = subjects(&filter).into_parts();
    assert!(!sql.contains("DROP"));
    assert_eq!(params.len(), 1);
  }

  #[test]
  fn incident_pattern_binds_three_columns() {
    let filter = IncidentFilter {
      text_pattern: Some("theft".into()),
      subject_id:   Some(SubjectId(7)),
      ..Default::default()
    };
    let (sql, params) = incidents(&filter).into_parts();
    assert!(sql.contains("title LIKE ?"));
    assert_eq!(params.len(), 4);
    assert_eq!(params[3], Value::Integer(7));
  }

  #[test]
  fn wildcards_are_escaped() {
    assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    assert_eq!(contains_pattern("an"), "%an%");
  }

  #[test]
  fn patterns_are_lowercased() {
    assert_eq!(contains_pattern("ÉMILE"), "%émile%");
    let (sql, _) = subjects(&SubjectFilter {
      name_pattern: Some("x".into()),
      ..Default::default()
    })
    .into_parts();
    assert!(sql.contains("fold_case(name) LIKE ?"), "{sql}");
  }
}
