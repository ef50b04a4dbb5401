//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`. Timestamps are stored as
//! RFC 3339 UTC strings with microsecond precision. Rows written by other
//! tools may carry other date text; reading such a row never fails a whole
//! listing. Rows are always read by column name.

use blotter_core::{
  incident::{Incident, IncidentId},
  report::{GroupColumn, Table},
  subject::{PhotoPaths, Subject, SubjectId},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::Row;
use tracing::warn;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

/// Accepts `YYYY-MM-DD`, and datetime text whose first ten characters are a
/// date followed by `T` or a space; the time part is dropped.
pub fn decode_date(s: &str) -> Result<NaiveDate> {
  let s = s.trim();
  let date_part = match s.get(10..11) {
    Some("T" | "t" | " ") => &s[..10],
    _ => s,
  };
  NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Decode an optional stored date, logging and dropping values that cannot
/// be read.
fn read_date(table: &str, column: &str, id: i64, s: Option<&str>) -> Option<NaiveDate> {
  let s = s.filter(|s| !s.trim().is_empty())?;
  decode_date(s)
    .inspect_err(|e| warn!(table, column, row_id = id, error = %e, "unreadable stored date"))
    .ok()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 and SQLite's `CURRENT_TIMESTAMP` format
/// (`YYYY-MM-DD HH:MM:SS`, implicitly UTC).
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Decode a stored creation time. Missing or unreadable values fall back to
/// the Unix epoch, which also places such rows last in every listing.
fn read_created_at(table: &str, id: i64, s: Option<&str>) -> DateTime<Utc> {
  let Some(s) = s else {
    warn!(table, row_id = id, "missing created_at");
    return DateTime::<Utc>::UNIX_EPOCH;
  };
  decode_dt(s.trim())
    .inspect_err(|e| warn!(table, row_id = id, error = %e, "unreadable created_at"))
    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// ─── Tables and grouping columns ─────────────────────────────────────────────

pub fn table_name(t: Table) -> &'static str {
  match t {
    Table::Subjects => "subjects",
    Table::Incidents => "incidents",
  }
}

pub fn group_column_name(c: GroupColumn) -> &'static str {
  match c {
    GroupColumn::SubjectGender => "gender",
    GroupColumn::IncidentCategory => "crime_type",
    GroupColumn::IncidentLocation => "location",
    GroupColumn::IncidentOfficer => "officer",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SUBJECT_COLUMNS: &str = "id, name, dob, gender, address, phone, occupation, \
   photo_front, photo_left, photo_right, created_at";

pub const INCIDENT_COLUMNS: &str = "id, title, crime_type, description, occurred_on, \
   location, subject_id, officer, created_at";

/// Raw values read directly from a `subjects` row.
pub struct RawSubject {
  pub id:          i64,
  pub name:        Option<String>,
  pub dob:         Option<String>,
  pub gender:      Option<String>,
  pub address:     Option<String>,
  pub phone:       Option<String>,
  pub occupation:  Option<String>,
  pub photo_front: Option<String>,
  pub photo_left:  Option<String>,
  pub photo_right: Option<String>,
  pub created_at:  Option<String>,
}

impl RawSubject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get("id")?,
      name:        row.get("name")?,
      dob:         row.get("dob")?,
      gender:      row.get("gender")?,
      address:     row.get("address")?,
      phone:       row.get("phone")?,
      occupation:  row.get("occupation")?,
      photo_front: row.get("photo_front")?,
      photo_left:  row.get("photo_left")?,
      photo_right: row.get("photo_right")?,
      created_at:  row.get("created_at")?,
    })
  }

  pub fn into_subject(self) -> Subject {
    Subject {
      id:            SubjectId(self.id),
      name:          self.name.unwrap_or_default(),
      date_of_birth: read_date("subjects", "dob", self.id, self.dob.as_deref()),
      gender:        self.gender,
      address:       self.address,
      phone:         self.phone,
      occupation:    self.occupation,
      photos:        PhotoPaths {
        front: self.photo_front,
        left:  self.photo_left,
        right: self.photo_right,
      },
      created_at:    read_created_at("subjects", self.id, self.created_at.as_deref()),
    }
  }
}

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub id:          i64,
  pub title:       Option<String>,
  pub crime_type:  Option<String>,
  pub description: Option<String>,
  pub occurred_on: Option<String>,
  pub location:    Option<String>,
  pub subject_id:  Option<i64>,
  pub officer:     Option<String>,
  pub created_at:  Option<String>,
}

impl RawIncident {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get("id")?,
      title:       row.get("title")?,
      crime_type:  row.get("crime_type")?,
      description: row.get("description")?,
      occurred_on: row.get("occurred_on")?,
      location:    row.get("location")?,
      subject_id:  row.get("subject_id")?,
      officer:     row.get("officer")?,
      created_at:  row.get("created_at")?,
    })
  }

  pub fn into_incident(self) -> Incident {
    Incident {
      id:          IncidentId(self.id),
      title:       self.title,
      category:    self.crime_type,
      description: self.description,
      occurred_on: read_date("incidents", "occurred_on", self.id, self.occurred_on.as_deref()),
      location:    self.location,
      subject_id:  self.subject_id.map(SubjectId),
      officer:     self.officer,
      created_at:  read_created_at("incidents", self.id, self.created_at.as_deref()),
    }
  }
}
