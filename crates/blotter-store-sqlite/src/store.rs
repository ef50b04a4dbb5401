//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use blotter_core::{
  filter::{IncidentFilter, SubjectFilter},
  incident::{Incident, IncidentId, NewIncident},
  report::{CategoryCount, GroupColumn, Table},
  store::RecordStore,
  subject::{NewSubject, PhotoPaths, Subject, SubjectId},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{
    INCIDENT_COLUMNS, RawIncident, RawSubject, SUBJECT_COLUMNS, encode_date,
    encode_dt, group_column_name, table_name,
  },
  query,
  schema::{SCHEMA, register_functions},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Blotter record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. The
/// connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Create the record tables if they are missing and register the SQL
  /// functions used by filters. Safe to call any number of times; existing
  /// tables and rows are left alone.
  pub async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("schema ensured");
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn create_subject(&self, input: NewSubject) -> Result<SubjectId> {
    input.validate()?;

    let dob_str = input.date_of_birth.map(encode_date);
    let at_str  = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (
             name, dob, gender, address, phone, occupation, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.name,
            dob_str,
            input.gender,
            input.address,
            input.phone,
            input.occupation,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    info!(subject_id = id, "subject created");
    Ok(SubjectId(id))
  }

  async fn attach_subject_photos(
    &self,
    id: SubjectId,
    photos: PhotoPaths,
  ) -> Result<()> {
    let PhotoPaths { front, left, right } = photos;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE subjects SET
             photo_front = COALESCE(?1, photo_front),
             photo_left  = COALESCE(?2, photo_left),
             photo_right = COALESCE(?3, photo_right)
           WHERE id = ?4",
          rusqlite::params![front, left, right, id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::SubjectNotFound(id));
    }
    debug!(subject_id = id.0, "subject photos attached");
    Ok(())
  }

  async fn get_subject(&self, id: SubjectId) -> Result<Option<Subject>> {
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SUBJECT_COLUMNS} FROM subjects WHERE id = ?1"),
            rusqlite::params![id.0],
            RawSubject::from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawSubject::into_subject))
  }

  async fn list_subjects(&self, filter: &SubjectFilter) -> Result<Vec<Subject>> {
    let (sql, params) = query::subjects(filter).into_parts();
    debug!(%sql, params = params.len(), "listing subjects");

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawSubject::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawSubject::into_subject).collect())
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn create_incident(&self, input: NewIncident) -> Result<IncidentId> {
    input.validate()?;

    let occurred_str = input.occurred_on.map(encode_date);
    let subject_id   = input.subject_id.map(|s| s.0);
    let at_str       = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             title, crime_type, description, occurred_on,
             location, subject_id, officer, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            input.title,
            input.category,
            input.description,
            occurred_str,
            input.location,
            subject_id,
            input.officer,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    info!(incident_id = id, "incident created");
    Ok(IncidentId(id))
  }

  async fn get_incident(&self, id: IncidentId) -> Result<Option<Incident>> {
    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"),
            rusqlite::params![id.0],
            RawIncident::from_row,
          )
          .optional()?)
      })
      .await?;

    Ok(raw.map(RawIncident::into_incident))
  }

  async fn list_incidents(&self, filter: &IncidentFilter) -> Result<Vec<Incident>> {
    let (sql, params) = query::incidents(filter).into_parts();
    debug!(%sql, params = params.len(), "listing incidents");

    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawIncident::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawIncident::into_incident).collect())
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn count_by(&self, column: GroupColumn) -> Result<Vec<CategoryCount>> {
    // Both names come from fixed enums, never from caller text.
    let sql = format!(
      "SELECT {col} AS category, COUNT(*) AS n
       FROM {table}
       GROUP BY {col}
       ORDER BY n DESC, category ASC",
      col   = group_column_name(column),
      table = table_name(column.table()),
    );

    let counts = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CategoryCount {
              category: row.get("category")?,
              count:    row.get::<_, i64>("n")? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(counts)
  }

  async fn total_count(&self, table: Table) -> Result<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table_name(table));

    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;

    Ok(n as u64)
  }
}
