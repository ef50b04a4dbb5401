//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `blotter-store-sqlite`).
//! Higher layers (`blotter-media`, `blotter-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  filter::{IncidentFilter, SubjectFilter},
  incident::{Incident, IncidentId, NewIncident},
  report::{CategoryCount, GroupColumn, Table},
  subject::{NewSubject, PhotoPaths, Subject, SubjectId},
};

/// Abstraction over a Blotter storage backend.
///
/// Records are append-only: the only mutation after creation is back-filling
/// a subject's photo paths.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Validate and persist a new subject with no photos. Returns the
  /// generated identifier, which is strictly greater than any issued before.
  fn create_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<SubjectId, Self::Error>> + Send + '_;

  /// Set the photo paths that are `Some` in `photos`; the others keep their
  /// stored value. Fails if the subject does not exist.
  fn attach_subject_photos(
    &self,
    id: SubjectId,
    photos: PhotoPaths,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a subject by id. Returns `None` if not found.
  fn get_subject(
    &self,
    id: SubjectId,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// List subjects matching `filter`, most recently created first.
  fn list_subjects<'a>(
    &'a self,
    filter: &'a SubjectFilter,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + 'a;

  // ── Incidents ─────────────────────────────────────────────────────────

  /// Validate and persist a new incident. The linked subject, if any, is
  /// not checked for existence.
  fn create_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<IncidentId, Self::Error>> + Send + '_;

  /// Retrieve an incident by id. Returns `None` if not found.
  fn get_incident(
    &self,
    id: IncidentId,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// List incidents matching `filter`, most recently created first.
  fn list_incidents<'a>(
    &'a self,
    filter: &'a IncidentFilter,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + 'a;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Count records per distinct value of `column`. Records with no value
  /// form their own bucket.
  fn count_by(
    &self,
    column: GroupColumn,
  ) -> impl Future<Output = Result<Vec<CategoryCount>, Self::Error>> + Send + '_;

  /// Total number of rows in `table`.
  fn total_count(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
