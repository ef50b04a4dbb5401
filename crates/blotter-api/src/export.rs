//! CSV export of whole tables, newest first.

use axum::{
  extract::State,
  http::header,
  response::IntoResponse,
};
use blotter_core::{
  filter::{IncidentFilter, SubjectFilter},
  incident::Incident,
  store::RecordStore,
  subject::Subject,
};

use crate::{ApiState, error::ApiError};

const SUBJECT_HEADER: [&str; 11] = [
  "id", "name", "dob", "gender", "address", "phone", "occupation",
  "photo_front", "photo_left", "photo_right", "created_at",
];

const INCIDENT_HEADER: [&str; 9] = [
  "id", "title", "crime_type", "description", "occurred_on", "location",
  "subject_id", "officer", "created_at",
];

fn opt<T: ToString>(v: &Option<T>) -> String {
  v.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn csv_error(e: impl std::fmt::Display) -> ApiError {
  ApiError::Internal(format!("csv export failed: {e}"))
}

/// Render subjects as CSV with a header row.
pub fn subjects_csv(subjects: &[Subject]) -> Result<Vec<u8>, ApiError> {
  let mut w = csv::Writer::from_writer(Vec::new());
  w.write_record(SUBJECT_HEADER).map_err(csv_error)?;
  for s in subjects {
    w.write_record([
      s.id.to_string(),
      s.name.clone(),
      opt(&s.date_of_birth),
      opt(&s.gender),
      opt(&s.address),
      opt(&s.phone),
      opt(&s.occupation),
      opt(&s.photos.front),
      opt(&s.photos.left),
      opt(&s.photos.right),
      s.created_at.to_rfc3339(),
    ])
    .map_err(csv_error)?;
  }
  w.into_inner().map_err(csv_error)
}

/// Render incidents as CSV with a header row.
pub fn incidents_csv(incidents: &[Incident]) -> Result<Vec<u8>, ApiError> {
  let mut w = csv::Writer::from_writer(Vec::new());
  w.write_record(INCIDENT_HEADER).map_err(csv_error)?;
  for i in incidents {
    w.write_record([
      i.id.to_string(),
      opt(&i.title),
      opt(&i.category),
      opt(&i.description),
      opt(&i.occurred_on),
      opt(&i.location),
      opt(&i.subject_id),
      opt(&i.officer),
      i.created_at.to_rfc3339(),
    ])
    .map_err(csv_error)?;
  }
  w.into_inner().map_err(csv_error)
}

fn attachment(file_name: &str, body: Vec<u8>) -> impl IntoResponse {
  (
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{file_name}\""),
      ),
    ],
    body,
  )
}

/// `GET /export/subjects.csv`
pub async fn subjects<S>(
  State(state): State<ApiState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let rows = state
    .store
    .list_subjects(&SubjectFilter::default())
    .await
    .map_err(ApiError::store)?;
  Ok(attachment("subjects.csv", subjects_csv(&rows)?))
}

/// `GET /export/incidents.csv`
pub async fn incidents<S>(
  State(state): State<ApiState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let rows = state
    .store
    .list_incidents(&IncidentFilter::default())
    .await
    .map_err(ApiError::store)?;
  Ok(attachment("incidents.csv", incidents_csv(&rows)?))
}
