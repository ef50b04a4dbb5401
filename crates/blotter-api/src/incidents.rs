//! Handlers for `/incidents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/incidents` | Optional `q`, `category`, `subject_id`, `from`, `to` |
//! | `POST` | `/incidents` | Body: [`CreateBody`]; returns 201 + `{"id": ...}` |
//! | `GET`  | `/incidents/:id` | Incident plus linked subject, if it exists |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use blotter_core::{
  ValidationError,
  filter::{DateRange, IncidentFilter, categorical, parse_optional_date, pattern},
  incident::{Incident, IncidentId, NewIncident},
  store::RecordStore,
  subject::{Subject, SubjectId},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Keyword matched against category, description and title.
  pub q:          Option<String>,
  pub category:   Option<String>,
  pub subject_id: Option<i64>,
  pub from:       Option<String>,
  pub to:         Option<String>,
}

impl TryFrom<ListParams> for IncidentFilter {
  type Error = ValidationError;

  fn try_from(p: ListParams) -> Result<Self, Self::Error> {
    Ok(IncidentFilter {
      text_pattern: pattern(p.q),
      category:     categorical(p.category),
      occurred:     DateRange::from_bounds(
        parse_optional_date("from", p.from.as_deref())?,
        parse_optional_date("to", p.to.as_deref())?,
      )?,
      subject_id:   p.subject_id.map(SubjectId),
    })
  }
}

/// `GET /incidents[?q=...][&category=...][&subject_id=...][&from=...&to=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: RecordStore,
{
  let filter = IncidentFilter::try_from(params)?;
  let incidents = state
    .store
    .list_incidents(&filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(incidents))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /incidents`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:       Option<String>,
  pub category:    String,
  pub description: Option<String>,
  /// `YYYY-MM-DD`.
  pub occurred_on: Option<String>,
  pub location:    Option<String>,
  pub subject_id:  Option<i64>,
  pub officer:     Option<String>,
}

impl TryFrom<CreateBody> for NewIncident {
  type Error = ValidationError;

  fn try_from(b: CreateBody) -> Result<Self, Self::Error> {
    let incident = NewIncident {
      title:       b.title,
      category:    b.category.trim().to_owned(),
      description: b.description,
      occurred_on: parse_optional_date("occurred_on", b.occurred_on.as_deref())?,
      location:    b.location,
      subject_id:  b.subject_id.map(SubjectId),
      officer:     b.officer,
    };
    incident.validate()?;
    Ok(incident)
  }
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub id: IncidentId,
}

/// `POST /incidents`: returns 201 + the new id.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Created>), ApiError>
where
  S: RecordStore,
{
  let input = NewIncident::try_from(body)?;
  let id = state
    .store
    .create_incident(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// An incident with its linked subject resolved. `subject` is `null` when
/// the incident has no link or the link points at a missing subject.
#[derive(Debug, Serialize)]
pub struct IncidentDetail {
  #[serde(flatten)]
  pub incident: Incident,
  pub subject:  Option<Subject>,
}

/// `GET /incidents/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<IncidentDetail>, ApiError>
where
  S: RecordStore,
{
  let incident = state
    .store
    .get_incident(IncidentId(id))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;

  let subject = match incident.subject_id {
    Some(subject_id) => state
      .store
      .get_subject(subject_id)
      .await
      .map_err(ApiError::store)?,
    None => None,
  };

  Ok(Json(IncidentDetail { incident, subject }))
}
