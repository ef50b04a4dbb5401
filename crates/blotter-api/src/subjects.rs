//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Optional `name`, `gender`, `dob_from`, `dob_to` |
//! | `POST` | `/subjects` | Body: [`CreateBody`]; returns 201 + registration |
//! | `GET`  | `/subjects/:id` | 404 if not found |
//! | `GET`  | `/subjects/:id/photos/:view` | Raw image; 404 if unset |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use blotter_core::{
  ValidationError,
  filter::{DateRange, SubjectFilter, categorical, parse_optional_date, pattern},
  store::RecordStore,
  subject::{NewSubject, PhotoView, Subject, SubjectId},
};
use blotter_media::{PhotoUpload, Registration, register_subject};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Case-insensitive part of the name.
  pub name:     Option<String>,
  /// Exact gender; `All` or blank disables the filter.
  pub gender:   Option<String>,
  pub dob_from: Option<String>,
  pub dob_to:   Option<String>,
}

impl TryFrom<ListParams> for SubjectFilter {
  type Error = ValidationError;

  fn try_from(p: ListParams) -> Result<Self, Self::Error> {
    Ok(SubjectFilter {
      name_pattern:  pattern(p.name),
      gender:        categorical(p.gender),
      date_of_birth: DateRange::from_bounds(
        parse_optional_date("dob_from", p.dob_from.as_deref())?,
        parse_optional_date("dob_to", p.dob_to.as_deref())?,
      )?,
    })
  }
}

/// `GET /subjects[?name=...][&gender=...][&dob_from=...&dob_to=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: RecordStore,
{
  let filter = SubjectFilter::try_from(params)?;
  let subjects = state
    .store
    .list_subjects(&filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(subjects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// One uploaded photo, base64-encoded.
#[derive(Debug, Deserialize)]
pub struct PhotoBody {
  /// `front`, `left` or `right`.
  pub view:      String,
  pub file_name: Option<String>,
  pub data:      String,
}

impl TryFrom<PhotoBody> for PhotoUpload {
  type Error = ValidationError;

  fn try_from(b: PhotoBody) -> Result<Self, Self::Error> {
    let view = PhotoView::parse(&b.view)?;
    let data = B64
      .decode(b.data.trim())
      .map_err(|e| ValidationError::InvalidPayload(format!("{}: {e}", view.label())))?;
    Ok(PhotoUpload { view, file_name: b.file_name, data: data.into() })
  }
}

/// JSON body accepted by `POST /subjects`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:          String,
  /// `YYYY-MM-DD`.
  pub date_of_birth: Option<String>,
  pub gender:        Option<String>,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub occupation:    Option<String>,
  #[serde(default)]
  pub photos:        Vec<PhotoBody>,
}

impl CreateBody {
  fn into_parts(self) -> Result<(NewSubject, Vec<PhotoUpload>), ValidationError> {
    let subject = NewSubject {
      name:          self.name.trim().to_owned(),
      date_of_birth: parse_optional_date(
        "date_of_birth",
        self.date_of_birth.as_deref(),
      )?,
      gender:        self.gender,
      address:       self.address,
      phone:         self.phone,
      occupation:    self.occupation,
    };
    subject.validate()?;
    let uploads = self
      .photos
      .into_iter()
      .map(PhotoUpload::try_from)
      .collect::<Result<Vec<_>, _>>()?;
    Ok((subject, uploads))
  }
}

/// `POST /subjects`: returns 201 + the [`Registration`], including any photos
/// that could not be stored.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Registration>), ApiError>
where
  S: RecordStore,
{
  let (subject, uploads) = body.into_parts()?;
  let registration =
    register_subject(state.store.as_ref(), &state.media, subject, uploads).await?;
  Ok((StatusCode::CREATED, Json(registration)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

async fn find<S>(state: &ApiState<S>, id: i64) -> Result<Subject, ApiError>
where
  S: RecordStore,
{
  state
    .store
    .get_subject(SubjectId(id))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subject {id} not found")))
}

/// `GET /subjects/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Subject>, ApiError>
where
  S: RecordStore,
{
  Ok(Json(find(&state, id).await?))
}

// ─── Photo ────────────────────────────────────────────────────────────────────

fn content_type(path: &str) -> &'static str {
  let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
  match ext.as_deref() {
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("png") => "image/png",
    Some("gif") => "image/gif",
    Some("webp") => "image/webp",
    _ => "application/octet-stream",
  }
}

/// `GET /subjects/:id/photos/:view`
pub async fn photo<S>(
  State(state): State<ApiState<S>>,
  Path((id, view)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let view = PhotoView::parse(&view)?;
  let subject = find(&state, id).await?;
  let path = subject.photos.get(view).ok_or_else(|| {
    ApiError::NotFound(format!("subject {id} has no {} photo", view.label()))
  })?;

  let bytes = state.media.read(path).await.map_err(|e| {
    if e.is_not_found() {
      ApiError::NotFound(format!("photo file for subject {id} is missing"))
    } else {
      e.into()
    }
  })?;
  Ok(([(header::CONTENT_TYPE, content_type(path))], bytes))
}
