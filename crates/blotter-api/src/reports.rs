//! Handlers for `/reports` endpoints. Every figure is computed from the live
//! tables on each request.

use axum::{
  Json,
  extract::{Path, State},
};
use blotter_core::{
  report::{CategoryCount, GroupColumn, Summary, Table},
  store::RecordStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /reports/summary`
pub async fn summary<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Summary>, ApiError>
where
  S: RecordStore,
{
  let store = &state.store;
  let total_subjects = store
    .total_count(Table::Subjects)
    .await
    .map_err(ApiError::store)?;
  let total_incidents = store
    .total_count(Table::Incidents)
    .await
    .map_err(ApiError::store)?;
  let incidents_by_category = store
    .count_by(GroupColumn::IncidentCategory)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(Summary { total_subjects, total_incidents, incidents_by_category }))
}

/// `GET /reports/counts/:column`, where the column is `gender`, `category`,
/// `location` or `officer`.
pub async fn counts<S>(
  State(state): State<ApiState<S>>,
  Path(column): Path<String>,
) -> Result<Json<Vec<CategoryCount>>, ApiError>
where
  S: RecordStore,
{
  let column = GroupColumn::parse(&column)?;
  let counts = state.store.count_by(column).await.map_err(ApiError::store)?;
  Ok(Json(counts))
}
