//! JSON REST API for Blotter.
//!
//! Exposes an axum [`Router`] backed by any
//! [`blotter_core::store::RecordStore`] plus a [`MediaDir`] for photos.
//! TLS, auth and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", blotter_api::api_router(ApiState::new(store, media)))
//! ```

pub mod error;
pub mod export;
pub mod incidents;
pub mod reports;
pub mod subjects;

use std::sync::Arc;

use axum::{Router, routing::get};
use blotter_core::store::RecordStore;
use blotter_media::MediaDir;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub media: Arc<MediaDir>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, media: Arc<MediaDir>) -> Self { Self { store, media } }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), media: Arc::clone(&self.media) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Subjects
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route("/subjects/{id}", get(subjects::get_one::<S>))
    .route("/subjects/{id}/photos/{view}", get(subjects::photo::<S>))
    // Incidents
    .route("/incidents", get(incidents::list::<S>).post(incidents::create::<S>))
    .route("/incidents/{id}", get(incidents::get_one::<S>))
    // Reports
    .route("/reports/summary", get(reports::summary::<S>))
    .route("/reports/counts/{column}", get(reports::counts::<S>))
    // Export
    .route("/export/subjects.csv", get(export::subjects::<S>))
    .route("/export/incidents.csv", get(export::incidents::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
