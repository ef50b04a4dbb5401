//! Subject registration: insert the record, then store its photos.

use std::path::PathBuf;

use blotter_core::{
  ValidationError,
  store::RecordStore,
  subject::{NewSubject, PhotoPaths, PhotoView, SubjectId},
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{Error, MediaDir, PhotoUpload, Result};

/// A photo that could not be written. The subject record stands regardless.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFailure {
  pub view:  PhotoView,
  pub path:  PathBuf,
  pub error: String,
}

/// Outcome of [`register_subject`].
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
  pub subject_id: SubjectId,
  /// Paths that were written and recorded on the subject.
  pub photos:     PhotoPaths,
  pub failures:   Vec<MediaFailure>,
}

impl Registration {
  pub fn is_complete(&self) -> bool { self.failures.is_empty() }
}

fn check_uploads(uploads: &[PhotoUpload]) -> Result<(), ValidationError> {
  for (i, upload) in uploads.iter().enumerate() {
    if uploads[..i].iter().any(|u| u.view == upload.view) {
      return Err(ValidationError::DuplicateView(upload.view.label()));
    }
  }
  Ok(())
}

/// Create a subject and store up to one photo per view for it.
///
/// Each photo is written to `media` independently; a failed write is reported
/// in [`Registration::failures`] and the remaining views are still tried.
/// Files already written are kept. The subject row is never rolled back, and
/// only the paths actually written are recorded on it. Once the subject row
/// exists the call always returns its id; a failure to record the paths is
/// reported per view in [`Registration::failures`].
pub async fn register_subject<S>(
  store: &S,
  media: &MediaDir,
  input: NewSubject,
  uploads: Vec<PhotoUpload>,
) -> Result<Registration>
where
  S: RecordStore,
{
  input.validate()?;
  check_uploads(&uploads)?;

  let subject_id = store
    .create_subject(input)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let mut photos = PhotoPaths::default();
  let mut failures = Vec::new();

  for upload in &uploads {
    match media.write(subject_id, upload).await {
      Ok(path) => photos.set(upload.view, path.to_string_lossy().into_owned()),
      Err(e) => {
        warn!(
          subject_id = subject_id.0,
          view = upload.view.label(),
          error = %e,
          "failed to store photo",
        );
        failures.push(MediaFailure {
          view:  upload.view,
          path:  media.path_for(subject_id, upload.view, upload.file_name.as_deref()),
          error: e.to_string(),
        });
      }
    }
  }

  if !photos.is_empty()
    && let Err(e) = store.attach_subject_photos(subject_id, photos.clone()).await
  {
    warn!(subject_id = subject_id.0, error = %e, "failed to record photo paths");
    for upload in &uploads {
      if let Some(path) = photos.get(upload.view) {
        failures.push(MediaFailure {
          view:  upload.view,
          path:  PathBuf::from(path),
          error: format!("photo stored but not recorded: {e}"),
        });
      }
    }
    photos = PhotoPaths::default();
  }

  info!(
    subject_id = subject_id.0,
    stored = uploads.len() - failures.len(),
    failed = failures.len(),
    "subject registered",
  );
  Ok(Registration { subject_id, photos, failures })
}
