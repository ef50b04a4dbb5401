//! Subjects: persons of interest, with up to three photo slots.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, ValidationError};

/// Store-assigned identifier of a subject. Never reused.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

// ─── Photos ──────────────────────────────────────────────────────────────────

/// Which of the three photo slots an image fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoView {
  Front,
  Left,
  Right,
}

impl PhotoView {
  /// Label used in media file names, e.g. `42_front.jpg`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Front => "front",
      Self::Left => "left",
      Self::Right => "right",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "front" => Ok(Self::Front),
      "left" => Ok(Self::Left),
      "right" => Ok(Self::Right),
      _ => Err(ValidationError::UnknownView(s.to_owned())),
    }
  }
}

/// Filesystem paths of a subject's photos. `None` means "no photo" when read
/// back, and "leave unchanged" when passed to
/// [`crate::store::RecordStore::attach_subject_photos`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPaths {
  pub front: Option<String>,
  pub left:  Option<String>,
  pub right: Option<String>,
}

impl PhotoPaths {
  pub fn get(&self, view: PhotoView) -> Option<&str> {
    match view {
      PhotoView::Front => self.front.as_deref(),
      PhotoView::Left => self.left.as_deref(),
      PhotoView::Right => self.right.as_deref(),
    }
  }

  pub fn set(&mut self, view: PhotoView, path: String) {
    match view {
      PhotoView::Front => self.front = Some(path),
      PhotoView::Left => self.left = Some(path),
      PhotoView::Right => self.right = Some(path),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.front.is_none() && self.left.is_none() && self.right.is_none()
  }
}

// ─── Subject ─────────────────────────────────────────────────────────────────

/// A stored subject row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
  pub id:            SubjectId,
  pub name:          String,
  pub date_of_birth: Option<NaiveDate>,
  pub gender:        Option<String>,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub occupation:    Option<String>,
  pub photos:        PhotoPaths,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::create_subject`].
/// `id`, `created_at` and the photo paths are always set by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSubject {
  pub name:          String,
  pub date_of_birth: Option<NaiveDate>,
  pub gender:        Option<String>,
  pub address:       Option<String>,
  pub phone:         Option<String>,
  pub occupation:    Option<String>,
}

impl NewSubject {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }

  /// A subject must at least carry a non-blank name.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(ValidationError::Required("name"));
    }
    Ok(())
  }
}
