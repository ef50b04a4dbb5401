//! Error type for `blotter-media`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  Invalid(#[from] blotter_core::ValidationError),

  #[error("i/o error on {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  /// True when the error means the file simply is not there.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
