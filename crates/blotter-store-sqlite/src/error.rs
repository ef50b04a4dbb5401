//! Error type for `blotter-store-sqlite`.

use blotter_core::subject::SubjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before any SQL was issued.
  #[error("invalid input: {0}")]
  Invalid(#[from] blotter_core::ValidationError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored date or timestamp could not be decoded.
  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("subject not found: {0}")]
  SubjectNotFound(SubjectId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
