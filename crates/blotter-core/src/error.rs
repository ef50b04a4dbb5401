//! Validation errors for `blotter-core`.
//!
//! Malformed input is rejected here, before it reaches any storage backend.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} is required")]
  Required(&'static str),

  #[error("invalid date for {field}: {value:?} (expected YYYY-MM-DD)")]
  InvalidDate { field: &'static str, value: String },

  #[error("date range is inverted: {from} is after {to}")]
  InvertedRange { from: String, to: String },

  #[error("unknown photo view: {0:?}")]
  UnknownView(String),

  #[error("more than one photo supplied for the {0} view")]
  DuplicateView(&'static str),

  #[error("unknown grouping column: {0:?}")]
  UnknownColumn(String),

  #[error("invalid photo payload: {0}")]
  InvalidPayload(String),
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
