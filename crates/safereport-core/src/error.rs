//! Error types for `safereport-core`.

use thiserror::Error;

use crate::report::ReportStatus;

/// A client-caused failure. Always maps to a 400-class response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("missing field {0}")]
  MissingField(&'static str),

  #[error("invalid category")]
  InvalidCategory,

  #[error("invalid status")]
  InvalidStatus,

  #[error("invalid role")]
  InvalidRole,

  #[error("unknown report type: {0:?}")]
  UnknownReportType(String),

  #[error("invalid image: {0}")]
  InvalidImage(String),

  #[error("image is larger than {limit} bytes")]
  ImageTooLarge { limit: usize },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("report not found: {0}")]
  ReportNotFound(String),

  #[error("report id {0:?} is already in use")]
  DuplicateReportId(String),

  #[error(
    "status cannot change from {from} to {to} (allowed: {})",
    list_statuses(.allowed)
  )]
  TransitionNotAllowed {
    from:    ReportStatus,
    to:      ReportStatus,
    /// Statuses `from` may move to instead.
    allowed: Vec<ReportStatus>,
  },

  #[error("email {0:?} is already registered")]
  DuplicateEmail(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn list_statuses(statuses: &[ReportStatus]) -> String {
  if statuses.is_empty() {
    return "none".to_owned();
  }
  statuses
    .iter()
    .map(|s| s.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
