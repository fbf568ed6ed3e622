//! Error type for `safereport-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value outside its enum's vocabulary.
  #[error("unexpected {column} value: {value:?}")]
  Decode {
    column: &'static str,
    value:  String,
  },

  /// The UNIQUE constraint on `reports.report_id` rejected an insert.
  #[error("report id {0:?} is already in use")]
  DuplicateReportId(String),

  /// The UNIQUE constraint on `users.email` rejected an insert.
  #[error("email {0:?} is already registered")]
  DuplicateEmail(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for safereport_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateReportId(id) => Self::DuplicateReportId(id),
      Error::DuplicateEmail(email) => Self::DuplicateEmail(email),
      other => Self::Store(Box::new(other)),
    }
  }
}
