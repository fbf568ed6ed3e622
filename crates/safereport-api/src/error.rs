//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use safereport_core::{ValidationError, classify::ClassifyError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The body could not be read as the expected JSON shape.
  #[error("{0}")]
  MalformedBody(String),

  #[error("request body is too large")]
  PayloadTooLarge,

  #[error("Unauthorized")]
  Unauthorized,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error(transparent)]
  Classify(#[from] ClassifyError),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert any store backend error.
  pub fn store<E: Into<safereport_core::Error>>(e: E) -> Self {
    let e: safereport_core::Error = e.into();
    e.into()
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::MalformedBody(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Unauthorized | ApiError::InvalidCredentials => {
        StatusCode::UNAUTHORIZED
      }
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Classify(_) | ApiError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn log(&self, status: StatusCode) {
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
  }
}

impl From<safereport_core::Error> for ApiError {
  fn from(e: safereport_core::Error) -> Self {
    use safereport_core::Error;
    match e {
      Error::Validation(v) => ApiError::Validation(v),
      Error::ReportNotFound(_) => ApiError::NotFound("Report not found".into()),
      e @ (Error::DuplicateReportId(_)
      | Error::DuplicateEmail(_)
      | Error::TransitionNotAllowed { .. }) => ApiError::Conflict(e.to_string()),
      Error::Store(e) => ApiError::Internal(e),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      return ApiError::PayloadTooLarge;
    }
    ApiError::MalformedBody(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    self.log(status);
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

/// An [`ApiError`] raised by report submission. Its body also carries
/// `"success": false`, mirroring the success body of that route.
#[derive(Debug)]
pub struct SubmitError(pub ApiError);

impl From<ApiError> for SubmitError {
  fn from(e: ApiError) -> Self { Self(e) }
}

impl From<safereport_core::Error> for SubmitError {
  fn from(e: safereport_core::Error) -> Self { Self(e.into()) }
}

impl IntoResponse for SubmitError {
  fn into_response(self) -> Response {
    let status = self.0.status();
    self.0.log(status);
    let body = json!({ "success": false, "error": self.0.to_string() });
    (status, Json(body)).into_response()
  }
}
