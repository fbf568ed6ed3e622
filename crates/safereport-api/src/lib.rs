//! JSON HTTP API for SafeReport.
//!
//! Exposes an axum [`Router`] backed by any [`IncidentStore`] and any
//! [`ImageClassifier`]. TLS and process concerns are the caller's
//! responsibility.
//!
//! | Method  | Path                              | Auth    |
//! |---------|-----------------------------------|---------|
//! | `POST`  | `/api/analyze-image`              |         |
//! | `POST`  | `/api/reports/create`             |         |
//! | `GET`   | `/api/reports/{reportId}/details` |         |
//! | `PATCH` | `/api/reports/{reportId}/details` | session |
//! | `GET`   | `/api/reports`                    | session |
//! | `PUT`   | `/api/reports`                    | session |
//! | `POST`  | `/api/auth/signup`                |         |
//! | `POST`  | `/api/auth/signin`                |         |
//! | `GET`   | `/api/auth/session`               | session |
//! | `POST`  | `/api/auth/signout`               | session |
//! | `GET`   | `/health`                         |         |

pub mod account;
pub mod analyze;
pub mod auth;
pub mod error;
pub mod extract;
pub mod reports;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use safereport_core::{
  classify::{ImageClassifier, MAX_IMAGE_BYTES},
  lifecycle::TransitionTable,
  service::ReportService,
  store::IncidentStore,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Request-handling knobs, fixed at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Upper bound on a decoded image, for analysis and for stored reports.
  pub max_image_bytes: usize,
  pub session_ttl:     chrono::Duration,
  /// When false, `POST /api/auth/signup` answers 403.
  pub allow_signup:    bool,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      max_image_bytes: MAX_IMAGE_BYTES,
      session_ttl:     chrono::Duration::days(30),
      allow_signup:    true,
    }
  }
}

impl ApiConfig {
  /// Largest request body accepted: a base64 data URI of the biggest
  /// allowed image plus room for the other JSON fields.
  fn body_limit(&self) -> usize { self.max_image_bytes.div_ceil(3) * 4 + 64 * 1024 }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub reports:    ReportService<S>,
  pub classifier: Arc<C>,
  pub config:     Arc<ApiConfig>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      reports:    self.reports.clone(),
      classifier: Arc::clone(&self.classifier),
      config:     Arc::clone(&self.config),
    }
  }
}

impl<S: IncidentStore, C: ImageClassifier> AppState<S, C> {
  pub fn new(
    store: Arc<S>,
    classifier: Arc<C>,
    transitions: TransitionTable,
    config: ApiConfig,
  ) -> Self {
    Self {
      reports: ReportService::new(store, transitions),
      classifier,
      config: Arc::new(config),
    }
  }

  pub fn store(&self) -> &S { self.reports.store() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full SafeReport router.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let body_limit = state.config.body_limit();

  Router::new()
    .route("/health", get(health))
    // Classification
    .route("/api/analyze-image", post(analyze::handler::<S, C>))
    // Reports
    .route("/api/reports/create", post(reports::create::<S, C>))
    .route(
      "/api/reports/{report_id}/details",
      get(reports::details::<S, C>).patch(reports::update_details::<S, C>),
    )
    .route(
      "/api/reports",
      get(reports::list::<S, C>).put(reports::update::<S, C>),
    )
    // Accounts
    .route("/api/auth/signup", post(account::signup::<S, C>))
    .route("/api/auth/signin", post(account::signin::<S, C>))
    .route("/api/auth/session", get(account::session::<S, C>))
    .route("/api/auth/signout", post(account::signout::<S, C>))
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /health`
async fn health() -> &'static str { "ok" }

#[cfg(test)]
mod tests;
