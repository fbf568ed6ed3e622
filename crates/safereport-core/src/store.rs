//! The `IncidentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `safereport-store-sqlite`). The service layer and the HTTP API depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  account::{NewUser, Session, User},
  report::{Category, NewReport, Report, ReportStatus},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`IncidentStore::list_reports`]. Results are always ordered
/// newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
  pub status:   Option<ReportStatus>,
  pub category: Option<Category>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a SafeReport storage backend.
///
/// Reports are never deleted and only their status is ever updated. Every
/// method is a single-row read or write; no method spans a transaction.
///
/// Backend errors convert into [`crate::Error`]; a backend reports a taken
/// public report id as [`crate::Error::DuplicateReportId`] and a taken email
/// as [`crate::Error::DuplicateEmail`].
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Persist a new report with status `PENDING`. The store assigns the
  /// internal id and both timestamps.
  fn insert_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Fetch a report by internal id. Returns `None` if not found.
  fn get_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// Fetch a report by its public report id. Returns `None` if not found.
  fn find_report<'a>(
    &'a self,
    report_id: &'a str,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + 'a;

  /// List reports matching `query`, ordered by creation time descending.
  fn list_reports<'a>(
    &'a self,
    query: &'a ReportQuery,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + 'a;

  /// Move a report from status `from` to `to` and refresh `updated_at`, as a
  /// single compare-and-set write. Returns the updated report, or `None` if
  /// no report has this id with status `from`.
  fn update_status(
    &self,
    id: Uuid,
    from: ReportStatus,
    to: ReportStatus,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Register a user. Emails are unique.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session for `user_id`, identified by the digest of its token.
  /// Sessions already expired at the time of the call are removed first.
  fn create_session(
    &self,
    user_id: Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  fn find_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Remove a session. Returns `false` if it did not exist.
  fn delete_session<'a>(
    &'a self,
    token_hash: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}
