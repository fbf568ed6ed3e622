//! Report intake, lookup and transition rules over any [`IncidentStore`].
//!
//! Authentication is enforced by the caller (the HTTP layer); this service
//! trusts that operator-only methods are reached with a valid session.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  intake::ReportSubmission,
  lifecycle::TransitionTable,
  report::{Report, ReportStatus},
  store::{IncidentStore, ReportQuery},
};

/// Shared handle; cloning is cheap.
pub struct ReportService<S> {
  store:       Arc<S>,
  transitions: Arc<TransitionTable>,
}

impl<S> Clone for ReportService<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      transitions: Arc::clone(&self.transitions),
    }
  }
}

impl<S: IncidentStore> ReportService<S> {
  pub fn new(store: Arc<S>, transitions: TransitionTable) -> Self {
    Self { store, transitions: Arc::new(transitions) }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Intake ────────────────────────────────────────────────────────────────

  /// Validate and persist a submission, returning its public report id
  /// verbatim.
  ///
  /// No existence check precedes the insert; a taken id comes back from the
  /// store as [`Error::DuplicateReportId`].
  pub async fn create_report(&self, submission: ReportSubmission) -> Result<String> {
    let input = submission.validate()?;
    let report = self.store.insert_report(input).await.map_err(lift)?;
    Ok(report.report_id)
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub async fn get_by_public_id(&self, report_id: &str) -> Result<Report> {
    self
      .store
      .find_report(report_id)
      .await
      .map_err(lift)?
      .ok_or_else(|| Error::ReportNotFound(report_id.to_owned()))
  }

  /// All reports matching `query`, newest first. Operator only.
  pub async fn list_all(&self, query: &ReportQuery) -> Result<Vec<Report>> {
    self.store.list_reports(query).await.map_err(lift)
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Move the report with internal id `id` to `status`. Operator only.
  ///
  /// The status is validated before anything is read, so an invalid value
  /// never touches the store.
  pub async fn set_status(&self, id: Uuid, status: &str) -> Result<Report> {
    let to: ReportStatus = status.parse()?;
    let current = self
      .store
      .get_report(id)
      .await
      .map_err(lift)?
      .ok_or_else(|| Error::ReportNotFound(id.to_string()))?;
    self.transition(current, to).await
  }

  /// Same as [`set_status`](Self::set_status), addressing the report by its
  /// public report id.
  pub async fn set_status_by_public_id(
    &self,
    report_id: &str,
    status: &str,
  ) -> Result<Report> {
    let to: ReportStatus = status.parse()?;
    let current = self.get_by_public_id(report_id).await?;
    self.transition(current, to).await
  }

  /// Check `current.status -> to` against the table and write it only if the
  /// stored status is still `current.status`. When another writer got there
  /// first, the fresh row is checked again.
  async fn transition(&self, mut current: Report, to: ReportStatus) -> Result<Report> {
    loop {
      let from = current.status;
      if !self.transitions.allows(from, to) {
        return Err(Error::TransitionNotAllowed {
          from,
          to,
          allowed: self.transitions.next_statuses(from),
        });
      }
      if let Some(updated) = self
        .store
        .update_status(current.id, from, to)
        .await
        .map_err(lift)?
      {
        return Ok(updated);
      }

      // Status moved underneath us.
      current = match self.store.get_report(current.id).await.map_err(lift)? {
        Some(fresh) => fresh,
        None => return Err(Error::ReportNotFound(current.report_id)),
      };
    }
  }
}

fn lift<E: Into<Error>>(e: E) -> Error { e.into() }
