//! Handlers for `/api/reports` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/api/reports/create` | Anonymous submission |
//! | `GET`   | `/api/reports/{reportId}/details` | Public lookup; 404 if not found |
//! | `PATCH` | `/api/reports/{reportId}/details` | Body: `{"status":"RESOLVED"}` |
//! | `GET`   | `/api/reports` | Optional `?status=<s>&type=<category>` |
//! | `PUT`   | `/api/reports` | Body: `{"id":"<uuid>","status":"RESOLVED"}` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use safereport_core::{
  ValidationError,
  classify::ImageClassifier,
  intake::ReportSubmission,
  report::{Category, PublicReport, Report, ReportStatus},
  store::{IncidentStore, ReportQuery},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::CurrentUser,
  error::{ApiError, SubmitError},
  extract::ApiJson,
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
  pub success:   bool,
  pub report_id: String,
  pub message:   &'static str,
}

/// `POST /api/reports/create`
pub async fn create<S, C>(
  State(state): State<AppState<S, C>>,
  body: Result<ApiJson<ReportSubmission>, ApiError>,
) -> Result<Json<CreateResponse>, SubmitError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let ApiJson(body) = body?;
  let report_id = state.reports.create_report(body).await?;
  tracing::debug!(%report_id, "report submitted");

  Ok(Json(CreateResponse {
    success: true,
    report_id,
    message: "Report submitted successfully",
  }))
}

// ─── Details ──────────────────────────────────────────────────────────────────

/// `GET /api/reports/{reportId}/details`
pub async fn details<S, C>(
  State(state): State<AppState<S, C>>,
  Path(report_id): Path<String>,
) -> Result<Json<PublicReport>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let report = state.reports.get_by_public_id(&report_id).await?;
  Ok(Json(report.into()))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Option<String>,
}

/// `PATCH /api/reports/{reportId}/details`: body: `{"status":"RESOLVED"}`
pub async fn update_details<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  Path(report_id): Path<String>,
  ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Report>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let status = body.status.ok_or(ValidationError::MissingField("status"))?;
  let report = state
    .reports
    .set_status_by_public_id(&report_id, &status)
    .await?;
  tracing::info!(
    report_id = %report.report_id,
    status = %report.status,
    operator = %user.email,
    "report status changed"
  );
  Ok(Json(report))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status:   Option<String>,
  #[serde(rename = "type")]
  pub category: Option<String>,
}

impl ListParams {
  fn into_query(self) -> Result<ReportQuery, ValidationError> {
    Ok(ReportQuery {
      status:   self.status.as_deref().map(str::parse::<ReportStatus>).transpose()?,
      category: self.category.as_deref().map(str::parse::<Category>).transpose()?,
    })
  }
}

/// `GET /api/reports[?status=<status>&type=<category>]`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
  _user: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let query = params.into_query()?;
  let reports = state.reports.list_all(&query).await?;
  Ok(Json(reports))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub id:     Option<String>,
  pub status: Option<String>,
}

/// `PUT /api/reports`: body: `{"id":"<uuid>","status":"RESOLVED"}`
pub async fn update<S, C>(
  State(state): State<AppState<S, C>>,
  CurrentUser { user, .. }: CurrentUser,
  ApiJson(body): ApiJson<UpdateBody>,
) -> Result<Json<Report>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let id = body.id.ok_or(ValidationError::MissingField("id"))?;
  let status = body.status.ok_or(ValidationError::MissingField("status"))?;
  status.parse::<ReportStatus>()?;

  // Internal ids are UUIDs; anything else cannot name a report.
  let id = Uuid::parse_str(&id)
    .map_err(|_| ApiError::NotFound("Report not found".into()))?;

  let report = state.reports.set_status(id, &status).await?;
  tracing::info!(
    report_id = %report.report_id,
    status = %report.status,
    operator = %user.email,
    "report status changed"
  );
  Ok(Json(report))
}
