//! `POST /api/analyze-image`: suggest report fields for an uploaded image.
//!
//! The image is never stored; a failed or abandoned analysis leaves no trace.

use axum::{Json, extract::State};
use safereport_core::{
  ValidationError,
  classify::{ImageClassifier, ImageUpload},
  report::Category,
  store::IncidentStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extract::ApiJson};

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
  /// `data:image/<subtype>;base64,<payload>`
  pub image: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
  pub title:       String,
  /// Canonical spelling of the fine-grained type.
  pub report_type: &'static str,
  pub description: String,
  pub category:    Category,
}

pub async fn handler<S, C>(
  State(state): State<AppState<S, C>>,
  ApiJson(body): ApiJson<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let uri = body
    .image
    .filter(|s| !s.trim().is_empty())
    .ok_or(ValidationError::MissingField("image"))?;
  let image = ImageUpload::from_data_uri(&uri, state.config.max_image_bytes)?;

  let classification = state.classifier.classify(&image).await?;
  let (category, report_type) =
    Category::for_report_type(&classification.report_type)?;
  tracing::debug!(%category, report_type, "image classified");

  Ok(Json(AnalyzeResponse {
    title: classification.title,
    report_type,
    description: classification.description,
    category,
  }))
}
