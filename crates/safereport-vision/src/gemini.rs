//! [`GeminiClassifier`]: classifies report images with Google's Gemini API.

use std::time::Duration;

use reqwest::Client;
use safereport_core::classify::{
  ANALYSIS_PROMPT, Classification, ClassifyError, ImageClassifier, ImageUpload,
  parse_model_response,
};

use crate::wire::{Content, GenerateRequest, GenerateResponse, InlineData, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
  /// Without a key every call fails with [`ClassifyError::Configuration`].
  pub api_key:  Option<String>,
  pub model:    String,
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:  None,
      model:    DEFAULT_MODEL.to_owned(),
      base_url: DEFAULT_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Async client for the `generateContent` endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClassifier {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClassifier {
  pub fn new(config: GeminiConfig) -> Result<Self, ClassifyError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| {
        ClassifyError::Configuration(format!("failed to build HTTP client: {e}"))
      })?;
    Ok(Self { client, config })
  }

  pub fn has_api_key(&self) -> bool { self.config.api_key.is_some() }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }

  /// `POST /v1beta/models/<model>:generateContent`, returning the model's
  /// raw text answer.
  async fn generate(&self, image: &ImageUpload) -> Result<String, ClassifyError> {
    let api_key = self.config.api_key.as_deref().ok_or_else(|| {
      ClassifyError::Configuration("Gemini API key not configured".into())
    })?;

    let body = GenerateRequest {
      contents: vec![Content {
        parts: vec![
          Part::Text { text: ANALYSIS_PROMPT },
          Part::InlineData {
            inline_data: InlineData {
              mime_type: &image.mime_type,
              data:      image.to_base64(),
            },
          },
        ],
      }],
    };

    tracing::debug!(
      model = %self.config.model,
      mime_type = %image.mime_type,
      bytes = image.data.len(),
      "requesting image classification"
    );

    let response = self
      .client
      .post(self.url())
      .header("x-goog-api-key", api_key)
      .json(&body)
      .send()
      .await
      .map_err(|e| ClassifyError::Upstream(format!("Gemini request failed: {e}")))?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      tracing::warn!(%status, %body, "Gemini API returned an error");
      return Err(ClassifyError::Upstream(format!("Gemini API error: {status}")));
    }

    let text = response.text().await.map_err(|e| {
      ClassifyError::Upstream(format!("failed to read Gemini response: {e}"))
    })?;
    let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
      ClassifyError::InvalidModelResponse(format!("failed to parse Gemini response: {e}"))
    })?;

    parsed.into_text().ok_or_else(|| {
      ClassifyError::InvalidModelResponse("no text in Gemini response".into())
    })
  }
}

impl ImageClassifier for GeminiClassifier {
  async fn classify<'a>(
    &'a self,
    image: &'a ImageUpload,
  ) -> Result<Classification, ClassifyError> {
    let text = self.generate(image).await?;
    parse_model_response(&text)
  }
}
