//! Image classification contract.
//!
//! An uploaded image is sent, together with [`ANALYSIS_PROMPT`], to an
//! external multimodal model. The model is instructed to answer in three
//! labelled lines which [`parse_model_response`] extracts. Adapters for
//! concrete models implement [`ImageClassifier`].

use std::{future::Future, sync::LazyLock};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::ValidationError;

/// Default upper bound on a decoded upload.
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Fixed instruction sent alongside every image.
pub const ANALYSIS_PROMPT: &str = "\
Analyze this emergency situation image and respond in this exact format:
TITLE: Write a clear, brief title
TYPE: Choose one (Theft, Fire Outbreak, Medical Emergency, Natural Disaster, Violence, or Other)
DESCRIPTION: Write a clear, concise description";

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
  /// The adapter is missing something it needs (e.g. an API key). Not
  /// retryable without operator action.
  #[error("classifier misconfigured: {0}")]
  Configuration(String),

  /// The upstream call failed, timed out or returned a non-success status.
  #[error("classifier request failed: {0}")]
  Upstream(String),

  /// The model answered, but not in the mandated three-line format.
  #[error("invalid model response: {0}")]
  InvalidModelResponse(String),
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// A decoded, size-checked image ready to be classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
  /// e.g. `image/jpeg`
  pub mime_type: String,
  pub data:      Vec<u8>,
}

impl ImageUpload {
  /// Parse a `data:<mime>;base64,<payload>` URI.
  ///
  /// The MIME type must be an `image/*` type and the decoded payload must not
  /// exceed `max_bytes`.
  pub fn from_data_uri(
    uri: &str,
    max_bytes: usize,
  ) -> Result<Self, ValidationError> {
    let invalid = |msg: &str| ValidationError::InvalidImage(msg.to_owned());

    let rest = uri
      .trim()
      .strip_prefix("data:")
      .ok_or_else(|| invalid("expected a data URI"))?;
    let (meta, payload) = rest
      .split_once(',')
      .ok_or_else(|| invalid("missing base64 encoding"))?;
    let meta = meta
      .strip_suffix(";base64")
      .ok_or_else(|| invalid("missing base64 encoding"))?;

    let mime_type = meta.split(';').next().unwrap_or_default().trim();
    if !mime_type.starts_with("image/") {
      return Err(invalid(&format!("{mime_type:?} is not an image type")));
    }

    // Reject obviously oversized payloads before decoding them.
    if payload.len() / 4 * 3 > max_bytes + 3 {
      return Err(ValidationError::ImageTooLarge { limit: max_bytes });
    }

    let data = B64
      .decode(payload.trim())
      .map_err(|_| invalid("payload is not valid base64"))?;
    if data.len() > max_bytes {
      return Err(ValidationError::ImageTooLarge { limit: max_bytes });
    }

    Ok(Self { mime_type: mime_type.to_owned(), data })
  }

  /// The payload re-encoded as standard base64, for inline transport.
  pub fn to_base64(&self) -> String { B64.encode(&self.data) }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// The model's suggestion for a new report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
  pub title:       String,
  /// One of the fine-grained report types, as spelled by the model.
  pub report_type: String,
  pub description: String,
}

// ─── Adapter trait ───────────────────────────────────────────────────────────

/// An external service able to suggest report fields for an image.
pub trait ImageClassifier: Send + Sync {
  fn classify<'a>(
    &'a self,
    image: &'a ImageUpload,
  ) -> impl Future<Output = Result<Classification, ClassifyError>> + Send + 'a;
}

// ─── Response parsing ────────────────────────────────────────────────────────

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern("TITLE"));
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| label_pattern("TYPE"));
static DESCRIPTION_RE: LazyLock<Regex> =
  LazyLock::new(|| label_pattern("DESCRIPTION"));

fn label_pattern(label: &str) -> Regex {
  // Line-anchored; tolerates indentation and markdown emphasis around the
  // label, e.g. `  **TITLE:** Fire`.
  Regex::new(&format!(r"(?m)^[ \t*_]*{label}[*_]*:[*_]*[ \t]*(.*)$"))
    .expect("static label pattern compiles")
}

/// Extract the three labelled fields from free-form model output.
///
/// Every label must be present with a non-empty value; otherwise the whole
/// response is rejected and nothing partial is returned.
pub fn parse_model_response(text: &str) -> Result<Classification, ClassifyError> {
  let field = |re: &Regex, label: &str| {
    re.captures(text)
      .and_then(|c| c.get(1))
      .map(|m| m.as_str().trim())
      .filter(|v| !v.is_empty())
      .map(str::to_owned)
      .ok_or_else(|| {
        ClassifyError::InvalidModelResponse(format!("missing {label} line"))
      })
  };

  let title = field(&TITLE_RE, "TITLE")?;
  let report_type = field(&TYPE_RE, "TYPE")?;
  let description = field(&DESCRIPTION_RE, "DESCRIPTION")?;

  Ok(Classification { title, report_type, description })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", B64.encode(bytes))
  }

  // ── parse_model_response ─────────────────────────────────────────────────

  #[test]
  fn parses_three_labelled_lines() {
    let text = "TITLE: Warehouse fire\nTYPE: Fire Outbreak\nDESCRIPTION: Thick smoke rising from a warehouse roof.\n";
    let c = parse_model_response(text).unwrap();
    assert_eq!(c.title, "Warehouse fire");
    assert_eq!(c.report_type, "Fire Outbreak");
    assert_eq!(c.description, "Thick smoke rising from a warehouse roof.");
  }

  #[test]
  fn tolerates_indentation_chatter_and_crlf() {
    let text = "Sure, here is my analysis.\r\n  TITLE:   Car accident  \r\n  TYPE: Medical Emergency\r\n  **DESCRIPTION:** Two cars collided.\r\n";
    let c = parse_model_response(text).unwrap();
    assert_eq!(c.title, "Car accident");
    assert_eq!(c.report_type, "Medical Emergency");
    assert_eq!(c.description, "Two cars collided.");
  }

  #[test]
  fn missing_type_line_is_rejected_without_partial_data() {
    let text = "TITLE: Something\nDESCRIPTION: Something happened";
    assert_eq!(
      parse_model_response(text),
      Err(ClassifyError::InvalidModelResponse("missing TYPE line".into()))
    );
  }

  #[test]
  fn empty_value_counts_as_missing() {
    let text = "TITLE: \nTYPE: Theft\nDESCRIPTION: Gone";
    assert!(matches!(
      parse_model_response(text),
      Err(ClassifyError::InvalidModelResponse(_))
    ));
  }

  #[test]
  fn label_must_start_the_line() {
    let text = "The TITLE: is missing here\nTYPE: Theft\nDESCRIPTION: Gone";
    assert!(parse_model_response(text).is_err());
  }

  // ── ImageUpload ──────────────────────────────────────────────────────────

  #[test]
  fn decodes_image_data_uri() {
    let upload =
      ImageUpload::from_data_uri(&data_uri("image/png", b"\x89PNG"), 1024)
        .unwrap();
    assert_eq!(upload.mime_type, "image/png");
    assert_eq!(upload.data, b"\x89PNG");
    assert_eq!(upload.to_base64(), B64.encode(b"\x89PNG"));
  }

  #[test]
  fn rejects_non_image_mime() {
    let err = ImageUpload::from_data_uri(&data_uri("text/plain", b"hi"), 1024)
      .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidImage(_)));
  }

  #[test]
  fn rejects_missing_base64_marker() {
    let err =
      ImageUpload::from_data_uri("data:image/png,rawbytes", 1024).unwrap_err();
    assert_eq!(
      err,
      ValidationError::InvalidImage("missing base64 encoding".into())
    );
  }

  #[test]
  fn rejects_plain_base64_without_scheme() {
    let err = ImageUpload::from_data_uri("aGVsbG8=", 1024).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidImage(_)));
  }

  #[test]
  fn enforces_size_limit() {
    let exact = vec![0u8; 64];
    assert!(ImageUpload::from_data_uri(&data_uri("image/jpeg", &exact), 64).is_ok());

    let over = vec![0u8; 65];
    assert_eq!(
      ImageUpload::from_data_uri(&data_uri("image/jpeg", &over), 64),
      Err(ValidationError::ImageTooLarge { limit: 64 })
    );

    let far_over = vec![0u8; 4096];
    assert_eq!(
      ImageUpload::from_data_uri(&data_uri("image/jpeg", &far_over), 64),
      Err(ValidationError::ImageTooLarge { limit: 64 })
    );
  }
}
