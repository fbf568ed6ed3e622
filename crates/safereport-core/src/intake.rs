//! Intake validation: turning a raw submission into a [`NewReport`].

use serde::Deserialize;

use crate::{
  ValidationError,
  report::{Category, NewReport},
};

/// A report exactly as a submitter sent it. Every field is optional here so
/// that a missing field surfaces as a [`ValidationError`] naming it, rather
/// than as a deserialisation failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
  pub report_id:      Option<String>,
  #[serde(rename = "type")]
  pub category:       Option<String>,
  pub specified_type: Option<String>,
  pub title:          Option<String>,
  pub description:    Option<String>,
  pub location:       Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  pub image:          Option<String>,
}

impl ReportSubmission {
  /// Validate, failing on the first violation:
  ///
  /// 1. `reportId`, `type`, `specifiedType`, `title`, `description` must be
  ///    present and non-blank, checked in that order.
  /// 2. `type` must be `EMERGENCY` or `NON_EMERGENCY`.
  ///
  /// Optional fields pass through untouched. The pairing of `specifiedType`
  /// with `type` is not checked.
  pub fn validate(self) -> Result<NewReport, ValidationError> {
    let report_id = required(self.report_id, "reportId")?;
    let category = required(self.category, "type")?;
    let specified_type = required(self.specified_type, "specifiedType")?;
    let title = required(self.title, "title")?;
    let description = required(self.description, "description")?;

    let category: Category = category.parse()?;

    Ok(NewReport {
      report_id,
      category,
      specified_type,
      title,
      description,
      location: self.location,
      latitude: self.latitude,
      longitude: self.longitude,
      image: self.image,
    })
  }
}

fn required(
  value: Option<String>,
  name: &'static str,
) -> Result<String, ValidationError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or(ValidationError::MissingField(name))
}
