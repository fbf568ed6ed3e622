//! Reports, the sole entity of consequence.
//!
//! A report is written once by intake and afterwards only its `status` (and
//! with it `updated_at`) ever changes. Nothing deletes reports.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

// ─── Category ────────────────────────────────────────────────────────────────

/// Fine-grained types that belong to [`Category::Emergency`].
pub const EMERGENCY_TYPES: [&str; 3] =
  ["Medical Emergency", "Fire Outbreak", "Violence"];

/// Fine-grained types that belong to [`Category::NonEmergency`].
pub const NON_EMERGENCY_TYPES: [&str; 3] =
  ["Theft", "Natural Disaster", "Other"];

/// Top-level classification of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
  Emergency,
  NonEmergency,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Emergency => "EMERGENCY",
      Self::NonEmergency => "NON_EMERGENCY",
    }
  }

  /// The specified-type vocabulary offered for this category.
  pub fn specified_types(&self) -> &'static [&'static str] {
    match self {
      Self::Emergency => &EMERGENCY_TYPES,
      Self::NonEmergency => &NON_EMERGENCY_TYPES,
    }
  }

  /// Map a fine-grained report type (as suggested by the classifier) onto its
  /// category. Returns the canonical spelling alongside the category.
  ///
  /// Matching ignores ASCII case and surrounding whitespace. A type outside
  /// both vocabularies is an error; it never defaults to either category.
  pub fn for_report_type(
    report_type: &str,
  ) -> Result<(Self, &'static str), ValidationError> {
    let wanted = report_type.trim();
    [Self::Emergency, Self::NonEmergency]
      .into_iter()
      .find_map(|category| {
        category
          .specified_types()
          .iter()
          .find(|t| t.eq_ignore_ascii_case(wanted))
          .map(|t| (category, *t))
      })
      .ok_or_else(|| ValidationError::UnknownReportType(wanted.to_owned()))
  }
}

impl FromStr for Category {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "EMERGENCY" => Ok(Self::Emergency),
      "NON_EMERGENCY" => Ok(Self::NonEmergency),
      _ => Err(ValidationError::InvalidCategory),
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage state of a report. Every report starts out [`Pending`](Self::Pending).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
  #[default]
  Pending,
  InProgress,
  Resolved,
  Dismissed,
}

impl ReportStatus {
  pub const ALL: [Self; 4] =
    [Self::Pending, Self::InProgress, Self::Resolved, Self::Dismissed];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::InProgress => "IN_PROGRESS",
      Self::Resolved => "RESOLVED",
      Self::Dismissed => "DISMISSED",
    }
  }
}

impl FromStr for ReportStatus {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or(ValidationError::InvalidStatus)
  }
}

impl fmt::Display for ReportStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// A persisted report, as seen by operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  /// Store-assigned primary key. Never shown to submitters.
  pub id:             Uuid,
  /// Public identifier handed to the submitter; immutable.
  pub report_id:      String,
  #[serde(rename = "type")]
  pub category:       Category,
  #[serde(rename = "reportType")]
  pub specified_type: String,
  pub title:          String,
  pub description:    String,
  pub location:       Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  /// Data-URI encoded image, stored inline.
  pub image:          Option<String>,
  pub status:         ReportStatus,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// What a submitter may see when looking a report up by its public id: the
/// full row minus the internal primary key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReport {
  pub report_id:      String,
  #[serde(rename = "type")]
  pub category:       Category,
  #[serde(rename = "reportType")]
  pub specified_type: String,
  pub title:          String,
  pub description:    String,
  pub location:       Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  pub image:          Option<String>,
  pub status:         ReportStatus,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl From<Report> for PublicReport {
  fn from(r: Report) -> Self {
    Self {
      report_id:      r.report_id,
      category:       r.category,
      specified_type: r.specified_type,
      title:          r.title,
      description:    r.description,
      location:       r.location,
      latitude:       r.latitude,
      longitude:      r.longitude,
      image:          r.image,
      status:         r.status,
      created_at:     r.created_at,
      updated_at:     r.updated_at,
    }
  }
}

// ─── NewReport ───────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::IncidentStore::insert_report`].
///
/// `status`, `created_at` and `updated_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
  pub report_id:      String,
  pub category:       Category,
  pub specified_type: String,
  pub title:          String,
  pub description:    String,
  pub location:       Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  pub image:          Option<String>,
}
