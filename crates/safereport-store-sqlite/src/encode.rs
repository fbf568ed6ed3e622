//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that they sort lexicographically. Enums are
//! stored by their wire names. UUIDs are stored as hyphenated lowercase
//! strings.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use safereport_core::{
  account::{Role, Session, User},
  report::{Category, Report, ReportStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode { column, value: s.to_owned() })
}

pub fn decode_category(s: &str) -> Result<Category> {
  decode_enum("category", s)
}

pub fn decode_status(s: &str) -> Result<ReportStatus> {
  decode_enum("status", s)
}

pub fn decode_role(s: &str) -> Result<Role> { decode_enum("role", s) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawReport::from_row`], in order.
pub const REPORT_COLUMNS: &str = "id, report_id, category, specified_type, title, description,
   location, latitude, longitude, image, status, created_at, updated_at";

/// Raw values read directly from a `reports` row.
pub struct RawReport {
  pub id:             String,
  pub report_id:      String,
  pub category:       String,
  pub specified_type: String,
  pub title:          String,
  pub description:    String,
  pub location:       Option<String>,
  pub latitude:       Option<f64>,
  pub longitude:      Option<f64>,
  pub image:          Option<String>,
  pub status:         String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawReport {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      report_id:      row.get(1)?,
      category:       row.get(2)?,
      specified_type: row.get(3)?,
      title:          row.get(4)?,
      description:    row.get(5)?,
      location:       row.get(6)?,
      latitude:       row.get(7)?,
      longitude:      row.get(8)?,
      image:          row.get(9)?,
      status:         row.get(10)?,
      created_at:     row.get(11)?,
      updated_at:     row.get(12)?,
    })
  }

  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      id:             decode_uuid(&self.id)?,
      report_id:      self.report_id,
      category:       decode_category(&self.category)?,
      specified_type: self.specified_type,
      title:          self.title,
      description:    self.description,
      location:       self.location,
      latitude:       self.latitude,
      longitude:      self.longitude,
      image:          self.image,
      status:         decode_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawUser::from_row`], in order.
pub const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            String,
  pub email:         String,
  pub name:          String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      email:         row.get(1)?,
      name:          row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.id)?,
      email:         self.email,
      name:          self.name,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub token_hash: String,
  pub user_id:    String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token_hash: self.token_hash,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
