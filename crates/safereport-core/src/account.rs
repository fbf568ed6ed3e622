//! Operator accounts and login sessions.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  User,
  Admin,
  Moderator,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::User => "USER",
      Self::Admin => "ADMIN",
      Self::Moderator => "MODERATOR",
    }
  }
}

impl FromStr for Role {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "USER" => Ok(Self::User),
      "ADMIN" => Ok(Self::Admin),
      "MODERATOR" => Ok(Self::Moderator),
      _ => Err(ValidationError::InvalidRole),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A registered operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            Uuid,
  pub email:         String,
  pub name:          String,
  /// argon2 PHC string. Never serialised.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::IncidentStore::create_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub name:          String,
  pub password_hash: String,
  pub role:          Role,
}

/// A login session. Only the SHA-256 digest of the bearer token is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token_hash: String,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}
