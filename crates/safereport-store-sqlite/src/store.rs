//! [`SqliteStore`]: the SQLite implementation of [`IncidentStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{ErrorCode, OptionalExtension as _};
use uuid::Uuid;

use safereport_core::{
  account::{NewUser, Session, User},
  report::{NewReport, Report, ReportStatus},
  store::{IncidentStore, ReportQuery},
};

use crate::{
  Error, Result,
  encode::{
    REPORT_COLUMNS, RawReport, RawSession, RawUser, USER_COLUMNS, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// True if `e` is SQLite rejecting a write on a UNIQUE / PRIMARY KEY
/// constraint.
fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation
  )
}

/// The current time at the precision the `created_at`/`updated_at` columns
/// hold, so a value handed back from a write equals the one read back later.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A SafeReport store backed by a single SQLite file.
///
/// Cheap to clone; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IncidentStore impl ──────────────────────────────────────────────────────

impl IncidentStore for SqliteStore {
  type Error = Error;

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn insert_report(&self, input: NewReport) -> Result<Report> {
    let now = now();
    let report = Report {
      id:             Uuid::new_v4(),
      report_id:      input.report_id,
      category:       input.category,
      specified_type: input.specified_type,
      title:          input.title,
      description:    input.description,
      location:       input.location,
      latitude:       input.latitude,
      longitude:      input.longitude,
      image:          input.image,
      status:         ReportStatus::Pending,
      created_at:     now,
      updated_at:     now,
    };

    let id_str         = encode_uuid(report.id);
    let report_id      = report.report_id.clone();
    let category_str   = report.category.as_str();
    let specified_type = report.specified_type.clone();
    let title          = report.title.clone();
    let description    = report.description.clone();
    let location       = report.location.clone();
    let latitude       = report.latitude;
    let longitude      = report.longitude;
    let image          = report.image.clone();
    let status_str     = report.status.as_str();
    let at_str         = encode_dt(now);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO reports (
             id, report_id, category, specified_type, title, description,
             location, latitude, longitude, image, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
          rusqlite::params![
            id_str,
            report_id,
            category_str,
            specified_type,
            title,
            description,
            location,
            latitude,
            longitude,
            image,
            status_str,
            at_str,
          ],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateReportId(report.report_id));
    }

    tracing::debug!(report_id = %report.report_id, id = %report.id, "report inserted");
    Ok(report)
  }

  async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
              rusqlite::params![id_str],
              RawReport::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn find_report<'a>(&'a self, report_id: &'a str) -> Result<Option<Report>> {
    let report_id = report_id.to_owned();

    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE report_id = ?1"),
              rusqlite::params![report_id],
              RawReport::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn list_reports<'a>(&'a self, query: &'a ReportQuery) -> Result<Vec<Report>> {
    let status_str   = query.status.map(|s| s.as_str());
    let category_str = query.category.map(|c| c.as_str());

    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPORT_COLUMNS}
           FROM reports
           WHERE (?1 IS NULL OR status = ?1)
             AND (?2 IS NULL OR category = ?2)
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![status_str, category_str], RawReport::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }

  async fn update_status(
    &self,
    id:   Uuid,
    from: ReportStatus,
    to:   ReportStatus,
  ) -> Result<Option<Report>> {
    let id_str   = encode_uuid(id);
    let from_str = from.as_str();
    let to_str   = to.as_str();
    let at_str   = encode_dt(now());

    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE reports SET status = ?2, updated_at = ?3
           WHERE id = ?1 AND status = ?4",
          rusqlite::params![id_str, to_str, at_str, from_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
              rusqlite::params![id_str],
              RawReport::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:            Uuid::new_v4(),
      email:         input.email,
      name:          input.name,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    now(),
    };

    let id_str   = encode_uuid(user.id);
    let email    = user.email.clone();
    let name     = user.name.clone();
    let hash     = user.password_hash.clone();
    let role_str = user.role.as_str();
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO users (id, email, name, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, email, name, hash, role_str, at_str],
        );
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateEmail(user.email));
    }
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id:    Uuid,
    token_hash: String,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session {
      token_hash,
      user_id,
      created_at: now(),
      expires_at: expires_at.trunc_subsecs(6),
    };

    let hash_str    = session.token_hash.clone();
    let user_id_str = encode_uuid(user_id);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        let pruned = conn.execute(
          "DELETE FROM sessions WHERE expires_at <= ?1",
          rusqlite::params![created_str],
        )?;
        if pruned > 0 {
          tracing::debug!(pruned, "removed expired sessions");
        }
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![hash_str, user_id_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn find_session<'a>(&'a self, token_hash: &'a str) -> Result<Option<Session>> {
    let hash_str = token_hash.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT token_hash, user_id, created_at, expires_at
               FROM sessions WHERE token_hash = ?1",
              rusqlite::params![hash_str],
              |row| {
                Ok(RawSession {
                  token_hash: row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                  expires_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn delete_session<'a>(&'a self, token_hash: &'a str) -> Result<bool> {
    let hash_str = token_hash.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![hash_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
