//! Operator accounts: sign-up, sign-in, session lookup and sign-out.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use safereport_core::{
  ValidationError,
  account::{NewUser, Role, User},
  classify::ImageClassifier,
  store::IncidentStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{self, CurrentUser},
  error::ApiError,
  extract::ApiJson,
};

fn required(
  value: Option<String>,
  name: &'static str,
) -> Result<String, ValidationError> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
    .ok_or(ValidationError::MissingField(name))
}

// ─── Sign-up ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub email:    Option<String>,
  pub name:     Option<String>,
  pub password: Option<String>,
  pub role:     Option<String>,
}

/// `POST /api/auth/signup`: body: `{"email","name","password","role"}`
pub async fn signup<S, C>(
  State(state): State<AppState<S, C>>,
  ApiJson(body): ApiJson<SignupBody>,
) -> Result<(StatusCode, Json<User>), ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  if !state.config.allow_signup {
    return Err(ApiError::Forbidden("sign-up is disabled".into()));
  }

  let email = required(body.email, "email")?;
  let name = required(body.name, "name")?;
  // Passwords are taken verbatim; only emptiness is rejected.
  let password = body
    .password
    .filter(|p| !p.is_empty())
    .ok_or(ValidationError::MissingField("password"))?;
  let role: Role = required(body.role, "role")?.parse()?;

  let password_hash = auth::hash_password(&password)?;
  let user = state
    .store()
    .create_user(NewUser { email, name, password_hash, role })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(email = %user.email, role = %user.role, "user registered");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Sign-in ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SigninBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
  /// Bearer token; shown once.
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub user:       User,
}

/// `POST /api/auth/signin`: body: `{"email","password"}`
pub async fn signin<S, C>(
  State(state): State<AppState<S, C>>,
  ApiJson(body): ApiJson<SigninBody>,
) -> Result<Json<SigninResponse>, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  let email = required(body.email, "email")?;
  let password = body
    .password
    .filter(|p| !p.is_empty())
    .ok_or(ValidationError::MissingField("password"))?;

  let store = state.store();
  let user = store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;
  let verified = match &user {
    Some(u) => auth::verify_password(&password, &u.password_hash),
    None => auth::verify_unknown_account(&password),
  };
  let Some(user) = user.filter(|_| verified) else {
    tracing::warn!(%email, "rejected sign-in");
    return Err(ApiError::InvalidCredentials);
  };

  let token = auth::generate_token();
  let expires_at = Utc::now() + state.config.session_ttl;
  let session = store
    .create_session(user.id, auth::token_digest(&token), expires_at)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SigninResponse { token, expires_at: session.expires_at, user }))
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// `GET /api/auth/session`
pub async fn session<S, C>(current: CurrentUser) -> Json<User>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  Json(current.user)
}

/// `POST /api/auth/signout`
pub async fn signout<S, C>(
  State(state): State<AppState<S, C>>,
  current: CurrentUser,
) -> Result<StatusCode, ApiError>
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  state
    .store()
    .delete_session(&current.token_hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
