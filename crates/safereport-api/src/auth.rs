//! Bearer-session extractor, token minting and password hashing.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use rand_core::{OsRng, RngCore};
use safereport_core::{
  account::User, classify::ImageClassifier, store::IncidentStore,
};
use sha2::{Digest, Sha256};

use crate::{AppState, error::ApiError};

/// Random bytes in a session token, before hex encoding.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Mint a fresh bearer token. Only its [`token_digest`] is ever stored.
pub fn generate_token() -> String {
  let mut bytes = [0u8; SESSION_TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Lowercase hex SHA-256 of a bearer token.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}").into()))
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Stands in for a stored hash when a sign-in names an unknown email, so that
/// both outcomes cost one argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("no such account").ok());

/// Spend the same work as [`verify_password`] without any account. Always
/// `false`.
pub fn verify_unknown_account(password: &str) -> bool {
  if let Some(phc) = DUMMY_HASH.as_deref() {
    verify_password(password, phc);
  }
  false
}

/// The token carried in `Authorization: Bearer <token>`, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// Present in a handler means the request carried a live session.
///
/// Any role is accepted.
pub struct CurrentUser {
  pub user:       User,
  /// Digest of the presented token; identifies the session.
  pub token_hash: String,
}

impl<S, C> FromRequestParts<AppState<S, C>> for CurrentUser
where
  S: IncidentStore + 'static,
  C: ImageClassifier + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let token_hash = token_digest(token);
    let store = state.store();

    let session = store
      .find_session(&token_hash)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;
    if session.is_expired_at(Utc::now()) {
      store.delete_session(&token_hash).await.map_err(ApiError::store)?;
      return Err(ApiError::Unauthorized);
    }

    let user = store
      .get_user(session.user_id)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;

    Ok(CurrentUser { user, token_hash })
  }
}
