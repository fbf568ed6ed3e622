//! Router-level tests against an in-memory SQLite store and a canned
//! classifier.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use safereport_core::{
  account::{NewUser, Role},
  classify::{Classification, ClassifyError, ImageClassifier, ImageUpload},
  lifecycle::TransitionTable,
  store::IncidentStore,
};
use safereport_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiConfig, AppState, auth, router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

#[derive(Clone)]
struct StubClassifier {
  reply: Result<Classification, ClassifyError>,
}

impl StubClassifier {
  fn answering(report_type: &str) -> Self {
    Self {
      reply: Ok(Classification {
        title:       "Smoke over the market".into(),
        report_type: report_type.into(),
        description: "Dense smoke rising from a stall.".into(),
      }),
    }
  }
}

impl ImageClassifier for StubClassifier {
  async fn classify<'a>(
    &'a self,
    _image: &'a ImageUpload,
  ) -> Result<Classification, ClassifyError> {
    self.reply.clone()
  }
}

type State = AppState<SqliteStore, StubClassifier>;

async fn make_state_with(
  classifier: StubClassifier,
  transitions: TransitionTable,
  config: ApiConfig,
) -> State {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState::new(Arc::new(store), Arc::new(classifier), transitions, config)
}

async fn make_state() -> State {
  make_state_with(
    StubClassifier::answering("fire outbreak"),
    TransitionTable::unrestricted(),
    ApiConfig::default(),
  )
  .await
}

/// Register an operator directly in the store and open a session for them.
async fn operator(state: &State) -> String {
  let user = state
    .store()
    .create_user(NewUser {
      email:         "ops@example.org".into(),
      name:          "Ops".into(),
      password_hash: "unused".into(),
      role:          Role::Admin,
    })
    .await
    .unwrap();
  let token = auth::generate_token();
  state
    .store()
    .create_session(user.id, auth::token_digest(&token), Utc::now() + Duration::days(1))
    .await
    .unwrap();
  token
}

async fn send(
  state: State,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  exchange(state, builder.body(body).unwrap()).await
}

/// Send a body verbatim, with an optional `Content-Type`.
async fn send_raw(
  state: State,
  uri: &str,
  content_type: Option<&str>,
  body: &str,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method("POST").uri(uri);
  if let Some(content_type) = content_type {
    builder = builder.header(header::CONTENT_TYPE, content_type);
  }
  exchange(state, builder.body(Body::from(body.to_owned())).unwrap()).await
}

async fn exchange(state: State, request: Request<Body>) -> (StatusCode, Value) {
  let resp = router(state).oneshot(request).await.unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or_else(|_| {
      Value::String(String::from_utf8_lossy(&bytes).into_owned())
    })
  };
  (status, value)
}

fn submission(report_id: &str) -> Value {
  json!({
    "reportId": report_id,
    "type": "EMERGENCY",
    "specifiedType": "Fire Outbreak",
    "title": "Warehouse fire",
    "description": "Smoke visible from main st",
    "location": "123 Main St",
    "latitude": 40.7,
    "longitude": -74.0
  })
}

async fn submit(state: &State, report_id: &str) {
  let (status, _) = send(
    state.clone(),
    "POST",
    "/api/reports/create",
    None,
    Some(submission(report_id)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

async fn status_of(state: &State, report_id: &str) -> String {
  let uri = format!("/api/reports/{report_id}/details");
  let (_, body) = send(state.clone(), "GET", &uri, None, None).await;
  body["status"].as_str().unwrap().to_owned()
}

/// Internal id of a report, as an operator sees it.
async fn internal_id(state: &State, token: &str, report_id: &str) -> String {
  let (_, body) = send(state.clone(), "GET", "/api/reports", Some(token), None).await;
  body
    .as_array()
    .unwrap()
    .iter()
    .find(|r| r["reportId"] == report_id)
    .unwrap()["id"]
    .as_str()
    .unwrap()
    .to_owned()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_ok() {
  let (status, body) = send(make_state().await, "GET", "/health", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, "ok");
}

// ── Intake & lookup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn submitted_report_is_pending_and_public() {
  let state = make_state().await;

  let (status, body) = send(
    state.clone(),
    "POST",
    "/api/reports/create",
    None,
    Some(submission("abc123")),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["reportId"], "abc123");
  assert_eq!(body["message"], "Report submitted successfully");

  let (status, body) =
    send(state, "GET", "/api/reports/abc123/details", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "PENDING");
  assert_eq!(body["type"], "EMERGENCY");
  assert_eq!(body["reportType"], "Fire Outbreak");
  assert_eq!(body["location"], "123 Main St");
  assert!(body.get("id").is_none(), "internal id leaked: {body}");
}

#[tokio::test]
async fn optional_fields_may_be_omitted() {
  let state = make_state().await;
  let (status, _) = send(
    state.clone(),
    "POST",
    "/api/reports/create",
    None,
    Some(json!({
      "reportId": "minimal",
      "type": "NON_EMERGENCY",
      "specifiedType": "Other",
      "title": "Broken streetlight",
      "description": "Out for a week"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (_, body) =
    send(state, "GET", "/api/reports/minimal/details", None, None).await;
  assert_eq!(body["location"], Value::Null);
  assert_eq!(body["image"], Value::Null);
}

#[tokio::test]
async fn missing_field_is_named_in_the_error() {
  let state = make_state().await;
  let mut body = submission("abc123");
  body.as_object_mut().unwrap().remove("title");

  let (status, body) =
    send(state.clone(), "POST", "/api/reports/create", None, Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["success"], false);
  assert_eq!(body["error"], "missing field title");

  let (status, _) =
    send(state, "GET", "/api/reports/abc123/details", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_category_is_rejected() {
  let state = make_state().await;
  let mut body = submission("abc123");
  body["type"] = json!("URGENT");

  let (status, body) =
    send(state, "POST", "/api/reports/create", None, Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "invalid category");
}

#[tokio::test]
async fn mistyped_submission_is_a_json_error() {
  let state = make_state().await;
  let mut body = submission("abc123");
  body["latitude"] = json!("40.7");

  let (status, resp) = send(
    state.clone(),
    "POST",
    "/api/reports/create",
    None,
    Some(body),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["success"], false);
  assert!(resp["error"].as_str().unwrap().contains("latitude"), "{resp}");

  let (status, _) =
    send(state, "GET", "/api/reports/abc123/details", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_submission_bodies_are_json_errors() {
  let state = make_state().await;
  let valid = submission("abc123").to_string();

  for (content_type, body) in [
    (Some("application/json"), "{not json"),
    (None, valid.as_str()),
    (Some("text/plain"), valid.as_str()),
  ] {
    let (status, resp) =
      send_raw(state.clone(), "/api/reports/create", content_type, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type:?}");
    assert_eq!(resp["success"], false, "{resp}");
    assert!(resp["error"].is_string(), "{resp}");
  }
}

#[tokio::test]
async fn duplicate_report_id_conflicts() {
  let state = make_state().await;
  submit(&state, "abc123").await;

  let (status, body) = send(
    state.clone(),
    "POST",
    "/api/reports/create",
    None,
    Some(submission("abc123")),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["success"], false);

  let token = operator(&state).await;
  let (_, list) = send(state, "GET", "/api/reports", Some(&token), None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_report_is_not_found() {
  let (status, body) = send(
    make_state().await,
    "GET",
    "/api/reports/nope/details",
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Report not found");
}

// ── Operator listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_requires_a_session() {
  let state = make_state().await;
  submit(&state, "abc123").await;

  let (status, body) = send(state.clone(), "GET", "/api/reports", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["error"], "Unauthorized");

  let (status, _) =
    send(state, "GET", "/api/reports", Some("not-a-token"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn listing_is_newest_first_with_internal_ids() {
  let state = make_state().await;
  for id in ["r1", "r2", "r3"] {
    submit(&state, id).await;
  }
  let token = operator(&state).await;

  let (status, body) = send(state, "GET", "/api/reports", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  let ids: Vec<_> = body
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["reportId"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(ids, ["r3", "r2", "r1"]);
  assert!(body[0]["id"].is_string());
}

#[tokio::test]
async fn listing_filters_by_status_and_type() {
  let state = make_state().await;
  submit(&state, "fire").await;
  let mut theft = submission("theft");
  theft["type"] = json!("NON_EMERGENCY");
  theft["specifiedType"] = json!("Theft");
  send(state.clone(), "POST", "/api/reports/create", None, Some(theft)).await;
  let token = operator(&state).await;

  let (_, body) = send(
    state.clone(),
    "GET",
    "/api/reports?type=NON_EMERGENCY",
    Some(&token),
    None,
  )
  .await;
  let reports = body.as_array().unwrap();
  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0]["reportId"], "theft");

  let (_, body) = send(
    state.clone(),
    "GET",
    "/api/reports?status=RESOLVED",
    Some(&token),
    None,
  )
  .await;
  assert!(body.as_array().unwrap().is_empty());

  let (status, _) = send(
    state,
    "GET",
    "/api/reports?status=ARCHIVED",
    Some(&token),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Status transitions ───────────────────────────────────────────────────────

#[tokio::test]
async fn unauthenticated_update_changes_nothing() {
  let state = make_state().await;
  submit(&state, "abc123").await;

  let (status, _) = send(
    state.clone(),
    "PUT",
    "/api/reports",
    None,
    Some(json!({ "id": "x", "status": "RESOLVED" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(status_of(&state, "abc123").await, "PENDING");

  let (status, _) = send(
    state.clone(),
    "PATCH",
    "/api/reports/abc123/details",
    None,
    Some(json!({ "status": "RESOLVED" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(status_of(&state, "abc123").await, "PENDING");
}

#[tokio::test]
async fn operator_updates_status_by_internal_id() {
  let state = make_state().await;
  submit(&state, "abc123").await;
  let token = operator(&state).await;
  let id = internal_id(&state, &token, "abc123").await;

  let (status, body) = send(
    state.clone(),
    "PUT",
    "/api/reports",
    Some(&token),
    Some(json!({ "id": id, "status": "RESOLVED" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "RESOLVED");
  assert_eq!(body["id"], id.as_str());
  assert_eq!(status_of(&state, "abc123").await, "RESOLVED");

  // The default table lets a resolved report reopen.
  let (status, body) = send(
    state.clone(),
    "PUT",
    "/api/reports",
    Some(&token),
    Some(json!({ "id": id, "status": "PENDING" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn invalid_updates_are_rejected_without_effect() {
  let state = make_state().await;
  submit(&state, "abc123").await;
  let token = operator(&state).await;
  let id = internal_id(&state, &token, "abc123").await;

  let cases = [
    (json!({ "id": id, "status": "ARCHIVED" }), StatusCode::BAD_REQUEST),
    (json!({ "id": id }), StatusCode::BAD_REQUEST),
    (json!({ "status": "RESOLVED" }), StatusCode::BAD_REQUEST),
    (json!({ "id": id, "status": 3 }), StatusCode::BAD_REQUEST),
    (
      json!({ "id": uuid::Uuid::new_v4().to_string(), "status": "RESOLVED" }),
      StatusCode::NOT_FOUND,
    ),
    (json!({ "id": "abc123", "status": "RESOLVED" }), StatusCode::NOT_FOUND),
  ];
  for (body, expected) in cases {
    let (status, resp) =
      send(state.clone(), "PUT", "/api/reports", Some(&token), Some(body)).await;
    assert_eq!(status, expected, "{resp}");
  }
  assert_eq!(status_of(&state, "abc123").await, "PENDING");
}

#[tokio::test]
async fn operator_updates_status_by_public_id() {
  let state = make_state().await;
  submit(&state, "abc123").await;
  let token = operator(&state).await;

  let (status, body) = send(
    state.clone(),
    "PATCH",
    "/api/reports/abc123/details",
    Some(&token),
    Some(json!({ "status": "IN_PROGRESS" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "IN_PROGRESS");

  let (status, _) = send(
    state,
    "PATCH",
    "/api/reports/missing/details",
    Some(&token),
    Some(json!({ "status": "IN_PROGRESS" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forward_only_table_freezes_resolved_reports() {
  let state = make_state_with(
    StubClassifier::answering("Theft"),
    TransitionTable::forward_only(),
    ApiConfig::default(),
  )
  .await;
  submit(&state, "abc123").await;
  let token = operator(&state).await;

  let (status, _) = send(
    state.clone(),
    "PATCH",
    "/api/reports/abc123/details",
    Some(&token),
    Some(json!({ "status": "RESOLVED" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    state.clone(),
    "PATCH",
    "/api/reports/abc123/details",
    Some(&token),
    Some(json!({ "status": "PENDING" })),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT, "{body}");
  assert!(body["error"].as_str().unwrap().ends_with("(allowed: none)"), "{body}");
  assert_eq!(status_of(&state, "abc123").await, "RESOLVED");
}

// ── Image analysis ───────────────────────────────────────────────────────────

#[tokio::test]
async fn analysis_resolves_the_category() {
  let (status, body) = send(
    make_state().await,
    "POST",
    "/api/analyze-image",
    None,
    Some(json!({ "image": PNG })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["title"], "Smoke over the market");
  assert_eq!(body["reportType"], "Fire Outbreak");
  assert_eq!(body["category"], "EMERGENCY");
  assert_eq!(body["description"], "Dense smoke rising from a stall.");
}

#[tokio::test]
async fn analysis_rejects_bad_uploads() {
  let state = make_state().await;
  for body in [
    json!({}),
    json!({ "image": "" }),
    json!({ "image": "data:text/plain;base64,aGVsbG8=" }),
    json!({ "image": "not a data uri" }),
  ] {
    let (status, resp) = send(
      state.clone(),
      "POST",
      "/api/analyze-image",
      None,
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
  }
}

#[tokio::test]
async fn analysis_rejects_non_string_images() {
  let state = make_state().await;
  let (status, resp) = send(
    state.clone(),
    "POST",
    "/api/analyze-image",
    None,
    Some(json!({ "image": 123 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(resp["error"].is_string(), "{resp}");

  let (status, resp) =
    send_raw(state, "/api/analyze-image", None, r#"{"image":"x"}"#).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(resp["error"].is_string(), "{resp}");
}

#[tokio::test]
async fn analysis_rejects_oversized_images() {
  let state = make_state_with(
    StubClassifier::answering("Theft"),
    TransitionTable::unrestricted(),
    ApiConfig { max_image_bytes: 4, ..ApiConfig::default() },
  )
  .await;
  let (status, _) = send(
    state,
    "POST",
    "/api/analyze-image",
    None,
    Some(json!({ "image": PNG })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_model_type_is_a_client_error() {
  let state = make_state_with(
    StubClassifier::answering("Alien Invasion"),
    TransitionTable::unrestricted(),
    ApiConfig::default(),
  )
  .await;
  let (status, body) = send(
    state,
    "POST",
    "/api/analyze-image",
    None,
    Some(json!({ "image": PNG })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("Alien Invasion"));
}

#[tokio::test]
async fn classifier_failures_are_server_errors() {
  for err in [
    ClassifyError::Configuration("Gemini API key not configured".into()),
    ClassifyError::Upstream("timed out".into()),
    ClassifyError::InvalidModelResponse("missing TYPE line".into()),
  ] {
    let state = make_state_with(
      StubClassifier { reply: Err(err) },
      TransitionTable::unrestricted(),
      ApiConfig::default(),
    )
    .await;
    let (status, body) = send(
      state,
      "POST",
      "/api/analyze-image",
      None,
      Some(json!({ "image": PNG })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
  }
}

// ── Accounts ─────────────────────────────────────────────────────────────────

fn signup_body() -> Value {
  json!({
    "email": "dana@example.org",
    "name": "Dana",
    "password": "hunter22",
    "role": "MODERATOR"
  })
}

#[tokio::test]
async fn signup_signin_session_signout() {
  let state = make_state().await;

  let (status, user) = send(
    state.clone(),
    "POST",
    "/api/auth/signup",
    None,
    Some(signup_body()),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(user["email"], "dana@example.org");
  assert_eq!(user["role"], "MODERATOR");
  assert!(user.get("passwordHash").is_none());

  let (status, body) = send(
    state.clone(),
    "POST",
    "/api/auth/signin",
    None,
    Some(json!({ "email": "dana@example.org", "password": "hunter22" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let token = body["token"].as_str().unwrap().to_owned();
  assert!(body["expiresAt"].is_string());

  let (status, me) =
    send(state.clone(), "GET", "/api/auth/session", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["id"], user["id"]);

  // Any role may list reports.
  let (status, _) =
    send(state.clone(), "GET", "/api/reports", Some(&token), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) =
    send(state.clone(), "POST", "/api/auth/signout", Some(&token), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, _) =
    send(state, "GET", "/api/auth/session", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signin_with_wrong_password_is_unauthorized() {
  let state = make_state().await;
  send(state.clone(), "POST", "/api/auth/signup", None, Some(signup_body())).await;

  for body in [
    json!({ "email": "dana@example.org", "password": "wrong" }),
    json!({ "email": "nobody@example.org", "password": "hunter22" }),
  ] {
    let (status, resp) =
      send(state.clone(), "POST", "/api/auth/signin", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "invalid credentials");
  }
}

#[tokio::test]
async fn signup_validation_and_conflicts() {
  let state = make_state().await;

  let mut missing_role = signup_body();
  missing_role.as_object_mut().unwrap().remove("role");
  let (status, body) = send(
    state.clone(),
    "POST",
    "/api/auth/signup",
    None,
    Some(missing_role),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "missing field role");

  let mut bad_role = signup_body();
  bad_role["role"] = json!("ROOT");
  let (status, _) =
    send(state.clone(), "POST", "/api/auth/signup", None, Some(bad_role)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  send(state.clone(), "POST", "/api/auth/signup", None, Some(signup_body())).await;
  let (status, _) =
    send(state, "POST", "/api/auth/signup", None, Some(signup_body())).await;
  assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_can_be_disabled() {
  let state = make_state_with(
    StubClassifier::answering("Theft"),
    TransitionTable::unrestricted(),
    ApiConfig { allow_signup: false, ..ApiConfig::default() },
  )
  .await;
  let (status, _) =
    send(state, "POST", "/api/auth/signup", None, Some(signup_body())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_session_is_unauthorized() {
  let state = make_state().await;
  let user = state
    .store()
    .create_user(NewUser {
      email:         "old@example.org".into(),
      name:          "Old".into(),
      password_hash: "unused".into(),
      role:          Role::User,
    })
    .await
    .unwrap();
  let token = auth::generate_token();
  state
    .store()
    .create_session(user.id, auth::token_digest(&token), Utc::now() - Duration::minutes(1))
    .await
    .unwrap();

  let (status, _) =
    send(state.clone(), "GET", "/api/reports", Some(&token), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(
    state
      .store()
      .find_session(&auth::token_digest(&token))
      .await
      .unwrap()
      .is_none()
  );
}
