//! Request-body extractors whose rejections use the API's JSON error shape.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// [`axum::Json`], except that a rejected body (bad syntax, wrong field
/// types, missing `Content-Type`) answers with an [`ApiError`] instead of
/// axum's plain-text reply.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
