//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use civis_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing or invalid bearer token")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend failure onto the transport status table, recovering the
  /// typed domain error through the [`StoreError`] seam. Anything without a
  /// domain error is an infrastructure failure and reports as 500.
  pub fn from_store<E>(e: E) -> Self
  where
    E: StoreError + std::error::Error + Send + Sync + 'static,
  {
    use civis_core::Error as Domain;
    let mapped = match e.domain() {
      Some(d @ (Domain::IssueNotFound(_) | Domain::UserNotFound(_))) => {
        Some(Self::NotFound(d.to_string()))
      }
      Some(d @ Domain::IssueTerminal { .. }) => {
        Some(Self::Conflict(d.to_string()))
      }
      Some(
        d @ (Domain::InvalidTransition { .. }
        | Domain::EmptyComment
        | Domain::EmptyField(_)
        | Domain::UnknownVoteType(_)),
      ) => Some(Self::BadRequest(d.to_string())),
      Some(Domain::Serialization(_)) | None => None,
    };
    mapped.unwrap_or_else(|| Self::Store(Box::new(e)))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let mut response =
      (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        header::HeaderValue::from_static("Bearer"),
      );
    }
    response
  }
}
