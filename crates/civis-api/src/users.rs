//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Unauthenticated registration; returns 201 + the one-time token |
//! | `GET`  | `/users/me` | The authenticated caller |
//! | `GET`  | `/users/:id` | 404 if not found |
//!
//! Registration always creates citizens; staff and admin accounts are
//! provisioned out of band.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use civis_core::{
  store::EngagementStore,
  user::{NewUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{self, CurrentUser},
  error::ApiError,
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:  String,
  pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
  pub user:  User,
  /// Shown exactly once; only a digest is stored server-side.
  pub token: String,
}

/// `POST /users` — body: `{"name":"...","email":"..."}`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let name = body.name.trim().to_string();
  if name.is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let email = body.email.trim().to_string();
  if email.is_empty() {
    return Err(ApiError::BadRequest("email must not be empty".into()));
  }

  let token = Uuid::new_v4().hyphenated().to_string();

  let user = state
    .store
    .add_user(NewUser {
      name,
      email,
      role: UserRole::Citizen,
      token_digest: auth::token_digest(&token),
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /users/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
  Json(user)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}
