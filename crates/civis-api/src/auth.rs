//! Bearer-token extractor and standalone verifier.
//!
//! Tokens are opaque strings issued at registration. Only a SHA-256 hex
//! digest is stored, so verification digests the presented token and looks
//! the digest up; there is nothing to decrypt and nothing sensitive at rest.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use civis_core::{store::EngagementStore, user::User};
use sha2::{Digest as _, Sha256};

use crate::{AppState, error::ApiError};

/// SHA-256 hex digest of an API token, as stored in the users table.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Verify credentials directly from headers — used by the extractor and by
/// anything doing manual dispatch.
pub async fn verify_bearer<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<User, ApiError>
where
  S: EngagementStore,
{
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  let digest = token_digest(token);

  store
    .find_user_by_token_digest(&digest)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Unauthorized)
}

/// The authenticated caller; present in a handler signature means the
/// request carried a valid token for an active user.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_bearer(&parts.headers, state.store.as_ref()).await?;
    Ok(CurrentUser(user))
  }
}
