//! User types.
//!
//! Karma mutation is owned by the engagement ledger; the fields here are the
//! read model. API tokens are issued at registration and never stored in
//! plaintext — the store keeps only a digest, which is why no token field
//! appears on [`User`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a user is allowed to do beyond citizen engagement.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
  #[default]
  Citizen,
  Staff,
  Admin,
}

impl UserRole {
  /// The discriminant string stored in the `role` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Citizen => "citizen",
      Self::Staff => "staff",
      Self::Admin => "admin",
    }
  }

  /// Staff and admins may change issue status; citizens may not.
  pub fn can_triage(self) -> bool {
    matches!(self, Self::Staff | Self::Admin)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub role:       UserRole,
  pub active:     bool,
  /// Non-negative reputation total, adjusted only by ledger operations.
  pub karma:      i64,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EngagementStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:         String,
  pub email:        String,
  pub role:         UserRole,
  /// SHA-256 hex digest of the user's API token. The transport layer
  /// generates the token and digests it; the plaintext never reaches the
  /// store.
  pub token_digest: String,
}
