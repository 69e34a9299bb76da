//! Comment types.
//!
//! Comments are immutable once recorded. They are stored in insertion order;
//! the direction a listing is read in is a caller option.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub issue_id:   Uuid,
  pub user_id:    Uuid,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EngagementStore::record_comment`].
/// The store trims `body` and rejects the comment if nothing remains.
#[derive(Debug, Clone)]
pub struct NewComment {
  pub issue_id: Uuid,
  pub user_id:  Uuid,
  pub body:     String,
}

/// Read order for a comment listing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CommentOrder {
  #[default]
  OldestFirst,
  NewestFirst,
}
