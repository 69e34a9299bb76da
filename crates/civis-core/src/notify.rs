//! Notification types.
//!
//! Notifications are written best-effort after a status change. Dispatch
//! failure is logged by the caller and never rolls back the transaction
//! that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub user_id:         Uuid,
  pub issue_id:        Option<Uuid>,
  pub title:           String,
  pub body:            String,
  pub read:            bool,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::EngagementStore::record_notification`].
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub user_id:  Uuid,
  pub issue_id: Option<Uuid>,
  pub title:    String,
  pub body:     String,
}
