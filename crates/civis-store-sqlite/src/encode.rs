//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which also compare
//! correctly as text for the windowed vote queries). Enums are stored as
//! their discriminant strings. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use civis_core::{
  comment::Comment,
  issue::{
    Issue, IssueCategory, IssuePriority, IssueStatus, StatusChange,
  },
  notify::Notification,
  user::{User, UserRole},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enum discriminants ──────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<IssueStatus> {
  match s {
    "submitted" => Ok(IssueStatus::Submitted),
    "acknowledged" => Ok(IssueStatus::Acknowledged),
    "in_progress" => Ok(IssueStatus::InProgress),
    "resolved" => Ok(IssueStatus::Resolved),
    "closed" => Ok(IssueStatus::Closed),
    "rejected" => Ok(IssueStatus::Rejected),
    other => Err(Error::UnknownDiscriminant {
      column: "status",
      value:  other.to_string(),
    }),
  }
}

pub fn decode_category(s: &str) -> Result<IssueCategory> {
  match s {
    "road_maintenance" => Ok(IssueCategory::RoadMaintenance),
    "streetlight" => Ok(IssueCategory::Streetlight),
    "sanitation" => Ok(IssueCategory::Sanitation),
    "water_supply" => Ok(IssueCategory::WaterSupply),
    "electricity" => Ok(IssueCategory::Electricity),
    "traffic" => Ok(IssueCategory::Traffic),
    "parks" => Ok(IssueCategory::Parks),
    "other" => Ok(IssueCategory::Other),
    other => Err(Error::UnknownDiscriminant {
      column: "category",
      value:  other.to_string(),
    }),
  }
}

pub fn decode_priority(s: &str) -> Result<IssuePriority> {
  match s {
    "low" => Ok(IssuePriority::Low),
    "medium" => Ok(IssuePriority::Medium),
    "high" => Ok(IssuePriority::High),
    "urgent" => Ok(IssuePriority::Urgent),
    other => Err(Error::UnknownDiscriminant {
      column: "priority",
      value:  other.to_string(),
    }),
  }
}

pub fn decode_role(s: &str) -> Result<UserRole> {
  match s {
    "citizen" => Ok(UserRole::Citizen),
    "staff" => Ok(UserRole::Staff),
    "admin" => Ok(UserRole::Admin),
    other => Err(Error::UnknownDiscriminant {
      column: "role",
      value:  other.to_string(),
    }),
  }
}

// ─── In-closure decode helpers ───────────────────────────────────────────────
//
// Mutating operations decode row values while still inside the connection
// closure; failures there surface through the rusqlite error channel.

fn conversion_failure(what: &'static str, value: &str) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(
    0,
    rusqlite::types::Type::Text,
    format!("unknown {what}: {value:?}").into(),
  )
}

pub fn decode_status_sql(s: &str) -> rusqlite::Result<IssueStatus> {
  decode_status(s).map_err(|_| conversion_failure("issue status", s))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawIssue::from_row`]; keep the two in sync.
pub const ISSUE_COLUMNS: &str = "issue_id, title, description, category, \
   status, priority, latitude, longitude, address, reporter_id, upvotes, \
   confirmations, urgency_score, resolve_karma_granted, created_at, \
   updated_at, acknowledged_at, resolved_at";

/// Raw values read directly from an `issues` row.
pub struct RawIssue {
  pub issue_id:              String,
  pub title:                 String,
  pub description:           String,
  pub category:              String,
  pub status:                String,
  pub priority:              String,
  pub latitude:              f64,
  pub longitude:             f64,
  pub address:               Option<String>,
  pub reporter_id:           String,
  pub upvotes:               u32,
  pub confirmations:         u32,
  pub urgency_score:         u32,
  pub resolve_karma_granted: bool,
  pub created_at:            String,
  pub updated_at:            String,
  pub acknowledged_at:       Option<String>,
  pub resolved_at:           Option<String>,
}

impl RawIssue {
  /// Mapper for any query selecting [`ISSUE_COLUMNS`] in order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      issue_id:              row.get(0)?,
      title:                 row.get(1)?,
      description:           row.get(2)?,
      category:              row.get(3)?,
      status:                row.get(4)?,
      priority:              row.get(5)?,
      latitude:              row.get(6)?,
      longitude:             row.get(7)?,
      address:               row.get(8)?,
      reporter_id:           row.get(9)?,
      upvotes:               row.get(10)?,
      confirmations:         row.get(11)?,
      urgency_score:         row.get(12)?,
      resolve_karma_granted: row.get(13)?,
      created_at:            row.get(14)?,
      updated_at:            row.get(15)?,
      acknowledged_at:       row.get(16)?,
      resolved_at:           row.get(17)?,
    })
  }

  pub fn into_issue(self) -> Result<Issue> {
    Ok(Issue {
      issue_id:              decode_uuid(&self.issue_id)?,
      title:                 self.title,
      description:           self.description,
      category:              decode_category(&self.category)?,
      status:                decode_status(&self.status)?,
      priority:              decode_priority(&self.priority)?,
      latitude:              self.latitude,
      longitude:             self.longitude,
      address:               self.address,
      reporter_id:           decode_uuid(&self.reporter_id)?,
      upvotes:               self.upvotes,
      confirmations:         self.confirmations,
      urgency_score:         self.urgency_score,
      resolve_karma_granted: self.resolve_karma_granted,
      created_at:            decode_dt(&self.created_at)?,
      updated_at:            decode_dt(&self.updated_at)?,
      acknowledged_at:       self
        .acknowledged_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      resolved_at:           self.resolved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub active:     bool,
  pub karma:      i64,
  pub created_at: String,
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str =
  "user_id, name, email, role, active, karma, created_at";

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      role:       row.get(3)?,
      active:     row.get(4)?,
      karma:      row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      role:       decode_role(&self.role)?,
      active:     self.active,
      karma:      self.karma,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub issue_id:   String,
  pub user_id:    String,
  pub body:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      issue_id:   row.get(1)?,
      user_id:    row.get(2)?,
      body:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      issue_id:   decode_uuid(&self.issue_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `status_log` row.
pub struct RawStatusChange {
  pub change_id:   String,
  pub issue_id:    String,
  pub actor_id:    String,
  pub from_status: String,
  pub to_status:   String,
  pub note:        Option<String>,
  pub created_at:  String,
}

impl RawStatusChange {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      change_id:   row.get(0)?,
      issue_id:    row.get(1)?,
      actor_id:    row.get(2)?,
      from_status: row.get(3)?,
      to_status:   row.get(4)?,
      note:        row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_status_change(self) -> Result<StatusChange> {
    Ok(StatusChange {
      change_id:  decode_uuid(&self.change_id)?,
      issue_id:   decode_uuid(&self.issue_id)?,
      actor_id:   decode_uuid(&self.actor_id)?,
      from:       decode_status(&self.from_status)?,
      to:         decode_status(&self.to_status)?,
      note:       self.note,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub user_id:         String,
  pub issue_id:        Option<String>,
  pub title:           String,
  pub body:            String,
  pub is_read:         bool,
  pub created_at:      String,
}

impl RawNotification {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      notification_id: row.get(0)?,
      user_id:         row.get(1)?,
      issue_id:        row.get(2)?,
      title:           row.get(3)?,
      body:            row.get(4)?,
      is_read:         row.get(5)?,
      created_at:      row.get(6)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      issue_id:        self.issue_id.as_deref().map(decode_uuid).transpose()?,
      title:           self.title,
      body:            self.body,
      read:            self.is_read,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
