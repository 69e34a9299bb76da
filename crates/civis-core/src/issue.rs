//! Issue types — the municipal problem reports the ledger tracks.
//!
//! An issue is created once and then only ever mutated through ledger
//! operations: vote toggles adjust the counts and urgency score, staff
//! actions advance the status. Issues are never deleted, only moved into a
//! terminal status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle state of an issue.
///
/// Transitions only move forward; `Closed` and `Rejected` are terminal, and
/// `Rejected` is reachable only from `Submitted` or `Acknowledged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
  Submitted,
  Acknowledged,
  InProgress,
  Resolved,
  Closed,
  Rejected,
}

impl IssueStatus {
  /// The discriminant string stored in the `status` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Submitted => "submitted",
      Self::Acknowledged => "acknowledged",
      Self::InProgress => "in_progress",
      Self::Resolved => "resolved",
      Self::Closed => "closed",
      Self::Rejected => "rejected",
    }
  }

  /// Position in the forward ordering. `Rejected` sits outside the ladder
  /// and is special-cased by [`Self::can_transition_to`].
  fn rank(self) -> u8 {
    match self {
      Self::Submitted => 0,
      Self::Acknowledged => 1,
      Self::InProgress => 2,
      Self::Resolved => 3,
      Self::Closed => 4,
      Self::Rejected => 5,
    }
  }

  /// Terminal statuses accept no further votes or transitions.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Closed | Self::Rejected)
  }

  /// Forward-only transition check.
  ///
  /// A transition to the current status is allowed — callers treat it as an
  /// idempotent no-op. Skipping forward over intermediate statuses is
  /// permitted; moving backward never is.
  pub fn can_transition_to(self, to: IssueStatus) -> bool {
    if self == to {
      return true;
    }
    if self.is_terminal() {
      return false;
    }
    match to {
      Self::Rejected => matches!(self, Self::Submitted | Self::Acknowledged),
      Self::Submitted => false,
      _ => to.rank() > self.rank(),
    }
  }
}

impl fmt::Display for IssueStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// Closed category enumeration.
///
/// Display labels and department routing are explicit mapping tables rather
/// than string transformations, so an invalid category cannot drift in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
  RoadMaintenance,
  Streetlight,
  Sanitation,
  WaterSupply,
  Electricity,
  Traffic,
  Parks,
  Other,
}

impl IssueCategory {
  /// The discriminant string stored in the `category` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::RoadMaintenance => "road_maintenance",
      Self::Streetlight => "streetlight",
      Self::Sanitation => "sanitation",
      Self::WaterSupply => "water_supply",
      Self::Electricity => "electricity",
      Self::Traffic => "traffic",
      Self::Parks => "parks",
      Self::Other => "other",
    }
  }

  /// Human-readable label shown in feeds and notifications.
  pub fn label(self) -> &'static str {
    match self {
      Self::RoadMaintenance => "Road Maintenance",
      Self::Streetlight => "Streetlight",
      Self::Sanitation => "Sanitation",
      Self::WaterSupply => "Water Supply",
      Self::Electricity => "Electricity",
      Self::Traffic => "Traffic",
      Self::Parks => "Parks",
      Self::Other => "Other",
    }
  }

  /// The municipal department responsible for issues of this category.
  pub fn department(self) -> &'static str {
    match self {
      Self::RoadMaintenance | Self::Streetlight => "Public Works",
      Self::Sanitation => "Sanitation Department",
      Self::WaterSupply => "Water Department",
      Self::Electricity => "Electricity Department",
      Self::Traffic => "Traffic Department",
      Self::Parks => "Parks and Recreation",
      Self::Other => "General Administration",
    }
  }
}

// ─── Priority ────────────────────────────────────────────────────────────────

/// Staff-assigned triage priority; independent of the derived urgency score.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
  Low,
  #[default]
  Medium,
  High,
  Urgent,
}

impl IssuePriority {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Urgent => "urgent",
    }
  }
}

// ─── Urgency ─────────────────────────────────────────────────────────────────

/// Derived ranking value: upvotes weigh double, confirmations single.
///
/// Pure so backfills and tests can recompute it in isolation. Every store
/// mutation that changes a count persists the recomputed score in the same
/// transaction.
pub fn urgency_score(upvotes: u32, confirmations: u32) -> u32 {
  upvotes * 2 + confirmations
}

// ─── Issue ───────────────────────────────────────────────────────────────────

/// A reported municipal problem.
///
/// Vote counts, `urgency_score`, and `resolve_karma_granted` are owned by
/// the engagement ledger and only change inside store operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
  pub issue_id:              Uuid,
  pub title:                 String,
  pub description:           String,
  pub category:              IssueCategory,
  pub status:                IssueStatus,
  pub priority:              IssuePriority,
  pub latitude:              f64,
  pub longitude:             f64,
  pub address:               Option<String>,
  pub reporter_id:           Uuid,
  pub upvotes:               u32,
  pub confirmations:         u32,
  pub urgency_score:         u32,
  /// Set once the one-time resolve karma bonus has been granted.
  pub resolve_karma_granted: bool,
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
  pub acknowledged_at:       Option<DateTime<Utc>>,
  pub resolved_at:           Option<DateTime<Utc>>,
}

// ─── NewIssue ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::EngagementStore::create_issue`].
/// Identifiers, counts, and timestamps are set by the store.
#[derive(Debug, Clone)]
pub struct NewIssue {
  pub title:       String,
  pub description: String,
  pub category:    IssueCategory,
  pub priority:    IssuePriority,
  pub latitude:    f64,
  pub longitude:   f64,
  pub address:     Option<String>,
  pub reporter_id: Uuid,
}

// ─── Status log ──────────────────────────────────────────────────────────────

/// One applied status change, as recorded in the append-only status log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
  pub change_id:  Uuid,
  pub issue_id:   Uuid,
  pub actor_id:   Uuid,
  pub from:       IssueStatus,
  pub to:         IssueStatus,
  pub note:       Option<String>,
  pub created_at: DateTime<Utc>,
}
