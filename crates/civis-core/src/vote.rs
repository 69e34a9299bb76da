//! Vote types — one row per active `(issue, user, type)` vote.
//!
//! Casting uses toggle semantics: a cast with no active vote creates one, a
//! repeated cast retracts it. Retracting deletes the row, so aggregate counts
//! and windowed trending queries both see only active votes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The two ways a citizen can back an issue: `Upvote` ("this matters") and
/// `Confirm` ("I see it too"). Upvotes weigh double in the urgency score and
/// grant the reporter karma; confirmations do neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
  Upvote,
  Confirm,
}

impl VoteType {
  /// The discriminant string stored in the `vote_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Upvote => "upvote",
      Self::Confirm => "confirm",
    }
  }

  /// Parse the wire discriminant. Anything but `upvote`/`confirm` is a
  /// validation failure.
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "upvote" => Ok(Self::Upvote),
      "confirm" => Ok(Self::Confirm),
      other => Err(Error::UnknownVoteType(other.to_string())),
    }
  }
}

/// An active vote. A user may hold one upvote and one confirmation on the
/// same issue simultaneously, but never two of a kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub issue_id:  Uuid,
  pub user_id:   Uuid,
  pub vote_type: VoteType,
  /// Feeds the trending window query; survives only while the vote is
  /// active.
  pub cast_at:   DateTime<Utc>,
}

/// Outcome of a toggle cast. `applied` is `false` when the call retracted an
/// existing vote; `new_count` is the count for the cast's vote type after
/// the toggle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VoteReceipt {
  pub applied:       bool,
  pub new_count:     u32,
  pub urgency_score: u32,
}
