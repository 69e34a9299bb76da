//! Karma deltas — the reputation side of the ledger.
//!
//! Every delta is tied to a single triggering event; reversible events have
//! a mirror image of the same magnitude. Totals are clamped at zero.

/// Reporter bonus for submitting a new issue.
pub const REPORT_ISSUE: i64 = 10;

/// Voter reward for casting a vote or confirmation. Reversed on retraction.
pub const CAST_VOTE: i64 = 1;

/// Reporter reward per distinct upvote received. Reversed when that upvote
/// is retracted. Confirmations carry no reporter reward.
pub const UPVOTE_RECEIVED: i64 = 2;

/// One-time reporter bonus when the issue first reaches `Resolved`, guarded
/// by the issue's `resolve_karma_granted` flag.
pub const ISSUE_RESOLVED: i64 = 50;

/// Commenter reward for posting a comment.
pub const POST_COMMENT: i64 = 1;

/// Apply `delta` to a karma total, clamping at zero.
pub fn apply(karma: i64, delta: i64) -> i64 {
  (karma + delta).max(0)
}
