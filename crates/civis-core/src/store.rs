//! The `EngagementStore` trait and supporting query types.
//!
//! The trait is the engagement ledger's contract, implemented by storage
//! backends (e.g. `civis-store-sqlite`). Higher layers (`civis-api`,
//! `civis-server`) depend on this abstraction, not on any concrete backend.
//!
//! Every mutating operation is one atomic unit: vote rows, counts, urgency
//! score, karma deltas, flags, and log rows commit or abort together, so
//! partial application is never observable. Implementations must also
//! serialise conflicting mutations — at minimum per `(issue, user, type)`
//! vote key and per user for karma — so that concurrent duplicate requests
//! perform exactly one logical toggle each.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
  comment::{Comment, CommentOrder, NewComment},
  issue::{Issue, IssueCategory, IssueStatus, NewIssue, StatusChange},
  notify::{NewNotification, Notification},
  user::{NewUser, User},
  vote::{Vote, VoteReceipt, VoteType},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`EngagementStore::list_issues`].
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
  pub status:      Option<IssueStatus>,
  pub category:    Option<IssueCategory>,
  /// Restrict to issues reported by this user.
  pub reporter_id: Option<Uuid>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

// ─── Error seam ──────────────────────────────────────────────────────────────

/// Implemented by backend error types so transport layers can recover the
/// typed domain error buried inside a backend failure and map it to the
/// right response without depending on a concrete backend.
pub trait StoreError {
  /// The domain error this backend failure carries, if any. `None` means an
  /// infrastructure failure (I/O, corruption) the transport reports as 500.
  fn domain(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an engagement ledger backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EngagementStore: Send + Sync {
  type Error: StoreError + std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user. Only the token digest carried by `input` is persisted;
  /// issuing the plaintext token is the transport layer's job.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up the user owning the token with this SHA-256 hex digest.
  fn find_user_by_token_digest<'a>(
    &'a self,
    digest: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Active citizens ordered by karma descending.
  fn leaderboard(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Issues ────────────────────────────────────────────────────────────

  /// Create an issue and apply the reporter's submission karma in the same
  /// transaction, so the bonus cannot fire twice or be lost.
  fn create_issue(
    &self,
    input: NewIssue,
  ) -> impl Future<Output = Result<Issue, Self::Error>> + Send + '_;

  /// Retrieve an issue by UUID. Returns `None` if not found.
  fn get_issue(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Issue>, Self::Error>> + Send + '_;

  /// List issues matching `filter`.
  fn list_issues<'a>(
    &'a self,
    filter: &'a IssueFilter,
  ) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send + 'a;

  /// Apply a staff status change.
  ///
  /// Validates the forward-only ordering (a same-status call is an
  /// idempotent no-op), stamps `acknowledged_at`/`resolved_at` on first
  /// entry, appends to the status log, and grants the one-time resolve
  /// karma bonus guarded by the issue's `resolve_karma_granted` flag.
  fn set_status(
    &self,
    issue_id: Uuid,
    to: IssueStatus,
    actor_id: Uuid,
    note: Option<String>,
  ) -> impl Future<Output = Result<Issue, Self::Error>> + Send + '_;

  /// Applied status changes for an issue, oldest first.
  fn status_log(
    &self,
    issue_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StatusChange>, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Toggle a vote.
  ///
  /// With no active vote for `(issue_id, user_id, vote_type)`: create it,
  /// bump the matching count, reward the voter, and for upvotes reward the
  /// reporter. With an active vote: retract it and reverse every one of
  /// those effects. The urgency score is recomputed and persisted either
  /// way. Fails with the issue-terminal error on closed/rejected issues.
  fn cast_vote(
    &self,
    issue_id: Uuid,
    user_id: Uuid,
    vote_type: VoteType,
  ) -> impl Future<Output = Result<VoteReceipt, Self::Error>> + Send + '_;

  /// The caller's active vote of this type, if any. Used by feed responses
  /// to annotate what the viewing user has already cast.
  fn find_vote(
    &self,
    issue_id: Uuid,
    user_id: Uuid,
    vote_type: VoteType,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Record a comment and reward the commenter. Rejects bodies that are
  /// empty after trimming. Never touches the urgency score.
  fn record_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Comments for an issue in the requested order.
  fn list_comments(
    &self,
    issue_id: Uuid,
    order: CommentOrder,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Feeds ─────────────────────────────────────────────────────────────

  /// Issues ordered by the count of upvotes cast within `[now - window,
  /// now]`, descending, ties broken by most recent `created_at`. Votes
  /// outside the window are excluded from the count. `now` is explicit so
  /// backfills and tests need no clock control.
  fn trending_feed(
    &self,
    window: Duration,
    now: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send + '_;

  /// Issues by `created_at` descending.
  fn newest_feed(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send + '_;

  /// Issues within `radius_km` of the given point, ordered by urgency score
  /// descending.
  fn nearby_feed(
    &self,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Issue>, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Record a notification. Callers treat failure as best-effort: log and
  /// move on, never abort the triggering operation.
  fn record_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Notifications for a user, newest first.
  fn list_notifications(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;
}
