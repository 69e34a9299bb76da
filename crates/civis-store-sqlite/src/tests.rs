//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use civis_core::{
  comment::{CommentOrder, NewComment},
  issue::{self, IssueCategory, IssuePriority, IssueStatus, NewIssue},
  notify::NewNotification,
  store::{EngagementStore, IssueFilter},
  user::{NewUser, User, UserRole},
  vote::VoteType,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str, role: UserRole) -> User {
  s.add_user(NewUser {
    name:         name.into(),
    email:        format!("{name}@example.com"),
    role,
    token_digest: format!("digest-{name}"),
  })
  .await
  .unwrap()
}

fn report(reporter: Uuid) -> NewIssue {
  NewIssue {
    title:       "Pothole on 5th Avenue".into(),
    description: "Deep pothole near the bus stop".into(),
    category:    IssueCategory::RoadMaintenance,
    priority:    IssuePriority::Medium,
    latitude:    12.97,
    longitude:   77.59,
    address:     Some("5th Avenue".into()),
    reporter_id: reporter,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let alice = user(&s, "alice", UserRole::Citizen).await;
  assert_eq!(alice.role, UserRole::Citizen);
  assert_eq!(alice.karma, 0);
  assert!(alice.active);

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, alice.user_id);
  assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn token_digest_lookup() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;

  let found = s
    .find_user_by_token_digest("digest-alice")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.user_id, alice.user_id);

  assert!(
    s.find_user_by_token_digest("digest-nobody")
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Issue creation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_issue_defaults_and_reporter_karma() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;

  let issue = s.create_issue(report(alice.user_id)).await.unwrap();
  assert_eq!(issue.status, IssueStatus::Submitted);
  assert_eq!(issue.upvotes, 0);
  assert_eq!(issue.confirmations, 0);
  assert_eq!(issue.urgency_score, 0);
  assert!(!issue.resolve_karma_granted);
  assert!(issue.acknowledged_at.is_none());
  assert!(issue.resolved_at.is_none());

  // Reporting earns the submission bonus.
  let alice = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice.karma, 10);

  let fetched = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!(fetched.issue_id, issue.issue_id);
  assert_eq!(fetched.title, "Pothole on 5th Avenue");
}

#[tokio::test]
async fn create_issue_unknown_reporter_errors() {
  let s = store().await;
  let err = s.create_issue(report(Uuid::new_v4())).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::UserNotFound(_))
  ));
}

#[tokio::test]
async fn create_issue_blank_title_rejected() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;

  let mut input = report(alice.user_id);
  input.title = "   ".into();
  let err = s.create_issue(input).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::EmptyField("title"))
  ));
}

// ─── Voting ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upvote_updates_counts_urgency_and_karma() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let receipt = s
    .cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  assert!(receipt.applied);
  assert_eq!(receipt.new_count, 1);
  assert_eq!(receipt.urgency_score, 2);

  let issue = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!(issue.upvotes, 1);
  assert_eq!(issue.urgency_score, 2);

  let bob = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob.karma, 1);
  let alice = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice.karma, 12);
}

#[tokio::test]
async fn repeated_cast_retracts() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  s.cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  let receipt = s
    .cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  assert!(!receipt.applied);
  assert_eq!(receipt.new_count, 0);
  assert_eq!(receipt.urgency_score, 0);

  // Everything the cast did is reversed.
  let issue = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!(issue.upvotes, 0);
  assert_eq!(issue.urgency_score, 0);
  let bob = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob.karma, 0);
  let alice = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice.karma, 10);
}

#[tokio::test]
async fn upvote_and_confirm_coexist() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  s.cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  let receipt = s
    .cast_vote(issue.issue_id, bob.user_id, VoteType::Confirm)
    .await
    .unwrap();
  assert!(receipt.applied);
  assert_eq!(receipt.new_count, 1);
  assert_eq!(receipt.urgency_score, 3);

  // Confirmations carry no reporter reward.
  let alice = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice.karma, 12);
  let bob = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob.karma, 2);
}

#[tokio::test]
async fn vote_on_unknown_issue_errors() {
  let s = store().await;
  let bob = user(&s, "bob", UserRole::Citizen).await;

  let err = s
    .cast_vote(Uuid::new_v4(), bob.user_id, VoteType::Upvote)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::IssueNotFound(_))
  ));
}

#[tokio::test]
async fn vote_by_unknown_user_errors() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let err = s
    .cast_vote(issue.issue_id, Uuid::new_v4(), VoteType::Upvote)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::UserNotFound(_))
  ));
}

#[tokio::test]
async fn vote_on_terminal_issue_errors() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  s.set_status(issue.issue_id, IssueStatus::Closed, staff.user_id, None)
    .await
    .unwrap();

  let err = s
    .cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::IssueTerminal { .. })
  ));
}

#[tokio::test]
async fn urgency_invariant_holds_after_every_mutation() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let carol = user(&s, "carol", UserRole::Citizen).await;
  let created = s.create_issue(report(alice.user_id)).await.unwrap();

  let steps = [
    (bob.user_id, VoteType::Upvote),
    (carol.user_id, VoteType::Upvote),
    (bob.user_id, VoteType::Confirm),
    (bob.user_id, VoteType::Upvote), // retract
    (carol.user_id, VoteType::Confirm),
  ];
  for (voter, vote_type) in steps {
    s.cast_vote(created.issue_id, voter, vote_type).await.unwrap();
    let i = s.get_issue(created.issue_id).await.unwrap().unwrap();
    assert_eq!(
      i.urgency_score,
      issue::urgency_score(i.upvotes, i.confirmations)
    );
  }

  let i = s.get_issue(created.issue_id).await.unwrap().unwrap();
  assert_eq!(i.upvotes, 1);
  assert_eq!(i.confirmations, 2);
  assert_eq!(i.urgency_score, 4);
}

#[tokio::test]
async fn concurrent_toggles_flip_at_most_once_each() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let mut handles = Vec::new();
  for _ in 0..100 {
    let s = s.clone();
    let issue_id = issue.issue_id;
    let voter = bob.user_id;
    handles.push(tokio::spawn(async move {
      s.cast_vote(issue_id, voter, VoteType::Upvote).await.unwrap();
    }));
  }
  for h in handles {
    h.await.unwrap();
  }

  // Each request performs exactly one logical toggle; an even number of
  // toggles lands back on the initial state.
  let after = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!(after.upvotes, 0);
  assert_eq!(after.urgency_score, 0);

  let bob = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob.karma, 0);
  let alice = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice.karma, 10);
}

#[tokio::test]
async fn find_vote_reflects_toggle_state() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  assert!(
    s.find_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
      .await
      .unwrap()
      .is_none()
  );

  s.cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  let vote = s
    .find_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(vote.vote_type, VoteType::Upvote);

  s.cast_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  assert!(
    s.find_vote(issue.issue_id, bob.user_id, VoteType::Upvote)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn forward_transitions_stamp_timestamps_and_log() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let issue = s
    .set_status(
      issue.issue_id,
      IssueStatus::Acknowledged,
      staff.user_id,
      Some("crew dispatched".into()),
    )
    .await
    .unwrap();
  assert_eq!(issue.status, IssueStatus::Acknowledged);
  assert!(issue.acknowledged_at.is_some());

  let issue = s
    .set_status(issue.issue_id, IssueStatus::InProgress, staff.user_id, None)
    .await
    .unwrap();
  let issue = s
    .set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  assert!(issue.resolved_at.is_some());

  let log = s.status_log(issue.issue_id).await.unwrap();
  assert_eq!(log.len(), 3);
  assert_eq!(log[0].from, IssueStatus::Submitted);
  assert_eq!(log[0].to, IssueStatus::Acknowledged);
  assert_eq!(log[0].note.as_deref(), Some("crew dispatched"));
  assert_eq!(log[2].to, IssueStatus::Resolved);
}

#[tokio::test]
async fn backward_transition_rejected() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  s.set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  let err = s
    .set_status(issue.issue_id, IssueStatus::InProgress, staff.user_id, None)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::InvalidTransition {
      from: IssueStatus::Resolved,
      to:   IssueStatus::InProgress,
    })
  ));
}

#[tokio::test]
async fn rejection_only_before_work_starts() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;

  let early = s.create_issue(report(alice.user_id)).await.unwrap();
  let early = s
    .set_status(early.issue_id, IssueStatus::Rejected, staff.user_id, None)
    .await
    .unwrap();
  assert_eq!(early.status, IssueStatus::Rejected);

  let late = s.create_issue(report(alice.user_id)).await.unwrap();
  s.set_status(late.issue_id, IssueStatus::InProgress, staff.user_id, None)
    .await
    .unwrap();
  let err = s
    .set_status(late.issue_id, IssueStatus::Rejected, staff.user_id, None)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::InvalidTransition { .. })
  ));
}

#[tokio::test]
async fn same_status_transition_is_noop() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  s.set_status(issue.issue_id, IssueStatus::Acknowledged, staff.user_id, None)
    .await
    .unwrap();
  let again = s
    .set_status(issue.issue_id, IssueStatus::Acknowledged, staff.user_id, None)
    .await
    .unwrap();
  assert_eq!(again.status, IssueStatus::Acknowledged);

  // The no-op writes nothing, not even a log entry.
  let log = s.status_log(issue.issue_id).await.unwrap();
  assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn resolve_bonus_applies_exactly_once() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let issue = s
    .set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  assert!(issue.resolve_karma_granted);
  let alice_after = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice_after.karma, 60);

  s.set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  let alice_after = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(alice_after.karma, 60);
}

// ─── Full scenario ───────────────────────────────────────────────────────────

#[tokio::test]
async fn full_engagement_scenario() {
  let s = store().await;
  let a = user(&s, "alice", UserRole::Citizen).await;
  let b = user(&s, "bob", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;

  // A reports: karma 0 -> 10.
  let issue = s.create_issue(report(a.user_id)).await.unwrap();
  assert_eq!(s.get_user(a.user_id).await.unwrap().unwrap().karma, 10);

  // B upvotes: upvotes 0 -> 1, urgency 0 -> 2, B +1, A 10 -> 12.
  s.cast_vote(issue.issue_id, b.user_id, VoteType::Upvote)
    .await
    .unwrap();
  let i = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!((i.upvotes, i.urgency_score), (1, 2));
  assert_eq!(s.get_user(b.user_id).await.unwrap().unwrap().karma, 1);
  assert_eq!(s.get_user(a.user_id).await.unwrap().unwrap().karma, 12);

  // B retracts: everything reverses.
  s.cast_vote(issue.issue_id, b.user_id, VoteType::Upvote)
    .await
    .unwrap();
  let i = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!((i.upvotes, i.urgency_score), (0, 0));
  assert_eq!(s.get_user(b.user_id).await.unwrap().unwrap().karma, 0);
  assert_eq!(s.get_user(a.user_id).await.unwrap().unwrap().karma, 10);

  // Resolve: A 10 -> 60, flag set; resolving again changes nothing.
  let i = s
    .set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  assert!(i.resolve_karma_granted);
  assert_eq!(s.get_user(a.user_id).await.unwrap().unwrap().karma, 60);
  s.set_status(issue.issue_id, IssueStatus::Resolved, staff.user_id, None)
    .await
    .unwrap();
  assert_eq!(s.get_user(a.user_id).await.unwrap().unwrap().karma, 60);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn whitespace_comment_rejected() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  let err = s
    .record_comment(NewComment {
      issue_id: issue.issue_id,
      user_id:  alice.user_id,
      body:     "   \n\t ".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::EmptyComment)
  ));
}

#[tokio::test]
async fn comments_award_karma_and_keep_creation_order() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  for body in ["first", "second"] {
    s.record_comment(NewComment {
      issue_id: issue.issue_id,
      user_id:  bob.user_id,
      body:     body.into(),
    })
    .await
    .unwrap();
  }

  let oldest = s
    .list_comments(issue.issue_id, CommentOrder::OldestFirst)
    .await
    .unwrap();
  assert_eq!(oldest.len(), 2);
  assert_eq!(oldest[0].body, "first");
  assert_eq!(oldest[1].body, "second");

  let newest = s
    .list_comments(issue.issue_id, CommentOrder::NewestFirst)
    .await
    .unwrap();
  assert_eq!(newest[0].body, "second");

  let bob = s.get_user(bob.user_id).await.unwrap().unwrap();
  assert_eq!(bob.karma, 2);

  // Commenting never touches the urgency score.
  let i = s.get_issue(issue.issue_id).await.unwrap().unwrap();
  assert_eq!(i.urgency_score, 0);
}

#[tokio::test]
async fn comment_on_unknown_issue_errors() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;

  let err = s
    .record_comment(NewComment {
      issue_id: Uuid::new_v4(),
      user_id:  alice.user_id,
      body:     "hello".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::IssueNotFound(_))
  ));
}

// ─── Feeds ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn trending_orders_by_windowed_upvotes() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let carol = user(&s, "carol", UserRole::Citizen).await;

  let i1 = s.create_issue(report(alice.user_id)).await.unwrap();
  let i2 = s.create_issue(report(alice.user_id)).await.unwrap();
  let i3 = s.create_issue(report(alice.user_id)).await.unwrap();

  for voter in [bob.user_id, carol.user_id] {
    s.cast_vote(i1.issue_id, voter, VoteType::Upvote).await.unwrap();
  }
  s.cast_vote(i2.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  // Confirmations never count toward trending.
  for voter in [bob.user_id, carol.user_id] {
    s.cast_vote(i3.issue_id, voter, VoteType::Confirm).await.unwrap();
  }

  let feed = s
    .trending_feed(Duration::hours(24), Utc::now(), 10)
    .await
    .unwrap();
  let ids: Vec<_> = feed.iter().map(|i| i.issue_id).collect();
  assert_eq!(ids, vec![i1.issue_id, i2.issue_id, i3.issue_id]);
}

#[tokio::test]
async fn trending_excludes_votes_outside_window() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;

  let i1 = s.create_issue(report(alice.user_id)).await.unwrap();
  let i2 = s.create_issue(report(alice.user_id)).await.unwrap();
  s.cast_vote(i1.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();

  // Evaluated three days from now, every vote has aged out of the 24h
  // window and recency decides the order.
  let later = Utc::now() + Duration::days(3);
  let feed = s
    .trending_feed(Duration::hours(24), later, 10)
    .await
    .unwrap();
  let ids: Vec<_> = feed.iter().map(|i| i.issue_id).collect();
  assert_eq!(ids, vec![i2.issue_id, i1.issue_id]);
}

#[tokio::test]
async fn trending_ties_break_by_newest_created() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;

  let i1 = s.create_issue(report(alice.user_id)).await.unwrap();
  let i2 = s.create_issue(report(alice.user_id)).await.unwrap();
  s.cast_vote(i1.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();
  s.cast_vote(i2.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();

  let feed = s
    .trending_feed(Duration::hours(24), Utc::now(), 10)
    .await
    .unwrap();
  let ids: Vec<_> = feed.iter().map(|i| i.issue_id).collect();
  assert_eq!(ids, vec![i2.issue_id, i1.issue_id]);
}

#[tokio::test]
async fn newest_feed_orders_by_creation() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;

  let i1 = s.create_issue(report(alice.user_id)).await.unwrap();
  let i2 = s.create_issue(report(alice.user_id)).await.unwrap();

  let feed = s.newest_feed(10).await.unwrap();
  let ids: Vec<_> = feed.iter().map(|i| i.issue_id).collect();
  assert_eq!(ids, vec![i2.issue_id, i1.issue_id]);
}

#[tokio::test]
async fn nearby_feed_filters_by_radius_and_orders_by_urgency() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;

  let here = s.create_issue(report(alice.user_id)).await.unwrap();

  let mut close = report(alice.user_id);
  close.latitude = 12.975;
  close.longitude = 77.595;
  let close = s.create_issue(close).await.unwrap();

  let mut far = report(alice.user_id);
  far.latitude = 13.5;
  far.longitude = 78.1;
  let far = s.create_issue(far).await.unwrap();

  s.cast_vote(close.issue_id, bob.user_id, VoteType::Upvote)
    .await
    .unwrap();

  let feed = s.nearby_feed(12.97, 77.59, 5.0, 10).await.unwrap();
  let ids: Vec<_> = feed.iter().map(|i| i.issue_id).collect();
  assert_eq!(ids, vec![close.issue_id, here.issue_id]);
  assert!(!ids.contains(&far.issue_id));
}

// ─── Listing and leaderboard ─────────────────────────────────────────────────

#[tokio::test]
async fn list_issues_filters() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;

  let pothole = s.create_issue(report(alice.user_id)).await.unwrap();
  let mut lamp = report(bob.user_id);
  lamp.category = IssueCategory::Streetlight;
  let lamp = s.create_issue(lamp).await.unwrap();
  s.set_status(lamp.issue_id, IssueStatus::Acknowledged, staff.user_id, None)
    .await
    .unwrap();

  let acknowledged = s
    .list_issues(&IssueFilter {
      status: Some(IssueStatus::Acknowledged),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(acknowledged.len(), 1);
  assert_eq!(acknowledged[0].issue_id, lamp.issue_id);

  let road = s
    .list_issues(&IssueFilter {
      category: Some(IssueCategory::RoadMaintenance),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(road.len(), 1);
  assert_eq!(road[0].issue_id, pothole.issue_id);

  let by_alice = s
    .list_issues(&IssueFilter {
      reporter_id: Some(alice.user_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_alice.len(), 1);
}

#[tokio::test]
async fn leaderboard_ranks_active_citizens() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let bob = user(&s, "bob", UserRole::Citizen).await;
  let staff = user(&s, "carol", UserRole::Staff).await;

  s.create_issue(report(alice.user_id)).await.unwrap();
  s.create_issue(report(alice.user_id)).await.unwrap();
  s.create_issue(report(bob.user_id)).await.unwrap();

  let board = s.leaderboard(10).await.unwrap();
  let ids: Vec<_> = board.iter().map(|u| u.user_id).collect();
  assert_eq!(ids, vec![alice.user_id, bob.user_id]);
  assert_eq!(board[0].karma, 20);
  assert!(!ids.contains(&staff.user_id));
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_record_and_list_newest_first() {
  let s = store().await;
  let alice = user(&s, "alice", UserRole::Citizen).await;
  let issue = s.create_issue(report(alice.user_id)).await.unwrap();

  for title in ["Issue Update", "Issue Resolved"] {
    s.record_notification(NewNotification {
      user_id:  alice.user_id,
      issue_id: Some(issue.issue_id),
      title:    title.into(),
      body:     format!("{title} for your report"),
    })
    .await
    .unwrap();
  }

  let inbox = s.list_notifications(alice.user_id).await.unwrap();
  assert_eq!(inbox.len(), 2);
  assert_eq!(inbox[0].title, "Issue Resolved");
  assert!(!inbox[0].read);
}

#[tokio::test]
async fn notification_for_unknown_user_errors() {
  let s = store().await;
  let err = s
    .record_notification(NewNotification {
      user_id:  Uuid::new_v4(),
      issue_id: None,
      title:    "hello".into(),
      body:     "world".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(civis_core::Error::UserNotFound(_))
  ));
}
