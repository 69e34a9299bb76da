//! [`SqliteStore`] — the SQLite implementation of [`EngagementStore`].
//!
//! Every ledger mutation runs inside one `rusqlite` transaction in a single
//! `conn.call` closure. The connection's dedicated worker thread executes
//! closures one at a time, which is what serialises conflicting toggles and
//! karma updates; the transaction is what makes each logical operation
//! all-or-nothing. Domain precondition failures travel out of the closure as
//! a nested `Result` so they roll the transaction back without being
//! mistaken for infrastructure errors.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use civis_core::{
  comment::{Comment, CommentOrder, NewComment},
  issue::{
    self, Issue, IssueStatus, NewIssue, StatusChange,
  },
  karma,
  notify::{NewNotification, Notification},
  store::{EngagementStore, IssueFilter},
  user::{NewUser, User},
  vote::{Vote, VoteReceipt, VoteType},
};

use crate::{
  encode::{
    ISSUE_COLUMNS, RawComment, RawIssue, RawNotification, RawStatusChange,
    RawUser, USER_COLUMNS, decode_dt, decode_status_sql, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Domain outcome of a transactional closure. `Err` aborts the transaction
/// (the `rusqlite::Transaction` is dropped without commit) and is surfaced
/// to the caller as [`Error::Core`].
type Domain<T> = std::result::Result<T, civis_core::Error>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Civis engagement ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── In-closure helpers ──────────────────────────────────────────────────────

fn issue_row(
  conn: &rusqlite::Connection,
  issue_id: &str,
) -> rusqlite::Result<Option<RawIssue>> {
  conn
    .query_row(
      &format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE issue_id = ?1"),
      rusqlite::params![issue_id],
      RawIssue::from_row,
    )
    .optional()
}

fn user_exists(
  conn: &rusqlite::Connection,
  user_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM users WHERE user_id = ?1",
        rusqlite::params![user_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// Adjust a user's karma, clamping the total at zero.
fn adjust_karma(
  conn: &rusqlite::Connection,
  user_id: &str,
  delta: i64,
) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE users SET karma = MAX(0, karma + ?2) WHERE user_id = ?1",
    rusqlite::params![user_id, delta],
  )?;
  Ok(())
}

// ─── EngagementStore impl ────────────────────────────────────────────────────

impl EngagementStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      role:       input.role,
      active:     true,
      karma:      0,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let role_str = user.role.as_str();
    let at_str   = encode_dt(user.created_at);
    let digest   = input.token_digest;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, email, role, active, karma, token_digest, created_at)
           VALUES (?1, ?2, ?3, ?4, 1, 0, ?5, ?6)",
          rusqlite::params![id_str, name, email, role_str, digest, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_token_digest(&self, digest: &str) -> Result<Option<User>> {
    let digest = digest.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE token_digest = ?1 AND active = 1"
              ),
              rusqlite::params![digest],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn leaderboard(&self, limit: usize) -> Result<Vec<User>> {
    let limit_val = limit as i64;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE role = 'citizen' AND active = 1
           ORDER BY karma DESC, created_at ASC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Issues ────────────────────────────────────────────────────────────

  async fn create_issue(&self, input: NewIssue) -> Result<Issue> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
      return Err(Error::Core(civis_core::Error::EmptyField("title")));
    }
    let description = input.description.trim().to_string();
    if description.is_empty() {
      return Err(Error::Core(civis_core::Error::EmptyField("description")));
    }

    let now = Utc::now();
    let issue = Issue {
      issue_id: Uuid::new_v4(),
      title,
      description,
      category: input.category,
      status: IssueStatus::Submitted,
      priority: input.priority,
      latitude: input.latitude,
      longitude: input.longitude,
      address: input.address,
      reporter_id: input.reporter_id,
      upvotes: 0,
      confirmations: 0,
      urgency_score: 0,
      resolve_karma_granted: false,
      created_at: now,
      updated_at: now,
      acknowledged_at: None,
      resolved_at: None,
    };

    let id_str       = encode_uuid(issue.issue_id);
    let title_str    = issue.title.clone();
    let desc_str     = issue.description.clone();
    let category_str = issue.category.as_str();
    let priority_str = issue.priority.as_str();
    let latitude     = issue.latitude;
    let longitude    = issue.longitude;
    let address      = issue.address.clone();
    let reporter     = issue.reporter_id;
    let reporter_str = encode_uuid(issue.reporter_id);
    let now_str      = encode_dt(now);

    let outcome: Domain<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if !user_exists(&tx, &reporter_str)? {
          return Ok(Err(civis_core::Error::UserNotFound(reporter)));
        }

        tx.execute(
          "INSERT INTO issues (
             issue_id, title, description, category, status, priority,
             latitude, longitude, address, reporter_id,
             upvotes, confirmations, urgency_score, resolve_karma_granted,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, 'submitted', ?5, ?6, ?7, ?8, ?9, 0, 0, 0, 0, ?10, ?10)",
          rusqlite::params![
            id_str,
            title_str,
            desc_str,
            category_str,
            priority_str,
            latitude,
            longitude,
            address,
            reporter_str,
            now_str,
          ],
        )?;

        adjust_karma(&tx, &reporter_str, karma::REPORT_ISSUE)?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(issue)
  }

  async fn get_issue(&self, id: Uuid) -> Result<Option<Issue>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIssue> = self
      .conn
      .call(move |conn| Ok(issue_row(conn, &id_str)?))
      .await?;

    raw.map(RawIssue::into_issue).transpose()
  }

  async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
    let status_str   = filter.status.map(IssueStatus::as_str);
    let category_str = filter.category.map(|c| c.as_str());
    let reporter_str = filter.reporter_id.map(encode_uuid);
    let limit_val    = filter.limit.unwrap_or(100) as i64;
    let offset_val   = filter.offset.unwrap_or(0) as i64;

    let raws: Vec<RawIssue> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; parameter positions stay fixed.
        let mut conds: Vec<&'static str> = vec![];
        if status_str.is_some() {
          conds.push("status = ?1");
        }
        if category_str.is_some() {
          conds.push("category = ?2");
        }
        if reporter_str.is_some() {
          conds.push("reporter_id = ?3");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {ISSUE_COLUMNS} FROM issues
           {where_clause}
           ORDER BY created_at DESC
           LIMIT ?4 OFFSET ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              status_str,
              category_str,
              reporter_str.as_deref(),
              limit_val,
              offset_val,
            ],
            RawIssue::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIssue::into_issue).collect()
  }

  async fn set_status(
    &self,
    issue_id: Uuid,
    to: IssueStatus,
    actor_id: Uuid,
    note: Option<String>,
  ) -> Result<Issue> {
    let issue_id_str = encode_uuid(issue_id);
    let actor_id_str = encode_uuid(actor_id);
    let change_id    = encode_uuid(Uuid::new_v4());
    let now_str      = encode_dt(Utc::now());

    let outcome: Domain<RawIssue> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = issue_row(&tx, &issue_id_str)? else {
          return Ok(Err(civis_core::Error::IssueNotFound(issue_id)));
        };
        if !user_exists(&tx, &actor_id_str)? {
          return Ok(Err(civis_core::Error::UserNotFound(actor_id)));
        }

        let from = decode_status_sql(&raw.status)?;

        // Same-status calls are idempotent no-ops: nothing is written, the
        // resolve bonus stays behind its flag.
        if from == to {
          return Ok(Ok(raw));
        }
        if !from.can_transition_to(to) {
          return Ok(Err(civis_core::Error::InvalidTransition { from, to }));
        }

        let ack_at = match (to, raw.acknowledged_at.as_ref()) {
          (IssueStatus::Acknowledged, None) => Some(now_str.clone()),
          (_, existing) => existing.cloned(),
        };
        let res_at = match (to, raw.resolved_at.as_ref()) {
          (IssueStatus::Resolved, None) => Some(now_str.clone()),
          (_, existing) => existing.cloned(),
        };

        tx.execute(
          "UPDATE issues
           SET status = ?2, updated_at = ?3, acknowledged_at = ?4, resolved_at = ?5
           WHERE issue_id = ?1",
          rusqlite::params![issue_id_str, to.as_str(), now_str, ack_at, res_at],
        )?;

        tx.execute(
          "INSERT INTO status_log (change_id, issue_id, actor_id, from_status, to_status, note, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            change_id,
            issue_id_str,
            actor_id_str,
            from.as_str(),
            to.as_str(),
            note,
            now_str,
          ],
        )?;

        if to == IssueStatus::Resolved && !raw.resolve_karma_granted {
          adjust_karma(&tx, &raw.reporter_id, karma::ISSUE_RESOLVED)?;
          tx.execute(
            "UPDATE issues SET resolve_karma_granted = 1 WHERE issue_id = ?1",
            rusqlite::params![issue_id_str],
          )?;
        }

        let Some(updated) = issue_row(&tx, &issue_id_str)? else {
          return Ok(Err(civis_core::Error::IssueNotFound(issue_id)));
        };

        tx.commit()?;
        Ok(Ok(updated))
      })
      .await?;

    outcome.map_err(Error::Core)?.into_issue()
  }

  async fn status_log(&self, issue_id: Uuid) -> Result<Vec<StatusChange>> {
    let issue_id_str = encode_uuid(issue_id);

    let raws: Vec<RawStatusChange> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT change_id, issue_id, actor_id, from_status, to_status, note, created_at
           FROM status_log
           WHERE issue_id = ?1
           ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![issue_id_str], RawStatusChange::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawStatusChange::into_status_change)
      .collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  async fn cast_vote(
    &self,
    issue_id: Uuid,
    user_id: Uuid,
    vote_type: VoteType,
  ) -> Result<VoteReceipt> {
    let issue_id_str = encode_uuid(issue_id);
    let user_id_str  = encode_uuid(user_id);
    let type_str     = vote_type.as_str();
    let now_str      = encode_dt(Utc::now());

    let outcome: Domain<VoteReceipt> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = issue_row(&tx, &issue_id_str)? else {
          return Ok(Err(civis_core::Error::IssueNotFound(issue_id)));
        };
        let status = decode_status_sql(&raw.status)?;
        if status.is_terminal() {
          return Ok(Err(civis_core::Error::IssueTerminal {
            issue: issue_id,
            status,
          }));
        }
        if !user_exists(&tx, &user_id_str)? {
          return Ok(Err(civis_core::Error::UserNotFound(user_id)));
        }

        let active: bool = tx
          .query_row(
            "SELECT 1 FROM votes
             WHERE issue_id = ?1 AND user_id = ?2 AND vote_type = ?3",
            rusqlite::params![issue_id_str, user_id_str, type_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        let (applied, upvotes, confirmations) = if active {
          // Retract: delete the vote and reverse every effect of the cast.
          tx.execute(
            "DELETE FROM votes
             WHERE issue_id = ?1 AND user_id = ?2 AND vote_type = ?3",
            rusqlite::params![issue_id_str, user_id_str, type_str],
          )?;
          adjust_karma(&tx, &user_id_str, -karma::CAST_VOTE)?;
          if vote_type == VoteType::Upvote {
            adjust_karma(&tx, &raw.reporter_id, -karma::UPVOTE_RECEIVED)?;
          }
          match vote_type {
            VoteType::Upvote => {
              (false, raw.upvotes.saturating_sub(1), raw.confirmations)
            }
            VoteType::Confirm => {
              (false, raw.upvotes, raw.confirmations.saturating_sub(1))
            }
          }
        } else {
          tx.execute(
            "INSERT INTO votes (issue_id, user_id, vote_type, cast_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![issue_id_str, user_id_str, type_str, now_str],
          )?;
          adjust_karma(&tx, &user_id_str, karma::CAST_VOTE)?;
          if vote_type == VoteType::Upvote {
            adjust_karma(&tx, &raw.reporter_id, karma::UPVOTE_RECEIVED)?;
          }
          match vote_type {
            VoteType::Upvote => (true, raw.upvotes + 1, raw.confirmations),
            VoteType::Confirm => (true, raw.upvotes, raw.confirmations + 1),
          }
        };

        let urgency = issue::urgency_score(upvotes, confirmations);

        tx.execute(
          "UPDATE issues
           SET upvotes = ?2, confirmations = ?3, urgency_score = ?4, updated_at = ?5
           WHERE issue_id = ?1",
          rusqlite::params![issue_id_str, upvotes, confirmations, urgency, now_str],
        )?;

        tx.commit()?;
        Ok(Ok(VoteReceipt {
          applied,
          new_count: match vote_type {
            VoteType::Upvote => upvotes,
            VoteType::Confirm => confirmations,
          },
          urgency_score: urgency,
        }))
      })
      .await?;

    outcome.map_err(Error::Core)
  }

  async fn find_vote(
    &self,
    issue_id: Uuid,
    user_id: Uuid,
    vote_type: VoteType,
  ) -> Result<Option<Vote>> {
    let issue_id_str = encode_uuid(issue_id);
    let user_id_str  = encode_uuid(user_id);
    let type_str     = vote_type.as_str();

    let cast_at: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT cast_at FROM votes
               WHERE issue_id = ?1 AND user_id = ?2 AND vote_type = ?3",
              rusqlite::params![issue_id_str, user_id_str, type_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    cast_at
      .map(|at| {
        Ok(Vote {
          issue_id,
          user_id,
          vote_type,
          cast_at: decode_dt(&at)?,
        })
      })
      .transpose()
  }

  // ── Comments ──────────────────────────────────────────────────────────

  async fn record_comment(&self, input: NewComment) -> Result<Comment> {
    let body = input.body.trim().to_string();
    if body.is_empty() {
      return Err(Error::Core(civis_core::Error::EmptyComment));
    }

    let comment = Comment {
      comment_id: Uuid::new_v4(),
      issue_id:   input.issue_id,
      user_id:    input.user_id,
      body,
      created_at: Utc::now(),
    };

    let comment_id_str = encode_uuid(comment.comment_id);
    let issue_id       = comment.issue_id;
    let issue_id_str   = encode_uuid(comment.issue_id);
    let user_id        = comment.user_id;
    let user_id_str    = encode_uuid(comment.user_id);
    let body_str       = comment.body.clone();
    let at_str         = encode_dt(comment.created_at);

    let outcome: Domain<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let known_issue: bool = tx
          .query_row(
            "SELECT 1 FROM issues WHERE issue_id = ?1",
            rusqlite::params![issue_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !known_issue {
          return Ok(Err(civis_core::Error::IssueNotFound(issue_id)));
        }
        if !user_exists(&tx, &user_id_str)? {
          return Ok(Err(civis_core::Error::UserNotFound(user_id)));
        }

        tx.execute(
          "INSERT INTO comments (comment_id, issue_id, user_id, body, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![comment_id_str, issue_id_str, user_id_str, body_str, at_str],
        )?;

        adjust_karma(&tx, &user_id_str, karma::POST_COMMENT)?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(comment)
  }

  async fn list_comments(
    &self,
    issue_id: Uuid,
    order: CommentOrder,
  ) -> Result<Vec<Comment>> {
    let issue_id_str = encode_uuid(issue_id);
    let direction = match order {
      CommentOrder::OldestFirst => "ASC",
      CommentOrder::NewestFirst => "DESC",
    };

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT comment_id, issue_id, user_id, body, created_at
           FROM comments
           WHERE issue_id = ?1
           ORDER BY created_at {direction}, rowid {direction}"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![issue_id_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Feeds ─────────────────────────────────────────────────────────────

  async fn trending_feed(
    &self,
    window: Duration,
    now: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<Issue>> {
    let start_str = encode_dt(now - window);
    let now_str   = encode_dt(now);
    let limit_val = limit as i64;

    let raws: Vec<RawIssue> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ISSUE_COLUMNS},
             (SELECT COUNT(*) FROM votes v
              WHERE v.issue_id = issues.issue_id
                AND v.vote_type = 'upvote'
                AND v.cast_at >= ?1 AND v.cast_at <= ?2) AS recent_upvotes
           FROM issues
           ORDER BY recent_upvotes DESC, created_at DESC
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![start_str, now_str, limit_val],
            RawIssue::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIssue::into_issue).collect()
  }

  async fn newest_feed(&self, limit: usize) -> Result<Vec<Issue>> {
    let limit_val = limit as i64;

    let raws: Vec<RawIssue> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ISSUE_COLUMNS} FROM issues
           ORDER BY created_at DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawIssue::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIssue::into_issue).collect()
  }

  async fn nearby_feed(
    &self,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    limit: usize,
  ) -> Result<Vec<Issue>> {
    // Flat scan; the distance filter runs in Rust over decoded rows.
    let raws: Vec<RawIssue> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {ISSUE_COLUMNS} FROM issues"))?;
        let rows = stmt
          .query_map([], RawIssue::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut nearby: Vec<Issue> = raws
      .into_iter()
      .map(RawIssue::into_issue)
      .collect::<Result<Vec<_>>>()?
      .into_iter()
      .filter(|i| {
        civis_core::feed::distance_km(i.latitude, i.longitude, latitude, longitude)
          <= radius_km
      })
      .collect();

    nearby.sort_by(|a, b| {
      b.urgency_score
        .cmp(&a.urgency_score)
        .then(b.created_at.cmp(&a.created_at))
    });
    nearby.truncate(limit);

    Ok(nearby)
  }

  // ── Notifications ─────────────────────────────────────────────────────

  async fn record_notification(
    &self,
    input: NewNotification,
  ) -> Result<Notification> {
    let notification = Notification {
      notification_id: Uuid::new_v4(),
      user_id:         input.user_id,
      issue_id:        input.issue_id,
      title:           input.title,
      body:            input.body,
      read:            false,
      created_at:      Utc::now(),
    };

    let id_str       = encode_uuid(notification.notification_id);
    let user_id      = notification.user_id;
    let user_id_str  = encode_uuid(notification.user_id);
    let issue_id_str = notification.issue_id.map(encode_uuid);
    let title        = notification.title.clone();
    let body         = notification.body.clone();
    let at_str       = encode_dt(notification.created_at);

    let outcome: Domain<()> = self
      .conn
      .call(move |conn| {
        if !user_exists(conn, &user_id_str)? {
          return Ok(Err(civis_core::Error::UserNotFound(user_id)));
        }
        conn.execute(
          "INSERT INTO notifications (notification_id, user_id, issue_id, title, body, is_read, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
          rusqlite::params![id_str, user_id_str, issue_id_str, title, body, at_str],
        )?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(notification)
  }

  async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT notification_id, user_id, issue_id, title, body, is_read, created_at
           FROM notifications
           WHERE user_id = ?1
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawNotification::into_notification)
      .collect()
  }
}
