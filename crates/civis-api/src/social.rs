//! Handlers for voting, comments, feeds, the leaderboard, and notifications.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/issues/:id/vote` | Body: `{"vote_type":"upvote"\|"confirm"}`; toggle semantics |
//! | `POST` | `/issues/:id/comments` | Body: `{"body":"..."}`; returns 201 |
//! | `GET`  | `/issues/:id/comments` | Optional `?order=oldest_first\|newest_first` |
//! | `GET`  | `/feed/trending` | Optional `window_hours`, `limit` |
//! | `GET`  | `/feed/newest` | Optional `limit` |
//! | `GET`  | `/feed/nearby` | Required `latitude`, `longitude`; optional `radius_km`, `limit` |
//! | `GET`  | `/leaderboard` | Optional `limit` |
//! | `GET`  | `/notifications` | The caller's inbox, newest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use civis_core::{
  comment::{Comment, CommentOrder, NewComment},
  issue::Issue,
  notify::Notification,
  store::EngagementStore,
  user::User,
  vote::{VoteReceipt, VoteType},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

const DEFAULT_FEED_LIMIT: usize = 20;
const MAX_FEED_LIMIT: usize = 50;
const DEFAULT_RADIUS_KM: f64 = 5.0;
const MAX_RADIUS_KM: f64 = 50.0;
const DEFAULT_LEADERBOARD_LIMIT: usize = 20;
const MAX_LEADERBOARD_LIMIT: usize = 100;
const MAX_WINDOW_HOURS: i64 = 24 * 365;

fn clamp_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
  requested.unwrap_or(default).min(max)
}

// ─── Vote ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub vote_type: String,
}

/// `POST /issues/:id/vote` — toggle semantics: a repeated cast retracts.
pub async fn vote<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<VoteBody>,
) -> Result<Json<VoteReceipt>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let vote_type = VoteType::parse(&body.vote_type)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let receipt = state
    .store
    .cast_vote(id, user.user_id, vote_type)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(receipt))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub body: String,
}

/// `POST /issues/:id/comments` — returns 201 + the stored comment.
pub async fn comment<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let comment = state
    .store
    .record_comment(NewComment {
      issue_id: id,
      user_id:  user.user_id,
      body:     body.body,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Deserialize)]
pub struct CommentsParams {
  #[serde(default)]
  pub order: CommentOrder,
}

/// `GET /issues/:id/comments[?order=newest_first]`
pub async fn comments<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Path(id): Path<Uuid>,
  Query(params): Query<CommentsParams>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_issue(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("issue {id} not found")))?;

  let comments = state
    .store
    .list_comments(id, params.order)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(comments))
}

// ─── Feeds ────────────────────────────────────────────────────────────────────

/// An issue annotated with its display mappings and what the viewing user
/// has already cast.
#[derive(Debug, Serialize)]
pub struct FeedEntry {
  #[serde(flatten)]
  pub issue:          Issue,
  pub category_label: &'static str,
  pub department:     &'static str,
  pub user_voted:     bool,
  pub user_confirmed: bool,
}

async fn annotate<S>(
  state: &AppState<S>,
  viewer: &User,
  issues: Vec<Issue>,
) -> Result<Vec<FeedEntry>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let mut entries = Vec::with_capacity(issues.len());
  for issue in issues {
    let user_voted = state
      .store
      .find_vote(issue.issue_id, viewer.user_id, VoteType::Upvote)
      .await
      .map_err(ApiError::from_store)?
      .is_some();
    let user_confirmed = state
      .store
      .find_vote(issue.issue_id, viewer.user_id, VoteType::Confirm)
      .await
      .map_err(ApiError::from_store)?
      .is_some();
    entries.push(FeedEntry {
      category_label: issue.category.label(),
      department: issue.category.department(),
      issue,
      user_voted,
      user_confirmed,
    });
  }
  Ok(entries)
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
  pub window_hours: Option<i64>,
  pub limit:        Option<usize>,
}

/// `GET /feed/trending[?window_hours=24][&limit=20]`
pub async fn trending<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<TrendingParams>,
) -> Result<Json<Vec<FeedEntry>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let hours = params
    .window_hours
    .unwrap_or(state.config.trending_window_hours);
  if !(1..=MAX_WINDOW_HOURS).contains(&hours) {
    return Err(ApiError::BadRequest(format!(
      "window_hours must be between 1 and {MAX_WINDOW_HOURS}"
    )));
  }
  let limit = clamp_limit(params.limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT);

  let issues = state
    .store
    .trending_feed(Duration::hours(hours), Utc::now(), limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(annotate(&state, &user, issues).await?))
}

#[derive(Debug, Deserialize)]
pub struct NewestParams {
  pub limit: Option<usize>,
}

/// `GET /feed/newest[?limit=20]`
pub async fn newest<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<NewestParams>,
) -> Result<Json<Vec<FeedEntry>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let limit = clamp_limit(params.limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT);

  let issues = state
    .store
    .newest_feed(limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(annotate(&state, &user, issues).await?))
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
  pub latitude:  f64,
  pub longitude: f64,
  pub radius_km: Option<f64>,
  pub limit:     Option<usize>,
}

/// `GET /feed/nearby?latitude=..&longitude=..[&radius_km=5][&limit=20]`
pub async fn nearby<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<FeedEntry>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let radius = params
    .radius_km
    .unwrap_or(DEFAULT_RADIUS_KM)
    .min(MAX_RADIUS_KM);
  let limit = clamp_limit(params.limit, DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT);

  let issues = state
    .store
    .nearby_feed(params.latitude, params.longitude, radius, limit)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(annotate(&state, &user, issues).await?))
}

// ─── Leaderboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
  pub rank:    usize,
  pub user_id: Uuid,
  pub name:    String,
  pub karma:   i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit: Option<usize>,
}

/// `GET /leaderboard[?limit=20]`
pub async fn leaderboard<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let limit = clamp_limit(
    params.limit,
    DEFAULT_LEADERBOARD_LIMIT,
    MAX_LEADERBOARD_LIMIT,
  );

  let users = state
    .store
    .leaderboard(limit)
    .await
    .map_err(ApiError::from_store)?;

  let entries = users
    .into_iter()
    .enumerate()
    .map(|(i, u)| LeaderboardEntry {
      rank:    i + 1,
      user_id: u.user_id,
      name:    u.name,
      karma:   u.karma,
    })
    .collect();
  Ok(Json(entries))
}

// ─── Notifications ────────────────────────────────────────────────────────────

/// `GET /notifications` — the caller's inbox, newest first.
pub async fn notifications<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let inbox = state
    .store
    .list_notifications(user.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(inbox))
}
