//! Handlers for `/issues` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/issues` | Body: [`IssueBody`]; returns 201 + stored issue |
//! | `GET`  | `/issues` | Optional `status`, `category`, `limit`, `offset`; citizens see only their own reports |
//! | `GET`  | `/issues/:id` | 404 if unknown; citizens may only view their own |
//! | `POST` | `/issues/:id/status` | Staff/admin only; best-effort reporter notification |
//! | `GET`  | `/issues/:id/updates` | Status-change audit log |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use civis_core::{
  issue::{
    Issue, IssueCategory, IssuePriority, IssueStatus, NewIssue, StatusChange,
  },
  notify::NewNotification,
  store::{EngagementStore, IssueFilter},
  user::User,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /issues`.
#[derive(Debug, Deserialize)]
pub struct IssueBody {
  pub title:       String,
  pub description: String,
  pub category:    IssueCategory,
  pub priority:    Option<IssuePriority>,
  pub latitude:    f64,
  pub longitude:   f64,
  pub address:     Option<String>,
}

/// `POST /issues` — the authenticated caller becomes the reporter.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<IssueBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let issue = state
    .store
    .create_issue(NewIssue {
      title:       body.title,
      description: body.description,
      category:    body.category,
      priority:    body.priority.unwrap_or_default(),
      latitude:    body.latitude,
      longitude:   body.longitude,
      address:     body.address,
      reporter_id: user.user_id,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(issue)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:   Option<IssueStatus>,
  pub category: Option<IssueCategory>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /issues[?status=...][&category=...][&limit=...][&offset=...]`
///
/// Citizens see only their own reports; staff and admins see everything.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Issue>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let filter = IssueFilter {
    status:      params.status,
    category:    params.category,
    reporter_id: (!user.role.can_triage()).then_some(user.user_id),
    limit:       params.limit,
    offset:      params.offset,
  };

  let issues = state
    .store
    .list_issues(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(issues))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /issues/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Issue>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let issue = fetch_issue(&state, id).await?;
  authorize_view(&user, &issue)?;
  Ok(Json(issue))
}

// ─── Status change ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: IssueStatus,
  pub note:   Option<String>,
}

/// `POST /issues/:id/status` — body: `{"status":"acknowledged","note":"..."}`
///
/// Staff/admin only. On an applied change, a reporter notification is
/// recorded on a detached task; its failure is logged and never affects the
/// response.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Issue>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  if !user.role.can_triage() {
    return Err(ApiError::Forbidden(
      "only staff may change issue status".into(),
    ));
  }

  let prior = fetch_issue(&state, id).await?;

  let issue = state
    .store
    .set_status(id, body.status, user.user_id, body.note)
    .await
    .map_err(ApiError::from_store)?;

  if issue.status != prior.status {
    let store = state.store.clone();
    let notified = issue.clone();
    tokio::spawn(async move {
      let input = NewNotification {
        user_id:  notified.reporter_id,
        issue_id: Some(notified.issue_id),
        title:    "Issue Update".into(),
        body:     format!(
          "Your issue \"{}\" is now {}",
          notified.title, notified.status
        ),
      };
      if let Err(e) = store.record_notification(input).await {
        tracing::warn!("failed to record status notification: {e}");
      }
    });
  }

  Ok(Json(issue))
}

// ─── Updates ──────────────────────────────────────────────────────────────────

/// `GET /issues/:id/updates` — the status-change audit log, oldest first.
pub async fn updates<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusChange>>, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  let issue = fetch_issue(&state, id).await?;
  authorize_view(&user, &issue)?;

  let log = state
    .store
    .status_log(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(log))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn fetch_issue<S>(
  state: &AppState<S>,
  id: Uuid,
) -> Result<Issue, ApiError>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_issue(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("issue {id} not found")))
}

fn authorize_view(user: &User, issue: &Issue) -> Result<(), ApiError> {
  if !user.role.can_triage() && issue.reporter_id != user.user_id {
    return Err(ApiError::Forbidden(
      "not authorized to view this issue".into(),
    ));
  }
  Ok(())
}
