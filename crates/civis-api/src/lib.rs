//! JSON REST API for Civis.
//!
//! Exposes an axum [`Router`] backed by any
//! [`civis_core::store::EngagementStore`]. TLS and listener concerns are the
//! caller's responsibility; authentication is bearer-token based and handled
//! here by the [`auth::CurrentUser`] extractor.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = civis_api::api_router(AppState {
//!   store:  Arc::new(store),
//!   config: Arc::new(ApiConfig::default()),
//! });
//! ```

pub mod auth;
pub mod error;
pub mod issues;
pub mod social;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use civis_core::{feed, store::EngagementStore};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Feed tuning shared by the handlers.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Trailing window for `/feed/trending`, in hours, when the request does
  /// not override it.
  pub trending_window_hours: i64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      trending_window_hours: feed::DEFAULT_TRENDING_WINDOW_HOURS,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: EngagementStore> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: EngagementStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::register::<S>))
    .route("/users/me", get(users::me))
    .route("/users/{id}", get(users::get_one::<S>))
    // Issues
    .route("/issues", get(issues::list::<S>).post(issues::create::<S>))
    .route("/issues/{id}", get(issues::get_one::<S>))
    .route("/issues/{id}/status", post(issues::set_status::<S>))
    .route("/issues/{id}/updates", get(issues::updates::<S>))
    // Social
    .route("/issues/{id}/vote", post(social::vote::<S>))
    .route(
      "/issues/{id}/comments",
      get(social::comments::<S>).post(social::comment::<S>),
    )
    .route("/feed/trending", get(social::trending::<S>))
    .route("/feed/newest", get(social::newest::<S>))
    .route("/feed/nearby", get(social::nearby::<S>))
    .route("/leaderboard", get(social::leaderboard::<S>))
    .route("/notifications", get(social::notifications::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
