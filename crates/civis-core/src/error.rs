//! Error types for `civis-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::issue::IssueStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("issue not found: {0}")]
  IssueNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("issue {issue} is {status} and no longer accepts engagement")]
  IssueTerminal { issue: Uuid, status: IssueStatus },

  #[error("invalid status transition: {from} -> {to}")]
  InvalidTransition { from: IssueStatus, to: IssueStatus },

  #[error("comment text is empty")]
  EmptyComment,

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("unknown vote type: {0:?}")]
  UnknownVoteType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
