//! Error type for `casebook-store-sqlite`.
//!
//! Every variant maps to one kind of the crate's error taxonomy so a web
//! boundary can pick an HTTP status from the kind alone; the store itself
//! never retries.

use casebook_core::share::{Role, SharePermission};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] casebook_core::Error),

  /// Any underlying persistence failure, including timeouts. The enclosing
  /// transaction has been rolled back when this surfaces.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A persisted value failed to decode into its domain type.
  #[error("stored value failed to decode: {0}")]
  Decode(String),

  #[error("case not found: {0}")]
  CaseNotFound(uuid::Uuid),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  #[error("institution not found: {0}")]
  InstitutionNotFound(uuid::Uuid),

  #[error("a user cannot share a case with themselves")]
  SelfShare,

  /// The revoke step has already been committed when this surfaces; the
  /// target user holds no links afterwards.
  #[error("user {user} has role {role}, ineligible for permission {requested}")]
  RoleIneligible {
    user:      uuid::Uuid,
    role:      Role,
    requested: SharePermission,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
