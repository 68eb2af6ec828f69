//! Error types for `casebook-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::share::{Role, SharePermission};

#[derive(Debug, Error)]
pub enum Error {
  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("institution not found: {0}")]
  InstitutionNotFound(Uuid),

  #[error("invalid permission level: {0:?}")]
  InvalidPermission(String),

  #[error("a user cannot share a case with themselves")]
  SelfShare,

  #[error("user {user} has role {role}, ineligible for permission {requested}")]
  RoleIneligible {
    user:      Uuid,
    role:      Role,
    requested: SharePermission,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
