//! Per-user sharing: permission levels, role eligibility, and the active
//! user↔case link.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Roles ───────────────────────────────────────────────────────────────────

/// A user's capability class. Owned by an external auth layer; read-only
/// from this crate's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Author,
  Player,
  Other,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Author => "author",
      Self::Player => "player",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Permission levels ───────────────────────────────────────────────────────

/// The level of a single sharing grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
  Read,
  Write,
  Share,
}

impl SharePermission {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Read => "read",
      Self::Write => "write",
      Self::Share => "share",
    }
  }

  /// Role gate: `read` is open to players and authors; `write` and `share`
  /// require an author.
  pub fn eligible(self, role: Role) -> bool {
    match self {
      Self::Read => matches!(role, Role::Player | Role::Author),
      Self::Write | Self::Share => matches!(role, Role::Author),
    }
  }
}

impl FromStr for SharePermission {
  type Err = Error;

  /// Parses a boundary-supplied permission string. Anything outside
  /// `read`/`write`/`share` is rejected here, before any store call runs.
  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "read" => Ok(Self::Read),
      "write" => Ok(Self::Write),
      "share" => Ok(Self::Share),
      other => Err(Error::InvalidPermission(other.to_owned())),
    }
  }
}

impl fmt::Display for SharePermission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// A collaborator record handed in by the auth layer. Password hashing and
/// token issuance live elsewhere; only identity, role, grade and
/// institution matter here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:        Uuid,
  pub role:           Role,
  pub grade:          Option<String>,
  pub institution_id: Uuid,
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// The single active sharing relationship of one user.
///
/// Granting a new link first removes all of the user's existing links,
/// whichever case they pointed to, so at most one row exists per user at
/// any time. This mirrors the original pivot-table semantics ("currently
/// assigned case") rather than per-case sharing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCaseLink {
  pub user_id:    Uuid,
  pub case_id:    Uuid,
  pub permission: SharePermission,
  pub created_at: DateTime<Utc>,
}
