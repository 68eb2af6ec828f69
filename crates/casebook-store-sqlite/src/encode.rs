//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Keyword lists are stored
//! as compact JSON arrays. UUIDs are stored as hyphenated lowercase
//! strings. Enum-like fields (role, share permission) are stored as their
//! lowercase names.

use casebook_core::{
  case::{Case, CaseFields},
  permission::{Permission, PermissionScope},
  share::{Role, SharePermission, UserCaseLink},
  version::CaseVersion,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "author" => Ok(Role::Author),
    "player" => Ok(Role::Player),
    "other" => Ok(Role::Other),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── SharePermission ─────────────────────────────────────────────────────────

pub fn decode_share_permission(s: &str) -> Result<SharePermission> {
  match s {
    "read" => Ok(SharePermission::Read),
    "write" => Ok(SharePermission::Write),
    "share" => Ok(SharePermission::Share),
    other => Err(Error::Decode(format!("unknown share permission: {other:?}"))),
  }
}

// ─── Keywords ────────────────────────────────────────────────────────────────

pub fn encode_keywords(keywords: &[String]) -> Result<String> {
  Ok(serde_json::to_string(keywords)?)
}

pub fn decode_keywords(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `cases` row.
pub struct RawCase {
  pub case_id:        String,
  pub title:          Option<String>,
  pub description:    Option<String>,
  pub language:       Option<String>,
  pub domain:         Option<String>,
  pub specialty:      Option<String>,
  pub keywords:       String,
  pub original_date:  Option<String>,
  pub complexity:     Option<String>,
  pub author_id:      String,
  pub author_grade:   Option<String>,
  pub institution_id: String,
  pub created_at:     String,
}

impl RawCase {
  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:        decode_uuid(&self.case_id)?,
      fields:         CaseFields {
        title:         self.title,
        description:   self.description,
        language:      self.language,
        domain:        self.domain,
        specialty:     self.specialty,
        keywords:      decode_keywords(&self.keywords)?,
        original_date: self.original_date,
        complexity:    self.complexity,
      },
      author_id:      decode_uuid(&self.author_id)?,
      author_grade:   self.author_grade,
      institution_id: decode_uuid(&self.institution_id)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `case_versions` row.
pub struct RawVersion {
  pub version_id: String,
  pub case_id:    String,
  pub source:     String,
  pub created_at: String,
}

impl RawVersion {
  pub fn into_version(self) -> Result<CaseVersion> {
    Ok(CaseVersion {
      version_id: decode_uuid(&self.version_id)?,
      case_id:    decode_uuid(&self.case_id)?,
      source:     self.source,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `permissions` row.
pub struct RawPermission {
  pub permission_id: String,
  pub entity:        String,
  pub subject:       String,
  pub clearance:     String,
  pub table:         String,
  pub table_id:      String,
}

impl RawPermission {
  pub fn into_permission(self) -> Result<Permission> {
    Ok(Permission {
      permission_id: decode_uuid(&self.permission_id)?,
      scope:         PermissionScope {
        entity:    self.entity,
        subject:   self.subject,
        clearance: self.clearance,
      },
      table:         self.table,
      table_id:      decode_uuid(&self.table_id)?,
    })
  }
}

/// Raw strings read directly from a `user_case_links` row.
pub struct RawLink {
  pub user_id:    String,
  pub case_id:    String,
  pub permission: String,
  pub created_at: String,
}

impl RawLink {
  pub fn into_link(self) -> Result<UserCaseLink> {
    Ok(UserCaseLink {
      user_id:    decode_uuid(&self.user_id)?,
      case_id:    decode_uuid(&self.case_id)?,
      permission: decode_share_permission(&self.permission)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
