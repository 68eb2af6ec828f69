//! Case — a versioned document with descriptive metadata.
//!
//! A case is created together with its first version; it is never valid
//! with zero versions. Its content lives entirely in the version history;
//! the case row holds only metadata and provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{permission::PermissionScope, version::CaseVersion};

// ─── Descriptive fields ──────────────────────────────────────────────────────

/// The mutable descriptive fields of a case.
///
/// `update_case` overwrites all of these at once: a field omitted from the
/// request becomes `None` (clear-on-omit), it is not left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFields {
  pub title:         Option<String>,
  pub description:   Option<String>,
  pub language:      Option<String>,
  pub domain:        Option<String>,
  pub specialty:     Option<String>,
  pub keywords:      Vec<String>,
  pub original_date: Option<String>,
  pub complexity:    Option<String>,
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A persisted case row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
  pub case_id:        Uuid,
  #[serde(flatten)]
  pub fields:         CaseFields,
  pub author_id:      Uuid,
  /// Copied from the author's user record at creation time.
  pub author_grade:   Option<String>,
  pub institution_id: Uuid,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::CaseStore::create_case`].
/// The case id and all timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewCase {
  pub fields:     CaseFields,
  /// Content of the first version.
  pub source:     String,
  /// Scope override for the default permission; when `None` the case is
  /// readable institution-wide at clearance "1".
  pub permission: Option<PermissionScope>,
}

impl NewCase {
  /// Convenience constructor with the default permission scope.
  pub fn new(fields: CaseFields, source: impl Into<String>) -> Self {
    Self { fields, source: source.into(), permission: None }
  }
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// The computed read model for one case — assembled on fetch, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseView {
  pub case:                Case,
  /// Content of the newest version.
  pub source:              String,
  /// Full version history, oldest first.
  pub versions:            Vec<CaseVersion>,
  pub institution_acronym: String,
  pub institution_title:   String,
}

// ─── Collaborator records ────────────────────────────────────────────────────

/// An institution record. Read model only: this crate never mutates it
/// beyond the initial seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
  pub institution_id: Uuid,
  pub acronym:        String,
  pub title:          String,
}

/// A file attached to a case. Artifact content lives outside the store;
/// only the record is kept here so the destroy cascade can cover it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
  pub artifact_id: Uuid,
  pub case_id:     Uuid,
  pub file_name:   String,
}
