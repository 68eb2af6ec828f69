//! Permission — a coarse, entity-scoped access grant attached to a resource.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Table name under which case rows are protected.
pub const CASES_TABLE: &str = "cases";

/// The scope of a permission: what kind of entity it grants to, which one,
/// and at which clearance level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScope {
  /// Scope kind, e.g. `"institution"`.
  pub entity:    String,
  /// Scope identifier within `entity`.
  pub subject:   String,
  /// Ordinal access level, encoded as a string.
  pub clearance: String,
}

impl PermissionScope {
  /// The default scope written at case creation: the author's whole
  /// institution at clearance "1".
  pub fn institution(institution_id: Uuid) -> Self {
    Self {
      entity:    "institution".to_owned(),
      subject:   institution_id.hyphenated().to_string(),
      clearance: "1".to_owned(),
    }
  }
}

/// A persisted permission row.
///
/// Immutable once written: no update or delete is exposed at this layer.
/// Revocation happens only through the per-user sharing mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
  pub permission_id: Uuid,
  #[serde(flatten)]
  pub scope:         PermissionScope,
  /// The protected resource: a table name plus a row id — always
  /// (`"cases"`, the case id) in this crate.
  pub table:         String,
  pub table_id:      Uuid,
}
