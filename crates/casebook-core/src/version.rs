//! CaseVersion — one immutable snapshot of a case's content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A version row in a case's append-only history.
///
/// Versions are never mutated or reordered after insertion. The "current"
/// version is the last one ordered by `created_at`; equal timestamps fall
/// back to insertion order, for which the store keeps a monotonically
/// increasing sequence — timestamp-only ordering would be ambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseVersion {
  pub version_id: Uuid,
  pub case_id:    Uuid,
  /// Opaque text payload; the store does not interpret it.
  pub source:     String,
  /// Store-assigned; never accepted from callers.
  pub created_at: DateTime<Utc>,
}
