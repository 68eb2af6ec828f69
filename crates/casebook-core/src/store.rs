//! The `CaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `casebook-store-sqlite`). The web boundary depends on this abstraction,
//! not on any concrete backend; handles are passed in explicitly, never
//! resolved from global state.

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{Artifact, Case, CaseFields, CaseView, Institution, NewCase},
  permission::{Permission, PermissionScope},
  share::{SharePermission, User, UserCaseLink},
  version::CaseVersion,
};

/// Abstraction over a casebook storage backend.
///
/// Each mutating operation runs inside its own transaction: its writes
/// commit or roll back together, and a storage failure at any point rolls
/// the whole operation back. There is no cross-operation locking or
/// optimistic versioning.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Collaborator records ──────────────────────────────────────────────

  /// Insert or replace an institution record (the read model joined into
  /// [`CaseView`]).
  fn put_institution(
    &self,
    institution: Institution,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert or replace a user record. Only `role`, `grade` and
  /// `institution_id` are ever consulted by this crate.
  fn put_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Case lifecycle ────────────────────────────────────────────────────

  /// Create a case together with its first version and its default
  /// permission, atomically: if any step fails, nothing persists.
  ///
  /// Provenance (`author_id`, `author_grade`, `institution_id`) is taken
  /// from `author`. The default permission is scoped to the author's
  /// institution at clearance "1" unless `input.permission` overrides it.
  /// Fails if the author's institution is unknown.
  fn create_case<'a>(
    &'a self,
    input: NewCase,
    author: &'a User,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + 'a;

  /// Assemble the full read model for a case: its row, the current source,
  /// the version history (oldest first), and its institution's acronym and
  /// title. Returns `None` if the case does not exist.
  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CaseView>, Self::Error>> + Send + '_;

  /// Overwrite all descriptive fields (clear-on-omit: a `None` field is
  /// stored as NULL, not left unchanged) and append a new version holding
  /// `source`. Both writes happen in one transaction.
  fn update_case(
    &self,
    id: Uuid,
    fields: CaseFields,
    source: String,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Delete a case, cascading over its versions, artifacts and sharing
  /// links first. Returns the deleted snapshot. Fails and rolls back if
  /// the case does not exist.
  fn destroy_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  // ── Versions — append-only ────────────────────────────────────────────

  /// Append a version with a store-assigned timestamp. Validates nothing
  /// about `source`; only that the owning case exists. Never touches the
  /// case row itself — keeping case metadata in step with the history is
  /// the caller's obligation, not a store invariant.
  fn append_version(
    &self,
    case_id: Uuid,
    source: String,
  ) -> impl Future<Output = Result<CaseVersion, Self::Error>> + Send + '_;

  /// The source of the newest version: the last element under
  /// (`created_at` ascending, insertion order ascending).
  fn current_source(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Full version history, oldest first.
  fn list_versions(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CaseVersion>, Self::Error>> + Send + '_;

  // ── Permissions ───────────────────────────────────────────────────────

  /// Write one permission row protecting (`"cases"`, `case_id`).
  ///
  /// Not deduplicated: calling this twice writes two rows. `create_case`
  /// calls it exactly once per case; other callers carry the same
  /// obligation.
  fn create_permission(
    &self,
    case_id: Uuid,
    scope: PermissionScope,
  ) -> impl Future<Output = Result<Permission, Self::Error>> + Send + '_;

  /// All permissions protecting one resource row.
  fn list_permissions<'a>(
    &'a self,
    table: &'a str,
    table_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Permission>, Self::Error>> + Send + 'a;

  // ── Sharing ───────────────────────────────────────────────────────────

  /// Grant `target_user_id` a sharing link to `case_id` at `permission`,
  /// replacing whatever link the user held before — to any case, not just
  /// this one.
  ///
  /// Self-shares, unknown users and unknown cases are rejected before
  /// anything is revoked. A role-ineligible request fails only after the
  /// revoke has been committed: the target ends with zero links. On
  /// success, exactly one link exists for the target.
  fn link_user(
    &self,
    acting_user_id: Uuid,
    target_user_id: Uuid,
    case_id: Uuid,
    permission: SharePermission,
  ) -> impl Future<Output = Result<UserCaseLink, Self::Error>> + Send + '_;

  /// The user's active links — by construction, zero or one.
  fn links_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<UserCaseLink>, Self::Error>> + Send + '_;

  // ── Artifacts ─────────────────────────────────────────────────────────

  /// Attach an artifact record to a case. Content storage is external;
  /// the record exists so `destroy_case` can cascade over it.
  fn add_artifact(
    &self,
    case_id: Uuid,
    file_name: String,
  ) -> impl Future<Output = Result<Artifact, Self::Error>> + Send + '_;

  fn list_artifacts(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Artifact>, Self::Error>> + Send + '_;
}
