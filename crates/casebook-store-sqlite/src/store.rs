//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use casebook_core::{
  case::{Artifact, Case, CaseFields, CaseView, Institution, NewCase},
  permission::{CASES_TABLE, Permission, PermissionScope},
  share::{Role, SharePermission, User, UserCaseLink},
  store::CaseStore,
  version::CaseVersion,
};

use crate::{
  Error, Result,
  encode::{
    RawCase, RawLink, RawPermission, RawVersion, decode_dt, decode_role,
    decode_uuid, encode_dt, encode_keywords, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A casebook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// database work runs on the connection's dedicated thread, so each
/// transaction is serialized against every other operation; writes are
/// never observed half-done.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one full `cases` row.
  async fn fetch_case_row(&self, id: Uuid) -> Result<Option<RawCase>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT case_id, title, description, language, domain,
                      specialty, keywords, original_date, complexity,
                      author_id, author_grade, institution_id, created_at
               FROM cases WHERE case_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawCase {
                  case_id:        row.get(0)?,
                  title:          row.get(1)?,
                  description:    row.get(2)?,
                  language:       row.get(3)?,
                  domain:         row.get(4)?,
                  specialty:      row.get(5)?,
                  keywords:       row.get(6)?,
                  original_date:  row.get(7)?,
                  complexity:     row.get(8)?,
                  author_id:      row.get(9)?,
                  author_grade:   row.get(10)?,
                  institution_id: row.get(11)?,
                  created_at:     row.get(12)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw)
  }

  async fn case_exists(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM cases WHERE case_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Role of a stored user, or `None` if the user is unknown.
  async fn user_role(&self, user_id: Uuid) -> Result<Option<Role>> {
    let id_str = encode_uuid(user_id);
    let role_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT role FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    role_str.as_deref().map(decode_role).transpose()
  }
}

// ─── Test observability ──────────────────────────────────────────────────────

#[cfg(test)]
impl SqliteStore {
  /// Row count of one table; used by atomicity and cascade tests.
  pub(crate) async fn count_rows(&self, table: &'static str) -> Result<i64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM {table}"),
          [],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(n)
  }

  /// Insert a version with a caller-chosen timestamp, bypassing the
  /// store-assigned clock. Exists so tests can force equal `created_at`
  /// values and exercise the insertion-order tie-break.
  pub(crate) async fn append_version_at(
    &self,
    case_id: Uuid,
    source: &str,
    created_at: chrono::DateTime<Utc>,
  ) -> Result<CaseVersion> {
    let version = CaseVersion {
      version_id: Uuid::new_v4(),
      case_id,
      source: source.to_owned(),
      created_at,
    };

    let version_id_str = encode_uuid(version.version_id);
    let case_id_str = encode_uuid(case_id);
    let source_str = version.source.clone();
    let at_str = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO case_versions (version_id, case_id, source, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![version_id_str, case_id_str, source_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(version)
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Collaborator records ────────────────────────────────────────────────

  async fn put_institution(&self, institution: Institution) -> Result<()> {
    let id_str = encode_uuid(institution.institution_id);
    let acronym = institution.acronym;
    let title = institution.title;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO institutions (institution_id, acronym, title)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, acronym, title],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn put_user(&self, user: User) -> Result<()> {
    let id_str = encode_uuid(user.user_id);
    let role_str = user.role.as_str();
    let grade = user.grade;
    let inst_id_str = encode_uuid(user.institution_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO users (user_id, role, grade, institution_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, role_str, grade, inst_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Case lifecycle ──────────────────────────────────────────────────────

  async fn create_case(&self, input: NewCase, author: &User) -> Result<Case> {
    let case = Case {
      case_id:        Uuid::new_v4(),
      fields:         input.fields,
      author_id:      author.user_id,
      author_grade:   author.grade.clone(),
      institution_id: author.institution_id,
      created_at:     Utc::now(),
    };
    let version = CaseVersion {
      version_id: Uuid::new_v4(),
      case_id:    case.case_id,
      source:     input.source,
      created_at: case.created_at,
    };
    let scope = input
      .permission
      .unwrap_or_else(|| PermissionScope::institution(author.institution_id));
    let permission_id = Uuid::new_v4();

    let case_id_str    = encode_uuid(case.case_id);
    let title          = case.fields.title.clone();
    let description    = case.fields.description.clone();
    let language       = case.fields.language.clone();
    let domain         = case.fields.domain.clone();
    let specialty      = case.fields.specialty.clone();
    let keywords_str   = encode_keywords(&case.fields.keywords)?;
    let original_date  = case.fields.original_date.clone();
    let complexity     = case.fields.complexity.clone();
    let author_id_str  = encode_uuid(case.author_id);
    let author_grade   = case.author_grade.clone();
    let inst_id_str    = encode_uuid(case.institution_id);
    let created_at_str = encode_dt(case.created_at);

    let version_id_str = encode_uuid(version.version_id);
    let source         = version.source.clone();

    let perm_id_str    = encode_uuid(permission_id);
    let perm_entity    = scope.entity;
    let perm_subject   = scope.subject;
    let perm_clearance = scope.clearance;

    let committed: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO cases (
             case_id, title, description, language, domain, specialty,
             keywords, original_date, complexity,
             author_id, author_grade, institution_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            case_id_str,
            title,
            description,
            language,
            domain,
            specialty,
            keywords_str,
            original_date,
            complexity,
            author_id_str,
            author_grade,
            inst_id_str,
            created_at_str,
          ],
        )?;

        tx.execute(
          "INSERT INTO case_versions (version_id, case_id, source, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![version_id_str, case_id_str, source, created_at_str],
        )?;

        tx.execute(
          "INSERT INTO permissions (permission_id, entity, subject, clearance, tbl, tbl_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            perm_id_str,
            perm_entity,
            perm_subject,
            perm_clearance,
            CASES_TABLE,
            case_id_str,
          ],
        )?;

        // Institution association is the last step of the unit of work;
        // an unknown institution aborts everything above.
        let known: bool = tx
          .query_row(
            "SELECT 1 FROM institutions WHERE institution_id = ?1",
            rusqlite::params![inst_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !known {
          return Ok(false); // tx dropped here rolls everything back
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !committed {
      return Err(Error::InstitutionNotFound(author.institution_id));
    }

    tracing::debug!(case_id = %case.case_id, "created case");
    Ok(case)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<CaseView>> {
    let raw = match self.fetch_case_row(id).await? {
      Some(raw) => raw,
      None => return Ok(None),
    };
    let case = raw.into_case()?;

    let versions = self.list_versions(id).await?;
    let source = versions
      .last()
      .map(|v| v.source.clone())
      .ok_or_else(|| Error::Decode(format!("case {id} has no versions")))?;

    let inst_id_str = encode_uuid(case.institution_id);
    let institution: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT acronym, title FROM institutions WHERE institution_id = ?1",
              rusqlite::params![inst_id_str],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let (institution_acronym, institution_title) =
      institution.ok_or(Error::InstitutionNotFound(case.institution_id))?;

    Ok(Some(CaseView {
      case,
      source,
      versions,
      institution_acronym,
      institution_title,
    }))
  }

  async fn update_case(
    &self,
    id: Uuid,
    fields: CaseFields,
    source: String,
  ) -> Result<Case> {
    let id_str = encode_uuid(id);
    let title         = fields.title.clone();
    let description   = fields.description.clone();
    let language      = fields.language.clone();
    let domain        = fields.domain.clone();
    let specialty     = fields.specialty.clone();
    let keywords_str  = encode_keywords(&fields.keywords)?;
    let original_date = fields.original_date.clone();
    let complexity    = fields.complexity.clone();

    let version_id_str = encode_uuid(Uuid::new_v4());
    let version_at_str = encode_dt(Utc::now());

    type Meta = (String, Option<String>, String, String);

    let meta: Option<Meta> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let meta: Option<Meta> = tx
          .query_row(
            "SELECT author_id, author_grade, institution_id, created_at
             FROM cases WHERE case_id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )
          .optional()?;

        let Some(meta) = meta else {
          return Ok(None);
        };

        // Clear-on-omit: every descriptive column is overwritten, so a
        // `None` field clears whatever was stored before.
        tx.execute(
          "UPDATE cases SET
             title = ?2, description = ?3, language = ?4, domain = ?5,
             specialty = ?6, keywords = ?7, original_date = ?8, complexity = ?9
           WHERE case_id = ?1",
          rusqlite::params![
            id_str,
            title,
            description,
            language,
            domain,
            specialty,
            keywords_str,
            original_date,
            complexity,
          ],
        )?;

        tx.execute(
          "INSERT INTO case_versions (version_id, case_id, source, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![version_id_str, id_str, source, version_at_str],
        )?;

        tx.commit()?;
        Ok(Some(meta))
      })
      .await?;

    let Some((author_id, author_grade, institution_id, created_at)) = meta
    else {
      return Err(Error::CaseNotFound(id));
    };

    tracing::debug!(case_id = %id, "updated case and appended version");

    Ok(Case {
      case_id: id,
      fields,
      author_id: decode_uuid(&author_id)?,
      author_grade,
      institution_id: decode_uuid(&institution_id)?,
      created_at: decode_dt(&created_at)?,
    })
  }

  async fn destroy_case(&self, id: Uuid) -> Result<Case> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw: Option<RawCase> = tx
          .query_row(
            "SELECT case_id, title, description, language, domain,
                    specialty, keywords, original_date, complexity,
                    author_id, author_grade, institution_id, created_at
             FROM cases WHERE case_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawCase {
                case_id:        row.get(0)?,
                title:          row.get(1)?,
                description:    row.get(2)?,
                language:       row.get(3)?,
                domain:         row.get(4)?,
                specialty:      row.get(5)?,
                keywords:       row.get(6)?,
                original_date:  row.get(7)?,
                complexity:     row.get(8)?,
                author_id:      row.get(9)?,
                author_grade:   row.get(10)?,
                institution_id: row.get(11)?,
                created_at:     row.get(12)?,
              })
            },
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(None); // tx dropped here rolls back
        };

        tx.execute(
          "DELETE FROM case_versions WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM artifacts WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM user_case_links WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM cases WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    let raw = raw.ok_or(Error::CaseNotFound(id))?;
    tracing::debug!(case_id = %id, "destroyed case");
    raw.into_case()
  }

  // ── Versions — append-only ──────────────────────────────────────────────

  async fn append_version(
    &self,
    case_id: Uuid,
    source: String,
  ) -> Result<CaseVersion> {
    let version = CaseVersion {
      version_id: Uuid::new_v4(),
      case_id,
      source,
      created_at: Utc::now(),
    };

    let version_id_str = encode_uuid(version.version_id);
    let case_id_str = encode_uuid(case_id);
    let source_str = version.source.clone();
    let at_str = encode_dt(version.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let known: bool = tx
          .query_row(
            "SELECT 1 FROM cases WHERE case_id = ?1",
            rusqlite::params![case_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !known {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO case_versions (version_id, case_id, source, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![version_id_str, case_id_str, source_str, at_str],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::CaseNotFound(case_id));
    }
    Ok(version)
  }

  async fn current_source(&self, case_id: Uuid) -> Result<String> {
    let case_id_str = encode_uuid(case_id);

    let (known, source): (bool, Option<String>) = self
      .conn
      .call(move |conn| {
        let known: bool = conn
          .query_row(
            "SELECT 1 FROM cases WHERE case_id = ?1",
            rusqlite::params![case_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !known {
          return Ok((false, None));
        }

        // Equal timestamps fall back to seq, i.e. insertion order, so the
        // result is deterministic.
        let source: Option<String> = conn
          .query_row(
            "SELECT source FROM case_versions
             WHERE case_id = ?1
             ORDER BY created_at DESC, seq DESC
             LIMIT 1",
            rusqlite::params![case_id_str],
            |row| row.get(0),
          )
          .optional()?;

        Ok((known, source))
      })
      .await?;

    if !known {
      return Err(Error::CaseNotFound(case_id));
    }
    source.ok_or_else(|| Error::Decode(format!("case {case_id} has no versions")))
  }

  async fn list_versions(&self, case_id: Uuid) -> Result<Vec<CaseVersion>> {
    let case_id_str = encode_uuid(case_id);

    let raws: Vec<RawVersion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT version_id, case_id, source, created_at
           FROM case_versions
           WHERE case_id = ?1
           ORDER BY created_at ASC, seq ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![case_id_str], |row| {
            Ok(RawVersion {
              version_id: row.get(0)?,
              case_id:    row.get(1)?,
              source:     row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVersion::into_version).collect()
  }

  // ── Permissions ─────────────────────────────────────────────────────────

  async fn create_permission(
    &self,
    case_id: Uuid,
    scope: PermissionScope,
  ) -> Result<Permission> {
    let permission = Permission {
      permission_id: Uuid::new_v4(),
      scope,
      table: CASES_TABLE.to_owned(),
      table_id: case_id,
    };

    let perm_id_str = encode_uuid(permission.permission_id);
    let entity = permission.scope.entity.clone();
    let subject = permission.scope.subject.clone();
    let clearance = permission.scope.clearance.clone();
    let table = permission.table.clone();
    let table_id_str = encode_uuid(case_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO permissions (permission_id, entity, subject, clearance, tbl, tbl_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            perm_id_str,
            entity,
            subject,
            clearance,
            table,
            table_id_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(permission)
  }

  async fn list_permissions(
    &self,
    table: &str,
    table_id: Uuid,
  ) -> Result<Vec<Permission>> {
    let table = table.to_owned();
    let table_id_str = encode_uuid(table_id);

    let raws: Vec<RawPermission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT permission_id, entity, subject, clearance, tbl, tbl_id
           FROM permissions
           WHERE tbl = ?1 AND tbl_id = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![table, table_id_str], |row| {
            Ok(RawPermission {
              permission_id: row.get(0)?,
              entity:        row.get(1)?,
              subject:       row.get(2)?,
              clearance:     row.get(3)?,
              table:         row.get(4)?,
              table_id:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPermission::into_permission).collect()
  }

  // ── Sharing ─────────────────────────────────────────────────────────────

  async fn link_user(
    &self,
    acting_user_id: Uuid,
    target_user_id: Uuid,
    case_id: Uuid,
    permission: SharePermission,
  ) -> Result<UserCaseLink> {
    // Validation runs before anything is revoked: a failure here leaves
    // the target's sharing state untouched.
    if acting_user_id == target_user_id {
      return Err(Error::SelfShare);
    }
    let role = self
      .user_role(target_user_id)
      .await?
      .ok_or(Error::UserNotFound(target_user_id))?;
    if !self.case_exists(case_id).await? {
      return Err(Error::CaseNotFound(case_id));
    }

    let link = UserCaseLink {
      user_id: target_user_id,
      case_id,
      permission,
      created_at: Utc::now(),
    };
    let eligible = permission.eligible(role);

    let user_id_str = encode_uuid(target_user_id);
    let case_id_str = encode_uuid(case_id);
    let perm_str = permission.as_str();
    let at_str = encode_dt(link.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Full reset of the target's sharing state, not scoped to this
        // case: at most one link per user, ever.
        tx.execute(
          "DELETE FROM user_case_links WHERE user_id = ?1",
          rusqlite::params![user_id_str],
        )?;

        if eligible {
          tx.execute(
            "INSERT INTO user_case_links (user_id, case_id, permission, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id_str, case_id_str, perm_str, at_str],
          )?;
        }

        // An ineligible request still commits: the revoke is kept, only
        // the grant is skipped.
        tx.commit()?;
        Ok(())
      })
      .await?;

    if !eligible {
      tracing::warn!(
        user = %target_user_id,
        role = %role,
        requested = %permission,
        "sharing request failed role gate; prior links stay revoked"
      );
      return Err(Error::RoleIneligible {
        user: target_user_id,
        role,
        requested: permission,
      });
    }

    tracing::debug!(
      user = %target_user_id,
      case = %case_id,
      permission = %permission,
      "linked user to case"
    );
    Ok(link)
  }

  async fn links_for_user(&self, user_id: Uuid) -> Result<Vec<UserCaseLink>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawLink> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, case_id, permission, created_at
           FROM user_case_links
           WHERE user_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawLink {
              user_id:    row.get(0)?,
              case_id:    row.get(1)?,
              permission: row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLink::into_link).collect()
  }

  // ── Artifacts ───────────────────────────────────────────────────────────

  async fn add_artifact(
    &self,
    case_id: Uuid,
    file_name: String,
  ) -> Result<Artifact> {
    if !self.case_exists(case_id).await? {
      return Err(Error::CaseNotFound(case_id));
    }

    let artifact = Artifact {
      artifact_id: Uuid::new_v4(),
      case_id,
      file_name,
    };

    let artifact_id_str = encode_uuid(artifact.artifact_id);
    let case_id_str = encode_uuid(case_id);
    let file_name_str = artifact.file_name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO artifacts (artifact_id, case_id, file_name)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![artifact_id_str, case_id_str, file_name_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(artifact)
  }

  async fn list_artifacts(&self, case_id: Uuid) -> Result<Vec<Artifact>> {
    let case_id_str = encode_uuid(case_id);

    let rows: Vec<(String, String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT artifact_id, case_id, file_name
           FROM artifacts
           WHERE case_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![case_id_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(artifact_id, case_id, file_name)| {
        Ok(Artifact {
          artifact_id: decode_uuid(&artifact_id)?,
          case_id:     decode_uuid(&case_id)?,
          file_name,
        })
      })
      .collect()
  }
}
