//! Integration tests for `SqliteStore` against an in-memory database.

use casebook_core::{
  case::{CaseFields, Institution, NewCase},
  permission::{CASES_TABLE, PermissionScope},
  share::{Role, SharePermission, User},
  store::CaseStore,
};
use chrono::Utc;
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn institution() -> Institution {
  Institution {
    institution_id: Uuid::new_v4(),
    acronym:        "MSH".into(),
    title:          "Mount Sinai Hospital".into(),
  }
}

fn user(role: Role, institution_id: Uuid) -> User {
  User {
    user_id: Uuid::new_v4(),
    role,
    grade: match role {
      Role::Author => Some("professor".into()),
      _ => None,
    },
    institution_id,
  }
}

fn fields(title: &str) -> CaseFields {
  CaseFields {
    title:         Some(title.into()),
    description:   Some("a teaching case".into()),
    language:      Some("en".into()),
    domain:        Some("cardiology".into()),
    specialty:     None,
    keywords:      vec!["chest pain".into(), "ecg".into()],
    original_date: None,
    complexity:    Some("medium".into()),
  }
}

/// Seed an institution plus an author belonging to it.
async fn seed_author(s: &SqliteStore) -> (Institution, User) {
  let inst = institution();
  s.put_institution(inst.clone()).await.unwrap();
  let author = user(Role::Author, inst.institution_id);
  s.put_user(author.clone()).await.unwrap();
  (inst, author)
}

// ─── Case lifecycle ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_case() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;

  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  assert_eq!(case.author_id, author.user_id);
  assert_eq!(case.author_grade.as_deref(), Some("professor"));
  assert_eq!(case.institution_id, inst.institution_id);

  let view = s.get_case(case.case_id).await.unwrap().unwrap();
  assert_eq!(view.case.fields.title.as_deref(), Some("Angina"));
  assert_eq!(view.source, "v1");
  assert_eq!(view.versions.len(), 1);
  assert_eq!(view.versions[0].source, "v1");
  assert_eq!(view.institution_acronym, "MSH");
  assert_eq!(view.institution_title, "Mount Sinai Hospital");
}

#[tokio::test]
async fn get_case_missing_returns_none() {
  let s = store().await;
  let view = s.get_case(Uuid::new_v4()).await.unwrap();
  assert!(view.is_none());
}

#[tokio::test]
async fn create_writes_default_permission() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;

  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let perms = s.list_permissions(CASES_TABLE, case.case_id).await.unwrap();
  assert_eq!(perms.len(), 1);
  assert_eq!(perms[0].scope.entity, "institution");
  assert_eq!(
    perms[0].scope.subject,
    inst.institution_id.hyphenated().to_string()
  );
  assert_eq!(perms[0].scope.clearance, "1");
  assert_eq!(perms[0].table, CASES_TABLE);
  assert_eq!(perms[0].table_id, case.case_id);
}

#[tokio::test]
async fn create_honors_permission_override() {
  let s = store().await;
  let (_, author) = seed_author(&s).await;

  let input = NewCase {
    fields:     fields("Angina"),
    source:     "v1".into(),
    permission: Some(PermissionScope {
      entity:    "group".into(),
      subject:   "residents".into(),
      clearance: "2".into(),
    }),
  };
  let case = s.create_case(input, &author).await.unwrap();

  let perms = s.list_permissions(CASES_TABLE, case.case_id).await.unwrap();
  assert_eq!(perms.len(), 1);
  assert_eq!(perms[0].scope.entity, "group");
  assert_eq!(perms[0].scope.subject, "residents");
  assert_eq!(perms[0].scope.clearance, "2");
}

#[tokio::test]
async fn create_rolls_back_when_institution_is_unknown() {
  let s = store().await;
  // No institution seeded: the association step, last in the transaction,
  // must abort the case, version and permission inserts before it.
  let author = user(Role::Author, Uuid::new_v4());

  let err = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::InstitutionNotFound(_)));

  assert_eq!(s.count_rows("cases").await.unwrap(), 0);
  assert_eq!(s.count_rows("case_versions").await.unwrap(), 0);
  assert_eq!(s.count_rows("permissions").await.unwrap(), 0);
}

#[tokio::test]
async fn update_overwrites_and_clears_omitted_fields() {
  let s = store().await;
  let (_, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  // Only a title is supplied; everything else must be cleared, not kept.
  let sparse = CaseFields {
    title: Some("Unstable angina".into()),
    ..Default::default()
  };
  let updated = s
    .update_case(case.case_id, sparse, "v2".into())
    .await
    .unwrap();

  assert_eq!(updated.fields.title.as_deref(), Some("Unstable angina"));
  assert!(updated.fields.description.is_none());
  assert!(updated.fields.complexity.is_none());
  assert!(updated.fields.keywords.is_empty());
  // Provenance is not a descriptive field; it survives updates.
  assert_eq!(updated.author_id, author.user_id);

  let view = s.get_case(case.case_id).await.unwrap().unwrap();
  assert_eq!(view.source, "v2");
  assert_eq!(view.versions.len(), 2);
  assert!(view.case.fields.description.is_none());
}

#[tokio::test]
async fn update_missing_case_errors() {
  let s = store().await;
  let err = s
    .update_case(Uuid::new_v4(), CaseFields::default(), "v2".into())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::CaseNotFound(_)));
  assert_eq!(s.count_rows("case_versions").await.unwrap(), 0);
}

#[tokio::test]
async fn destroy_cascades_over_versions_artifacts_and_links() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();
  s.append_version(case.case_id, "v2".into()).await.unwrap();
  s.add_artifact(case.case_id, "ecg.png".into()).await.unwrap();

  let player = user(Role::Player, inst.institution_id);
  s.put_user(player.clone()).await.unwrap();
  s.link_user(author.user_id, player.user_id, case.case_id, SharePermission::Read)
    .await
    .unwrap();

  let snapshot = s.destroy_case(case.case_id).await.unwrap();
  assert_eq!(snapshot.case_id, case.case_id);
  assert_eq!(snapshot.fields.title.as_deref(), Some("Angina"));

  assert!(s.get_case(case.case_id).await.unwrap().is_none());
  assert_eq!(s.count_rows("case_versions").await.unwrap(), 0);
  assert_eq!(s.count_rows("artifacts").await.unwrap(), 0);
  assert_eq!(s.count_rows("user_case_links").await.unwrap(), 0);
}

#[tokio::test]
async fn destroy_missing_case_errors() {
  let s = store().await;
  let err = s.destroy_case(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::CaseNotFound(_)));
}

// ─── Versions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_resolve_current() {
  let s = store().await;
  let (_, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  s.append_version(case.case_id, "v2".into()).await.unwrap();
  s.append_version(case.case_id, "v3".into()).await.unwrap();

  assert_eq!(s.current_source(case.case_id).await.unwrap(), "v3");

  // Earlier versions are untouched and stay in append order.
  let versions = s.list_versions(case.case_id).await.unwrap();
  let sources: Vec<_> = versions.iter().map(|v| v.source.as_str()).collect();
  assert_eq!(sources, ["v1", "v2", "v3"]);
}

#[tokio::test]
async fn equal_timestamps_fall_back_to_insertion_order() {
  let s = store().await;
  let (_, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let at = Utc::now() + chrono::Duration::seconds(10);
  s.append_version_at(case.case_id, "tie-a", at).await.unwrap();
  s.append_version_at(case.case_id, "tie-b", at).await.unwrap();

  // The timestamps collide; insertion order decides.
  assert_eq!(s.current_source(case.case_id).await.unwrap(), "tie-b");

  let versions = s.list_versions(case.case_id).await.unwrap();
  let sources: Vec<_> = versions.iter().map(|v| v.source.as_str()).collect();
  assert_eq!(sources, ["v1", "tie-a", "tie-b"]);
}

#[tokio::test]
async fn append_to_missing_case_errors() {
  let s = store().await;
  let err = s
    .append_version(Uuid::new_v4(), "v1".into())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::CaseNotFound(_)));
}

#[tokio::test]
async fn current_source_missing_case_errors() {
  let s = store().await;
  let err = s.current_source(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, crate::Error::CaseNotFound(_)));
}

// ─── Permissions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_permission_is_not_deduplicated() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  // Creation already wrote the default row; two more calls write two more.
  let scope = PermissionScope::institution(inst.institution_id);
  s.create_permission(case.case_id, scope.clone()).await.unwrap();
  s.create_permission(case.case_id, scope).await.unwrap();

  let perms = s.list_permissions(CASES_TABLE, case.case_id).await.unwrap();
  assert_eq!(perms.len(), 3);
}

// ─── Sharing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn link_user_grants_a_single_link() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let target = user(Role::Author, inst.institution_id);
  s.put_user(target.clone()).await.unwrap();

  let link = s
    .link_user(author.user_id, target.user_id, case.case_id, SharePermission::Share)
    .await
    .unwrap();
  assert_eq!(link.case_id, case.case_id);
  assert_eq!(link.permission, SharePermission::Share);

  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].case_id, case.case_id);
  assert_eq!(links[0].permission, SharePermission::Share);
}

#[tokio::test]
async fn link_replaces_prior_link_across_cases() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case_c = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();
  let case_d = s
    .create_case(NewCase::new(fields("Sepsis"), "v1"), &author)
    .await
    .unwrap();

  let target = user(Role::Author, inst.institution_id);
  s.put_user(target.clone()).await.unwrap();

  s.link_user(author.user_id, target.user_id, case_c.case_id, SharePermission::Share)
    .await
    .unwrap();
  // Linking to a different case resets the user's sharing state wholesale:
  // the old link is gone, not kept alongside.
  s.link_user(author.user_id, target.user_id, case_d.case_id, SharePermission::Read)
    .await
    .unwrap();

  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].case_id, case_d.case_id);
  assert_eq!(links[0].permission, SharePermission::Read);

  // An unknown permission level fails at parse time, before any store
  // call, so the existing link is untouched.
  let parse_err = "owner".parse::<SharePermission>().unwrap_err();
  assert!(matches!(
    parse_err,
    casebook_core::Error::InvalidPermission(_)
  ));
  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].case_id, case_d.case_id);
}

#[tokio::test]
async fn role_gate_failure_leaves_prior_links_revoked() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case_c = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();
  let case_d = s
    .create_case(NewCase::new(fields("Sepsis"), "v1"), &author)
    .await
    .unwrap();

  let player = user(Role::Player, inst.institution_id);
  s.put_user(player.clone()).await.unwrap();

  // A valid read link first.
  s.link_user(author.user_id, player.user_id, case_c.case_id, SharePermission::Read)
    .await
    .unwrap();

  // Write requires an author. The revoke has already run and is not
  // compensated: the player ends with no links at all.
  let err = s
    .link_user(author.user_id, player.user_id, case_d.case_id, SharePermission::Write)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RoleIneligible { .. }));

  let links = s.links_for_user(player.user_id).await.unwrap();
  assert!(links.is_empty());
}

#[tokio::test]
async fn read_requires_player_or_author() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let outsider = user(Role::Other, inst.institution_id);
  s.put_user(outsider.clone()).await.unwrap();

  let err = s
    .link_user(author.user_id, outsider.user_id, case.case_id, SharePermission::Read)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RoleIneligible { .. }));
  assert!(s.links_for_user(outsider.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn self_share_is_rejected_with_no_state_change() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let target = user(Role::Author, inst.institution_id);
  s.put_user(target.clone()).await.unwrap();
  s.link_user(author.user_id, target.user_id, case.case_id, SharePermission::Read)
    .await
    .unwrap();

  // Acting user equals target: rejected before the revoke step runs.
  let err = s
    .link_user(target.user_id, target.user_id, case.case_id, SharePermission::Read)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::SelfShare));

  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].case_id, case.case_id);
}

#[tokio::test]
async fn link_unknown_user_errors_without_mutation() {
  let s = store().await;
  let (_, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let err = s
    .link_user(author.user_id, Uuid::new_v4(), case.case_id, SharePermission::Read)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::UserNotFound(_)));
}

#[tokio::test]
async fn link_unknown_case_errors_without_revoking() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();

  let target = user(Role::Author, inst.institution_id);
  s.put_user(target.clone()).await.unwrap();
  s.link_user(author.user_id, target.user_id, case.case_id, SharePermission::Read)
    .await
    .unwrap();

  let err = s
    .link_user(author.user_id, target.user_id, Uuid::new_v4(), SharePermission::Read)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::CaseNotFound(_)));

  // The existing link survives: the case check runs before the revoke.
  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  assert_eq!(links[0].case_id, case.case_id);
}

#[tokio::test]
async fn concurrent_links_settle_on_exactly_one() {
  let s = store().await;
  let (inst, author) = seed_author(&s).await;
  let case_c = s
    .create_case(NewCase::new(fields("Angina"), "v1"), &author)
    .await
    .unwrap();
  let case_d = s
    .create_case(NewCase::new(fields("Sepsis"), "v1"), &author)
    .await
    .unwrap();

  let target = user(Role::Author, inst.institution_id);
  s.put_user(target.clone()).await.unwrap();

  // Two racing grants for the same target against different cases: the
  // accepted outcome is last-writer-wins. The final state must be one of
  // the two requested links — never both, never a mix.
  let (a, b) = tokio::join!(
    s.link_user(author.user_id, target.user_id, case_c.case_id, SharePermission::Read),
    s.link_user(author.user_id, target.user_id, case_d.case_id, SharePermission::Share),
  );
  a.unwrap();
  b.unwrap();

  let links = s.links_for_user(target.user_id).await.unwrap();
  assert_eq!(links.len(), 1);
  let won = &links[0];
  assert!(
    (won.case_id == case_c.case_id && won.permission == SharePermission::Read)
      || (won.case_id == case_d.case_id
        && won.permission == SharePermission::Share)
  );
}

// ─── Eligibility rules ───────────────────────────────────────────────────────

#[test]
fn share_permission_parse_and_role_gate() {
  assert_eq!("read".parse::<SharePermission>().unwrap(), SharePermission::Read);
  assert_eq!("write".parse::<SharePermission>().unwrap(), SharePermission::Write);
  assert_eq!("share".parse::<SharePermission>().unwrap(), SharePermission::Share);
  assert!("owner".parse::<SharePermission>().is_err());

  assert!(SharePermission::Read.eligible(Role::Player));
  assert!(SharePermission::Read.eligible(Role::Author));
  assert!(!SharePermission::Read.eligible(Role::Other));
  assert!(SharePermission::Write.eligible(Role::Author));
  assert!(!SharePermission::Write.eligible(Role::Player));
  assert!(SharePermission::Share.eligible(Role::Author));
  assert!(!SharePermission::Share.eligible(Role::Player));
}
