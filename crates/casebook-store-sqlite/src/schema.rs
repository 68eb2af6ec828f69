//! SQL schema for the Casebook SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS institutions (
    institution_id TEXT PRIMARY KEY,
    acronym        TEXT NOT NULL,
    title          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    role           TEXT NOT NULL,   -- 'author' | 'player' | 'other'
    grade          TEXT,
    institution_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cases (
    case_id        TEXT PRIMARY KEY,
    title          TEXT,
    description    TEXT,
    language       TEXT,
    domain         TEXT,
    specialty      TEXT,
    keywords       TEXT NOT NULL DEFAULT '[]',   -- JSON array
    original_date  TEXT,
    complexity     TEXT,
    author_id      TEXT NOT NULL,
    author_grade   TEXT,
    -- Not FK-enforced: the association is verified explicitly inside
    -- create_case's transaction, as its final step.
    institution_id TEXT NOT NULL,
    created_at     TEXT NOT NULL
);

-- Version history is strictly append-only: no UPDATE is ever issued against
-- this table, and rows are deleted only by the owning case's destroy
-- cascade. seq disambiguates versions that share a created_at timestamp.
CREATE TABLE IF NOT EXISTS case_versions (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    version_id TEXT NOT NULL UNIQUE,
    case_id    TEXT NOT NULL REFERENCES cases(case_id),
    source     TEXT NOT NULL,
    created_at TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

-- Coarse entity-scoped grants; immutable once written.
CREATE TABLE IF NOT EXISTS permissions (
    permission_id TEXT PRIMARY KEY,
    entity        TEXT NOT NULL,  -- scope kind, e.g. 'institution'
    subject       TEXT NOT NULL,  -- scope identifier
    clearance     TEXT NOT NULL,  -- ordinal level, as text
    tbl           TEXT NOT NULL,  -- protected table name
    tbl_id        TEXT NOT NULL   -- protected row id
);

-- The current sharing relationship, not a history. At most one row per
-- user, maintained by link_user's revoke-then-grant.
CREATE TABLE IF NOT EXISTS user_case_links (
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    case_id    TEXT NOT NULL REFERENCES cases(case_id),
    permission TEXT NOT NULL,    -- 'read' | 'write' | 'share'
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS artifacts (
    artifact_id TEXT PRIMARY KEY,
    case_id     TEXT NOT NULL REFERENCES cases(case_id),
    file_name   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS case_versions_case_idx  ON case_versions(case_id);
CREATE INDEX IF NOT EXISTS permissions_resource_idx ON permissions(tbl, tbl_id);
CREATE INDEX IF NOT EXISTS user_case_links_user_idx ON user_case_links(user_id);
CREATE INDEX IF NOT EXISTS artifacts_case_idx       ON artifacts(case_id);

PRAGMA user_version = 1;
";
