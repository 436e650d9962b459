//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout for any future migration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,   -- normalised: trimmed, lower-case
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    avatar        TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- One JSON document per profile; rewritten whole on every update.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL UNIQUE REFERENCES users(user_id),
    document   TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_created_idx ON profiles(created_at);

PRAGMA user_version = 1;
";
