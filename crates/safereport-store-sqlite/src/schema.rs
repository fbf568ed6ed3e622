//! SQL schema for the SafeReport SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Reports are never deleted. Only status and updated_at are ever updated.
CREATE TABLE IF NOT EXISTS reports (
    id             TEXT PRIMARY KEY,       -- internal UUID
    report_id      TEXT NOT NULL UNIQUE,   -- public identifier
    category       TEXT NOT NULL,          -- 'EMERGENCY' | 'NON_EMERGENCY'
    specified_type TEXT NOT NULL,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL,
    location       TEXT,
    latitude       REAL,
    longitude      REAL,
    image          TEXT,                   -- data URI
    status         TEXT NOT NULL DEFAULT 'PENDING',
    created_at     TEXT NOT NULL,          -- ISO 8601 UTC; server-assigned
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,           -- argon2 PHC string
    role          TEXT NOT NULL,           -- 'USER' | 'ADMIN' | 'MODERATOR'
    created_at    TEXT NOT NULL
);

-- Only the SHA-256 digest of a session token is kept.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS reports_created_idx ON reports(created_at);
CREATE INDEX IF NOT EXISTS reports_status_idx  ON reports(status);

PRAGMA user_version = 1;
";
