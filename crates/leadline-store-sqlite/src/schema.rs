//! SQL schema for the Leadline SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Leads are never deleted. `status` and `priority` are nullable and kept
-- verbatim; readers map absent or unknown values to 'new' / 'normal'.
CREATE TABLE IF NOT EXISTS leads (
    lead_id      TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL DEFAULT '',
    message      TEXT NOT NULL,
    source       TEXT NOT NULL DEFAULT 'web',
    status       TEXT,
    priority     TEXT,
    assigned_to  TEXT,
    follow_up_at TEXT,             -- RFC 3339 UTC or NULL
    last_note    TEXT NOT NULL DEFAULT '',
    notes_json   TEXT NOT NULL DEFAULT '[]',
    created_at   TEXT NOT NULL,    -- store clock, set once
    updated_at   TEXT NOT NULL     -- store clock, every write
);

-- Admin allow-list keyed by the identity uid.
CREATE TABLE IF NOT EXISTS admins (
    uid        TEXT PRIMARY KEY,
    is_admin   INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS leads_updated_idx ON leads(updated_at DESC);

PRAGMA user_version = 1;
";
