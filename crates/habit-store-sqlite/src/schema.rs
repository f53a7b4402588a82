//! SQL schema for the habit store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id   INTEGER NOT NULL UNIQUE,
    display_name  TEXT,
    created_at    TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Habits are never deleted; is_active = 0 marks a soft delete.
CREATE TABLE IF NOT EXISTS habits (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    title       TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

-- One row per (habit, day) at most. Un-marking deletes the row.
CREATE TABLE IF NOT EXISTS habit_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id    INTEGER NOT NULL REFERENCES habits(id),
    log_date    TEXT NOT NULL,     -- YYYY-MM-DD
    done        INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    UNIQUE (habit_id, log_date)
);

CREATE INDEX IF NOT EXISTS habits_user_active_idx ON habits(user_id, is_active);

PRAGMA user_version = 1;
";
