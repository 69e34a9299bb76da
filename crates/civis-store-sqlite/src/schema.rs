//! SQL schema for the Civis SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id      TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL UNIQUE,
    role         TEXT NOT NULL DEFAULT 'citizen', -- 'citizen' | 'staff' | 'admin'
    active       INTEGER NOT NULL DEFAULT 1,
    karma        INTEGER NOT NULL DEFAULT 0 CHECK (karma >= 0),
    token_digest TEXT NOT NULL UNIQUE,            -- SHA-256 hex of the API token
    created_at   TEXT NOT NULL                    -- ISO 8601 UTC
);

-- Issues are never deleted; terminal statuses freeze them instead.
-- Counts, urgency_score, and resolve_karma_granted are mutated only inside
-- ledger transactions.
CREATE TABLE IF NOT EXISTS issues (
    issue_id              TEXT PRIMARY KEY,
    title                 TEXT NOT NULL,
    description           TEXT NOT NULL,
    category              TEXT NOT NULL,
    status                TEXT NOT NULL DEFAULT 'submitted',
    priority              TEXT NOT NULL DEFAULT 'medium',
    latitude              REAL NOT NULL,
    longitude             REAL NOT NULL,
    address               TEXT,
    reporter_id           TEXT NOT NULL REFERENCES users(user_id),
    upvotes               INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
    confirmations         INTEGER NOT NULL DEFAULT 0 CHECK (confirmations >= 0),
    urgency_score         INTEGER NOT NULL DEFAULT 0,
    resolve_karma_granted INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL,
    acknowledged_at       TEXT,
    resolved_at           TEXT
);

-- One active vote per (issue, user, type); retraction deletes the row.
-- cast_at feeds the trending window query.
CREATE TABLE IF NOT EXISTS votes (
    issue_id  TEXT NOT NULL REFERENCES issues(issue_id),
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    vote_type TEXT NOT NULL,   -- 'upvote' | 'confirm'
    cast_at   TEXT NOT NULL,
    PRIMARY KEY (issue_id, user_id, vote_type)
);

-- Comments are strictly append-only.
CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    issue_id   TEXT NOT NULL REFERENCES issues(issue_id),
    user_id    TEXT NOT NULL REFERENCES users(user_id),
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Append-only audit of applied status changes.
CREATE TABLE IF NOT EXISTS status_log (
    change_id   TEXT PRIMARY KEY,
    issue_id    TEXT NOT NULL REFERENCES issues(issue_id),
    actor_id    TEXT NOT NULL REFERENCES users(user_id),
    from_status TEXT NOT NULL,
    to_status   TEXT NOT NULL,
    note        TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    issue_id        TEXT REFERENCES issues(issue_id),
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    is_read         INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS votes_issue_type_cast_idx ON votes(issue_id, vote_type, cast_at);
CREATE INDEX IF NOT EXISTS issues_status_idx         ON issues(status);
CREATE INDEX IF NOT EXISTS issues_created_idx        ON issues(created_at);
CREATE INDEX IF NOT EXISTS comments_issue_idx        ON comments(issue_id);
CREATE INDEX IF NOT EXISTS status_log_issue_idx      ON status_log(issue_id);
CREATE INDEX IF NOT EXISTS notifications_user_idx    ON notifications(user_id);

PRAGMA user_version = 1;
";
