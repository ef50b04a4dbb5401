//! SQL schema for the Blotter SQLite store.
//!
//! Executed at every connection startup. There are no migrations: a change to
//! an existing table has to be applied by hand.

use rusqlite::{
  Connection,
  functions::FunctionFlags,
  types::{Value, ValueRef},
};

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// Every column except the id is nullable. `subject_id` on incidents is
/// deliberately not a foreign key.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS subjects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT,
    dob         TEXT,            -- YYYY-MM-DD
    gender      TEXT,
    address     TEXT,
    phone       TEXT,
    occupation  TEXT,
    photo_front TEXT,            -- path under the media directory
    photo_left  TEXT,
    photo_right TEXT,
    created_at  TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS incidents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT,
    crime_type  TEXT,
    description TEXT,
    occurred_on TEXT,            -- YYYY-MM-DD
    location    TEXT,
    subject_id  INTEGER,         -- may reference a missing subject
    officer     TEXT,
    created_at  TEXT DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS subjects_created_idx  ON subjects(created_at);
CREATE INDEX IF NOT EXISTS incidents_created_idx ON incidents(created_at);
CREATE INDEX IF NOT EXISTS incidents_subject_idx ON incidents(subject_id);

PRAGMA user_version = 1;
";

/// SQL function lowercasing text with full Unicode rules. SQLite's own `lower`
/// and `LIKE` only fold ASCII letters.
pub const FOLD_CASE: &str = "fold_case";

/// Register the connection-local SQL functions the queries rely on.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_CASE,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      Ok(match ctx.get_raw(0) {
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).to_lowercase()),
        other => Value::from(other),
      })
    },
  )
}
