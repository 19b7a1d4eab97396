use rusqlite::Connection;

use crate::{Error, Result};

// Schema version (increment when changing table definitions)
pub const SCHEMA_VERSION: i32 = 1;

// The prompt table is never dropped: newer versions must migrate forward.
// seq is assigned in the same IMMEDIATE transaction as the INSERT; the UNIQUE
// index backs that invariant.

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version > SCHEMA_VERSION {
        return Err(Error::Query(format!(
            "Ledger schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS prompt (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            prompt TEXT NOT NULL,
            cwd TEXT NOT NULL,
            seq INTEGER NOT NULL,
            stopped_at TEXT,
            last_wait_user_at TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_prompt_session_seq ON prompt(session_id, seq);
        CREATE INDEX IF NOT EXISTS idx_prompt_session_created ON prompt(session_id, created_at DESC);
        "#,
    )?;

    if current_version != SCHEMA_VERSION {
        conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
    }

    Ok(())
}
