use ccnotify_types::PromptRecord;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::Result;

const COLUMNS: &str = "id, session_id, created_at, prompt, cwd, seq, stopped_at, last_wait_user_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PromptRecord> {
    Ok(PromptRecord {
        id: row.get(0)?,
        session_id: row.get(1)?,
        created_at: row.get(2)?,
        prompt: row.get(3)?,
        cwd: row.get(4)?,
        seq: row.get(5)?,
        stopped_at: row.get(6)?,
        last_wait_user_at: row.get(7)?,
    })
}

/// Next free seq for the session, plus its most recent `created_at`.
pub fn next_seq(conn: &Connection, session_id: &str) -> Result<(i64, Option<String>)> {
    let row = conn.query_row(
        r#"
        SELECT COALESCE(MAX(seq), 0) + 1, MAX(created_at)
        FROM prompt
        WHERE session_id = ?1
        "#,
        [session_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(row)
}

pub fn insert(
    conn: &Connection,
    session_id: &str,
    prompt: &str,
    cwd: &str,
    seq: i64,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO prompt (session_id, created_at, prompt, cwd, seq)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![session_id, created_at, prompt, cwd, seq],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<PromptRecord>> {
    let record = conn
        .query_row(
            &format!("SELECT {} FROM prompt WHERE id = ?1", COLUMNS),
            [id],
            from_row,
        )
        .optional()?;

    Ok(record)
}

/// Most recently created open record: `(id, created_at)`.
pub fn latest_open(conn: &Connection, session_id: &str) -> Result<Option<(i64, String)>> {
    let row = conn
        .query_row(
            r#"
            SELECT id, created_at
            FROM prompt
            WHERE session_id = ?1 AND stopped_at IS NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
            [session_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(row)
}

/// Most recently created record regardless of completion state.
pub fn latest(conn: &Connection, session_id: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            r#"
            SELECT id
            FROM prompt
            WHERE session_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
            [session_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(id)
}

/// Set `stopped_at` if still unset. Returns whether the row changed.
pub fn set_stopped(conn: &Connection, id: i64, stopped_at: &str) -> Result<bool> {
    let changed = conn.execute(
        r#"
        UPDATE prompt
        SET stopped_at = ?2
        WHERE id = ?1 AND stopped_at IS NULL
        "#,
        params![id, stopped_at],
    )?;

    Ok(changed == 1)
}

pub fn set_last_wait(conn: &Connection, id: i64, at: &str) -> Result<()> {
    conn.execute(
        "UPDATE prompt SET last_wait_user_at = ?2 WHERE id = ?1",
        params![id, at],
    )?;

    Ok(())
}

pub fn list_for_session(conn: &Connection, session_id: &str) -> Result<Vec<PromptRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM prompt WHERE session_id = ?1 ORDER BY seq ASC",
        COLUMNS
    ))?;

    let records = stmt
        .query_map([session_id], from_row)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(records)
}
