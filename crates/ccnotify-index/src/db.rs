use ccnotify_engine::duration::{UNKNOWN_DURATION, elapsed};
use ccnotify_types::{PromptRecord, format_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

use crate::queries::prompt;
use crate::{Error, Result, schema};

// Concurrent hook processes queue on the write lock for at most this long.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The session ledger.
///
/// Every mutation runs inside a `BEGIN IMMEDIATE` transaction, so the
/// read-then-write steps (next seq, latest open record) are serialized across
/// processes sharing the same file.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Append a record for a newly submitted task and assign its seq.
    pub fn record_submission(
        &mut self,
        session_id: &str,
        prompt_text: &str,
        cwd: &str,
    ) -> Result<PromptRecord> {
        self.submit(session_id, prompt_text, cwd, Utc::now)
    }

    pub fn record_submission_at(
        &mut self,
        session_id: &str,
        prompt_text: &str,
        cwd: &str,
        at: DateTime<Utc>,
    ) -> Result<PromptRecord> {
        self.submit(session_id, prompt_text, cwd, || at)
    }

    /// Close the most recently created open record of the session.
    ///
    /// Returns `None` without touching the ledger when nothing is open.
    pub fn complete_latest_open(&mut self, session_id: &str) -> Result<Option<PromptRecord>> {
        self.complete(session_id, Utc::now)
    }

    pub fn complete_latest_open_at(
        &mut self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<PromptRecord>> {
        self.complete(session_id, || at)
    }

    /// Stamp `last_wait_user_at` on the session's most recent record.
    ///
    /// The record is picked regardless of completion state, so a finished
    /// task can still be stamped.
    pub fn mark_waiting(&mut self, session_id: &str) -> Result<Option<PromptRecord>> {
        self.touch_waiting(session_id, Utc::now)
    }

    pub fn mark_waiting_at(
        &mut self,
        session_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<PromptRecord>> {
        self.touch_waiting(session_id, || at)
    }

    /// Elapsed time of a completed record; `"Unknown"` while it is open.
    pub fn duration(record: &PromptRecord) -> String {
        match &record.stopped_at {
            Some(stopped_at) => elapsed(&record.created_at, stopped_at),
            None => UNKNOWN_DURATION.to_string(),
        }
    }

    pub fn get_record(&self, id: i64) -> Result<Option<PromptRecord>> {
        prompt::get_by_id(&self.conn, id)
    }

    /// All records of a session in seq order.
    pub fn session_records(&self, session_id: &str) -> Result<Vec<PromptRecord>> {
        prompt::list_for_session(&self.conn, session_id)
    }

    // The clock is read after the write lock is held, so created_at order
    // follows seq order across processes.
    fn submit(
        &mut self,
        session_id: &str,
        prompt_text: &str,
        cwd: &str,
        now: impl FnOnce() -> DateTime<Utc>,
    ) -> Result<PromptRecord> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let (seq, latest_created_at) = prompt::next_seq(&tx, session_id)?;
        let created_at = not_before(format_timestamp(now()), latest_created_at);
        let id = prompt::insert(&tx, session_id, prompt_text, cwd, seq, &created_at)?;

        tx.commit()?;

        tracing::debug!(session_id, seq, id, "prompt record inserted");

        Ok(PromptRecord {
            id,
            session_id: session_id.to_string(),
            created_at,
            prompt: prompt_text.to_string(),
            cwd: cwd.to_string(),
            seq,
            stopped_at: None,
            last_wait_user_at: None,
        })
    }

    fn complete(
        &mut self,
        session_id: &str,
        now: impl FnOnce() -> DateTime<Utc>,
    ) -> Result<Option<PromptRecord>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some((id, created_at)) = prompt::latest_open(&tx, session_id)? else {
            return Ok(None);
        };

        let stopped_at = not_before(format_timestamp(now()), Some(created_at));
        if !prompt::set_stopped(&tx, id, &stopped_at)? {
            return Err(Error::Query(format!(
                "prompt record {} was completed by another writer",
                id
            )));
        }

        let record = prompt::get_by_id(&tx, id)?
            .ok_or_else(|| Error::Query(format!("prompt record {} vanished", id)))?;
        tx.commit()?;

        Ok(Some(record))
    }

    fn touch_waiting(
        &mut self,
        session_id: &str,
        now: impl FnOnce() -> DateTime<Utc>,
    ) -> Result<Option<PromptRecord>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(id) = prompt::latest(&tx, session_id)? else {
            return Ok(None);
        };

        prompt::set_last_wait(&tx, id, &format_timestamp(now()))?;

        let record = prompt::get_by_id(&tx, id)?
            .ok_or_else(|| Error::Query(format!("prompt record {} vanished", id)))?;
        tx.commit()?;

        Ok(Some(record))
    }
}

// Clamp a fresh timestamp so it never sorts before `floor` when the wall
// clock steps backwards. Both sides use the fixed-width storage format.
fn not_before(candidate: String, floor: Option<String>) -> String {
    match floor {
        Some(floor) if floor > candidate => floor,
        _ => candidate,
    }
}
