use serde::{Deserialize, Serialize};

/// One task submission within a session, as stored in the ledger.
///
/// Timestamps are RFC 3339 UTC strings with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Row id assigned by the store.
    pub id: i64,
    /// Opaque identifier of the interactive run.
    pub session_id: String,
    /// Submission time.
    pub created_at: String,
    /// Prompt text captured at submission.
    pub prompt: String,
    /// Working directory captured at submission.
    pub cwd: String,
    /// 1-based ordinal within the session.
    pub seq: i64,
    /// Completion time; set once by a Stop event.
    pub stopped_at: Option<String>,
    /// Last time the assistant reported it was waiting on the user.
    pub last_wait_user_at: Option<String>,
}

impl PromptRecord {
    /// A record is open until its completion time is set.
    pub fn is_open(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn project_name(&self) -> String {
        crate::project_name(&self.cwd)
    }
}
