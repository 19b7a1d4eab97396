use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Lifecycle signal delivered by the assistant's hook mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A user submitted a new task.
    UserPromptSubmit,
    /// The assistant finished responding to the current task.
    Stop,
    /// Informational message (waiting for input, permission prompts, ...).
    Notification,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::UserPromptSubmit,
        EventKind::Stop,
        EventKind::Notification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserPromptSubmit => "UserPromptSubmit",
            EventKind::Stop => "Stop",
            EventKind::Notification => "Notification",
        }
    }

    /// Comma separated list of accepted names, for diagnostics.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnsupportedKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserPromptSubmitPayload {
    pub session_id: String,
    pub prompt: String,
    pub cwd: String,
    pub hook_event_name: String,
    #[serde(default)]
    pub transcript_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopPayload {
    pub session_id: String,
    pub hook_event_name: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub stop_hook_active: Option<bool>,
    #[serde(default)]
    pub transcript_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotificationPayload {
    pub session_id: String,
    pub message: String,
    pub hook_event_name: String,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
}

/// Typed hook event, decoded after the payload passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    UserPromptSubmit(UserPromptSubmitPayload),
    Stop(StopPayload),
    Notification(NotificationPayload),
}

impl HookEvent {
    /// Decode a JSON payload as the given kind.
    ///
    /// Unknown fields are ignored; a required field with the wrong JSON type
    /// is reported as a decode error.
    pub fn from_value(kind: EventKind, value: Value) -> Result<Self> {
        let event = match kind {
            EventKind::UserPromptSubmit => {
                HookEvent::UserPromptSubmit(serde_json::from_value(value)?)
            }
            EventKind::Stop => HookEvent::Stop(serde_json::from_value(value)?),
            EventKind::Notification => HookEvent::Notification(serde_json::from_value(value)?),
        };
        Ok(event)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            HookEvent::UserPromptSubmit(_) => EventKind::UserPromptSubmit,
            HookEvent::Stop(_) => EventKind::Stop,
            HookEvent::Notification(_) => EventKind::Notification,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            HookEvent::UserPromptSubmit(p) => &p.session_id,
            HookEvent::Stop(p) => &p.session_id,
            HookEvent::Notification(p) => &p.session_id,
        }
    }
}
