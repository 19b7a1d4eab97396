use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag passed to the platform notifier so it can pick an icon or sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    TaskComplete,
    Permission,
    WaitingInput,
    Notification,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::TaskComplete => "TaskComplete",
            NotificationType::Permission => "Permission",
            NotificationType::WaitingInput => "WaitingInput",
            NotificationType::Notification => "Notification",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outbound notification content handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub subtitle: String,
    /// Originating working directory (empty when unknown).
    pub cwd: String,
    pub kind: NotificationType,
}
