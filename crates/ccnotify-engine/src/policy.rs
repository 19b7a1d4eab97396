use ccnotify_types::{Notification, NotificationType, PromptRecord, project_name};
use std::fmt;

/// Category assigned to a Notification event message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The assistant is idle and waiting for the user.
    WaitingInput,
    /// A tool call needs explicit permission.
    Permission,
    /// The assistant asks the user to approve or pick an option.
    ActionRequired,
    Generic,
}

impl Category {
    /// Headline shown to the user for this category.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Category::WaitingInput => "Waiting for input",
            Category::Permission => "Permission Required",
            Category::ActionRequired => "Action Required",
            Category::Generic => "Notification",
        }
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            Category::WaitingInput => NotificationType::WaitingInput,
            Category::Permission => NotificationType::Permission,
            Category::ActionRequired | Category::Generic => NotificationType::Notification,
        }
    }

    /// Waiting alerts are dropped: the Stop event that follows announces
    /// completion anyway.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Category::WaitingInput)
    }

    /// Whether the session's latest record gets its wait time stamped.
    pub fn marks_waiting(&self) -> bool {
        matches!(self, Category::WaitingInput)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::WaitingInput => write!(f, "WaitingInput"),
            Category::Permission => write!(f, "Permission"),
            Category::ActionRequired => write!(f, "ActionRequired"),
            Category::Generic => write!(f, "Generic"),
        }
    }
}

// Ordered: first match wins.
const RULES: &[(&[&str], Category)] = &[
    (
        &["waiting for your input", "waiting for input"],
        Category::WaitingInput,
    ),
    (&["permission"], Category::Permission),
    (&["approval", "choose an option"], Category::ActionRequired),
];

/// Classify a free-text notification message, case-insensitively.
pub fn classify(message: &str) -> Category {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Generic)
}

/// What to do with one Notification event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub category: Category,
    /// Stamp `last_wait_user_at` on the session's latest record.
    pub mark_waiting: bool,
    /// Content to deliver; `None` when suppressed.
    pub notification: Option<Notification>,
}

impl PolicyDecision {
    pub fn is_suppressed(&self) -> bool {
        self.notification.is_none()
    }
}

/// Classify `message` and build the outbound notification, if any.
pub fn decide(message: &str, cwd: Option<&str>) -> PolicyDecision {
    let category = classify(message);
    let cwd = cwd.unwrap_or_default();

    let notification = (!category.is_suppressed()).then(|| Notification {
        title: category.subtitle().to_string(),
        subtitle: project_name(cwd),
        cwd: cwd.to_string(),
        kind: category.notification_type(),
    });

    PolicyDecision {
        category,
        mark_waiting: category.marks_waiting(),
        notification,
    }
}

/// Completion notice for a record closed by a Stop event.
pub fn stop_notification(record: &PromptRecord, duration: &str) -> Notification {
    Notification {
        title: format!("job#{} done, duration: {}", record.seq, duration),
        subtitle: record.project_name(),
        cwd: record.cwd.clone(),
        kind: NotificationType::TaskComplete,
    }
}
