use ccnotify_types::EventKind;
use serde_json::Value;
use std::fmt;

/// Reason a hook payload was rejected before any state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Event kind is not one of the supported hook events.
    UnsupportedKind(String),
    /// `hook_event_name` in the payload disagrees with the invoked kind.
    KindMismatch {
        expected: EventKind,
        actual: Option<String>,
    },
    /// Required fields are absent or null.
    MissingFields {
        kind: EventKind,
        fields: Vec<String>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnsupportedKind(kind) => {
                write!(f, "Unknown event type: {}", kind)
            }
            ValidationError::KindMismatch { expected, actual } => write!(
                f,
                "Event name mismatch: expected {}, got {}",
                expected,
                actual.as_deref().unwrap_or("nothing")
            ),
            ValidationError::MissingFields { kind, fields } => write!(
                f,
                "Missing required fields for {}: [{}]",
                kind,
                fields.join(", ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Fields every payload of `kind` must carry with a non-null value.
pub fn required_fields(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::UserPromptSubmit => &["session_id", "prompt", "cwd", "hook_event_name"],
        EventKind::Stop => &["session_id", "hook_event_name"],
        EventKind::Notification => &["session_id", "message", "hook_event_name"],
    }
}

/// Check `payload` against the field contract of the event named `kind`.
///
/// Checks run in order: known kind, then `hook_event_name` agreement, then
/// required fields. Returns the parsed kind on success.
pub fn validate(kind: &str, payload: &Value) -> Result<EventKind, ValidationError> {
    let expected: EventKind = kind
        .parse()
        .map_err(|_| ValidationError::UnsupportedKind(kind.to_string()))?;

    let actual = payload.get("hook_event_name");
    if actual.and_then(Value::as_str) != Some(expected.as_str()) {
        return Err(ValidationError::KindMismatch {
            expected,
            actual: actual.filter(|v| !v.is_null()).map(describe_value),
        });
    }

    let missing: Vec<String> = required_fields(expected)
        .iter()
        .filter(|field| payload.get(**field).is_none_or(Value::is_null))
        .map(|field| field.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields {
            kind: expected,
            fields: missing,
        });
    }

    Ok(expected)
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
