use ccnotify_engine::{Category, decide, stop_notification, validate};
use ccnotify_index::Database;
use ccnotify_types::{
    HookEvent, Notification, NotificationPayload, PromptRecord, StopPayload,
    UserPromptSubmitPayload,
};
use serde_json::Value;

use crate::{Notifier, Result};

/// Decode and validate one hook payload for the event named `kind`.
///
/// Nothing is written to the ledger here; a payload that fails any check
/// never reaches [`HookService::handle`].
pub fn parse_event(kind: &str, input: &str) -> Result<HookEvent> {
    let payload: Value = serde_json::from_str(input)?;
    let kind = validate(kind, &payload)?;
    Ok(HookEvent::from_value(kind, payload)?)
}

/// What a handled event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new task was appended to the ledger.
    Recorded(PromptRecord),
    /// The session's latest open task was closed and announced.
    Completed {
        record: PromptRecord,
        duration: String,
        notification: Notification,
        delivered: bool,
    },
    /// Stop arrived for a session without an open task.
    NothingOpen,
    /// Notification withheld; `record` is the entry stamped as waiting, if any.
    Suppressed {
        category: Category,
        record: Option<PromptRecord>,
    },
    Notified {
        category: Category,
        notification: Notification,
        delivered: bool,
    },
}

/// Routes validated hook events to the ledger and the notifier.
pub struct HookService<N> {
    db: Database,
    notifier: N,
}

impl<N: Notifier> HookService<N> {
    pub fn new(db: Database, notifier: N) -> Self {
        Self { db, notifier }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Apply one event. Ledger errors are returned; notifier failures are
    /// logged and reported through `delivered` only.
    pub fn handle(&mut self, event: HookEvent) -> Result<Outcome> {
        match event {
            HookEvent::UserPromptSubmit(payload) => self.on_submit(payload),
            HookEvent::Stop(payload) => self.on_stop(payload),
            HookEvent::Notification(payload) => self.on_notification(payload),
        }
    }

    fn on_submit(&mut self, payload: UserPromptSubmitPayload) -> Result<Outcome> {
        let record =
            self.db
                .record_submission(&payload.session_id, &payload.prompt, &payload.cwd)?;

        tracing::info!("Recorded prompt for session {}", payload.session_id);
        Ok(Outcome::Recorded(record))
    }

    fn on_stop(&mut self, payload: StopPayload) -> Result<Outcome> {
        let Some(record) = self.db.complete_latest_open(&payload.session_id)? else {
            tracing::debug!("No open task for session {}", payload.session_id);
            return Ok(Outcome::NothingOpen);
        };

        let duration = Database::duration(&record);
        let notification = stop_notification(&record, &duration);
        let delivered = self.deliver(&payload.session_id, &notification);

        tracing::info!(
            "Task completed for session {}, job#{}, duration: {}",
            payload.session_id,
            record.seq,
            duration
        );

        Ok(Outcome::Completed {
            record,
            duration,
            notification,
            delivered,
        })
    }

    fn on_notification(&mut self, payload: NotificationPayload) -> Result<Outcome> {
        let session_id = payload.session_id.as_str();
        tracing::info!(
            "[NOTIFICATION] session={}, message='{}'",
            session_id,
            payload.message
        );

        let decision = decide(&payload.message, payload.cwd.as_deref());
        let category = decision.category;

        let marked = if decision.mark_waiting {
            let record = self.db.mark_waiting(session_id)?;
            match &record {
                Some(_) => tracing::info!("Updated lastWaitUserAt for session {}", session_id),
                None => tracing::debug!("No task to mark as waiting for session {}", session_id),
            }
            record
        } else {
            None
        };

        let Some(notification) = decision.notification else {
            tracing::info!(
                "Notification suppressed for session {}: {}",
                session_id,
                category.subtitle()
            );
            return Ok(Outcome::Suppressed {
                category,
                record: marked,
            });
        };

        let delivered = self.deliver(session_id, &notification);
        if delivered {
            tracing::info!(
                "Notification sent for session {}: {}",
                session_id,
                category.subtitle()
            );
        }

        Ok(Outcome::Notified {
            category,
            notification,
            delivered,
        })
    }

    fn deliver(&self, session_id: &str, notification: &Notification) -> bool {
        match self.notifier.send(notification) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    "Error sending notification for session {}: {}",
                    session_id,
                    err
                );
                false
            }
        }
    }
}
