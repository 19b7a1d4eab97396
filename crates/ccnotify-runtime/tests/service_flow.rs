use std::cell::RefCell;

use ccnotify_engine::Category;
use ccnotify_index::Database;
use ccnotify_runtime::{HookService, LogContext, Notifier, NotifyError, Outcome, parse_event};
use ccnotify_types::{Notification, NotificationType};

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "powershell not found",
        )))
    }
}

fn service<N: Notifier>(notifier: N) -> HookService<N> {
    HookService::new(Database::open_in_memory().unwrap(), notifier)
}

fn submit<N: Notifier>(service: &mut HookService<N>, session: &str, prompt: &str) -> Outcome {
    let input = format!(
        r#"{{"session_id":"{session}","prompt":"{prompt}","cwd":"/home/dev/webapp","hook_event_name":"UserPromptSubmit"}}"#
    );
    service
        .handle(parse_event("UserPromptSubmit", &input).unwrap())
        .unwrap()
}

fn stop<N: Notifier>(service: &mut HookService<N>, session: &str) -> Outcome {
    let input = format!(r#"{{"session_id":"{session}","hook_event_name":"Stop"}}"#);
    service.handle(parse_event("Stop", &input).unwrap()).unwrap()
}

fn notify<N: Notifier>(service: &mut HookService<N>, session: &str, message: &str) -> Outcome {
    let input = format!(
        r#"{{"session_id":"{session}","message":"{message}","cwd":"/srv/api","hook_event_name":"Notification"}}"#
    );
    service
        .handle(parse_event("Notification", &input).unwrap())
        .unwrap()
}

#[test]
fn test_submit_then_stop_announces_job() {
    let mut service = service(RecordingNotifier::default());

    let Outcome::Recorded(first) = submit(&mut service, "s1", "add tests") else {
        panic!("expected a recorded prompt");
    };
    assert_eq!(first.seq, 1);
    assert!(first.is_open());

    let Outcome::Completed {
        record,
        duration,
        notification,
        delivered,
    } = stop(&mut service, "s1")
    else {
        panic!("expected completion");
    };

    assert!(delivered);
    assert_eq!(record.id, first.id);
    assert_eq!(record.seq, 1);
    assert!(record.stopped_at.as_deref() >= Some(record.created_at.as_str()));
    assert_eq!(notification.title, format!("job#1 done, duration: {}", duration));
    assert_eq!(notification.subtitle, "webapp");
    assert_eq!(notification.kind, NotificationType::TaskComplete);
    assert_eq!(service.notifier().sent.borrow().len(), 1);
}

#[test]
fn test_stop_without_open_task_is_silent() {
    let mut service = service(RecordingNotifier::default());

    assert_eq!(stop(&mut service, "s1"), Outcome::NothingOpen);

    submit(&mut service, "s1", "one");
    stop(&mut service, "s1");
    assert_eq!(stop(&mut service, "s1"), Outcome::NothingOpen);

    assert_eq!(service.notifier().sent.borrow().len(), 1);
}

#[test]
fn test_stop_completes_newest_open_task_first() {
    let mut service = service(RecordingNotifier::default());

    submit(&mut service, "s1", "first");
    submit(&mut service, "s1", "second");

    let Outcome::Completed { record, .. } = stop(&mut service, "s1") else {
        panic!("expected completion");
    };
    assert_eq!(record.seq, 2);

    let records = service.database().session_records("s1").unwrap();
    assert!(records[0].is_open());
    assert!(!records[1].is_open());
}

#[test]
fn test_waiting_notification_is_suppressed_and_stamps_latest_record() {
    let mut service = service(RecordingNotifier::default());
    submit(&mut service, "s1", "build it");

    let outcome = notify(&mut service, "s1", "Claude is waiting for your input");

    let Outcome::Suppressed { category, record } = outcome else {
        panic!("expected suppression");
    };
    assert_eq!(category, Category::WaitingInput);
    let record = record.expect("latest record is stamped");
    assert!(record.last_wait_user_at.is_some());
    assert!(service.notifier().sent.borrow().is_empty());
}

#[test]
fn test_waiting_notification_without_records() {
    let mut service = service(RecordingNotifier::default());

    let outcome = notify(&mut service, "fresh", "Waiting for input");

    assert_eq!(
        outcome,
        Outcome::Suppressed {
            category: Category::WaitingInput,
            record: None
        }
    );
}

#[test]
fn test_permission_notification_is_delivered() {
    let mut service = service(RecordingNotifier::default());

    let Outcome::Notified {
        category,
        notification,
        delivered,
    } = notify(&mut service, "s1", "Permission to run bash?")
    else {
        panic!("expected a notification");
    };

    assert!(delivered);
    assert_eq!(category, Category::Permission);
    assert_eq!(notification.title, "Permission Required");
    assert_eq!(notification.subtitle, "api");
    assert_eq!(notification.cwd, "/srv/api");
    assert_eq!(notification.kind, NotificationType::Permission);
}

#[test]
fn test_notifier_failure_does_not_fail_the_event() {
    let (logs_ctx, logs) = LogContext::capture("info");
    let mut service = service(FailingNotifier);

    let outcome = logs_ctx.scope(|| {
        submit(&mut service, "s1", "deploy");
        stop(&mut service, "s1")
    });

    let Outcome::Completed { delivered, .. } = outcome else {
        panic!("expected completion");
    };
    assert!(!delivered);
    assert!(!service.database().session_records("s1").unwrap()[0].is_open());
    assert!(logs.has_message("Error sending notification for session s1"));
    assert!(logs.has_message("Task completed for session s1, job#1, duration:"));
}

#[test]
fn test_logs_follow_event_flow() {
    let (logs_ctx, logs) = LogContext::capture("info");
    let mut service = service(RecordingNotifier::default());

    logs_ctx.scope(|| {
        submit(&mut service, "s9", "x");
        notify(&mut service, "s9", "waiting for input");
        notify(&mut service, "s9", "Please choose an option");
    });

    assert!(logs.has_message("Recorded prompt for session s9"));
    assert!(logs.has_message("[NOTIFICATION] session=s9, message='waiting for input'"));
    assert!(logs.has_message("Updated lastWaitUserAt for session s9"));
    assert!(logs.has_message("Notification suppressed for session s9: Waiting for input"));
    assert!(logs.has_message("Notification sent for session s9: Action Required"));
}

#[test]
fn test_sessions_are_independent() {
    let mut service = service(RecordingNotifier::default());

    submit(&mut service, "a", "1");
    submit(&mut service, "a", "2");
    let Outcome::Recorded(b) = submit(&mut service, "b", "1") else {
        panic!("expected a recorded prompt");
    };
    assert_eq!(b.seq, 1);

    let Outcome::Completed { record, .. } = stop(&mut service, "b") else {
        panic!("expected completion");
    };
    assert_eq!(record.session_id, "b");

    let a = service.database().session_records("a").unwrap();
    assert_eq!(a.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 2]);
    assert!(a.iter().all(|r| r.is_open()));
}
