mod common;
use ccnotify_runtime::NotifierConfig;
use common::{MISSING_NOTIFIER, TestFixture};
use predicates::prelude::*;

#[test]
fn test_no_event_prints_ok() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::eq("ok\n"));

    assert!(
        !fixture.data_dir().join("ccnotify.db").exists(),
        "health check must not create the ledger"
    );
}

#[test]
fn test_invalid_event_exits_non_zero_and_logs() {
    let fixture = TestFixture::new();

    fixture
        .hook("PreToolUse", "{}")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid hook type: PreToolUse"));

    let log = fixture.log_contents();
    assert!(log.contains("Invalid hook type: PreToolUse"));
    assert!(log.contains("Valid hook types: UserPromptSubmit, Stop, Notification"));
}

#[test]
fn test_submissions_get_consecutive_seq() {
    let fixture = TestFixture::new();

    fixture.submit("s1", "first").success();
    fixture.submit("s1", "second").success();
    fixture.submit("s2", "other").success();

    let db = fixture.db();
    let s1 = db.session_records("s1").unwrap();
    assert_eq!(s1.iter().map(|r| r.seq).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(s1[1].prompt, "second");
    assert_eq!(s1[1].cwd, "/home/dev/webapp");
    assert_eq!(db.session_records("s2").unwrap()[0].seq, 1);

    assert!(
        fixture
            .log_contents()
            .contains("Recorded prompt for session s1")
    );
}

#[test]
fn test_stop_succeeds_when_notifier_is_missing() {
    let fixture = TestFixture::bare();
    fixture.write_notifier(NotifierConfig {
        program: MISSING_NOTIFIER.to_string(),
        ..NotifierConfig::default()
    });

    fixture.submit("s1", "ship it").success();
    fixture.stop("s1").success();

    let records = fixture.db().session_records("s1").unwrap();
    assert!(records[0].stopped_at.is_some());

    let log = fixture.log_contents();
    assert!(log.contains("Error sending notification for session s1"));
    assert!(log.contains("Task completed for session s1, job#1, duration:"));
}

#[test]
fn test_stop_without_open_task_is_a_no_op() {
    let fixture = TestFixture::new();

    fixture.stop("nobody").success();
    assert!(fixture.db().session_records("nobody").unwrap().is_empty());
}

#[test]
fn test_kind_mismatch_is_rejected_without_mutation() {
    let fixture = TestFixture::new();

    fixture
        .hook(
            "UserPromptSubmit",
            r#"{"session_id":"s1","prompt":"x","cwd":"/tmp","hook_event_name":"Stop"}"#,
        )
        .failure()
        .code(1);

    assert!(fixture.db().session_records("s1").unwrap().is_empty());
    assert!(
        fixture
            .log_contents()
            .contains("Event name mismatch: expected UserPromptSubmit, got Stop")
    );
}

#[test]
fn test_missing_fields_are_listed() {
    let fixture = TestFixture::new();

    fixture
        .hook(
            "UserPromptSubmit",
            r#"{"session_id":"s1","hook_event_name":"UserPromptSubmit"}"#,
        )
        .failure()
        .stderr(predicate::str::contains(
            "Missing required fields for UserPromptSubmit: [prompt, cwd]",
        ));
}

#[test]
fn test_malformed_json_fails() {
    let fixture = TestFixture::new();

    fixture
        .hook("Stop", "{\"session_id\": ")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("JSON decode error"));
}

#[test]
fn test_empty_stdin_is_ignored() {
    let fixture = TestFixture::new();

    fixture.hook("Stop", "  \n").success();

    assert!(fixture.log_contents().contains("No input data received"));
    assert!(!fixture.data_dir().join("ccnotify.db").exists());
}

#[test]
fn test_waiting_notification_stamps_latest_record() {
    let fixture = TestFixture::new();

    fixture.submit("s1", "long task").success();
    fixture
        .hook(
            "Notification",
            r#"{"session_id":"s1","message":"Claude is waiting for your input","hook_event_name":"Notification"}"#,
        )
        .success();

    let records = fixture.db().session_records("s1").unwrap();
    assert!(records[0].last_wait_user_at.is_some());
    assert!(records[0].stopped_at.is_none());

    let log = fixture.log_contents();
    assert!(log.contains("Notification suppressed for session s1: Waiting for input"));
}

#[test]
fn test_log_level_flag_filters_info() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["--log-level", "warn", "UserPromptSubmit"])
        .write_stdin(
            r#"{"session_id":"s1","prompt":"p","cwd":"/tmp","hook_event_name":"UserPromptSubmit"}"#,
        )
        .assert()
        .success();

    assert!(!fixture.log_contents().contains("Recorded prompt"));
}

#[cfg(unix)]
#[test]
fn test_notifier_receives_encoded_arguments() {
    let fixture = TestFixture::bare();
    let out = fixture.data_dir().join("notify-args.txt");
    fixture.write_notifier(NotifierConfig {
        program: "sh".to_string(),
        args: Some(vec![
            "-c".to_string(),
            format!("printf '%s\\n' \"$@\" > '{}'", out.display()),
            "notify".to_string(),
        ]),
        ..NotifierConfig::default()
    });

    fixture.submit("s1", "build").success();
    fixture.stop("s1").success();

    let args = std::fs::read_to_string(&out).expect("notifier was not run");
    let lines: Vec<&str> = args.lines().collect();
    assert_eq!(lines[0], "-TitleB64");
    // base64 of "job#1 done, duration:"; the duration itself depends on timing
    assert!(lines[1].starts_with("am9iIzEgZG9uZSwgZHVyYXRpb246"));
    assert!(lines.contains(&"/home/dev/webapp"));
    assert_eq!(lines.last(), Some(&"TaskComplete"));
}

#[test]
fn test_unusable_ledger_drops_event() {
    let fixture = TestFixture::new();
    // A directory where the ledger file should be makes SQLite refuse to open it.
    std::fs::create_dir_all(fixture.data_dir().join("ccnotify.db")).unwrap();

    fixture
        .submit("s1", "lost")
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Storage unavailable"));

    assert!(
        fixture
            .log_contents()
            .contains("Dropping UserPromptSubmit event: Storage unavailable")
    );
}
