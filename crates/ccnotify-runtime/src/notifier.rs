use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ccnotify_types::Notification;
use chrono::Local;
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::NotifierConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const MESSAGE_TIME_FORMAT: &str = "%Y年%m月%d日 %H:%M";

#[derive(Debug)]
pub enum NotifyError {
    /// The notifier program could not be started
    Spawn(io::Error),
    /// Killed after running longer than the configured limit
    Timeout(Duration),
    /// Exited unsuccessfully
    Failed { status: ExitStatus, stderr: String },
    Io(io::Error),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Spawn(err) => write!(f, "Failed to start notifier: {}", err),
            NotifyError::Timeout(limit) => {
                write!(f, "Notifier timed out after {}ms", limit.as_millis())
            }
            NotifyError::Failed { status, stderr } => {
                if stderr.trim().is_empty() {
                    write!(f, "Notifier exited with {}", status)
                } else {
                    write!(f, "Notifier exited with {}: {}", status, stderr.trim())
                }
            }
            NotifyError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Spawn(err) | NotifyError::Io(err) => Some(err),
            NotifyError::Timeout(_) | NotifyError::Failed { .. } => None,
        }
    }
}

impl From<io::Error> for NotifyError {
    fn from(err: io::Error) -> Self {
        NotifyError::Io(err)
    }
}

/// Delivers a notification to the user. Failures are reported, never retried.
pub trait Notifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).send(notification)
    }
}

/// Build the notifier described by the config.
pub fn from_config(config: &NotifierConfig, data_dir: &Path) -> Box<dyn Notifier> {
    if !config.enabled {
        return Box::new(DisabledNotifier);
    }

    Box::new(
        CommandNotifier::new(&config.program, config.resolved_args(data_dir))
            .with_timeout(config.timeout()),
    )
}

/// Used when notifications are switched off; always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::debug!(title = %notification.title, "notifier disabled, skipping");
        Ok(())
    }
}

/// Runs an external program once per notification.
///
/// The program receives its configured arguments followed by
/// `-TitleB64 <b64> -MessageB64 <b64> -Cwd <cwd> -NotificationType <tag>`.
/// Title and message are base64 encoded UTF-8 so non-ASCII text survives
/// any console code page.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full argument list for one notification, with the message body
    /// stamped with the current local time.
    pub fn command_args(&self, notification: &Notification) -> Vec<String> {
        let message = format!(
            "{}\n{}",
            notification.subtitle,
            Local::now().format(MESSAGE_TIME_FORMAT)
        );

        let mut args = self.args.clone();
        args.extend([
            "-TitleB64".to_string(),
            STANDARD.encode(notification.title.as_bytes()),
            "-MessageB64".to_string(),
            STANDARD.encode(message.as_bytes()),
            "-Cwd".to_string(),
            notification.cwd.clone(),
            "-NotificationType".to_string(),
            notification.kind.as_str().to_string(),
        ]);
        args
    }

    fn wait(
        &self,
        child: &mut Child,
        start: Instant,
    ) -> Result<Option<ExitStatus>, NotifyError> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if start.elapsed() >= self.timeout {
                return Ok(None);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Notifier for CommandNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .args(self.command_args(notification))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(NotifyError::Spawn)?;

        let stderr_reader = spawn_stderr_reader(&mut child);

        let Some(status) = self.wait(&mut child, start)? else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(NotifyError::Timeout(self.timeout));
        };

        if status.success() {
            tracing::info!(
                "Notification sent: {} - {}",
                notification.title,
                notification.subtitle
            );
            return Ok(());
        }

        // A grandchild can keep the pipe open after the notifier exits; stderr
        // is only collected within what is left of the timeout.
        let remaining = self.timeout.saturating_sub(start.elapsed());
        let stderr = stderr_reader
            .and_then(|rx| rx.recv_timeout(remaining.max(POLL_INTERVAL)).ok())
            .unwrap_or_default();
        Err(NotifyError::Failed { status, stderr })
    }
}

// Drained on a separate thread so a chatty notifier cannot block on a full pipe.
fn spawn_stderr_reader(child: &mut Child) -> Option<Receiver<String>> {
    let mut stderr = child.stderr.take()?;
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = String::new();
        let _ = stderr.read_to_string(&mut buf);
        let _ = tx.send(buf);
    });
    Some(rx)
}
