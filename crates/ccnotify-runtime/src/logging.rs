//! Per-invocation log sink.
//!
//! Each hook call is a short-lived process, so the subscriber is scoped to
//! the call instead of being installed globally. Output goes to a daily
//! rotated file in the data directory; the assistant never sees it.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::{Error, Result};

const LOG_FILE_PREFIX: &str = "ccnotify";
const LOG_FILE_SUFFIX: &str = "log";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    /// Daily rotated `ccnotify.<date>.log` files under `dir`, keeping at most
    /// `max_files` of them.
    pub fn rolling(dir: &Path, level: &str, max_files: usize) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(max_files.max(1))
            .build(dir)
            .map_err(|err| Error::Io(io::Error::other(err)))?;

        Ok(Self::with_writer(appender, level))
    }

    /// RUST_LOG wins over `level` when set.
    pub fn with_writer<W>(make_writer: W, level: &str) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        Self::build(make_writer, filter)
    }

    /// In-memory sink for tests. Ignores RUST_LOG.
    pub fn capture(level: &str) -> (Self, CapturedLogs) {
        let logs = CapturedLogs::default();
        let buffer = logs.clone();
        let context = Self::build(move || buffer.clone(), EnvFilter::new(level));
        (context, logs)
    }

    fn build<W>(make_writer: W, filter: EnvFilter) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Run `f` with this context as the thread's default subscriber.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

/// Shared buffer filled by a [`LogContext::capture`] subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
