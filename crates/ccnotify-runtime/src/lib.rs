pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod notifier;
pub mod service;

pub use config::{Config, LogConfig, NotifierConfig, resolve_data_dir};
pub use error::{Error, Result};
pub use logging::{CapturedLogs, LogContext};
pub use notifier::{CommandNotifier, DisabledNotifier, Notifier, NotifyError, from_config};
pub use service::{HookService, Outcome, parse_event};

/// Ledger file name inside the data directory.
pub const DB_FILE_NAME: &str = "ccnotify.db";

/// Config file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
