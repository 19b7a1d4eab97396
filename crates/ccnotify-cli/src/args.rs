use crate::types::LogLevel;
use clap::Parser;

#[derive(Parser)]
#[command(name = "ccnotify")]
#[command(about = "Track assistant tasks from hook events and send desktop notifications", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Hook event to handle (UserPromptSubmit, Stop or Notification).
    /// The JSON payload is read from stdin.
    pub event: Option<String>,

    /// Data directory for the ledger, config and logs
    /// [default: $CCNOTIFY_HOME, else the platform data directory]
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Overrides `[log] level` from config.toml
    #[arg(long)]
    pub log_level: Option<LogLevel>,
}
