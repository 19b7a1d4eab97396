use super::args::Cli;
use anyhow::{Result, bail};
use ccnotify_index::Database;
use ccnotify_runtime::input::read_input;
use ccnotify_runtime::{
    Config, DB_FILE_NAME, HookService, LogContext, Outcome, from_config, parse_event,
    resolve_data_dir,
};
use ccnotify_types::EventKind;
use std::io::Read;
use std::path::Path;

pub fn run(cli: Cli, stdin: impl Read) -> Result<()> {
    // Bare invocation is a health check.
    let Some(event) = cli.event else {
        println!("ok");
        return Ok(());
    };

    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config = Config::load(&data_dir)?;
    let level = cli
        .log_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| config.log.level.clone());

    let logs = LogContext::rolling(&data_dir, &level, config.log.max_files)?;
    logs.scope(|| dispatch(&event, &data_dir, &config, stdin))
}

fn dispatch(event: &str, data_dir: &Path, config: &Config, stdin: impl Read) -> Result<()> {
    let kind: EventKind = match event.parse() {
        Ok(kind) => kind,
        Err(_) => {
            tracing::error!("Invalid hook type: {}", event);
            tracing::error!("Valid hook types: {}", EventKind::valid_names());
            bail!("Invalid hook type: {}", event);
        }
    };

    let Some(input) = read_input(stdin)? else {
        tracing::warn!("No input data received");
        return Ok(());
    };

    match handle(kind, &input, data_dir, config) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "{} handled", kind);
            Ok(())
        }
        Err(err) => {
            if err.is_storage_unavailable() {
                tracing::error!("Dropping {} event: {}", kind, err);
            } else {
                tracing::error!("{}", err);
            }
            Err(err.into())
        }
    }
}

fn handle(
    kind: EventKind,
    input: &str,
    data_dir: &Path,
    config: &Config,
) -> ccnotify_runtime::Result<Outcome> {
    // Validate before touching storage: a rejected payload leaves no trace.
    let event = parse_event(kind.as_str(), input)?;

    let db = Database::open(&data_dir.join(DB_FILE_NAME))?;
    let notifier = from_config(&config.notifier, data_dir);
    let mut service = HookService::new(db, notifier);

    service.handle(event)
}
