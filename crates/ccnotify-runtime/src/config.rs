use crate::{CONFIG_FILE_NAME, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the data directory (ledger, log, config, notifier script):
/// 1. Explicit path (with tilde expansion)
/// 2. CCNOTIFY_HOME environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.ccnotify (fallback for systems without XDG)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("CCNOTIFY_HOME")
        && !env_path.is_empty()
    {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("ccnotify"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".ccnotify"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

fn default_enabled() -> bool {
    true
}

fn default_program() -> String {
    "powershell".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_level() -> String {
    "info".to_string()
}

fn default_max_files() -> usize {
    2
}

/// External command that shows the desktop notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_program")]
    pub program: String,
    /// Leading arguments; the title/message/cwd/type flags are appended.
    /// When unset, runs `notify.ps1` from the data directory.
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            program: default_program(),
            args: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NotifierConfig {
    pub fn resolved_args(&self, data_dir: &Path) -> Vec<String> {
        match &self.args {
            Some(args) => args.clone(),
            None => vec![
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-NoProfile".to_string(),
                "-File".to_string(),
                data_dir.join("notify.ps1").to_string_lossy().to_string(),
            ],
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `--log-level` and RUST_LOG take precedence.
    #[serde(default = "default_level")]
    pub level: String,
    /// Rotated daily log files to keep, including today's.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            max_files: default_max_files(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load `config.toml` from the data directory, or defaults if absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_from(&data_dir.join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
