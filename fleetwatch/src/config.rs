//! YAML configuration (`./config` by default) and per-host command templates.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

use crate::snapshot::SnapshotScope;
use crate::types::DEFAULT_USAGE_THRESHOLD;

pub const CONFIG_ENV: &str = "FLEETWATCH_CONFIG";
pub const DEFAULT_PORT: u16 = 8002;
const DEFAULT_POLL_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CANDIDATES: [&str; 3] = ["config", "config.yaml", "config.yml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (tried {0:?})")]
    NotFound(Vec<PathBuf>),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

// Keys keep the operator-facing spelling; lowercase aliases accept files written
// for case-insensitive loaders.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "telegramBotToken", alias = "telegrambottoken")]
    pub telegram_bot_token: String,
    #[serde(rename = "telegramChatID", alias = "telegramchatid")]
    pub telegram_chat_id: i64,
    #[serde(rename = "IPs", alias = "ips")]
    pub hosts: Vec<String>,
    #[serde(rename = "SSHCommands", alias = "sshcommands")]
    pub health_command: String,
    #[serde(rename = "SSHErrorLogCommand", alias = "ssherrorlogcommand")]
    pub error_log_command: String,
    #[serde(rename = "SSHValidatorLogCommand", alias = "sshvalidatorlogcommand")]
    pub validator_log_command: String,

    #[serde(rename = "pollIntervalSecs")]
    pub poll_interval_secs: u64,
    #[serde(rename = "commandTimeoutSecs")]
    pub command_timeout_secs: u64,
    #[serde(rename = "listenPort")]
    pub listen_port: u16,
    #[serde(rename = "usageThreshold")]
    pub usage_threshold: f64,
    #[serde(rename = "snapshotScope")]
    pub snapshot_scope: SnapshotScope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_chat_id: 0,
            hosts: Vec::new(),
            health_command: String::new(),
            error_log_command: String::new(),
            validator_log_command: String::new(),
            poll_interval_secs: DEFAULT_POLL_SECS,
            command_timeout_secs: DEFAULT_TIMEOUT_SECS,
            listen_port: DEFAULT_PORT,
            usage_threshold: DEFAULT_USAGE_THRESHOLD,
            snapshot_scope: SnapshotScope::Global,
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn health_command_for(&self, host: &str) -> String {
        expand_template(&self.health_command, host)
    }

    pub fn error_log_command_for(&self, host: &str) -> String {
        expand_template(&self.error_log_command, host)
    }

    pub fn validator_log_command_for(&self, host: &str) -> String {
        expand_template(&self.validator_log_command, host)
    }
}

/// Explicit path first, then `$FLEETWATCH_CONFIG`, then `./config{,.yaml,.yml}`.
pub fn locate_config(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let tried: Vec<PathBuf> = CANDIDATES.iter().map(PathBuf::from).collect();
    if let Some(found) = tried.iter().find(|p| p.is_file()) {
        return Ok(found.clone());
    }
    Err(ConfigError::NotFound(tried))
}

pub async fn load_config(explicit: Option<&Path>) -> Result<(PathBuf, Config), ConfigError> {
    let path = locate_config(explicit)?;
    let text = fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let cfg = Config::from_yaml_str(&text, &path)?;
    Ok((path, cfg))
}

/// printf-style expansion for the single `%s` verb: the first `%s` becomes
/// `host`, `%%` becomes `%`, anything else passes through.
pub fn expand_template(template: &str, host: &str) -> String {
    let mut out = String::with_capacity(template.len() + host.len());
    let mut substituted = false;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') if !substituted => {
                chars.next();
                out.push_str(host);
                substituted = true;
            }
            _ => out.push('%'),
        }
    }
    out
}
