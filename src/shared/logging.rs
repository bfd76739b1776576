use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn player_log_path(log_root: &Path) -> PathBuf {
    log_root.join("logs/player.log")
}

pub fn append_player_log_line(log_root: &Path, line: &str) -> std::io::Result<()> {
    let path = player_log_path(log_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Best-effort JSON-lines event log. A logger without a root discards events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    root: Option<PathBuf>,
}

impl EventLog {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn disabled() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn info(&self, event: &str, message: &str, fields: &[(&str, &str)]) {
        self.append(LogLevel::Info, event, message, fields);
    }

    pub fn warn(&self, event: &str, message: &str, fields: &[(&str, &str)]) {
        self.append(LogLevel::Warn, event, message, fields);
    }

    pub fn error(&self, event: &str, message: &str, fields: &[(&str, &str)]) {
        self.append(LogLevel::Error, event, message, fields);
    }

    pub fn append(&self, level: LogLevel, event: &str, message: &str, fields: &[(&str, &str)]) {
        let Some(root) = self.root.as_deref() else {
            return;
        };
        let mut payload = Map::new();
        payload.insert(
            "timestamp".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        payload.insert("level".to_string(), Value::String(level.as_str().to_string()));
        payload.insert("event".to_string(), Value::String(event.to_string()));
        payload.insert("message".to_string(), Value::String(message.to_string()));
        for (key, value) in fields {
            payload.insert((*key).to_string(), Value::String((*value).to_string()));
        }

        let Ok(line) = serde_json::to_string(&Value::Object(payload)) else {
            return;
        };
        let _ = append_player_log_line(root, &line);
    }
}
