use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub fn default_port_paths() -> BTreeMap<u16, String> {
    BTreeMap::from([
        (8070, "/tools/epsilon/services".to_string()),
        (8071, "/tools/emf/services".to_string()),
        (8072, "/tools/ocl/services".to_string()),
        (8073, "/tools/conversion/services".to_string()),
        (8074, "/tools/emfatic/services".to_string()),
        (8075, "/tools/eugenia/services".to_string()),
        (8080, "/".to_string()),
        (9000, "/tools/xtext/services/xtext".to_string()),
    ])
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub base_url: String,
    /// Merged over the built-in port table; entries here win.
    #[serde(default)]
    pub port_paths: BTreeMap<u16, String>,
    /// Session-scoped values substituted for `{{ID-<key>}}` placeholders.
    #[serde(default)]
    pub session: BTreeMap<String, String>,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub log_root: Option<PathBuf>,
}

impl Settings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            port_paths: BTreeMap::new(),
            session: BTreeMap::new(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            log_root: None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Settings(
                "`base_url` must be non-empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Settings(format!(
                "`base_url` `{base_url}` must start with http:// or https://"
            )));
        }
        for (port, path) in &self.port_paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Settings(format!(
                    "port path for `{port}` must start with `/`, got `{path}`"
                )));
            }
        }
        for key in self.session.keys() {
            if key.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`session` keys must be non-empty".to_string(),
                ));
            }
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Settings(
                "`request_timeout_seconds` must be >= 1".to_string(),
            ));
        }
        if let Some(log_root) = &self.log_root {
            if !log_root.is_absolute() {
                return Err(ConfigError::Settings(
                    "`log_root` must be an absolute path".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn effective_port_paths(&self) -> BTreeMap<u16, String> {
        let mut table = default_port_paths();
        table.extend(
            self.port_paths
                .iter()
                .map(|(port, path)| (*port, path.clone())),
        );
        table
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_parse_applies_defaults() {
        let settings: Settings = serde_yaml::from_str(
            r#"
base_url: https://play.example.org
"#,
        )
        .expect("parse settings");
        assert_eq!(settings.request_timeout_seconds, 30);
        assert!(settings.session.is_empty());
        settings.validate().expect("valid settings");
    }

    #[test]
    fn settings_port_override_wins_over_builtin_table() {
        let settings: Settings = serde_yaml::from_str(
            r#"
base_url: https://play.example.org
port_paths:
  8070: /custom/epsilon
"#,
        )
        .expect("parse settings");
        let table = settings.effective_port_paths();
        assert_eq!(table.get(&8070).map(String::as_str), Some("/custom/epsilon"));
        assert_eq!(
            table.get(&9000).map(String::as_str),
            Some("/tools/xtext/services/xtext")
        );
    }

    #[test]
    fn settings_validation_rejects_relative_port_path() {
        let settings: Settings = serde_yaml::from_str(
            r#"
base_url: https://play.example.org
port_paths:
  8070: tools/epsilon
"#,
        )
        .expect("parse settings");
        let err = settings.validate().expect_err("validation should fail");
        match err {
            ConfigError::Settings(message) => assert!(message.contains("must start with `/`")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn settings_validation_rejects_non_http_base_url() {
        let settings = Settings::new("ftp://play.example.org");
        assert!(settings.validate().is_err());
    }
}
