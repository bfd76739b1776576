use actplay::config::{load_settings, ConfigError, Settings, UrlRewriter, DEFAULT_REQUEST_TIMEOUT_SECONDS};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn settings_module_loads_yaml_and_merges_port_paths() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.yaml");
    fs::write(
        &path,
        r#"
base_url: https://play.example.org
port_paths:
  8070: /custom/epsilon
session:
  activity: lab-1
"#,
    )
    .expect("write settings");

    let settings = load_settings(&path).expect("settings");
    assert_eq!(settings.request_timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECONDS);
    assert_eq!(settings.request_timeout(), Duration::from_secs(30));

    let ports = settings.effective_port_paths();
    assert_eq!(ports.get(&8070).map(String::as_str), Some("/custom/epsilon"));
    assert_eq!(ports.get(&8074).map(String::as_str), Some("/tools/emfatic/services"));

    let rewriter = UrlRewriter::from_settings(&settings);
    assert_eq!(
        rewriter
            .rewrite("{{BASE-URL}}:8070/{{ID-activity}}.json")
            .expect("rewrite"),
        "https://play.example.org/custom/epsilon/lab-1.json"
    );
}

#[test]
fn settings_module_rejects_invalid_values() {
    let mut settings = Settings::new("ftp://play.example.org");
    assert!(matches!(settings.validate(), Err(ConfigError::Settings(_))));

    settings.base_url = "http://play.example.org".to_string();
    settings.request_timeout_seconds = 0;
    assert!(matches!(settings.validate(), Err(ConfigError::Settings(_))));

    settings.request_timeout_seconds = 5;
    settings.port_paths.insert(9000, "no-slash".to_string());
    let err = settings.validate().expect_err("port path without slash");
    assert!(err.to_string().contains("9000"));
}

#[test]
fn settings_module_reports_unreadable_file() {
    let dir = tempdir().expect("tempdir");
    let err = load_settings(&dir.path().join("missing.yaml")).expect_err("missing");
    assert!(matches!(err, ConfigError::Read { .. }));
}
