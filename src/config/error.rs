#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid json in {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
    #[error("activity file `{name}` could not be fetched")]
    MissingActivityFile { name: String },
    #[error("activity `{activity_id}` is not declared in the activity document")]
    UnknownActivity { activity_id: String },
    #[error("activity document declares no activities")]
    NoActivities,
    #[error("unknown placeholder `{placeholder}` in `{raw}`")]
    UnknownPlaceholder { placeholder: String, raw: String },
}
