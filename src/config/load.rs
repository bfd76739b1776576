use super::{ConfigError, DocumentFormat, Settings};
use crate::activity::files::FileSource;
use serde_json::Value;
use std::path::Path;

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings = Settings::from_path(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Fetches an activity document through the file collaborator and parses it
/// into an untyped value ready for schema validation.
pub fn read_activity_document(source: &dyn FileSource, name: &str) -> Result<Value, ConfigError> {
    let handle = source
        .fetch_file(name)
        .ok_or_else(|| ConfigError::MissingActivityFile {
            name: name.to_string(),
        })?;
    DocumentFormat::from_file_name(name).parse_value(&handle.content, name)
}
