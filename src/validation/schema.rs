use super::{FileType, ValidationIssue};
use serde_json::Value;

const ACTIVITY_SCHEMA: &str = include_str!("schemas/activity.schema.json");
const TOOL_SCHEMA: &str = include_str!("schemas/tool.schema.json");

/// Structural check of a raw activity document. Independent of every other document.
pub fn validate_activity_document(document: &Value) -> Vec<ValidationIssue> {
    validate_against(ACTIVITY_SCHEMA, document, FileType::Activity)
}

/// Structural check of a raw tool document.
pub fn validate_tool_document(document: &Value) -> Vec<ValidationIssue> {
    validate_against(TOOL_SCHEMA, document, FileType::Tool)
}

fn validate_against(schema_source: &str, document: &Value, file_type: FileType) -> Vec<ValidationIssue> {
    let schema: Value = match serde_json::from_str(schema_source) {
        Ok(schema) => schema,
        Err(err) => {
            return vec![ValidationIssue::schema(
                "schema",
                format!("embedded {file_type} schema is not valid json: {err}"),
                "/".to_string(),
                file_type,
            )]
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(validator) => validator,
        Err(err) => {
            return vec![ValidationIssue::schema(
                "schema",
                format!("embedded {file_type} schema failed to compile: {err}"),
                "/".to_string(),
                file_type,
            )]
        }
    };

    validator
        .iter_errors(document)
        .map(|error| {
            let schema_path = error.schema_path.to_string();
            let keyword = schema_keyword(&schema_path);
            let instance_path = error.instance_path.to_string();
            let location = if instance_path.is_empty() {
                "/".to_string()
            } else {
                instance_path
            };
            ValidationIssue::schema(keyword, error.to_string(), location, file_type)
        })
        .collect()
}

fn schema_keyword(schema_path: &str) -> &str {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && segment.parse::<usize>().is_err())
        .unwrap_or("schema")
}
