use actplay::validation::{validate_activity_document, validate_tool_document, FileType, IssueCategory};
use serde_json::json;

#[test]
fn schema_module_reports_missing_activity_fields_with_location() {
    let issues = validate_activity_document(&json!({
        "activities": [{
            "id": "lab",
            "title": "Lab",
            "tools": [],
            "layout": { "area": [] },
            "panels": [{ "id": "program", "name": "Program" }],
            "actions": []
        }]
    }));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::Schema("required".to_string()));
    assert_eq!(issues[0].location, "/activities/0/panels/0");
    assert_eq!(issues[0].file_type, FileType::Activity);
}

#[test]
fn schema_module_rejects_empty_activity_list() {
    let issues = validate_activity_document(&json!({ "activities": [] }));
    assert!(issues
        .iter()
        .any(|issue| issue.category == IssueCategory::Schema("minItems".to_string())));
}

#[test]
fn schema_module_checks_tool_function_shape() {
    let issues = validate_tool_document(&json!({
        "tool": {
            "id": "emf",
            "name": "EMF",
            "functions": [{ "id": "convert", "parameters": [{ "name": "in" }], "returnType": "xmi", "path": 7 }],
            "panelDefs": []
        }
    }));

    let keywords: Vec<&str> = issues.iter().map(|issue| issue.category.label()).collect();
    assert!(keywords.contains(&"required"));
    assert!(keywords.contains(&"type"));
    assert!(issues.iter().all(|issue| issue.file_type == FileType::Tool));
    assert!(issues.iter().all(|issue| issue.category.is_structural()));
}
