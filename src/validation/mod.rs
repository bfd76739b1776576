pub mod issue;
pub mod schema;
pub mod semantic;

pub use issue::{FileType, IssueCategory, ValidationIssue};
pub use schema::{validate_activity_document, validate_tool_document};
pub use semantic::validate_semantics;
