use crate::config::ConfigError;
use crate::transport::TransportError;
use crate::validation::ValidationIssue;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool url `{url}` could not be expanded: {source}")]
    Url {
        url: String,
        #[source]
        source: ConfigError,
    },
    #[error("failed to fetch tool document {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("invalid tool document {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: ConfigError,
    },
    #[error("tool document {url} failed schema validation with {} issue(s)", .issues.len())]
    Invalid {
        url: String,
        issues: Vec<ValidationIssue>,
    },
    #[error("function `{function_id}` of tool `{tool_id}` has an invalid path: {source}")]
    FunctionPath {
        tool_id: String,
        function_id: String,
        #[source]
        source: ConfigError,
    },
    #[error("tool id `{tool_id}` is loaded more than once ({url})")]
    DuplicateTool { tool_id: String, url: String },
}
