use super::files::FileSource;
use super::resolver::ReferenceResolver;
use crate::config::{read_activity_document, Activity, ActivityDocument, ConfigError, UrlRewriter};
use crate::shared::logging::EventLog;
use crate::tools::{ToolError, ToolManager, ToolSession};
use crate::transport::RemoteTransport;
use crate::validation::{
    validate_activity_document, validate_semantics, FileType, IssueCategory, ValidationIssue,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("activity configuration has {} issue(s)", .0.len())]
    Invalid(Vec<ValidationIssue>),
}

impl LoadError {
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Invalid(issues) => issues,
            Self::Config(_) => &[],
        }
    }
}

/// A fully linked activity and the tool session its actions dispatch against.
#[derive(Debug)]
pub struct LoadedActivity {
    pub activity: Activity,
    pub tools: ToolSession,
}

/// Runs the configuration pipeline: schema check, activity selection, tool
/// loading, reference resolution, semantic check. Validation problems from
/// every stage are collected and returned together.
pub struct ActivityLoader<'a> {
    transport: &'a dyn RemoteTransport,
    files: &'a dyn FileSource,
    rewriter: &'a UrlRewriter,
    log: &'a EventLog,
}

impl<'a> ActivityLoader<'a> {
    pub fn new(
        transport: &'a dyn RemoteTransport,
        files: &'a dyn FileSource,
        rewriter: &'a UrlRewriter,
        log: &'a EventLog,
    ) -> Self {
        Self {
            transport,
            files,
            rewriter,
            log,
        }
    }

    pub fn load(&self, activity_file: &str, activity_id: Option<&str>) -> Result<LoadedActivity, LoadError> {
        let document = read_activity_document(self.files, activity_file)?;
        let structural = validate_activity_document(&document);
        if !structural.is_empty() {
            self.log.warn(
                "activity.invalid",
                &format!("{} structural issue(s) in {activity_file}", structural.len()),
                &[],
            );
            return Err(LoadError::Invalid(structural));
        }

        let mut activity = ActivityDocument::from_value(document, activity_file)?.select(activity_id)?;

        let outcome = ToolManager::new(self.transport, self.rewriter, self.log).load(&activity.tools);
        let mut issues: Vec<ValidationIssue> =
            outcome.errors.into_iter().flat_map(tool_error_issues).collect();
        let tools = outcome.session;

        ReferenceResolver::new(
            |def_id: &str| tools.panel_definition(def_id),
            self.files,
            self.rewriter,
        )
        .resolve(&mut activity);

        issues.extend(validate_semantics(&activity, tools.tools()));
        if !issues.is_empty() {
            self.log.warn(
                "activity.invalid",
                &format!("activity `{}` has {} issue(s)", activity.id, issues.len()),
                &[("activityId", &activity.id)],
            );
            return Err(LoadError::Invalid(issues));
        }

        self.log.info(
            "activity.loaded",
            &format!(
                "activity `{}` loaded with {} tool(s) and {} action(s)",
                activity.id,
                tools.tools().len(),
                activity.actions.len()
            ),
            &[("activityId", &activity.id)],
        );
        Ok(LoadedActivity { activity, tools })
    }
}

fn tool_error_issues(err: ToolError) -> Vec<ValidationIssue> {
    match err {
        ToolError::Invalid { issues, .. } => issues,
        other => {
            let location = match &other {
                ToolError::Url { url, .. }
                | ToolError::Fetch { url, .. }
                | ToolError::Parse { url, .. }
                | ToolError::Invalid { url, .. }
                | ToolError::DuplicateTool { url, .. } => url.clone(),
                ToolError::FunctionPath {
                    tool_id,
                    function_id,
                    ..
                } => format!("tool[{tool_id}] -> functions -> {function_id} -> path"),
            };
            vec![ValidationIssue {
                category: IssueCategory::ToolLoad,
                message: other.to_string(),
                location,
                file_type: FileType::Tool,
            }]
        }
    }
}
