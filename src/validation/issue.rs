use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    Activity,
    Tool,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueCategory {
    /// Structural error; carries the failing schema keyword (`required`, `type`, ...).
    Schema(String),
    Layout,
    PanelReference,
    ActionReference,
    DuplicatePanel,
    SourceButton,
    ButtonFunction,
    ToolLoad,
}

impl IssueCategory {
    pub fn label(&self) -> &str {
        match self {
            Self::Schema(keyword) => keyword,
            Self::Layout => "layout",
            Self::PanelReference => "panel-reference",
            Self::ActionReference => "action-reference",
            Self::DuplicatePanel => "duplicate-panel",
            Self::SourceButton => "source-button",
            Self::ButtonFunction => "button-function",
            Self::ToolLoad => "tool-load",
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One accumulated configuration problem, displayable to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub message: String,
    pub location: String,
    pub file_type: FileType,
}

impl ValidationIssue {
    pub fn schema(keyword: &str, message: String, location: String, file_type: FileType) -> Self {
        Self {
            category: IssueCategory::Schema(keyword.to_string()),
            message,
            location,
            file_type,
        }
    }

    pub fn semantic(category: IssueCategory, message: String, location: String) -> Self {
        Self {
            category,
            message,
            location,
            file_type: FileType::Activity,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} file: {} (at {})",
            self.category, self.file_type, self.message, self.location
        )
    }
}

/// Joins location segments with the arrow separator used in diagnostics.
pub fn location(segments: &[&str]) -> String {
    segments.join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_display_includes_category_file_and_location() {
        let issue = ValidationIssue::semantic(
            IssueCategory::Layout,
            "panel `x` is not declared".to_string(),
            location(&["activity[lab]", "layout", "area[0][1]"]),
        );
        assert_eq!(
            issue.to_string(),
            "[layout] activity file: panel `x` is not declared (at activity[lab] -> layout -> area[0][1])"
        );
    }

    #[test]
    fn schema_category_reports_keyword() {
        let issue = ValidationIssue::schema(
            "required",
            "\"id\" is a required property".to_string(),
            "/activities/0".to_string(),
            FileType::Tool,
        );
        assert!(issue.category.is_structural());
        assert_eq!(issue.category.label(), "required");
    }
}
