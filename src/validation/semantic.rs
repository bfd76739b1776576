use super::issue::location;
use super::{FileType, IssueCategory, ValidationIssue};
use crate::config::{
    ActionParameter, Activity, ButtonDefinition, PanelLink, PanelRef, Tool,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Checks a resolved activity and the tools it uses for references that did
/// not resolve. Reads only; running it twice yields the same list.
pub fn validate_semantics(activity: &Activity, tools: &[Tool]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let scope = format!("activity[{}]", activity.id);

    check_layout(activity, &scope, &mut issues);
    check_panels(activity, tools, &scope, &mut issues);
    check_actions(activity, &scope, &mut issues);
    for tool in tools {
        check_tool_buttons(tool, &mut issues);
    }
    issues
}

fn check_layout(activity: &Activity, scope: &str, issues: &mut Vec<ValidationIssue>) {
    for (row_idx, row) in activity.layout.area.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            // An empty cell extends the panel before it.
            if cell.is_empty() {
                continue;
            }
            let panel_id = cell.as_str();
            if activity.find_panel(panel_id).is_none() {
                issues.push(ValidationIssue::semantic(
                    IssueCategory::Layout,
                    format!("layout cell references undeclared panel `{panel_id}`"),
                    location(&[scope, "layout", &format!("area[{row_idx}][{col_idx}]")]),
                ));
            }
        }
    }
}

fn check_panels(activity: &Activity, tools: &[Tool], scope: &str, issues: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    for panel in activity.all_panels() {
        let panel_scope = format!("panel[{}]", panel.id);
        if !seen.insert(panel.id.as_str()) {
            issues.push(ValidationIssue::semantic(
                IssueCategory::DuplicatePanel,
                format!("panel id `{}` is declared more than once", panel.id),
                location(&[scope, "panels", &panel_scope]),
            ));
        }
        if let PanelRef::Id(def_id) = &panel.reference {
            issues.push(ValidationIssue::semantic(
                IssueCategory::PanelReference,
                format!(
                    "panel `{}` references unknown panel definition `{def_id}`",
                    panel.id
                ),
                location(&[scope, "panels", &panel_scope, "ref"]),
            ));
        }
        for button in &panel.buttons {
            for (field, function_id) in button_functions(button) {
                let declared = tools.iter().any(|tool| tool.function(function_id).is_some());
                if !declared {
                    issues.push(ValidationIssue::semantic(
                        IssueCategory::ButtonFunction,
                        format!(
                            "button `{}` of panel `{}` references unknown function `{function_id}`",
                            button.id, panel.id
                        ),
                        location(&[
                            scope,
                            "panels",
                            &panel_scope,
                            &format!("buttons[{}]", button.id),
                            field,
                        ]),
                    ));
                }
            }
        }
    }
}

fn check_actions(activity: &Activity, scope: &str, issues: &mut Vec<ValidationIssue>) {
    for (idx, action) in activity.actions.iter().enumerate() {
        let action_scope = format!("actions[{idx}]");
        // A link counts as resolved only when it points at the tree's own panel.
        let mut check_link = |field: &str, link: &PanelLink| {
            let in_tree = match (link, activity.find_panel(link.id())) {
                (PanelLink::Panel(panel), Some(found)) => Arc::ptr_eq(panel, found),
                _ => false,
            };
            if in_tree {
                return;
            }
            issues.push(ValidationIssue::semantic(
                IssueCategory::ActionReference,
                format!("action {field} references undeclared panel `{}`", link.id()),
                location(&[scope, &action_scope, field]),
            ));
            if let PanelLink::Panel(panel) = link {
                if let PanelRef::Id(def_id) = &panel.reference {
                    issues.push(ValidationIssue::semantic(
                        IssueCategory::PanelReference,
                        format!(
                            "inline panel `{}` references unknown panel definition `{def_id}`",
                            panel.id
                        ),
                        location(&[scope, &action_scope, field, "ref"]),
                    ));
                }
            }
        };

        check_link("source", &action.source);
        check_link("output", &action.output);
        if let Some(console) = &action.output_console {
            check_link("outputConsole", console);
        }
        for (name, parameter) in &action.parameters {
            if let ActionParameter::Panel(link) = parameter {
                check_link(&format!("parameters.{name}"), link);
            }
        }

        if let Some(source) = action.source.panel() {
            let has_buttons = !source.buttons.is_empty() || source.definition().is_some();
            if has_buttons && source.button(&action.source_button).is_none() {
                issues.push(ValidationIssue::semantic(
                    IssueCategory::SourceButton,
                    format!(
                        "action source panel `{}` has no button `{}`",
                        source.id, action.source_button
                    ),
                    location(&[scope, &action_scope, "sourceButton"]),
                ));
            }
        }
    }
}

fn check_tool_buttons(tool: &Tool, issues: &mut Vec<ValidationIssue>) {
    let tool_scope = format!("tool[{}]", tool.id);
    for def in &tool.panel_defs {
        for button in &def.buttons {
            for (field, function_id) in button_functions(button) {
                if tool.function(function_id).is_none() {
                    issues.push(ValidationIssue {
                        category: IssueCategory::ButtonFunction,
                        message: format!(
                            "button `{}` of panel definition `{}` references unknown function `{function_id}`",
                            button.id, def.id
                        ),
                        location: location(&[
                            &tool_scope,
                            "panelDefs",
                            &format!("panelDef[{}]", def.id),
                            &format!("buttons[{}]", button.id),
                            field,
                        ]),
                        file_type: FileType::Tool,
                    });
                }
            }
        }
    }
}

fn button_functions(button: &ButtonDefinition) -> Vec<(&'static str, &str)> {
    let mut out = Vec::new();
    if let Some(function_id) = button.actionfunction.as_deref() {
        out.push(("actionfunction", function_id));
    }
    if let Some(function_id) = button.renderfunction.as_deref() {
        out.push(("renderfunction", function_id));
    }
    out
}
