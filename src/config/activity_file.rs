use super::tool_file::{ButtonDefinition, PanelDefinition};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }

    pub fn parse_value(self, raw: &str, origin: &str) -> Result<Value, ConfigError> {
        match self {
            Self::Json => serde_json::from_str(raw).map_err(|source| ConfigError::ParseJson {
                path: origin.to_string(),
                source,
            }),
            Self::Yaml => serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivityDocument {
    pub activities: Vec<Activity>,
}

impl ActivityDocument {
    pub fn from_value(value: Value, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|source| ConfigError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    /// Picks the activity with `activity_id`, or the first one when no id is given.
    pub fn select(self, activity_id: Option<&str>) -> Result<Activity, ConfigError> {
        let mut activities = self.activities.into_iter();
        match activity_id {
            Some(activity_id) => activities
                .find(|activity| activity.id == activity_id)
                .ok_or_else(|| ConfigError::UnknownActivity {
                    activity_id: activity_id.to_string(),
                }),
            None => activities.next().ok_or(ConfigError::NoActivities),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub panels: Vec<Arc<Panel>>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Layout {
    /// Rows of panel ids; an empty cell extends the panel to its left.
    #[serde(default)]
    pub area: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Panel {
    pub id: String,
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: PanelRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonDefinition>,
    #[serde(default, rename = "childPanels", skip_serializing_if = "Vec::is_empty")]
    pub child_panels: Vec<Arc<Panel>>,
    #[serde(skip)]
    pub file_handle: Option<FileHandle>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PanelRef {
    Id(String),
    Definition(Arc<PanelDefinition>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PanelLink {
    Id(String),
    Panel(Arc<Panel>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ActionParameter {
    Panel(PanelLink),
    Literal(Value),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Action {
    pub source: PanelLink,
    #[serde(rename = "sourceButton")]
    pub source_button: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ActionParameter>,
    pub output: PanelLink,
    #[serde(default, rename = "outputConsole", skip_serializing_if = "Option::is_none")]
    pub output_console: Option<PanelLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub content: String,
}

impl PanelRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Definition(def) => &def.id,
        }
    }

    pub fn definition(&self) -> Option<&Arc<PanelDefinition>> {
        match self {
            Self::Id(_) => None,
            Self::Definition(def) => Some(def),
        }
    }
}

impl PanelLink {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Panel(panel) => &panel.id,
        }
    }

    pub fn panel(&self) -> Option<&Arc<Panel>> {
        match self {
            Self::Id(_) => None,
            Self::Panel(panel) => Some(panel),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Panel(_))
    }
}

impl Panel {
    pub fn definition(&self) -> Option<&Arc<PanelDefinition>> {
        self.reference.definition()
    }

    pub fn language(&self) -> Option<&str> {
        self.definition()
            .and_then(|def| def.language.as_deref())
    }

    /// Buttons declared on the panel itself take precedence over the definition's.
    pub fn button(&self, button_id: &str) -> Option<&ButtonDefinition> {
        self.buttons
            .iter()
            .find(|button| button.id == button_id)
            .or_else(|| self.definition().and_then(|def| def.button(button_id)))
    }
}

impl Activity {
    /// Every panel in the tree, parents before their children.
    pub fn all_panels(&self) -> Vec<&Arc<Panel>> {
        fn walk<'a>(panels: &'a [Arc<Panel>], out: &mut Vec<&'a Arc<Panel>>) {
            for panel in panels {
                out.push(panel);
                walk(&panel.child_panels, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.panels, &mut out);
        out
    }

    pub fn find_panel(&self, panel_id: &str) -> Option<&Arc<Panel>> {
        find_in_tree(&self.panels, panel_id)
    }

    pub fn find_action(&self, panel_id: &str, button_id: &str) -> Option<&Action> {
        self.actions
            .iter()
            .find(|action| action.source.id() == panel_id && action.source_button == button_id)
    }
}

pub(crate) fn find_in_tree<'a>(panels: &'a [Arc<Panel>], panel_id: &str) -> Option<&'a Arc<Panel>> {
    for panel in panels {
        if panel.id == panel_id {
            return Some(panel);
        }
        if let Some(found) = find_in_tree(&panel.child_panels, panel_id) {
            return Some(found);
        }
    }
    None
}
