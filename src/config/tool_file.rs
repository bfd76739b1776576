use super::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolDocument {
    pub tool: Tool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
    #[serde(default, rename = "panelDefs")]
    pub panel_defs: Vec<PanelDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionSpec {
    pub id: String,
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    #[serde(rename = "returnType")]
    pub return_type: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    /// Names the sibling parameter this one is an instance of (its metamodel).
    #[serde(default, rename = "instanceOf", skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PanelDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub panelclass: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub buttons: Vec<ButtonDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ButtonDefinition {
    pub id: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub actionfunction: Option<String>,
    #[serde(default)]
    pub renderfunction: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ButtonDefinition {
    /// The tool function a press of this button invokes, if any.
    pub fn function_id(&self) -> Option<&str> {
        self.actionfunction
            .as_deref()
            .or(self.renderfunction.as_deref())
    }
}

impl FunctionSpec {
    pub fn input_types(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|param| param.param_type.clone())
            .collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&FunctionParameter> {
        self.parameters.iter().find(|param| param.name == name)
    }
}

impl Tool {
    pub fn function(&self, function_id: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|function| function.id == function_id)
    }

    pub fn panel_definition(&self, panel_def_id: &str) -> Option<&PanelDefinition> {
        self.panel_defs.iter().find(|def| def.id == panel_def_id)
    }
}

impl PanelDefinition {
    pub fn button(&self, button_id: &str) -> Option<&ButtonDefinition> {
        self.buttons.iter().find(|button| button.id == button_id)
    }
}

impl ToolDocument {
    pub fn parse(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|source| ConfigError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }
}
