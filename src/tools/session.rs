use super::registry::FunctionRegistry;
use crate::config::{FunctionSpec, PanelDefinition, Tool};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The tools loaded for one activity run together with their function table
/// and type-signature registry. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct ToolSession {
    tools: Vec<Tool>,
    functions: BTreeMap<String, FunctionSpec>,
    panel_definitions: BTreeMap<String, Arc<PanelDefinition>>,
    registry: FunctionRegistry,
}

impl ToolSession {
    /// Indexes `tools` in order. On id collisions the earliest tool wins.
    pub fn from_tools(tools: Vec<Tool>) -> Self {
        let mut functions = BTreeMap::new();
        let mut panel_definitions = BTreeMap::new();
        let mut registry = FunctionRegistry::new();

        for tool in &tools {
            for function in &tool.functions {
                registry.register(
                    function.input_types(),
                    function.return_type.as_str(),
                    &function.id,
                );
                functions
                    .entry(function.id.clone())
                    .or_insert_with(|| function.clone());
            }
            for def in &tool.panel_defs {
                panel_definitions
                    .entry(def.id.clone())
                    .or_insert_with(|| Arc::new(def.clone()));
            }
        }

        Self {
            tools,
            functions,
            panel_definitions,
            registry,
        }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn tool(&self, tool_id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == tool_id)
    }

    pub fn function(&self, function_id: &str) -> Option<&FunctionSpec> {
        self.functions.get(function_id)
    }

    pub fn panel_definition(&self, panel_def_id: &str) -> Option<Arc<PanelDefinition>> {
        self.panel_definitions.get(panel_def_id).cloned()
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }
}
