use super::cancel::CancellationToken;
use super::conversion::{value_text, TypeConverter};
use super::error::DispatchError;
use super::panels::{GeneratedFile, NotificationSink, PanelHandle, PanelHost};
use crate::config::{Action, ActionParameter, Activity, FunctionParameter, FunctionSpec, PanelLink};
use crate::shared::ids::generate_invocation_id;
use crate::shared::logging::EventLog;
use crate::tools::ToolSession;
use crate::transport::RemoteTransport;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::thread;

/// A value handed to a tool function together with the type it currently has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    pub type_name: String,
    pub value: String,
}

impl ParameterValue {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub invocation_id: String,
    pub function_id: String,
    pub response: Value,
}

enum Preparation<'p> {
    Ready(String),
    Convert {
        value: &'p ParameterValue,
        target_type: &'p str,
    },
    ConvertWithMetamodel {
        value: &'p ParameterValue,
        dependency: &'p ParameterValue,
        target_type: &'p str,
    },
}

enum Pending<H> {
    Ready(String),
    Running(H),
}

/// Executes the action bound to a button press: gathers panel values,
/// converts each one to the type the target function declares, calls the
/// function and routes the response back into the activity's panels.
pub struct ActionDispatcher<'a> {
    tools: &'a ToolSession,
    transport: &'a dyn RemoteTransport,
    log: &'a EventLog,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(tools: &'a ToolSession, transport: &'a dyn RemoteTransport, log: &'a EventLog) -> Self {
        Self {
            tools,
            transport,
            log,
        }
    }

    /// Invokes `function_id` with `parameters`. Every declared parameter must
    /// be present. Values whose type differs from the declared one are
    /// converted concurrently; the target function is only called once all
    /// conversions succeeded, and only declared parameters are sent.
    pub fn invoke_action_function(
        &self,
        function_id: &str,
        parameters: &BTreeMap<String, ParameterValue>,
        token: &CancellationToken,
    ) -> Result<Value, DispatchError> {
        let function = self.function(function_id)?;
        let plan = plan_parameters(function, parameters)?;

        // Sibling conversions stop issuing calls once one of them failed.
        let abort = token.child();
        let converted = thread::scope(|scope| {
            let pending: Vec<_> = plan
                .into_iter()
                .map(|(param, step)| {
                    let work = match step {
                        Preparation::Ready(value) => Pending::Ready(value),
                        step => {
                            let abort = &abort;
                            Pending::Running(scope.spawn(move || {
                                let result = self.prepare(step, abort);
                                if result.is_err() {
                                    abort.cancel();
                                }
                                result
                            }))
                        }
                    };
                    (param, work)
                })
                .collect();

            pending
                .into_iter()
                .map(|(param, work)| {
                    let result = match work {
                        Pending::Ready(value) => Ok(value),
                        Pending::Running(handle) => handle.join().unwrap_or_else(|_| {
                            Err(DispatchError::WorkerPanicked {
                                parameter: param.name.clone(),
                            })
                        }),
                    };
                    (param, result)
                })
                .collect::<Vec<_>>()
        });

        let mut payload = Map::new();
        let mut first_error: Option<DispatchError> = None;
        for (param, result) in converted {
            match result {
                Ok(value) => {
                    payload.insert(param.name.clone(), Value::String(value));
                }
                Err(err) => {
                    let replace = match &first_error {
                        None => true,
                        Some(current) => current.is_cancelled() && !err.is_cancelled(),
                    };
                    if replace {
                        first_error = Some(err);
                    }
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
        if token.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        Ok(self
            .transport
            .post_json(&function.path, &Value::Object(payload))?)
    }

    /// Handles a button press on `panel_id`. On failure the sink is notified
    /// exactly once; a cancelled invocation neither notifies nor touches panels.
    pub fn handle_button(
        &self,
        activity: &Activity,
        panel_id: &str,
        button_id: &str,
        panels: &dyn PanelHost,
        sink: &dyn NotificationSink,
        token: &CancellationToken,
    ) -> Result<ActionOutcome, DispatchError> {
        let invocation_id = generate_invocation_id();
        let fields = [
            ("invocationId", invocation_id.as_str()),
            ("panelId", panel_id),
            ("buttonId", button_id),
        ];
        self.log.info("action.start", "button pressed", &fields);

        match self.run_button(activity, panel_id, button_id, panels, token) {
            Ok((function_id, response)) => {
                self.log.info("action.complete", "action finished", &fields);
                Ok(ActionOutcome {
                    invocation_id,
                    function_id,
                    response,
                })
            }
            Err(DispatchError::Cancelled) => {
                self.log.warn("action.cancelled", "action cancelled", &fields);
                Err(DispatchError::Cancelled)
            }
            Err(err) => {
                let message = err.to_string();
                self.log.error("action.failed", &message, &fields);
                sink.notify(&message, &err);
                Err(err)
            }
        }
    }

    fn run_button(
        &self,
        activity: &Activity,
        panel_id: &str,
        button_id: &str,
        panels: &dyn PanelHost,
        token: &CancellationToken,
    ) -> Result<(String, Value), DispatchError> {
        let action = activity
            .find_action(panel_id, button_id)
            .ok_or_else(|| DispatchError::ActionNotFound {
                panel_id: panel_id.to_string(),
                button_id: button_id.to_string(),
            })?;
        let source = action.source.panel().ok_or_else(|| DispatchError::UnresolvedPanel {
            panel_id: action.source.id().to_string(),
        })?;
        let function_id = source
            .button(button_id)
            .and_then(|button| button.function_id())
            .ok_or_else(|| DispatchError::ButtonWithoutFunction {
                panel_id: panel_id.to_string(),
                button_id: button_id.to_string(),
            })?
            .to_string();
        let function = self.function(&function_id)?;

        let output = panel_handle(panels, &action.output)?;
        let console = action
            .output_console
            .as_ref()
            .map(|link| panel_handle(panels, link))
            .transpose()?;

        let parameters = collect_parameters(action, function, panels)?;
        let response = self.invoke_action_function(&function_id, &parameters, token)?;
        if token.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        route_response(&response, function, output, console);
        Ok((function_id, response))
    }

    fn function(&self, function_id: &str) -> Result<&'a FunctionSpec, DispatchError> {
        self.tools
            .function(function_id)
            .ok_or_else(|| DispatchError::UnknownFunction {
                function_id: function_id.to_string(),
            })
    }

    fn prepare(&self, step: Preparation<'_>, token: &CancellationToken) -> Result<String, DispatchError> {
        let converter = TypeConverter::new(self.tools, self.transport, self.log, token);
        match step {
            Preparation::Ready(value) => Ok(value),
            Preparation::Convert { value, target_type } => {
                converter.convert(&value.value, &value.type_name, target_type)
            }
            Preparation::ConvertWithMetamodel {
                value,
                dependency,
                target_type,
            } => converter.convert_including_metamodel(
                &value.value,
                &value.type_name,
                &dependency.value,
                &dependency.type_name,
                target_type,
            ),
        }
    }
}

/// Decides per declared parameter whether its value passes through or needs
/// converting. Fails before any remote call when a value is missing.
fn plan_parameters<'p>(
    function: &'p FunctionSpec,
    parameters: &'p BTreeMap<String, ParameterValue>,
) -> Result<Vec<(&'p FunctionParameter, Preparation<'p>)>, DispatchError> {
    let mut plan = Vec::with_capacity(function.parameters.len());
    for param in &function.parameters {
        let value = parameters
            .get(&param.name)
            .ok_or_else(|| DispatchError::MissingParameter {
                function_id: function.id.clone(),
                parameter: param.name.clone(),
            })?;

        let step = if value.type_name == param.param_type {
            Preparation::Ready(value.value.clone())
        } else if let Some(dependency_name) = &param.instance_of {
            let dependency =
                parameters
                    .get(dependency_name)
                    .ok_or_else(|| DispatchError::MissingDependency {
                        function_id: function.id.clone(),
                        parameter: param.name.clone(),
                        dependency: dependency_name.clone(),
                    })?;
            Preparation::ConvertWithMetamodel {
                value,
                dependency,
                target_type: &param.param_type,
            }
        } else {
            Preparation::Convert {
                value,
                target_type: &param.param_type,
            }
        };
        plan.push((param, step));
    }
    Ok(plan)
}

fn panel_handle<'h>(panels: &'h dyn PanelHost, link: &PanelLink) -> Result<&'h dyn PanelHandle, DispatchError> {
    if !link.is_resolved() {
        return Err(DispatchError::UnresolvedPanel {
            panel_id: link.id().to_string(),
        });
    }
    panels
        .panel(link.id())
        .ok_or_else(|| DispatchError::PanelUnavailable {
            panel_id: link.id().to_string(),
        })
}

/// Panel parameters read the panel's current value and type. Literals take
/// the type the function declares for them so they pass through unconverted.
fn collect_parameters(
    action: &Action,
    function: &FunctionSpec,
    panels: &dyn PanelHost,
) -> Result<BTreeMap<String, ParameterValue>, DispatchError> {
    let mut values = BTreeMap::new();
    for (name, parameter) in &action.parameters {
        let value = match parameter {
            ActionParameter::Panel(link) => {
                let handle = panel_handle(panels, link)?;
                ParameterValue::new(handle.value_type(), handle.value())
            }
            ActionParameter::Literal(literal) => {
                let type_name = function
                    .parameter(name)
                    .map(|param| param.param_type.clone())
                    .unwrap_or_default();
                ParameterValue::new(type_name, value_text(literal))
            }
        };
        values.insert(name.clone(), value);
    }
    Ok(values)
}

/// A tool-reported `error`, or a `generatedFiles` list that does not decode,
/// goes to the console (or the output panel when the action has none) and
/// suppresses everything else. Otherwise `output` goes to
/// the console, generated files and diagrams to the output panel, and the
/// value under the return-type key (or `data`) replaces the output panel value.
fn route_response(
    response: &Value,
    function: &FunctionSpec,
    output: &dyn PanelHandle,
    console: Option<&dyn PanelHandle>,
) {
    if let Some(error) = response.get("error").filter(|value| !value.is_null()) {
        console.unwrap_or(output).set_error(&value_text(error));
        return;
    }

    let files = match response.get("generatedFiles") {
        Some(raw) => match serde_json::from_value::<Vec<GeneratedFile>>(raw.clone()) {
            Ok(files) => Some(files),
            Err(err) => {
                console
                    .unwrap_or(output)
                    .set_error(&format!("tool returned malformed generatedFiles: {err}"));
                return;
            }
        },
        None => None,
    };

    if let (Some(text), Some(console)) = (response.get("output"), console) {
        console.set_value(&value_text(text));
    }

    if let Some(files) = files {
        output.set_generated_files(&files);
    }

    if let Some(diagram) = response.get("diagram") {
        output.render_diagram(&value_text(diagram));
    }

    if let Some(value) = response
        .get(function.return_type.as_str())
        .or_else(|| response.get("data"))
    {
        output.set_value(&value_text(value));
    }
}
