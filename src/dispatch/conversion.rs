use super::cancel::CancellationToken;
use super::error::DispatchError;
use crate::shared::logging::EventLog;
use crate::tools::{RegistryEntry, ToolSession, TypeToken};
use crate::transport::RemoteTransport;
use serde_json::{Map, Value};

/// Converts panel values between model types by calling the conversion
/// functions registered in a tool session.
pub struct TypeConverter<'a> {
    tools: &'a ToolSession,
    transport: &'a dyn RemoteTransport,
    log: &'a EventLog,
    token: &'a CancellationToken,
}

impl<'a> TypeConverter<'a> {
    pub fn new(
        tools: &'a ToolSession,
        transport: &'a dyn RemoteTransport,
        log: &'a EventLog,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            tools,
            transport,
            log,
            token,
        }
    }

    /// Single-input conversion through the first function registered as
    /// `[source_type] -> target_type`.
    pub fn convert(
        &self,
        value: &str,
        source_type: &str,
        target_type: &str,
    ) -> Result<String, DispatchError> {
        let Some(function_id) = self
            .tools
            .registry()
            .find(&[TypeToken::from(source_type)], &TypeToken::from(target_type))
        else {
            return Err(DispatchError::NoConversion {
                input_types: source_type.to_string(),
                target_type: target_type.to_string(),
            });
        };
        self.call_conversion(function_id, &[value], target_type)
    }

    /// Conversion of a value that is only meaningful together with its
    /// metamodel. Candidates are functions `[source_type, *] -> target_type`.
    /// A candidate whose second input already is `dependency_type` wins;
    /// otherwise the first candidate whose second input can be produced from
    /// the dependency by a single-input conversion is used, at the cost of one
    /// extra call.
    pub fn convert_including_metamodel(
        &self,
        value: &str,
        source_type: &str,
        dependency_value: &str,
        dependency_type: &str,
        target_type: &str,
    ) -> Result<String, DispatchError> {
        let registry = self.tools.registry();
        let candidates = registry.matching_entries(
            &[TypeToken::from(source_type), TypeToken::Wildcard],
            &TypeToken::from(target_type),
            true,
        );

        let dependency_token = TypeToken::from(dependency_type);
        if let Some(entry) = candidates
            .iter()
            .find(|entry| second_input(entry) == Some(&dependency_token))
        {
            return self.call_conversion(&entry.id, &[value, dependency_value], target_type);
        }

        for entry in &candidates {
            let Some(required) = second_input(entry).and_then(TypeToken::as_named) else {
                continue;
            };
            let Some(bridge_id) = registry.find(
                std::slice::from_ref(&dependency_token),
                &TypeToken::from(required),
            ) else {
                continue;
            };
            let bridged = self.call_conversion(bridge_id, &[dependency_value], required)?;
            return self.call_conversion(&entry.id, &[value, bridged.as_str()], target_type);
        }

        Err(DispatchError::NoConversion {
            input_types: format!("{source_type}, {dependency_type}"),
            target_type: target_type.to_string(),
        })
    }

    /// Posts `args` keyed by the function's declared parameter names and reads
    /// the converted value from `data`, falling back to the target-type key.
    fn call_conversion(
        &self,
        function_id: &str,
        args: &[&str],
        target_type: &str,
    ) -> Result<String, DispatchError> {
        let function = self
            .tools
            .function(function_id)
            .ok_or_else(|| DispatchError::UnknownFunction {
                function_id: function_id.to_string(),
            })?;

        let mut payload = Map::new();
        for (param, arg) in function.parameters.iter().zip(args) {
            payload.insert(param.name.clone(), Value::String((*arg).to_string()));
        }

        if self.token.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }
        self.log.info(
            "conversion.call",
            "calling conversion function",
            &[("functionId", function_id), ("targetType", target_type)],
        );
        let response = self
            .transport
            .post_json(&function.path, &Value::Object(payload))?;

        response
            .get("data")
            .or_else(|| response.get(target_type))
            .map(value_text)
            .ok_or_else(|| DispatchError::MissingConvertedValue {
                function_id: function_id.to_string(),
            })
    }
}

fn second_input(entry: &RegistryEntry) -> Option<&TypeToken> {
    entry.input_param_types.get(1)
}

/// Text form of a response value: strings verbatim, anything else as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
