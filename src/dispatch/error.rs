use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("cannot find action for panel `{panel_id}` and button `{button_id}`")]
    ActionNotFound { panel_id: String, button_id: String },
    #[error("button `{button_id}` of panel `{panel_id}` does not invoke a tool function")]
    ButtonWithoutFunction { panel_id: String, button_id: String },
    #[error("action references unresolved panel `{panel_id}`")]
    UnresolvedPanel { panel_id: String },
    #[error("panel `{panel_id}` is not available")]
    PanelUnavailable { panel_id: String },
    #[error("unknown function id `{function_id}`")]
    UnknownFunction { function_id: String },
    #[error("missing value for parameter `{parameter}` of function `{function_id}`")]
    MissingParameter {
        function_id: String,
        parameter: String,
    },
    #[error(
        "parameter `{parameter}` of function `{function_id}` is an instance of `{dependency}`, which has no value"
    )]
    MissingDependency {
        function_id: String,
        parameter: String,
        dependency: String,
    },
    #[error("no conversion function available for input types [{input_types}] to `{target_type}`")]
    NoConversion {
        input_types: String,
        target_type: String,
    },
    #[error("response from function `{function_id}` carries no converted value")]
    MissingConvertedValue { function_id: String },
    #[error("conversion worker for parameter `{parameter}` panicked")]
    WorkerPanicked { parameter: String },
    #[error("invocation was cancelled")]
    Cancelled,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DispatchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
