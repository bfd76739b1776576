use super::error::DispatchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Live view of one rendered panel. Implemented by the host UI.
pub trait PanelHandle {
    fn value(&self) -> String;

    fn value_type(&self) -> String;

    fn set_value(&self, value: &str);

    fn set_error(&self, message: &str);

    fn render_diagram(&self, svg: &str);

    fn set_generated_files(&self, files: &[GeneratedFile]);
}

pub trait PanelHost {
    fn panel(&self, panel_id: &str) -> Option<&dyn PanelHandle>;
}

/// Receives every user-facing dispatch failure, one call per failed invocation.
pub trait NotificationSink {
    fn notify(&self, message: &str, error: &DispatchError);
}
