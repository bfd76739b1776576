pub mod activity_file;
pub mod error;
pub mod load;
pub mod placeholders;
pub mod settings;
pub mod tool_file;

pub use activity_file::{
    Action, ActionParameter, Activity, ActivityDocument, DocumentFormat, FileHandle, Layout, Panel,
    PanelLink, PanelRef,
};
pub use error::ConfigError;
pub use load::{load_settings, read_activity_document};
pub use placeholders::{UrlRewriter, BASE_URL_TOKEN};
pub use settings::{default_port_paths, Settings, DEFAULT_REQUEST_TIMEOUT_SECONDS};
pub use tool_file::{
    ButtonDefinition, FunctionParameter, FunctionSpec, PanelDefinition, Tool, ToolDocument,
};
