pub mod error;
pub mod manager;
pub mod registry;
pub mod session;

pub use error::ToolError;
pub use manager::{ToolLoadOutcome, ToolManager};
pub use registry::{FunctionRegistry, RegistryEntry, TypeToken};
pub use session::ToolSession;
