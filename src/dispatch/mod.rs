pub mod cancel;
pub mod conversion;
pub mod dispatcher;
pub mod error;
pub mod panels;

pub use cancel::CancellationToken;
pub use conversion::TypeConverter;
pub use dispatcher::{ActionDispatcher, ActionOutcome, ParameterValue};
pub use error::DispatchError;
pub use panels::{GeneratedFile, NotificationSink, PanelHandle, PanelHost};
