pub mod files;
pub mod loader;
pub mod resolver;

pub use files::{FileSource, LocalFileSource};
pub use loader::{ActivityLoader, LoadError, LoadedActivity};
pub use resolver::{resolve_activity, ReferenceResolver};
