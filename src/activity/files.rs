use crate::config::FileHandle;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Fetches activity documents and panel files by name. Absence is reported
/// as `None`; callers decide whether that is fatal.
pub trait FileSource {
    fn fetch_file(&self, name: &str) -> Option<FileHandle>;
}

impl<F> FileSource for F
where
    F: Fn(&str) -> Option<FileHandle>,
{
    fn fetch_file(&self, name: &str) -> Option<FileHandle> {
        self(name)
    }
}

/// Serves files from a directory. Names must stay inside the root.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    root: PathBuf,
}

impl LocalFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name.trim_start_matches("./"));
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl FileSource for LocalFileSource {
    fn fetch_file(&self, name: &str) -> Option<FileHandle> {
        let path = self.resolve(name)?;
        let content = fs::read_to_string(path).ok()?;
        Some(FileHandle {
            name: name.to_string(),
            content,
        })
    }
}
