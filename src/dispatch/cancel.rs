use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-invocation cancellation flag. A child token observes its parents'
/// cancellation; cancelling a child leaves the parents untouched.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    flags: Vec<Arc<AtomicBool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            flags: vec![Arc::new(AtomicBool::new(false))],
        }
    }

    pub fn child(&self) -> Self {
        let mut flags = self.flags.clone();
        flags.push(Arc::new(AtomicBool::new(false)));
        Self { flags }
    }

    pub fn cancel(&self) {
        if let Some(own) = self.flags.last() {
            own.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.iter().any(|flag| flag.load(Ordering::SeqCst))
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
