use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Error, Result};

/// Shared cancellation flag, set from the signal handler and polled by the
/// transfer loops between I/O attempts.
///
/// Clones share the same flag. Open ports and files are dropped normally on
/// the way out, so cancellation never leaks a descriptor.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Register this flag as the process SIGINT/SIGTERM handler.
    ///
    /// Can only succeed once per process; a second call reports the handler
    /// as already taken.
    pub fn install(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            log::info!("termination signal received, stopping after the current attempt");
            flag.cancel();
        })
        .map_err(|e| Error::Signal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_flag() {
        let flag = CancelFlag::new();
        let seen_by_handler = flag.clone();
        assert!(!flag.is_cancelled());
        seen_by_handler.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn handler_installs_once_per_process() {
        // The process-wide handler slot is single use, so this is the only
        // test that calls install().
        let first = CancelFlag::new();
        first.install().unwrap();
        let second = CancelFlag::new();
        assert!(matches!(second.install(), Err(Error::Signal(_))));
    }
}
