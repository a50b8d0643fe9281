use std::thread;
use std::time::Duration;

use crate::{Error, Result};

/// Pause between attempts when the port makes no progress.
pub const RETRY_PAUSE: Duration = Duration::from_millis(20);

/// Paces retries when an I/O attempt moves no bytes.
///
/// Every zero-progress attempt sleeps for the fixed pause instead of spinning
/// against the descriptor. An optional stall limit turns a link that never
/// moves data into a hard error instead of an endless wait.
pub struct RetryPacer {
    pause: Duration,
    stalls: u32,
    max_stalls: Option<u32>,
}

impl RetryPacer {
    pub fn new(max_stalls: Option<u32>) -> Self {
        Self {
            pause: RETRY_PAUSE,
            stalls: 0,
            max_stalls,
        }
    }

    /// Same pacer with a custom pause, so tests don't wait out real delays.
    pub fn with_pause(max_stalls: Option<u32>, pause: Duration) -> Self {
        Self {
            pause,
            stalls: 0,
            max_stalls,
        }
    }

    /// Record a zero-progress attempt and sleep before the caller retries.
    pub fn stall(&mut self) -> Result<()> {
        self.stalls = self.stalls.saturating_add(1);
        if let Some(limit) = self.max_stalls {
            if self.stalls > limit {
                return Err(Error::Stalled(limit));
            }
        }
        if self.stalls % 50 == 0 {
            log::warn!("link stalled, {} consecutive zero-progress retries", self.stalls);
        }
        log::trace!("no progress, pausing {:?} (stall #{})", self.pause, self.stalls);
        thread::sleep(self.pause);
        Ok(())
    }

    /// Reset the stall counter after an attempt that moved bytes.
    pub fn mark_progress(&mut self) {
        self.stalls = 0;
    }

    pub fn stalls(&self) -> u32 {
        self.stalls
    }
}
