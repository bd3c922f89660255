//! System wall clock.

use crate::time::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// [`TimeSource`] backed by [`SystemTime`].
///
/// Clocks set before the epoch read as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}
