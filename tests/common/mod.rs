//! Shared test infrastructure for color-cycle integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use color_cycle::{HexColor, Pattern, StepDuration, TimeSource};
use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Mock Time Sources
// ============================================================================

/// Mock wall clock with controllable time, for single-threaded tests
pub struct MockTimeSource {
    current_time: Cell<u64>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::at(0)
    }

    pub fn at(millis: u64) -> Self {
        Self {
            current_time: Cell::new(millis),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        self.current_time.set(self.current_time.get() + millis);
    }

    pub fn set_time(&self, millis: u64) {
        self.current_time.set(millis);
    }
}

impl TimeSource for MockTimeSource {
    fn now_millis(&self) -> u64 {
        self.current_time.get()
    }
}

/// Mock wall clock that can be moved into a spawned task and still be driven
/// from the test
#[derive(Clone, Default)]
pub struct SharedTimeSource {
    current_time: Arc<AtomicU64>,
}

impl SharedTimeSource {
    pub fn at(millis: u64) -> Self {
        let source = Self::default();
        source.set_time(millis);
        source
    }

    pub fn set_time(&self, millis: u64) {
        self.current_time.store(millis, Ordering::SeqCst);
    }
}

impl TimeSource for SharedTimeSource {
    fn now_millis(&self) -> u64 {
        self.current_time.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Colors and patterns
// ============================================================================

#[allow(unused_imports)]
pub use color_cycle::{BLACK, FALLBACK_COLOR, RED, WHITE};

pub const GREEN: HexColor = HexColor::new(0x00, 0xff, 0x00);
pub const BLUE: HexColor = HexColor::new(0x00, 0x00, 0xff);

/// Some instant far from the epoch, aligned to a 10 s cycle
pub const EPOCH_2024: u64 = 1_704_067_200_000;

pub fn millis(ms: u64) -> StepDuration {
    StepDuration::from_millis(ms)
}

/// Red for 5 s, then white for 5 s
pub fn red_white() -> Pattern<8> {
    Pattern::builder()
        .step(RED, millis(5000))
        .unwrap()
        .step(WHITE, millis(5000))
        .unwrap()
        .build()
}

/// Red 1 s, green 2 s, blue 3 s
pub fn rgb_uneven() -> Pattern<8> {
    Pattern::builder()
        .step(RED, millis(1000))
        .unwrap()
        .step(GREEN, millis(2000))
        .unwrap()
        .step(BLUE, millis(3000))
        .unwrap()
        .build()
}
