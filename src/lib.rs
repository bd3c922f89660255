#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Pattern`**: An ordered cycle of color steps with a pure `time → color` lookup
//! - **`Step`**: A single color + duration within a pattern
//! - **`StepDuration`**: A step length, clamped to at least 0.1 s
//! - **`HexColor`**: An 8-bit sRGB color written as `#rrggbb`
//! - **`ColorScheduler`**: Tracks the active color of a pattern while playing, freezes it while paused
//! - **`TimeSource`**: Trait to implement for your wall clock
//! - **`StepPosition`**: Information about the active step at a given instant
//! - **`SchedulerAction`**: Commands that can be sent to control schedulers
//!
//! The active step is looked up from `wall-clock time mod cycle length`, never
//! from time elapsed since playback started. Two displays running the same
//! pattern against clocks that agree show the same color at the same moment.
//!
//! With the default `std` feature the crate also provides [`SystemClock`], an
//! async [`SchedulerService`] that runs the redraw-tick loop on tokio, and
//! [`DisplayConfig`] for file/environment configuration.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod color;
pub mod command;
pub mod pattern;
pub mod scheduler;
pub mod time;
pub mod types;

#[cfg(feature = "std")]
pub mod clock;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod service;

pub use color::{BLACK, ColorParseError, FALLBACK_COLOR, HexColor, RED, TextColor, WHITE};
pub use command::SchedulerAction;
pub use pattern::{Pattern, PatternBuilder, StepPosition};
pub use scheduler::{ColorScheduler, SchedulerState, TickOutcome};
pub use time::{FnTimeSource, TimeSource};
pub use types::{PatternError, Step, StepDuration, StepId};

#[cfg(feature = "std")]
pub use clock::SystemClock;
#[cfg(feature = "std")]
pub use config::{ConfigError, DisplayConfig, FrameRate};
#[cfg(feature = "std")]
pub use service::{SchedulerHandle, SchedulerService, ServiceError, Snapshot};
