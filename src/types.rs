//! Core types for pattern construction.

use crate::color::HexColor;

/// Identifier of a step within one pattern.
///
/// Ids are issued by the owning [`Pattern`](crate::Pattern) and are only
/// stable for the lifetime of that pattern. Rebuilding a pattern issues new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepId(pub u32);

/// How long a step stays active.
///
/// Always at least [`StepDuration::MIN`]. Constructors clamp rather than
/// fail, so a zero or negative duration can never reach the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDuration(u64);

impl StepDuration {
    /// Shortest allowed step (0.1 s).
    pub const MIN: Self = StepDuration(100);

    /// Longest allowed step (`u32::MAX` ms, a little under 50 days).
    ///
    /// Keeps the cycle total of any pattern well inside `u64`.
    pub const MAX: Self = StepDuration(u32::MAX as u64);

    /// Duration used when the input is zero or not a number.
    pub const DEFAULT: Self = StepDuration(1000);

    /// Creates a duration from milliseconds, clamped to
    /// [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        if millis < Self::MIN.0 {
            Self::MIN
        } else if millis > Self::MAX.0 {
            Self::MAX
        } else {
            StepDuration(millis)
        }
    }

    /// Creates a duration from seconds.
    ///
    /// Zero, NaN and infinities fall back to [`DEFAULT`](Self::DEFAULT).
    /// Anything else clamps to [`MIN`](Self::MIN)..=[`MAX`](Self::MAX).
    pub fn from_secs_f32(secs: f32) -> Self {
        if secs == 0.0 || !secs.is_finite() {
            return Self::DEFAULT;
        }
        let millis = secs * 1000.0;
        if millis <= Self::MIN.0 as f32 {
            Self::MIN
        } else if millis >= Self::MAX.0 as f32 {
            Self::MAX
        } else {
            // Round half up
            StepDuration((millis + 0.5) as u64)
        }
    }

    /// Returns the duration in milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the duration in seconds.
    #[inline]
    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

impl Default for StepDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single step in a color pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// Session-scoped identifier.
    pub id: StepId,

    /// Color shown while the step is active.
    pub color: HexColor,

    /// How long the step stays active.
    pub duration: StepDuration,
}

impl Step {
    /// Creates a new step.
    #[inline]
    pub fn new(id: StepId, color: HexColor, duration: StepDuration) -> Self {
        Self {
            id,
            color,
            duration,
        }
    }
}

/// Pattern editing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// Pattern capacity exceeded.
    CapacityExceeded,

    /// No step with this id exists in the pattern.
    UnknownStep(StepId),
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::CapacityExceeded => {
                write!(f, "pattern capacity exceeded")
            }
            PatternError::UnknownStep(id) => {
                write!(f, "no step with id {} in pattern", id.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}
