//! Time abstraction for wall-clock driven scheduling.
//!
//! The scheduler never measures elapsed time itself. It asks a [`TimeSource`]
//! for the current wall-clock reading and derives everything from that, so
//! two schedulers reading clocks that agree will always show the same color.

/// Trait for abstracting wall-clock sources.
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    #[inline]
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Adapts any `Fn() -> u64` into a [`TimeSource`].
///
/// Handy for feeding synthetic timestamps:
///
/// ```
/// use color_cycle::{FnTimeSource, TimeSource};
///
/// let clock = FnTimeSource(|| 42_000);
/// assert_eq!(clock.now_millis(), 42_000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnTimeSource<F>(pub F);

impl<F: Fn() -> u64> TimeSource for FnTimeSource<F> {
    #[inline]
    fn now_millis(&self) -> u64 {
        (self.0)()
    }
}
