//! Command-based control for schedulers.

use crate::pattern::Pattern;

/// Actions for controlling a scheduler.
#[derive(Debug, Clone)]
pub enum SchedulerAction<const N: usize> {
    /// Replace the pattern. Does not change the play flag.
    Load(Pattern<N>),
    /// Start playing.
    Play,
    /// Stop playing and freeze the current color.
    Pause,
    /// Flip the play flag. Ignored while the pattern is empty.
    Toggle,
    /// Show the first step's color. Does not change the play flag.
    Reset,
    /// Pause, then reset.
    Stop,
}
