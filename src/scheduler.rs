//! Wall-clock color scheduler with play/pause lifecycle.
//!
//! Provides [`ColorScheduler`], which decides the active color of a pattern on
//! every refresh tick. The active color is looked up from absolute wall-clock
//! time, never from time elapsed since playback started, so independent
//! schedulers running the same pattern stay in step without talking to each
//! other.

use crate::color::{FALLBACK_COLOR, HexColor};
use crate::command::SchedulerAction;
use crate::pattern::{Pattern, StepPosition};
use crate::time::TimeSource;

/// The current state of a color scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// Not playing, or nothing to play. No ticks are due and the color is frozen.
    Idle,
    /// Playing a non-empty pattern. Every tick recomputes the color.
    Running,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// The scheduler is idle. Nothing was evaluated.
    Idle,
    /// The active color changed to this value.
    Changed(HexColor),
    /// The active color is the same as before.
    Unchanged,
}

/// Drives the active color of a pattern from a wall-clock source.
///
/// The scheduler does not own a timer. Call [`tick`](Self::tick) once per
/// display refresh while [`is_running`](Self::is_running) returns true; when it
/// returns false no tick is due and the color stays frozen.
///
/// # Type Parameters
/// * `T` - Time source implementation type
/// * `N` - Maximum number of steps in patterns
pub struct ColorScheduler<T: TimeSource, const N: usize> {
    time_source: T,
    pattern: Pattern<N>,
    playing: bool,
    state: SchedulerState,
    current_color: HexColor,
}

impl<T: TimeSource, const N: usize> ColorScheduler<T, N> {
    /// Creates a new idle, paused scheduler showing the first step's color.
    pub fn new(pattern: Pattern<N>, time_source: T) -> Self {
        let current_color = pattern.first_color().unwrap_or(FALLBACK_COLOR);

        Self {
            time_source,
            pattern,
            playing: false,
            state: SchedulerState::Idle,
            current_color,
        }
    }

    /// Handles a scheduler action by dispatching to the appropriate method.
    ///
    /// Returns the state after the action.
    pub fn handle_action(&mut self, action: SchedulerAction<N>) -> SchedulerState {
        match action {
            SchedulerAction::Load(pattern) => self.set_pattern(pattern),
            SchedulerAction::Play => self.set_playing(true),
            SchedulerAction::Pause => self.set_playing(false),
            SchedulerAction::Toggle => {
                if self.pattern.is_empty() {
                    self.state
                } else {
                    self.set_playing(!self.playing)
                }
            }
            SchedulerAction::Reset => {
                self.reset();
                self.state
            }
            SchedulerAction::Stop => {
                self.set_playing(false);
                self.reset();
                self.state
            }
        }
    }

    /// Replaces the pattern. The next tick uses it.
    ///
    /// The current color is left alone; an empty pattern freezes it.
    pub fn set_pattern(&mut self, pattern: Pattern<N>) -> SchedulerState {
        self.pattern = pattern;
        self.update_state()
    }

    /// Sets the play flag.
    ///
    /// Pausing freezes the current color. Playing again does not resume
    /// from where it paused: the next tick shows whatever wall-clock time
    /// dictates at that moment.
    pub fn set_playing(&mut self, playing: bool) -> SchedulerState {
        self.playing = playing;
        self.update_state()
    }

    /// Shows the first step's color.
    ///
    /// Does nothing on an empty pattern. Does not pause: a running scheduler
    /// overwrites the color again on its next tick.
    pub fn reset(&mut self) {
        if let Some(first) = self.pattern.first_color() {
            self.current_color = first;
        }
    }

    /// Evaluates the active color at the current wall-clock time.
    ///
    /// # Returns
    /// - `TickOutcome::Idle` - Not running, color untouched
    /// - `TickOutcome::Changed(color)` - A new step became active
    /// - `TickOutcome::Unchanged` - Same color as the previous tick
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SchedulerState::Running {
            return TickOutcome::Idle;
        }

        let now = self.time_source.now_millis();
        let Some(color) = self.pattern.color_at(now) else {
            return TickOutcome::Idle;
        };

        if color == self.current_color {
            TickOutcome::Unchanged
        } else {
            self.current_color = color;
            TickOutcome::Changed(color)
        }
    }

    /// Returns the current state of the scheduler.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns the color currently shown.
    pub fn current_color(&self) -> HexColor {
        self.current_color
    }

    /// Returns true if ticks are due.
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Returns the last play flag supplied.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns the pattern being scheduled.
    pub fn pattern(&self) -> &Pattern<N> {
        &self.pattern
    }

    /// Returns the active step position at the current wall-clock time.
    pub fn position(&self) -> Option<StepPosition> {
        self.pattern.position_at(self.time_source.now_millis())
    }

    /// Returns a reference to the time source.
    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    fn update_state(&mut self) -> SchedulerState {
        self.state = if self.playing && !self.pattern.is_empty() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{RED, WHITE};
    use crate::types::StepDuration;
    use core::cell::Cell;

    // Mock time source with controllable time
    struct MockTimeSource {
        now: Cell<u64>,
    }

    impl MockTimeSource {
        fn at(millis: u64) -> Self {
            Self {
                now: Cell::new(millis),
            }
        }

        fn advance(&self, millis: u64) {
            self.now.set(self.now.get() + millis);
        }
    }

    impl TimeSource for MockTimeSource {
        fn now_millis(&self) -> u64 {
            self.now.get()
        }
    }

    fn red_white() -> Pattern<8> {
        Pattern::builder()
            .step(RED, StepDuration::from_millis(5000))
            .unwrap()
            .step(WHITE, StepDuration::from_millis(5000))
            .unwrap()
            .build()
    }

    #[test]
    fn new_scheduler_is_idle_with_first_color() {
        let timer = MockTimeSource::at(7000);
        let scheduler = ColorScheduler::new(red_white(), &timer);

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.current_color(), RED);
    }

    #[test]
    fn new_scheduler_on_empty_pattern_uses_fallback() {
        let timer = MockTimeSource::at(0);
        let scheduler = ColorScheduler::new(Pattern::<8>::new(), &timer);
        assert_eq!(scheduler.current_color(), FALLBACK_COLOR);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let timer = MockTimeSource::at(7000);
        let mut scheduler = ColorScheduler::new(red_white(), &timer);

        assert_eq!(scheduler.tick(), TickOutcome::Idle);
        assert_eq!(scheduler.current_color(), RED);
    }

    #[test]
    fn tick_reports_change_only_once() {
        let timer = MockTimeSource::at(7000);
        let mut scheduler = ColorScheduler::new(red_white(), &timer);
        scheduler.set_playing(true);

        assert_eq!(scheduler.tick(), TickOutcome::Changed(WHITE));
        assert_eq!(scheduler.tick(), TickOutcome::Unchanged);

        timer.advance(1000);
        assert_eq!(scheduler.tick(), TickOutcome::Unchanged);
    }

    #[test]
    fn playing_an_empty_pattern_stays_idle() {
        let timer = MockTimeSource::at(0);
        let mut scheduler = ColorScheduler::new(Pattern::<8>::new(), &timer);

        assert_eq!(scheduler.set_playing(true), SchedulerState::Idle);
        assert!(scheduler.is_playing());
        assert_eq!(scheduler.tick(), TickOutcome::Idle);
    }

    #[test]
    fn loading_a_pattern_while_playing_starts_running() {
        let timer = MockTimeSource::at(7000);
        let mut scheduler = ColorScheduler::new(Pattern::<8>::new(), &timer);
        scheduler.set_playing(true);

        assert_eq!(scheduler.set_pattern(red_white()), SchedulerState::Running);
        assert_eq!(scheduler.tick(), TickOutcome::Changed(WHITE));
    }

    #[test]
    fn toggle_is_ignored_on_empty_pattern() {
        let timer = MockTimeSource::at(0);
        let mut scheduler = ColorScheduler::new(Pattern::<8>::new(), &timer);

        scheduler.handle_action(SchedulerAction::Toggle);
        assert!(!scheduler.is_playing());
    }

    #[test]
    fn stop_pauses_and_resets() {
        let timer = MockTimeSource::at(7000);
        let mut scheduler = ColorScheduler::new(red_white(), &timer);
        scheduler.handle_action(SchedulerAction::Play);
        scheduler.tick();
        assert_eq!(scheduler.current_color(), WHITE);

        let state = scheduler.handle_action(SchedulerAction::Stop);
        assert_eq!(state, SchedulerState::Idle);
        assert!(!scheduler.is_playing());
        assert_eq!(scheduler.current_color(), RED);
    }

    #[test]
    fn position_tracks_wall_clock() {
        let timer = MockTimeSource::at(13_250);
        let scheduler = ColorScheduler::new(red_white(), &timer);

        let position = scheduler.position().unwrap();
        assert_eq!(position.index, 0);
        assert_eq!(position.elapsed_millis, 3250);
        assert_eq!(position.remaining_millis, 1750);
    }
}
