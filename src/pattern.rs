use crate::color::HexColor;
use crate::types::{PatternError, Step, StepDuration, StepId};
use heapless::Vec;

/// An ordered, fixed-capacity cycle of color steps.
///
/// Step order defines the cycle order. The active step at any instant is a
/// pure function of the pattern and the wall-clock reading: the cycle is
/// anchored at the Unix epoch, so every pattern with the same steps agrees on
/// the active color at the same moment.
///
/// Also carries the editing operations used by pattern editors. Durations are
/// clamped by [`StepDuration`] before they get here.
///
/// # Type Parameters
/// * `N` - Maximum number of steps this pattern can hold
#[derive(Debug, Clone)]
pub struct Pattern<const N: usize> {
    steps: Vec<Step, N>,
    next_id: u32,
}

/// Information about the active step at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepPosition {
    /// Index of the active step.
    pub index: usize,

    /// Id of the active step.
    pub id: StepId,

    /// Color of the active step.
    pub color: HexColor,

    /// Milliseconds since the step became active.
    pub elapsed_millis: u64,

    /// Milliseconds until the next step takes over.
    pub remaining_millis: u64,
}

impl<const N: usize> Pattern<N> {
    /// Creates an empty pattern.
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
            next_id: 0,
        }
    }

    /// Creates a new pattern builder.
    pub fn builder() -> PatternBuilder<N> {
        PatternBuilder::new()
    }

    /// Appends a step and returns its id.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The pattern already holds `N` steps
    pub fn push(&mut self, color: HexColor, duration: StepDuration) -> Result<StepId, PatternError> {
        let id = StepId(self.next_id);
        self.steps
            .push(Step::new(id, color, duration))
            .map_err(|_| PatternError::CapacityExceeded)?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    /// Removes the step with the given id, keeping the order of the rest.
    pub fn remove(&mut self, id: StepId) -> Option<Step> {
        let index = self.index_of(id)?;
        Some(self.steps.remove(index))
    }

    /// Changes the color of a step.
    pub fn set_color(&mut self, id: StepId, color: HexColor) -> Result<(), PatternError> {
        self.step_mut(id)?.color = color;
        Ok(())
    }

    /// Changes the duration of a step.
    pub fn set_duration(&mut self, id: StepId, duration: StepDuration) -> Result<(), PatternError> {
        self.step_mut(id)?.duration = duration;
        Ok(())
    }

    /// Returns the steps in cycle order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the step with the given id.
    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Returns the number of steps in this pattern.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the pattern has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Color of the first step, if any.
    pub fn first_color(&self) -> Option<HexColor> {
        self.steps.first().map(|step| step.color)
    }

    /// Length of one full cycle in milliseconds.
    pub fn cycle_millis(&self) -> u64 {
        self.steps
            .iter()
            .fold(0u64, |total, step| total.saturating_add(step.duration.as_millis()))
    }

    /// Returns the color active at the given wall-clock time.
    ///
    /// `None` only when the pattern is empty.
    pub fn color_at(&self, epoch_millis: u64) -> Option<HexColor> {
        let total = self.cycle_millis();
        if total == 0 {
            return self.first_color();
        }
        self.position_at(epoch_millis).map(|position| position.color)
    }

    /// Locates the active step at the given wall-clock time.
    ///
    /// Each step owns the half-open interval `[start, start + duration)` of
    /// the cycle, so a reading exactly on a boundary belongs to the later step.
    pub fn position_at(&self, epoch_millis: u64) -> Option<StepPosition> {
        let first = self.steps.first()?;
        let total = self.cycle_millis();
        if total == 0 {
            return Some(StepPosition {
                index: 0,
                id: first.id,
                color: first.color,
                elapsed_millis: 0,
                remaining_millis: 0,
            });
        }

        let time_in_cycle = epoch_millis % total;

        let mut step_start: u64 = 0;
        for (index, step) in self.steps.iter().enumerate() {
            let step_end = step_start.saturating_add(step.duration.as_millis());
            if time_in_cycle < step_end {
                return Some(StepPosition {
                    index,
                    id: step.id,
                    color: step.color,
                    elapsed_millis: time_in_cycle - step_start,
                    remaining_millis: step_end - time_in_cycle,
                });
            }
            step_start = step_end;
        }

        // time_in_cycle < total, so the walk above always matches
        None
    }

    fn index_of(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    fn step_mut(&mut self, id: StepId) -> Result<&mut Step, PatternError> {
        self.steps
            .iter_mut()
            .find(|step| step.id == id)
            .ok_or(PatternError::UnknownStep(id))
    }
}

impl<const N: usize> Default for Pattern<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for Pattern<N> {
    /// Patterns are equal when their steps match, ids included.
    fn eq(&self, other: &Self) -> bool {
        self.steps() == other.steps()
    }
}

/// Builder for constructing patterns in one expression.
#[derive(Debug)]
pub struct PatternBuilder<const N: usize> {
    pattern: Pattern<N>,
}

impl<const N: usize> PatternBuilder<N> {
    /// Creates a new empty pattern builder.
    pub fn new() -> Self {
        Self {
            pattern: Pattern::new(),
        }
    }

    /// Adds a step to the pattern.
    ///
    /// # Errors
    /// * `CapacityExceeded` - More than `N` steps were added
    pub fn step(mut self, color: HexColor, duration: StepDuration) -> Result<Self, PatternError> {
        self.pattern.push(color, duration)?;
        Ok(self)
    }

    /// Finishes the pattern. Empty patterns are allowed.
    pub fn build(self) -> Pattern<N> {
        self.pattern
    }
}

impl<const N: usize> Default for PatternBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
