//! Animation state machine and local time conversion.
//!
//! ```text
//! WaitingForTargetAvailability -> Starting -> Running <-> Paused
//!                                               |
//!                                   Finished | Aborted -> WaitingForDeletion
//! ```

use serde::{Deserialize, Serialize};

use crate::commit::PauseState;
use crate::curve::AnimationCurve;
use crate::ids::{AnimationId, GroupId};
use crate::time::{TimeDelta, TimeTicks};
use crate::TargetProperty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    WaitingForTargetAvailability,
    WaitingForDeletion,
    Starting,
    Running,
    Paused,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    None,
    Forwards,
    Backwards,
    #[default]
    Both,
}

/// One running instance of a curve bound to a target property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    id: AnimationId,
    group: GroupId,
    target_property: TargetProperty,
    run_state: RunState,
    /// Negative means infinite.
    iterations: f64,
    iteration_start: f64,
    direction: Direction,
    fill_mode: FillMode,
    playback_rate: f64,
    start_time: Option<TimeTicks>,
    time_offset: TimeDelta,
    /// Instant (already shifted by `time_offset`) at which the animation was paused.
    pause_time: TimeTicks,
    total_paused_time: TimeDelta,
    curve: AnimationCurve,

    /// Set on a control-side animation until the render side reports its start time.
    needs_synchronized_start_time: bool,
    received_finished_event: bool,
    /// The render-side clone; it decides when FINISHED is sent.
    is_controlling_instance: bool,
    is_impl_only: bool,
    affects_active_observers: bool,
    affects_pending_observers: bool,
}

impl Animation {
    /// New animation in `WaitingForTargetAvailability`, one iteration, normal direction,
    /// fill both, rate 1.
    pub fn new(
        curve: AnimationCurve,
        id: AnimationId,
        group: GroupId,
        target_property: TargetProperty,
    ) -> Self {
        debug_assert!(
            curve.kind().can_animate(target_property),
            "{:?} curve cannot animate {:?}",
            curve.kind(),
            target_property
        );
        Self {
            id,
            group,
            target_property,
            run_state: RunState::WaitingForTargetAvailability,
            iterations: 1.0,
            iteration_start: 0.0,
            direction: Direction::Normal,
            fill_mode: FillMode::Both,
            playback_rate: 1.0,
            start_time: None,
            time_offset: TimeDelta::ZERO,
            pause_time: TimeTicks::default(),
            total_paused_time: TimeDelta::ZERO,
            curve,
            needs_synchronized_start_time: false,
            received_finished_event: false,
            is_controlling_instance: false,
            is_impl_only: false,
            affects_active_observers: true,
            affects_pending_observers: true,
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn target_property(&self) -> TargetProperty {
        self.target_property
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn curve(&self) -> &AnimationCurve {
        &self.curve
    }

    pub fn curve_mut(&mut self) -> &mut AnimationCurve {
        &mut self.curve
    }

    pub fn iterations(&self) -> f64 {
        self.iterations
    }

    /// Negative for infinite.
    pub fn set_iterations(&mut self, iterations: f64) {
        self.iterations = iterations;
    }

    pub fn iteration_start(&self) -> f64 {
        self.iteration_start
    }

    /// # Panics
    /// Panics if `iteration_start` is negative.
    pub fn set_iteration_start(&mut self, iteration_start: f64) {
        assert!(iteration_start >= 0.0, "iteration start must be non-negative");
        self.iteration_start = iteration_start;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// # Panics
    /// Panics if `playback_rate` is zero.
    pub fn set_playback_rate(&mut self, playback_rate: f64) {
        assert!(playback_rate != 0.0, "playback rate must be non-zero");
        self.playback_rate = playback_rate;
    }

    pub fn start_time(&self) -> Option<TimeTicks> {
        self.start_time
    }

    pub fn has_set_start_time(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn set_start_time(&mut self, start_time: TimeTicks) {
        self.start_time = Some(start_time);
    }

    pub fn time_offset(&self) -> TimeDelta {
        self.time_offset
    }

    pub fn set_time_offset(&mut self, time_offset: TimeDelta) {
        self.time_offset = time_offset;
    }

    pub fn total_paused_time(&self) -> TimeDelta {
        self.total_paused_time
    }

    pub fn needs_synchronized_start_time(&self) -> bool {
        self.needs_synchronized_start_time
    }

    pub fn set_needs_synchronized_start_time(&mut self, needs: bool) {
        self.needs_synchronized_start_time = needs;
    }

    pub fn received_finished_event(&self) -> bool {
        self.received_finished_event
    }

    pub fn set_received_finished_event(&mut self, received: bool) {
        self.received_finished_event = received;
    }

    pub fn is_controlling_instance(&self) -> bool {
        self.is_controlling_instance
    }

    pub fn is_impl_only(&self) -> bool {
        self.is_impl_only
    }

    pub fn set_is_impl_only(&mut self, is_impl_only: bool) {
        self.is_impl_only = is_impl_only;
    }

    pub fn affects_active_observers(&self) -> bool {
        self.affects_active_observers
    }

    pub fn set_affects_active_observers(&mut self, affects: bool) {
        self.affects_active_observers = affects;
    }

    pub fn affects_pending_observers(&self) -> bool {
        self.affects_pending_observers
    }

    pub fn set_affects_pending_observers(&mut self, affects: bool) {
        self.affects_pending_observers = affects;
    }

    /// Finished, aborted or waiting for deletion.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.run_state,
            RunState::Finished | RunState::Aborted | RunState::WaitingForDeletion
        )
    }

    /// Move to `run_state` at `monotonic_time`, keeping paused time out of the active time.
    pub fn set_run_state(&mut self, run_state: RunState, monotonic_time: TimeTicks) {
        let local_now = monotonic_time + self.time_offset;
        if run_state == RunState::Running && self.run_state == RunState::Paused {
            self.total_paused_time += local_now - self.pause_time;
        } else if run_state == RunState::Paused {
            self.pause_time = local_now;
        }
        if self.run_state != run_state {
            log::trace!(
                "{} ({:?}, {}): {:?} -> {:?}",
                self.id,
                self.target_property,
                self.group,
                self.run_state,
                run_state
            );
        }
        self.run_state = run_state;
    }

    /// Pause so that the active time reads `local_time`.
    pub fn pause(&mut self, local_time: TimeDelta) {
        let start = self.start_time.unwrap_or_default();
        self.run_state = RunState::Paused;
        self.pause_time = start + self.total_paused_time + local_time;
    }

    /// Abort at `monotonic_time`.
    pub fn abort(&mut self, monotonic_time: TimeTicks) {
        self.set_run_state(RunState::Aborted, monotonic_time);
    }

    /// Time since the start, minus time spent paused. May be negative.
    pub fn convert_to_active_time(&self, monotonic_time: TimeTicks) -> TimeDelta {
        if (self.run_state == RunState::Starting && !self.has_set_start_time())
            || self.needs_synchronized_start_time
        {
            return self.time_offset;
        }
        let trimmed = if self.run_state == RunState::Paused {
            self.pause_time
        } else {
            monotonic_time + self.time_offset
        };
        trimmed - self.start_time.unwrap_or_default() - self.total_paused_time
    }

    /// Curve time for `monotonic_time`, adjusted for iterations, rate and direction.
    pub fn trim_time_to_current_iteration(&self, monotonic_time: TimeTicks) -> TimeDelta {
        let active_time = self.convert_to_active_time(monotonic_time);
        let duration = self.curve.duration();
        let start_offset = duration * self.iteration_start;

        if active_time < TimeDelta::ZERO {
            return start_offset;
        }
        if self.iterations == 0.0 {
            return TimeDelta::ZERO;
        }
        if duration <= TimeDelta::ZERO {
            return TimeDelta::ZERO;
        }

        let infinite = self.iterations < 0.0;
        let rate = self.playback_rate;
        // Infinite repetition has no end to play back from, so a negative rate plays
        // every iteration backwards instead.
        let play_backwards_infinitely = infinite && rate < 0.0;

        let repeated_duration = duration * self.iterations;
        let active_duration = repeated_duration / rate.abs();

        let mut active_time = active_time;
        if !infinite && active_time >= active_duration {
            active_time = active_duration;
        }

        let scaled_active_time = if rate < 0.0 && !infinite {
            (active_time - active_duration) * rate + start_offset
        } else {
            active_time * rate.abs() + start_offset
        };

        let ends_on_iteration_boundary = ((self.iterations + self.iteration_start) % 1.0) == 0.0;
        let mut iteration_time = if !infinite
            && scaled_active_time - start_offset == repeated_duration
            && ends_on_iteration_boundary
        {
            duration
        } else {
            scaled_active_time % duration
        };

        let iteration = if scaled_active_time <= TimeDelta::ZERO {
            0
        } else if iteration_time == duration {
            (self.iteration_start + self.iterations - 1.0).ceil() as i64
        } else {
            (scaled_active_time / duration) as i64
        };

        let odd = iteration % 2 == 1;
        let mut reverse = match self.direction {
            Direction::Normal => false,
            Direction::Reverse => true,
            Direction::Alternate => odd,
            Direction::AlternateReverse => !odd,
        };
        if play_backwards_infinitely {
            reverse = !reverse;
        }
        if reverse {
            iteration_time = duration - iteration_time;
        }
        iteration_time
    }

    /// Whether the animation contributes a value at `monotonic_time`.
    pub fn in_effect(&self, monotonic_time: TimeTicks) -> bool {
        self.convert_to_active_time(monotonic_time) >= TimeDelta::ZERO
            || matches!(self.fill_mode, FillMode::Both | FillMode::Backwards)
    }

    /// Whether a running animation has played all its iterations by `monotonic_time`.
    pub fn is_finished_at(&self, monotonic_time: TimeTicks) -> bool {
        if self.is_finished() {
            return true;
        }
        if self.needs_synchronized_start_time {
            return false;
        }
        let elapsed = monotonic_time + self.time_offset
            - self.start_time.unwrap_or_default()
            - self.total_paused_time;
        self.run_state == RunState::Running
            && self.iterations >= 0.0
            && self.curve.duration() * (self.iterations / self.playback_rate.abs()) <= elapsed
    }

    /// Deep copy for the other schedule. The copy is the controlling instance.
    pub fn clone_and_initialize(&self, initial_run_state: RunState) -> Animation {
        let mut copy = Animation::new(
            self.curve.clone(),
            self.id,
            self.group,
            self.target_property,
        );
        copy.run_state = initial_run_state;
        copy.iterations = self.iterations;
        copy.iteration_start = self.iteration_start;
        copy.start_time = self.start_time;
        copy.pause_time = self.pause_time;
        copy.total_paused_time = self.total_paused_time;
        copy.time_offset = self.time_offset;
        copy.direction = self.direction;
        copy.playback_rate = self.playback_rate;
        copy.fill_mode = self.fill_mode;
        debug_assert!(!copy.is_controlling_instance);
        copy.is_controlling_instance = true;
        copy
    }

    /// Pause/resume state as carried by a commit.
    pub fn pause_state(&self) -> PauseState {
        PauseState {
            id: self.id,
            run_state: self.run_state,
            pause_time: self.pause_time,
            total_paused_time: self.total_paused_time,
        }
    }

    /// Adopt `state` if either side is paused.
    pub fn apply_pause_state(&mut self, state: &PauseState) {
        if state.run_state == RunState::Paused || self.run_state == RunState::Paused {
            self.run_state = state.run_state;
            self.pause_time = state.pause_time;
            self.total_paused_time = state.total_paused_time;
        }
    }

    /// Push pause/resume state to the other schedule's instance.
    pub fn push_properties_to(&self, other: &mut Animation) {
        other.apply_pause_state(&self.pause_state());
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        if matches!(self.run_state, RunState::Running | RunState::Paused) {
            log::debug!("{} dropped while {:?}; aborting", self.id, self.run_state);
            self.set_run_state(RunState::Aborted, TimeTicks::default());
        }
    }
}
