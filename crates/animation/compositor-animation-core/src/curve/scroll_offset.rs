//! Scroll offset curve with distance-derived duration and mid-flight retargeting.
//!
//! Retargeting keeps the position continuous and carries the current velocity
//! into the new segment by shaping the new ease-out Bezier's initial slope.

use serde::{Deserialize, Serialize};

use crate::geometry::{ScrollOffset, Vector2d};
use crate::time::TimeDelta;
use crate::timing::TimingFunction;
use crate::tween::scroll_offset_value_between;

const DURATION_DIVISOR: f64 = 60.0;
const CONSTANT_DURATION: f64 = 9.0;

const INVERSE_DELTA_RAMP_START_PX: f64 = 120.0;
const INVERSE_DELTA_RAMP_END_PX: f64 = 480.0;
const INVERSE_DELTA_MIN_DURATION: f64 = 6.0;
const INVERSE_DELTA_MAX_DURATION: f64 = 12.0;
const INVERSE_DELTA_SLOPE: f64 = (INVERSE_DELTA_MIN_DURATION - INVERSE_DELTA_MAX_DURATION)
    / (INVERSE_DELTA_RAMP_END_PX - INVERSE_DELTA_RAMP_START_PX);
const INVERSE_DELTA_OFFSET: f64 =
    INVERSE_DELTA_MAX_DURATION - INVERSE_DELTA_RAMP_START_PX * INVERSE_DELTA_SLOPE;

const MAX_INITIAL_VELOCITY: f64 = 1000.0;

/// How a segment's duration follows from its scroll distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DurationBehavior {
    /// `sqrt(distance) / 60` seconds.
    #[default]
    DeltaBased,
    /// Always 9/60 seconds.
    Constant,
    /// Shorter for longer distances, between 6/60 and 12/60 seconds.
    InverseDelta,
}

/// The component of larger magnitude, keeping its sign.
#[inline]
fn maximum_dimension(delta: Vector2d) -> f64 {
    if delta.x.abs() > delta.y.abs() {
        delta.x
    } else {
        delta.y
    }
}

fn segment_duration(delta: Vector2d, behavior: DurationBehavior) -> TimeDelta {
    let frames = match behavior {
        DurationBehavior::Constant => CONSTANT_DURATION,
        DurationBehavior::DeltaBased => maximum_dimension(delta).abs().sqrt(),
        DurationBehavior::InverseDelta => (INVERSE_DELTA_OFFSET
            + maximum_dimension(delta).abs() * INVERSE_DELTA_SLOPE)
            .clamp(INVERSE_DELTA_MIN_DURATION, INVERSE_DELTA_MAX_DURATION),
    };
    TimeDelta::from_seconds(frames / DURATION_DIVISOR)
}

/// Ease-out Bezier whose slope at progress 0 equals `velocity`.
fn ease_out_with_initial_velocity(velocity: f64) -> TimingFunction {
    let velocity = velocity.clamp(-MAX_INITIAL_VELOCITY, MAX_INITIAL_VELOCITY);
    TimingFunction::cubic_bezier(0.42, 0.42 * velocity, 0.58, 1.0)
}

/// Animated scroll from an initial offset to a target offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffsetAnimationCurve {
    initial_value: ScrollOffset,
    target_value: ScrollOffset,
    total_animation_duration: TimeDelta,
    /// Local time of the most recent retarget; evaluation is relative to it.
    last_retarget: TimeDelta,
    timing_function: TimingFunction,
    duration_behavior: DurationBehavior,
    has_set_initial_value: bool,
}

impl ScrollOffsetAnimationCurve {
    /// A curve toward `target_value`. Its duration is known once the initial value is set.
    pub fn new(
        target_value: ScrollOffset,
        timing_function: TimingFunction,
        duration_behavior: DurationBehavior,
    ) -> Self {
        Self {
            initial_value: ScrollOffset::default(),
            target_value,
            total_animation_duration: TimeDelta::ZERO,
            last_retarget: TimeDelta::ZERO,
            timing_function,
            duration_behavior,
            has_set_initial_value: false,
        }
    }

    /// Set the start offset and derive the duration from the distance to the target.
    pub fn set_initial_value(&mut self, initial_value: ScrollOffset) {
        self.initial_value = initial_value;
        self.has_set_initial_value = true;
        self.total_animation_duration =
            segment_duration(self.target_value - self.initial_value, self.duration_behavior);
    }

    pub fn has_set_initial_value(&self) -> bool {
        self.has_set_initial_value
    }

    pub fn initial_value(&self) -> ScrollOffset {
        self.initial_value
    }

    pub fn target_value(&self) -> ScrollOffset {
        self.target_value
    }

    pub fn timing_function(&self) -> &TimingFunction {
        &self.timing_function
    }

    pub fn duration_behavior(&self) -> DurationBehavior {
        self.duration_behavior
    }

    /// Local end time, measured from the start of the first segment.
    pub fn duration(&self) -> TimeDelta {
        self.total_animation_duration
    }

    fn segment_length(&self) -> TimeDelta {
        self.total_animation_duration - self.last_retarget
    }

    pub fn get_value(&self, t: TimeDelta) -> ScrollOffset {
        let duration = self.segment_length();
        let t = t - self.last_retarget;
        if t <= TimeDelta::ZERO {
            return self.initial_value;
        }
        if t >= duration {
            return self.target_value;
        }
        let progress = self.timing_function.get_value(t / duration);
        scroll_offset_value_between(progress, self.initial_value, self.target_value)
    }

    /// Velocity in pixels per second at local time `t`.
    pub fn velocity_at(&self, t: TimeDelta) -> Vector2d {
        let duration = self.segment_length();
        let t = t - self.last_retarget;
        if duration <= TimeDelta::ZERO || t < TimeDelta::ZERO || t > duration {
            return Vector2d::default();
        }
        let slope = self.timing_function.velocity(t / duration);
        (self.target_value - self.initial_value) * (slope / duration.as_seconds())
    }

    /// Redirect toward `new_target` starting at local time `t`.
    ///
    /// Position is continuous at `t`. Velocity is carried along the dominant axis of
    /// each segment's delta.
    pub fn update_target(&mut self, t: TimeDelta, new_target: ScrollOffset) {
        let current_position = self.get_value(t);
        let old_delta = self.target_value - self.initial_value;
        let new_delta = new_target - current_position;

        let old_duration = self.segment_length().as_seconds();
        let new_duration = segment_duration(new_delta, self.duration_behavior).as_seconds();

        let old_velocity = if old_duration > 0.0 {
            self.timing_function
                .velocity((t - self.last_retarget).as_seconds() / old_duration)
        } else {
            0.0
        };

        let new_max = maximum_dimension(new_delta);
        let new_velocity = if old_duration > 0.0 && new_duration > 0.0 && new_max != 0.0 {
            old_velocity * (new_duration / old_duration) * (maximum_dimension(old_delta) / new_max)
        } else {
            0.0
        };

        log::trace!(
            "scroll retarget at {}s: velocity {old_velocity} -> {new_velocity}, duration {new_duration}s",
            t.as_seconds()
        );

        self.initial_value = current_position;
        self.target_value = new_target;
        self.total_animation_duration = t + TimeDelta::from_seconds(new_duration);
        self.last_retarget = t;
        self.timing_function = ease_out_with_initial_velocity(new_velocity);
    }
}
