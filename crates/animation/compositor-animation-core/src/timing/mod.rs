//! Timing functions: map normalized progress in [0, 1] to eased progress.
//!
//! - `Linear` passes progress through.
//! - `CubicBezier` uses the bisection solver in [`cubic_bezier`].
//! - `Steps` quantizes progress into `steps` jumps placed by [`StepPosition`].

pub mod cubic_bezier;

use serde::{Deserialize, Serialize};

pub use cubic_bezier::CubicBezier;

/// Where the jump of each step happens inside its interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    Start,
    Middle,
    #[default]
    End,
}

impl StepPosition {
    #[inline]
    fn offset(self) -> f64 {
        match self {
            StepPosition::Start => 1.0,
            StepPosition::Middle => 0.5,
            StepPosition::End => 0.0,
        }
    }
}

/// Easing applied to a curve or to one keyframe segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimingFunction {
    #[default]
    Linear,
    CubicBezier(CubicBezier),
    Steps { steps: u32, position: StepPosition },
}

impl TimingFunction {
    pub fn ease() -> Self {
        Self::CubicBezier(CubicBezier::new(0.25, 0.1, 0.25, 1.0))
    }

    pub fn ease_in() -> Self {
        Self::CubicBezier(CubicBezier::new(0.42, 0.0, 1.0, 1.0))
    }

    pub fn ease_out() -> Self {
        Self::CubicBezier(CubicBezier::new(0.0, 0.0, 0.58, 1.0))
    }

    pub fn ease_in_out() -> Self {
        Self::CubicBezier(CubicBezier::new(0.42, 0.0, 0.58, 1.0))
    }

    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::CubicBezier(CubicBezier::new(x1, y1, x2, y2))
    }

    /// # Panics
    /// Panics if `steps` is zero.
    pub fn steps(steps: u32, position: StepPosition) -> Self {
        assert!(steps > 0, "steps timing function needs at least one step");
        Self::Steps { steps, position }
    }

    /// Eased progress for `x`. Bezier input outside [0, 1] is clamped.
    pub fn get_value(&self, x: f64) -> f64 {
        match self {
            TimingFunction::Linear => x,
            TimingFunction::CubicBezier(bez) => bez.solve(x),
            TimingFunction::Steps { steps, position } => {
                let steps = f64::from((*steps).max(1));
                let mut current_step = (steps * x + position.offset()).floor();
                if x >= 0.0 && current_step < 0.0 {
                    current_step = 0.0;
                }
                if x <= 1.0 && current_step > steps {
                    current_step = steps;
                }
                current_step / steps
            }
        }
    }

    /// Derivative of the eased progress at `x`. Steps are flat everywhere.
    pub fn velocity(&self, x: f64) -> f64 {
        match self {
            TimingFunction::Linear => 1.0,
            TimingFunction::CubicBezier(bez) => bez.slope(x),
            TimingFunction::Steps { .. } => 0.0,
        }
    }

    /// Output range over input [0, 1].
    pub fn range(&self) -> (f64, f64) {
        match self {
            TimingFunction::CubicBezier(bez) => bez.range(),
            _ => (0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_end_and_start() {
        let end = TimingFunction::steps(4, StepPosition::End);
        assert_eq!(end.get_value(0.0), 0.0);
        assert_eq!(end.get_value(0.24), 0.0);
        assert_eq!(end.get_value(0.25), 0.25);
        assert_eq!(end.get_value(0.99), 0.75);
        assert_eq!(end.get_value(1.0), 1.0);

        let start = TimingFunction::steps(4, StepPosition::Start);
        assert_eq!(start.get_value(0.0), 0.25);
        assert_eq!(start.get_value(0.5), 0.75);
        assert_eq!(start.get_value(1.0), 1.0);
    }

    #[test]
    fn steps_middle_jumps_halfway() {
        let mid = TimingFunction::steps(2, StepPosition::Middle);
        assert_eq!(mid.get_value(0.0), 0.0);
        assert_eq!(mid.get_value(0.25), 0.5);
        assert_eq!(mid.get_value(0.8), 1.0);
    }

    #[test]
    fn linear_is_identity_with_unit_velocity() {
        let f = TimingFunction::Linear;
        assert_eq!(f.get_value(0.3), 0.3);
        assert_eq!(f.velocity(0.7), 1.0);
        assert_eq!(f.range(), (0.0, 1.0));
    }

    #[test]
    fn serde_tagged_form() {
        let f = TimingFunction::ease_in_out();
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"type\":\"cubic_bezier\""), "{json}");
        let back: TimingFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);

        let steps: TimingFunction =
            serde_json::from_str(r#"{"type":"steps","steps":3,"position":"start"}"#).unwrap();
        assert_eq!(steps, TimingFunction::steps(3, StepPosition::Start));
    }
}
