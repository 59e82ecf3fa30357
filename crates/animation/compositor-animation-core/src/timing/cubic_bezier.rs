//! Unit cubic Bezier with fixed end points (0,0) and (1,1).
//!
//! Solving for a given x uses plain bisection with a bounded step count, so every
//! evaluation terminates in at most [`MAX_STEPS`] iterations.

use serde::{Deserialize, Serialize};

const BEZIER_EPSILON: f64 = 1e-7;
const MAX_STEPS: usize = 30;

/// Cubic Bezier timing curve defined by its two inner control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// B(t) for a curve with end points 0 and 1 and inner points p1, p2.
#[inline]
fn eval_bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let p1_times_3 = 3.0 * p1;
    let p2_times_3 = 3.0 * p2;
    let h3 = p1_times_3;
    let h1 = p1_times_3 - p2_times_3 + 1.0;
    let h2 = p2_times_3 - 6.0 * p1;
    t * (t * (t * h1 + h2) + h3)
}

#[inline]
fn eval_bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let h1 = 9.0 * p1 - 9.0 * p2 + 3.0;
    let h2 = 6.0 * p2 - 12.0 * p1;
    let h3 = 3.0 * p1;
    t * (t * h1 + h2) + h3
}

/// Find t such that B_x(t) = x. The solution is unique while x1, x2 lie in [0, 1].
fn bezier_interp(x1: f64, x2: f64, x: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&x1), "x1 out of range: {x1}");
    debug_assert!((0.0..=1.0).contains(&x2), "x2 out of range: {x2}");
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);
    let x = x.clamp(0.0, 1.0);

    let mut t = 0.0;
    let mut step = 1.0;
    for _ in 0..MAX_STEPS {
        let error = eval_bezier(x1, x2, t) - x;
        if error.abs() < BEZIER_EPSILON {
            break;
        }
        t += if error > 0.0 { -step } else { step };
        step *= 0.5;
    }
    t
}

impl CubicBezier {
    /// # Panics
    /// Debug builds assert that `x1` and `x2` are in `[0, 1]`; release builds clamp.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self { x1, y1, x2, y2 }
    }

    /// Eased y for the given x in [0, 1].
    pub fn solve(&self, x: f64) -> f64 {
        eval_bezier(self.y1, self.y2, bezier_interp(self.x1, self.x2, x))
    }

    /// dy/dx at the given x.
    pub fn slope(&self, x: f64) -> f64 {
        let t = bezier_interp(self.x1, self.x2, x);
        let dx_dt = eval_bezier_derivative(self.x1, self.x2, t);
        let dy_dt = eval_bezier_derivative(self.y1, self.y2, t);
        if dx_dt.abs() < BEZIER_EPSILON {
            // Vertical tangent: report the steepest finite slope available.
            return if dy_dt >= 0.0 { f64::MAX } else { f64::MIN };
        }
        dy_dt / dx_dt
    }

    /// Minimum and maximum y reached for x in [0, 1]. Always contains [0, 1].
    pub fn range(&self) -> (f64, f64) {
        let (mut min, mut max) = (0.0f64, 1.0f64);
        if (0.0..1.0).contains(&self.y1) && (0.0..=1.0).contains(&self.y2) {
            return (min, max);
        }

        // Derivative of B_y in the form a*t^2 + b*t + c.
        let a = 3.0 * (self.y1 - self.y2) + 1.0;
        let b = 2.0 * (self.y2 - 2.0 * self.y1);
        let c = self.y1;

        if a.abs() < BEZIER_EPSILON && b.abs() < BEZIER_EPSILON {
            return (min, max);
        }

        let (t_1, t_2) = if a.abs() < BEZIER_EPSILON {
            (-c / b, 0.0)
        } else {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return (min, max);
            }
            let sqrt_d = discriminant.sqrt();
            ((-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a))
        };

        let mut sol_1 = 0.0;
        let mut sol_2 = 0.0;
        if 0.0 < t_1 && t_1 < 1.0 {
            sol_1 = eval_bezier(self.y1, self.y2, t_1);
        }
        if 0.0 < t_2 && t_2 < 1.0 {
            sol_2 = eval_bezier(self.y1, self.y2, t_2);
        }

        min = min.min(sol_1).min(sol_2);
        max = max.max(sol_1).max(sol_2);
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn linear_control_points_solve_to_identity() {
        let bez = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            approx(bez.solve(x), x, 1e-6);
        }
    }

    #[test]
    fn ease_values_match_reference_points() {
        let ease = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        approx(ease.solve(0.0), 0.0, 1e-6);
        approx(ease.solve(0.25), 0.41, 0.01);
        approx(ease.solve(0.5), 0.8024, 0.01);
        approx(ease.solve(0.75), 0.9604, 0.01);
        approx(ease.solve(1.0), 1.0, 1e-6);
    }

    #[test]
    fn slope_of_ease_in_out_is_symmetric() {
        let bez = CubicBezier::new(0.42, 0.0, 0.58, 1.0);
        approx(bez.slope(0.25), bez.slope(0.75), 1e-4);
        approx(bez.slope(0.0), 0.0, 1e-6);
        assert!(bez.slope(0.5) > 1.0);
    }

    #[test]
    fn range_includes_overshoot() {
        let bez = CubicBezier::new(0.5, -1.0, 0.5, 2.0);
        let (min, max) = bez.range();
        assert!(min < 0.0, "min={min}");
        assert!(max > 1.0, "max={max}");

        let plain = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        assert_eq!(plain.range(), (0.0, 1.0));
    }
}
