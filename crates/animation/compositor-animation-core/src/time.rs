//! Monotonic time types.
//!
//! Both types store f64 seconds. `TimeTicks` is a point on a monotonic clock with an
//! arbitrary origin; `TimeDelta` is a signed span between two such points.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Rem, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Signed duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct TimeDelta(f64);

impl TimeDelta {
    pub const ZERO: TimeDelta = TimeDelta(0.0);

    #[inline]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    #[inline]
    pub fn from_millis(milliseconds: f64) -> Self {
        Self(milliseconds / 1000.0)
    }

    #[inline]
    pub fn from_micros(microseconds: f64) -> Self {
        Self(microseconds / 1_000_000.0)
    }

    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn as_millis(&self) -> f64 {
        self.0 * 1000.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl Add for TimeDelta {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for TimeDelta {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for TimeDelta {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for TimeDelta {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for TimeDelta {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for TimeDelta {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for TimeDelta {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// Ratio of two spans.
impl Div for TimeDelta {
    type Output = f64;
    fn div(self, rhs: Self) -> f64 {
        self.0 / rhs.0
    }
}

/// Remainder with the sign of the dividend.
impl Rem for TimeDelta {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        Self(self.0 % rhs.0)
    }
}

/// A point on the monotonic clock, in seconds from an arbitrary origin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct TimeTicks(f64);

impl TimeTicks {
    #[inline]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    #[inline]
    pub fn from_millis(milliseconds: f64) -> Self {
        Self(milliseconds / 1000.0)
    }

    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0
    }

    /// Span from the clock origin to this instant.
    #[inline]
    pub fn since_origin(&self) -> TimeDelta {
        TimeDelta(self.0)
    }
}

impl Add<TimeDelta> for TimeTicks {
    type Output = Self;
    fn add(self, rhs: TimeDelta) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<TimeDelta> for TimeTicks {
    fn add_assign(&mut self, rhs: TimeDelta) {
        self.0 += rhs.0;
    }
}

impl Sub<TimeDelta> for TimeTicks {
    type Output = Self;
    fn sub(self, rhs: TimeDelta) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for TimeTicks {
    type Output = TimeDelta;
    fn sub(self, rhs: Self) -> TimeDelta {
        TimeDelta(self.0 - rhs.0)
    }
}
