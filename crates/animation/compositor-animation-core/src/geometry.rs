//! Small value types shared by curves and sinks.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2d {
    pub x: f64,
    pub y: f64,
}

impl Vector2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Vector2d {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2d {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2d {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Scroll position of a target, in pixels from its origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise clamp into `[0, max]`.
    pub fn clamped_to(self, max: ScrollOffset) -> Self {
        Self::new(self.x.clamp(0.0, max.x.max(0.0)), self.y.clamp(0.0, max.y.max(0.0)))
    }
}

impl Add<Vector2d> for ScrollOffset {
    type Output = Self;
    fn add(self, rhs: Vector2d) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ScrollOffset {
    type Output = Vector2d;
    fn sub(self, rhs: Self) -> Vector2d {
        Vector2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 3D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned 3D box given by its origin and non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxF {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl BoxF {
    pub const fn new(x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self {
            x,
            y,
            z,
            width,
            height,
            depth,
        }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, 0.0, width, height, 0.0)
    }

    pub fn origin(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn max_corner(&self) -> Point3 {
        Point3::new(self.x + self.width, self.y + self.height, self.z + self.depth)
    }

    pub fn corners(&self) -> [Point3; 8] {
        let (x0, y0, z0) = (self.x, self.y, self.z);
        let max = self.max_corner();
        [
            Point3::new(x0, y0, z0),
            Point3::new(max.x, y0, z0),
            Point3::new(x0, max.y, z0),
            Point3::new(max.x, max.y, z0),
            Point3::new(x0, y0, max.z),
            Point3::new(max.x, y0, max.z),
            Point3::new(x0, max.y, max.z),
            Point3::new(max.x, max.y, max.z),
        ]
    }

    /// Smallest box containing all `points`. Returns an empty box at the origin for no points.
    pub fn bounding(points: &[Point3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Self::new(min.x, min.y, min.z, max.x - min.x, max.y - min.y, max.z - min.z)
    }

    /// Grow to contain `point`.
    pub fn expand_to(&mut self, point: Point3) {
        let points = [self.origin(), self.max_corner(), point];
        *self = Self::bounding(&points);
    }

    /// Grow to contain `other`.
    pub fn union(&mut self, other: &BoxF) {
        let points = [self.origin(), self.max_corner(), other.origin(), other.max_corner()];
        *self = Self::bounding(&points);
    }
}

/// 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_of_corners_round_trips() {
        let b = BoxF::new(-1.0, 2.0, 0.0, 3.0, 4.0, 5.0);
        assert_eq!(BoxF::bounding(&b.corners()), b);
    }

    #[test]
    fn union_and_expand() {
        let mut b = BoxF::from_rect(0.0, 0.0, 10.0, 10.0);
        b.union(&BoxF::from_rect(5.0, -5.0, 10.0, 10.0));
        assert_eq!(b, BoxF::from_rect(0.0, -5.0, 15.0, 15.0));
        b.expand_to(Point3::new(0.0, 0.0, 2.0));
        assert_eq!(b.depth, 2.0);
    }

    #[test]
    fn scroll_offset_clamp() {
        let max = ScrollOffset::new(100.0, 50.0);
        assert_eq!(
            ScrollOffset::new(-5.0, 80.0).clamped_to(max),
            ScrollOffset::new(0.0, 50.0)
        );
    }
}
