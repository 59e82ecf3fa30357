//! Value blending helpers used by keyframed curves:
//! - linear scalars (`f64`, `f32`)
//! - rounded integers
//! - premultiplied-alpha color blend
//! - component-wise 2D values

use crate::geometry::{Color, ScrollOffset, Vector2d};

#[inline]
pub fn lerp(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

#[inline]
pub fn lerp_f32(from: f32, to: f32, progress: f64) -> f32 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * progress) as f32
}

/// Linear blend rounded to the nearest integer.
#[inline]
pub fn int_value_between(progress: f64, from: i32, to: i32) -> i32 {
    lerp(f64::from(from), f64::from(to), progress).round() as i32
}

#[inline]
fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Blend two straight-alpha colors in premultiplied space.
///
/// Returns fully transparent when the blended alpha is not positive.
pub fn color_value_between(progress: f64, from: Color, to: Color) -> Color {
    let start_a = f64::from(from.a) / 255.0;
    let end_a = f64::from(to.a) / 255.0;
    let blended_a = lerp(start_a, end_a, progress);
    if blended_a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let blended_a = blended_a.min(1.0);

    let channel = |s: u8, e: u8| {
        let premultiplied = lerp(f64::from(s) * start_a, f64::from(e) * end_a, progress);
        to_byte(premultiplied / blended_a)
    };

    Color::rgba(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
        to_byte(blended_a * 255.0),
    )
}

#[inline]
pub fn vector_value_between(progress: f64, from: Vector2d, to: Vector2d) -> Vector2d {
    Vector2d::new(lerp(from.x, to.x, progress), lerp(from.y, to.y, progress))
}

#[inline]
pub fn scroll_offset_value_between(
    progress: f64,
    from: ScrollOffset,
    to: ScrollOffset,
) -> ScrollOffset {
    ScrollOffset::new(lerp(from.x, to.x, progress), lerp(from.y, to.y, progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_rounds_to_nearest() {
        assert_eq!(int_value_between(0.5, 0, 3), 2);
        assert_eq!(int_value_between(0.25, 0, 3), 1);
        assert_eq!(int_value_between(0.0, -4, 4), -4);
    }

    #[test]
    fn color_blend_fades_through_premultiplied_space() {
        let red = Color::rgba(255, 0, 0, 255);
        let clear = Color::TRANSPARENT;
        // Fading to transparent keeps the hue instead of darkening toward black.
        let mid = color_value_between(0.5, red, clear);
        assert_eq!(mid, Color::rgba(255, 0, 0, 128));
        assert_eq!(color_value_between(1.0, red, clear), Color::TRANSPARENT);
    }

    #[test]
    fn color_blend_opaque_is_plain_lerp() {
        let a = Color::rgba(0, 100, 200, 255);
        let b = Color::rgba(100, 200, 0, 255);
        assert_eq!(color_value_between(0.5, a, b), Color::rgba(50, 150, 100, 255));
    }

    #[test]
    fn f32_lerp_matches_f64() {
        assert_eq!(lerp_f32(0.0, 1.0, 0.25), 0.25);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }
}
