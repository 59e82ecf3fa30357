//! Animation curves as one closed tagged union.

pub mod keyframed;
pub mod scroll_offset;

use serde::{Deserialize, Serialize};

use crate::time::TimeDelta;
use crate::TargetProperty;

pub use keyframed::{
    Keyframe, KeyframeValue, KeyframedAnimationCurve, KeyframedColorAnimationCurve,
    KeyframedFilterAnimationCurve, KeyframedFloatAnimationCurve, KeyframedTransformAnimationCurve,
};
pub use scroll_offset::{DurationBehavior, ScrollOffsetAnimationCurve};

/// Value family a curve produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    Color,
    Float,
    Transform,
    Filter,
    ScrollOffset,
}

impl CurveKind {
    /// Whether a curve of this kind can drive `property`.
    pub fn can_animate(self, property: TargetProperty) -> bool {
        property.curve_kind() == self
    }
}

/// An animation curve. Each animation owns its curve exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "curve", rename_all = "snake_case")]
pub enum AnimationCurve {
    Color(KeyframedColorAnimationCurve),
    Float(KeyframedFloatAnimationCurve),
    Transform(KeyframedTransformAnimationCurve),
    Filter(KeyframedFilterAnimationCurve),
    ScrollOffset(ScrollOffsetAnimationCurve),
}

impl AnimationCurve {
    pub fn kind(&self) -> CurveKind {
        match self {
            AnimationCurve::Color(_) => CurveKind::Color,
            AnimationCurve::Float(_) => CurveKind::Float,
            AnimationCurve::Transform(_) => CurveKind::Transform,
            AnimationCurve::Filter(_) => CurveKind::Filter,
            AnimationCurve::ScrollOffset(_) => CurveKind::ScrollOffset,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        match self {
            AnimationCurve::Color(c) => c.duration(),
            AnimationCurve::Float(c) => c.duration(),
            AnimationCurve::Transform(c) => c.duration(),
            AnimationCurve::Filter(c) => c.duration(),
            AnimationCurve::ScrollOffset(c) => c.duration(),
        }
    }

    /// Check keyframe ordering for the keyframed variants.
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            AnimationCurve::Color(c) => c.validate(),
            AnimationCurve::Float(c) => c.validate(),
            AnimationCurve::Transform(c) => c.validate(),
            AnimationCurve::Filter(c) => c.validate(),
            AnimationCurve::ScrollOffset(_) => Ok(()),
        }
    }

    pub fn as_color(&self) -> Option<&KeyframedColorAnimationCurve> {
        match self {
            AnimationCurve::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&KeyframedFloatAnimationCurve> {
        match self {
            AnimationCurve::Float(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&KeyframedTransformAnimationCurve> {
        match self {
            AnimationCurve::Transform(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&KeyframedFilterAnimationCurve> {
        match self {
            AnimationCurve::Filter(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scroll_offset(&self) -> Option<&ScrollOffsetAnimationCurve> {
        match self {
            AnimationCurve::ScrollOffset(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scroll_offset_mut(&mut self) -> Option<&mut ScrollOffsetAnimationCurve> {
        match self {
            AnimationCurve::ScrollOffset(c) => Some(c),
            _ => None,
        }
    }
}

impl From<KeyframedColorAnimationCurve> for AnimationCurve {
    fn from(curve: KeyframedColorAnimationCurve) -> Self {
        AnimationCurve::Color(curve)
    }
}

impl From<KeyframedFloatAnimationCurve> for AnimationCurve {
    fn from(curve: KeyframedFloatAnimationCurve) -> Self {
        AnimationCurve::Float(curve)
    }
}

impl From<KeyframedTransformAnimationCurve> for AnimationCurve {
    fn from(curve: KeyframedTransformAnimationCurve) -> Self {
        AnimationCurve::Transform(curve)
    }
}

impl From<KeyframedFilterAnimationCurve> for AnimationCurve {
    fn from(curve: KeyframedFilterAnimationCurve) -> Self {
        AnimationCurve::Filter(curve)
    }
}

impl From<ScrollOffsetAnimationCurve> for AnimationCurve {
    fn from(curve: ScrollOffsetAnimationCurve) -> Self {
        AnimationCurve::ScrollOffset(curve)
    }
}
