//! Compositor animation core (engine-agnostic)
//!
//! Schedules keyframed animations attached to render targets, ticks them once per
//! frame and pushes interpolated transform, opacity, filter and scroll offset values
//! to a value sink. Animations are authored on a control schedule and run on a
//! render schedule; the two meet only through [`commit::CommitDiff`] values and
//! [`events::AnimationEvent`] lists.

pub mod animation;
pub mod commit;
pub mod config;
pub mod controller;
pub mod curve;
pub mod error;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod observers;
pub mod registry;
pub mod time;
pub mod timing;
pub mod transform;
pub mod tween;

use serde::{Deserialize, Serialize};

// Re-exports for consumers (hosts and sinks)
pub use animation::{Animation, Direction, FillMode, RunState};
pub use commit::{CommitDiff, PauseState, TargetCommit};
pub use config::HostConfig;
pub use controller::AnimationController;
pub use curve::{
    AnimationCurve, CurveKind, DurationBehavior, Keyframe, KeyframedColorAnimationCurve,
    KeyframedFilterAnimationCurve, KeyframedFloatAnimationCurve, KeyframedTransformAnimationCurve,
    ScrollOffsetAnimationCurve,
};
pub use error::{AnimationError, BlendError};
pub use events::{AnimationEvent, AnimationEventKind, EventPayload};
pub use filter::{FilterOperation, FilterOperations};
pub use geometry::{BoxF, Color, Point3, ScrollOffset, Vector2d};
pub use host::{AnimationHost, Schedule};
pub use ids::{AnimationId, GroupId, IdProvider, TargetId};
pub use observers::{EventSink, ObserverSet, TargetTree, ValueProvider, ValueSink};
pub use registry::AnimationRegistry;
pub use time::{TimeDelta, TimeTicks};
pub use timing::{CubicBezier, StepPosition, TimingFunction};
pub use transform::{Transform, TransformOperation, TransformOperations};

/// Result alias for fallible host and registry calls.
pub type Result<T> = core::result::Result<T, AnimationError>;

/// The render target property an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetProperty {
    Transform,
    Opacity,
    Filter,
    ScrollOffset,
    BackgroundColor,
}

impl TargetProperty {
    pub const ALL: [TargetProperty; 5] = [
        TargetProperty::Transform,
        TargetProperty::Opacity,
        TargetProperty::Filter,
        TargetProperty::ScrollOffset,
        TargetProperty::BackgroundColor,
    ];

    /// Curve kind that can drive this property.
    pub fn curve_kind(self) -> CurveKind {
        match self {
            TargetProperty::Transform => CurveKind::Transform,
            TargetProperty::Opacity => CurveKind::Float,
            TargetProperty::Filter => CurveKind::Filter,
            TargetProperty::ScrollOffset => CurveKind::ScrollOffset,
            TargetProperty::BackgroundColor => CurveKind::Color,
        }
    }
}
