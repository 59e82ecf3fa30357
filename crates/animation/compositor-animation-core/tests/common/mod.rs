//! Recording collaborators shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use compositor_animation_core::{
    Animation, EventSink, FilterOperations, GroupId, IdProvider, Keyframe,
    KeyframedFloatAnimationCurve, ObserverSet, ScrollOffset, TargetId, TargetProperty,
    TargetTree, TimeDelta, TimeTicks, Transform, ValueProvider, ValueSink,
};

pub fn secs(s: f64) -> TimeDelta {
    TimeDelta::from_seconds(s)
}

pub fn ticks(s: f64) -> TimeTicks {
    TimeTicks::from_seconds(s)
}

pub fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn float_curve(points: &[(f64, f64)]) -> KeyframedFloatAnimationCurve {
    let mut curve = KeyframedFloatAnimationCurve::new();
    for &(time, value) in points {
        curve.add_keyframe(Keyframe::new(secs(time), value, None));
    }
    curve
}

/// Opacity 0 -> 1 over one second with a fresh id.
pub fn opacity_animation(group: GroupId) -> Animation {
    Animation::new(
        float_curve(&[(0.0, 0.0), (1.0, 1.0)]).into(),
        IdProvider::next_animation_id(),
        group,
        TargetProperty::Opacity,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Opacity(TargetId, ObserverSet, f64),
    Transform(TargetId, ObserverSet, Transform),
    Filters(TargetId, ObserverSet, FilterOperations),
    ScrollOffset(TargetId, ObserverSet, ScrollOffset),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn shared() -> Rc<RefCell<RecordingSink>> {
        Rc::new(RefCell::new(RecordingSink::default()))
    }

    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn opacities(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Opacity(_, _, value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    pub fn scroll_offsets(&self) -> Vec<ScrollOffset> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::ScrollOffset(_, _, value) => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl ValueSink for RecordingSink {
    fn set_opacity(&mut self, target: TargetId, observers: ObserverSet, opacity: f64) {
        self.calls.push(SinkCall::Opacity(target, observers, opacity));
    }

    fn set_transform(&mut self, target: TargetId, observers: ObserverSet, transform: &Transform) {
        self.calls
            .push(SinkCall::Transform(target, observers, *transform));
    }

    fn set_filters(&mut self, target: TargetId, observers: ObserverSet, filters: &FilterOperations) {
        self.calls
            .push(SinkCall::Filters(target, observers, filters.clone()));
    }

    fn set_scroll_offset(&mut self, target: TargetId, observers: ObserverSet, offset: ScrollOffset) {
        self.calls
            .push(SinkCall::ScrollOffset(target, observers, offset));
    }
}

#[derive(Debug, Default)]
pub struct RecordingEvents {
    pub started: Vec<(TimeTicks, TargetProperty, GroupId)>,
    pub finished: Vec<(TimeTicks, TargetProperty, GroupId)>,
    pub aborted: Vec<(TimeTicks, TargetProperty, GroupId)>,
}

impl RecordingEvents {
    pub fn shared() -> Rc<RefCell<RecordingEvents>> {
        Rc::new(RefCell::new(RecordingEvents::default()))
    }
}

impl EventSink for RecordingEvents {
    fn on_started(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId) {
        self.started.push((monotonic_time, property, group));
    }

    fn on_finished(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId) {
        self.finished.push((monotonic_time, property, group));
    }

    fn on_aborted(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId) {
        self.aborted.push((monotonic_time, property, group));
    }
}

/// Value provider reporting a fixed scroll offset.
pub struct FixedScroll(pub ScrollOffset);

impl ValueProvider for FixedScroll {
    fn scroll_offset_for_animation(&self, _target: TargetId) -> ScrollOffset {
        self.0
    }
}

/// Target tree with explicit membership per observer set.
#[derive(Debug, Default)]
pub struct StaticTree {
    pub active: Vec<TargetId>,
    pub pending: Vec<TargetId>,
}

impl StaticTree {
    pub fn both(targets: &[TargetId]) -> Self {
        Self {
            active: targets.to_vec(),
            pending: targets.to_vec(),
        }
    }
}

impl TargetTree for StaticTree {
    fn target_in_tree(&self, target: TargetId, observers: ObserverSet) -> bool {
        match observers {
            ObserverSet::Active => self.active.contains(&target),
            ObserverSet::Pending => self.pending.contains(&target),
        }
    }
}
