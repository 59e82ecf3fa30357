//! Collaborator contracts at the edge of the core: value sink, value provider,
//! event sink and target tree lookup.
//!
//! A controller has at most one of each callback. Slots are shared handles so the
//! embedder can keep its own reference to read results back.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::filter::FilterOperations;
use crate::geometry::ScrollOffset;
use crate::ids::{GroupId, TargetId};
use crate::time::TimeTicks;
use crate::transform::Transform;
use crate::TargetProperty;

/// The two parallel consumers of animated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverSet {
    Active,
    Pending,
}

/// Receives ticked values. Calls must not fail.
pub trait ValueSink {
    fn set_opacity(&mut self, target: TargetId, observers: ObserverSet, opacity: f64);

    fn set_transform(&mut self, target: TargetId, observers: ObserverSet, transform: &Transform);

    fn set_filters(&mut self, target: TargetId, observers: ObserverSet, filters: &FilterOperations);

    fn set_scroll_offset(&mut self, target: TargetId, observers: ObserverSet, offset: ScrollOffset);
}

/// Supplies current values that relative animations start from.
pub trait ValueProvider {
    fn scroll_offset_for_animation(&self, target: TargetId) -> ScrollOffset;
}

/// Lifecycle notifications for impl-only animations and for the control schedule.
pub trait EventSink {
    fn on_started(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId);

    fn on_finished(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId);

    fn on_aborted(&mut self, monotonic_time: TimeTicks, property: TargetProperty, group: GroupId);
}

/// The external render target tree.
pub trait TargetTree {
    fn target_in_tree(&self, target: TargetId, observers: ObserverSet) -> bool;
}

pub type SharedValueSink = Rc<RefCell<dyn ValueSink>>;
pub type SharedValueProvider = Rc<dyn ValueProvider>;
pub type SharedEventSink = Rc<RefCell<dyn EventSink>>;
