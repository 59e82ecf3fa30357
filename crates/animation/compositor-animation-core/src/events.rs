//! Animation events sent from the render schedule back to the control schedule.

use serde::{Deserialize, Serialize};

use crate::filter::FilterOperations;
use crate::ids::{GroupId, TargetId};
use crate::time::TimeTicks;
use crate::transform::Transform;
use crate::TargetProperty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEventKind {
    Started,
    Finished,
    Aborted,
    PropertyUpdate,
}

/// Current value carried by a property update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventPayload {
    Opacity(f64),
    Transform(Transform),
    Filters(FilterOperations),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub kind: AnimationEventKind,
    pub target: TargetId,
    pub group: GroupId,
    pub property: TargetProperty,
    pub monotonic_time: TimeTicks,
    /// Impl-only events are routed to the event sink instead of the control-side animation.
    pub is_impl_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<EventPayload>,
}

impl AnimationEvent {
    pub fn new(
        kind: AnimationEventKind,
        target: TargetId,
        group: GroupId,
        property: TargetProperty,
        monotonic_time: TimeTicks,
    ) -> Self {
        Self {
            kind,
            target,
            group,
            property,
            monotonic_time,
            is_impl_only: false,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}
