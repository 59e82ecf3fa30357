//! Identifiers and the process-wide id providers.
//!
//! Animation and group ids must be unique across both schedules so that a
//! render-side clone can be matched with its control-side original by id alone.
//! The two atomic counters below are the only global state in this crate.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Id of a render target (layer). Assigned by the external target tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animation#{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

// Ids start at 1 so that 0 never names a live animation or group.
static NEXT_ANIMATION_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_GROUP_ID: AtomicU32 = AtomicU32::new(1);

/// Monotonic allocator for [`AnimationId`] and [`GroupId`].
pub struct IdProvider;

impl IdProvider {
    #[inline]
    pub fn next_animation_id() -> AnimationId {
        AnimationId(NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn next_group_id() -> GroupId {
        GroupId(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed))
    }
}
