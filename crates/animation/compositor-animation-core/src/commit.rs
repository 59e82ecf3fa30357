//! The one-way push from the control schedule to the render schedule.
//!
//! A [`CommitDiff`] is a plain value: the control host builds it, the render host
//! consumes it, and nothing inside refers back to either side.

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, RunState};
use crate::ids::{AnimationId, TargetId};
use crate::time::{TimeDelta, TimeTicks};

/// Pause/resume state of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseState {
    pub id: AnimationId,
    pub run_state: RunState,
    pub pause_time: TimeTicks,
    pub total_paused_time: TimeDelta,
}

/// Changes for one target's render-side controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCommit {
    pub target: TargetId,
    /// Deep copies of animations the render side has not seen yet.
    pub new_animations: Vec<Animation>,
    /// Every animation the control side still owns. Anything else on the render
    /// side (except impl-only animations) is on its way out.
    pub live_animations: Vec<AnimationId>,
    /// Aborted on the control side; the render side retires them at once.
    pub aborted: Vec<AnimationId>,
    pub pause_states: Vec<PauseState>,
    pub scroll_offset_animation_was_interrupted: bool,
}

impl TargetCommit {
    /// A commit for a target the control side no longer animates.
    pub fn empty(target: TargetId) -> Self {
        Self {
            target,
            new_animations: Vec::new(),
            live_animations: Vec::new(),
            aborted: Vec::new(),
            pause_states: Vec::new(),
            scroll_offset_animation_was_interrupted: false,
        }
    }

    /// Whether applying this commit would leave the render side untouched apart from
    /// retiring animations.
    pub fn is_empty(&self) -> bool {
        self.new_animations.is_empty()
            && self.live_animations.is_empty()
            && self.aborted.is_empty()
            && self.pause_states.is_empty()
            && !self.scroll_offset_animation_was_interrupted
    }
}

/// All per-target changes of one commit, in registry order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommitDiff {
    pub targets: Vec<TargetCommit>,
}

impl CommitDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, commit: TargetCommit) {
        self.targets.push(commit);
    }

    pub fn target(&self, target: TargetId) -> Option<&TargetCommit> {
        self.targets.iter().find(|c| c.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of animations this commit will clone into the render schedule.
    pub fn new_animation_count(&self) -> usize {
        self.targets.iter().map(|c| c.new_animations.len()).sum()
    }
}
