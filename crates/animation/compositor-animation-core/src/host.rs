//! Per-schedule entry point: owns the registry and drives one frame.
//!
//! A control host authors animations and produces [`CommitDiff`]s; a render host
//! applies them, ticks every frame and hands events back:
//!
//! ```text
//! control.prepare_commit() --CommitDiff--> render.apply_commit()
//! render.animate(now); render.update_animation_state(true, Some(&mut events))
//! control.set_animation_events(events)
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::commit::CommitDiff;
use crate::config::HostConfig;
use crate::controller::AnimationController;
use crate::curve::ScrollOffsetAnimationCurve;
use crate::error::AnimationError;
use crate::events::AnimationEvent;
use crate::geometry::{ScrollOffset, Vector2d};
use crate::ids::{AnimationId, IdProvider, TargetId};
use crate::observers::{
    ObserverSet, SharedEventSink, SharedValueProvider, SharedValueSink, TargetTree,
};
use crate::registry::AnimationRegistry;
use crate::time::{TimeDelta, TimeTicks};
use crate::timing::TimingFunction;
use crate::TargetProperty;

/// Which side of the commit boundary a host lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Authoring side. Receives events, never emits them.
    Control,
    /// Per-frame side. Decides start times and completion.
    Render,
}

#[derive(Debug)]
pub struct AnimationHost {
    schedule: Schedule,
    config: HostConfig,
    registry: AnimationRegistry,
}

impl AnimationHost {
    pub fn new(schedule: Schedule) -> Self {
        Self::with_config(schedule, HostConfig::default())
    }

    pub fn with_config(schedule: Schedule, config: HostConfig) -> Self {
        Self {
            schedule,
            config,
            registry: AnimationRegistry::new(),
        }
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }

    // --- Targets ---

    /// Create the controller for `target`. Control-side controllers always observe
    /// the active set; render-side ones wait for [`AnimationHost::update_observers`].
    pub fn register_target(&mut self, target: TargetId) -> crate::Result<()> {
        let mut controller = AnimationController::new(target);
        if self.schedule == Schedule::Control {
            controller.set_observes(ObserverSet::Active, true);
        }
        self.registry.register(controller)
    }

    pub fn unregister_target(&mut self, target: TargetId) -> crate::Result<AnimationController> {
        self.registry.unregister(target)
    }

    pub fn controller(&self, target: TargetId) -> Option<&AnimationController> {
        self.registry.controller(target)
    }

    /// Mutate one controller; activation is refreshed afterwards.
    pub fn with_controller<R>(
        &mut self,
        target: TargetId,
        f: impl FnOnce(&mut AnimationController) -> R,
    ) -> crate::Result<R> {
        self.registry.with_controller(target, f)
    }

    /// Attach each controller to the observer sets whose tree currently holds its target.
    pub fn update_observers(&mut self, tree: &dyn TargetTree) {
        self.registry.for_each_controller(|controller| {
            let target = controller.target();
            for set in [ObserverSet::Active, ObserverSet::Pending] {
                controller.set_observes(set, tree.target_in_tree(target, set));
            }
        });
    }

    pub fn set_value_sink(&mut self, target: TargetId, sink: SharedValueSink) -> crate::Result<()> {
        self.registry.with_controller(target, |c| c.set_value_sink(sink))
    }

    pub fn set_value_provider(
        &mut self,
        target: TargetId,
        provider: SharedValueProvider,
    ) -> crate::Result<()> {
        self.registry
            .with_controller(target, |c| c.set_value_provider(provider))
    }

    pub fn set_event_sink(&mut self, target: TargetId, sink: SharedEventSink) -> crate::Result<()> {
        self.registry.with_controller(target, |c| c.set_event_sink(sink))
    }

    // --- Animations ---

    /// Attach `animation` to `target`.
    ///
    /// On the control schedule the animation waits for the render side's start time
    /// unless it already has one.
    pub fn add_animation(&mut self, target: TargetId, mut animation: Animation) -> crate::Result<()> {
        let kind = animation.curve().kind();
        let property = animation.target_property();
        if !kind.can_animate(property) {
            return Err(AnimationError::CurveKindMismatch { kind, property });
        }
        animation.curve().validate()?;
        if property == TargetProperty::ScrollOffset && !self.config.supports_scroll_animations {
            return Err(AnimationError::ScrollAnimationsUnsupported);
        }
        if self.schedule == Schedule::Control
            && !animation.is_impl_only()
            && !animation.has_set_start_time()
        {
            animation.set_needs_synchronized_start_time(true);
        }
        self.registry
            .with_controller(target, |c| c.add_animation(animation))
    }

    pub fn remove_animation(&mut self, target: TargetId, id: AnimationId) -> crate::Result<()> {
        self.registry.with_controller(target, |c| c.remove_animation(id))
    }

    pub fn pause_animation(
        &mut self,
        target: TargetId,
        id: AnimationId,
        time_offset: TimeDelta,
    ) -> crate::Result<()> {
        self.registry
            .with_controller(target, |c| c.pause_animation(id, time_offset))
    }

    pub fn abort_animations(
        &mut self,
        target: TargetId,
        property: TargetProperty,
    ) -> crate::Result<()> {
        self.registry
            .with_controller(target, |c| c.abort_animations(property))
    }

    // --- Frame ---

    /// Tick every active controller. Returns false when nothing was active.
    pub fn animate(&mut self, monotonic_time: TimeTicks) -> bool {
        self.registry.animate_layers(monotonic_time)
    }

    pub fn update_animation_state(
        &mut self,
        start_ready_animations: bool,
        events: Option<&mut Vec<AnimationEvent>>,
    ) -> bool {
        self.registry
            .update_animation_state(start_ready_animations, events)
    }

    pub fn activate_animations(&mut self) -> bool {
        self.registry.activate_animations()
    }

    /// An empty event list sized from the configuration.
    pub fn create_events(&self) -> Vec<AnimationEvent> {
        self.registry.create_events(self.config.events_capacity)
    }

    pub fn set_animation_events(&mut self, events: Vec<AnimationEvent>) {
        self.registry.set_animation_events(events);
    }

    // --- Commit ---

    pub fn prepare_commit(&mut self) -> CommitDiff {
        debug_assert_eq!(self.schedule, Schedule::Control, "commits flow from control to render");
        let diff = self.registry.prepare_commit();
        log::debug!(
            "commit prepared: {} targets, {} new animations",
            diff.targets.len(),
            diff.new_animation_count()
        );
        diff
    }

    pub fn apply_commit(&mut self, diff: CommitDiff) {
        debug_assert_eq!(self.schedule, Schedule::Render, "commits flow from control to render");
        log::debug!("commit applied: {} targets", diff.targets.len());
        self.registry.apply_commit(diff);
    }

    // --- Impl-only scroll animations ---

    /// Start a render-side smooth scroll of `target` from `current_offset` to
    /// `target_offset`.
    pub fn scroll_animation_create(
        &mut self,
        target: TargetId,
        target_offset: ScrollOffset,
        current_offset: ScrollOffset,
    ) -> crate::Result<AnimationId> {
        if !self.config.supports_scroll_animations || self.schedule != Schedule::Render {
            return Err(AnimationError::ScrollAnimationsUnsupported);
        }
        let mut curve = ScrollOffsetAnimationCurve::new(
            target_offset,
            TimingFunction::ease_in_out(),
            self.config.scroll_duration_behavior,
        );
        curve.set_initial_value(current_offset);
        let id = IdProvider::next_animation_id();
        let mut animation = Animation::new(
            curve.into(),
            id,
            IdProvider::next_group_id(),
            TargetProperty::ScrollOffset,
        );
        animation.set_is_impl_only(true);
        self.registry
            .with_controller(target, |c| c.add_animation(animation))?;
        Ok(id)
    }

    /// Shift the running scroll animation's target by `scroll_delta`, clamped to
    /// `[0, max_scroll_offset]`. Returns false when `target` has no scroll animation.
    pub fn scroll_animation_update_target(
        &mut self,
        target: TargetId,
        scroll_delta: Vector2d,
        max_scroll_offset: ScrollOffset,
        frame_time: TimeTicks,
    ) -> crate::Result<bool> {
        self.registry.with_controller(target, |c| {
            let Some(animation) = c.animation_mut(TargetProperty::ScrollOffset) else {
                return false;
            };
            let trimmed = animation.trim_time_to_current_iteration(frame_time);
            let Some(curve) = animation.curve_mut().as_scroll_offset_mut() else {
                return false;
            };
            let new_target = (curve.target_value() + scroll_delta).clamped_to(max_scroll_offset);
            curve.update_target(trimmed, new_target);
            true
        })
    }
}
