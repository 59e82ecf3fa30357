//! Arena of controllers keyed by target id, plus the active subset that gets ticked.
//!
//! Controllers hold no pointer back to the registry. Every mutating entry point
//! recomputes activation for the controllers it touched.

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use crate::commit::{CommitDiff, TargetCommit};
use crate::controller::AnimationController;
use crate::error::AnimationError;
use crate::events::AnimationEvent;
use crate::ids::TargetId;
use crate::time::TimeTicks;

#[derive(Debug, Default)]
pub struct AnimationRegistry {
    /// Every known controller, in registration order.
    controllers: IndexMap<TargetId, AnimationController>,
    /// Controllers owning at least one animation not waiting for deletion.
    active: IndexSet<TargetId>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: AnimationController) -> crate::Result<()> {
        let target = controller.target();
        if self.controllers.contains_key(&target) {
            return Err(AnimationError::TargetAlreadyRegistered { target });
        }
        debug!("registry: register {target}");
        self.controllers.insert(target, controller);
        self.refresh_activation(target);
        Ok(())
    }

    pub fn unregister(&mut self, target: TargetId) -> crate::Result<AnimationController> {
        let controller = self
            .controllers
            .shift_remove(&target)
            .ok_or(AnimationError::TargetNotRegistered { target })?;
        self.active.shift_remove(&target);
        debug!("registry: unregister {target}");
        Ok(controller)
    }

    pub fn controller(&self, target: TargetId) -> Option<&AnimationController> {
        self.controllers.get(&target)
    }

    /// Run `f` on one controller and refresh its activation afterwards.
    pub fn with_controller<R>(
        &mut self,
        target: TargetId,
        f: impl FnOnce(&mut AnimationController) -> R,
    ) -> crate::Result<R> {
        let controller = self
            .controllers
            .get_mut(&target)
            .ok_or(AnimationError::TargetNotRegistered { target })?;
        let result = f(controller);
        self.refresh_activation(target);
        Ok(result)
    }

    /// Run `f` on every controller, then refresh activation for all of them.
    pub fn for_each_controller(&mut self, mut f: impl FnMut(&mut AnimationController)) {
        for controller in self.controllers.values_mut() {
            f(controller);
        }
        self.refresh_all();
    }

    pub fn controllers(&self) -> impl Iterator<Item = &AnimationController> {
        self.controllers.values()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn is_active(&self, target: TargetId) -> bool {
        self.active.contains(&target)
    }

    /// Active targets in registration order.
    pub fn active_targets(&self) -> Vec<TargetId> {
        self.controllers
            .keys()
            .filter(|target| self.active.contains(*target))
            .copied()
            .collect()
    }

    pub fn needs_animate_layers(&self) -> bool {
        !self.active.is_empty()
    }

    fn refresh_activation(&mut self, target: TargetId) {
        let is_active = self
            .controllers
            .get(&target)
            .is_some_and(AnimationController::is_active);
        if is_active {
            if self.active.insert(target) {
                trace!("registry: {target} activated");
            }
        } else if self.active.shift_remove(&target) {
            trace!("registry: {target} deactivated");
        }
    }

    fn refresh_all(&mut self) {
        let targets: Vec<TargetId> = self.controllers.keys().copied().collect();
        for target in targets {
            self.refresh_activation(target);
        }
    }

    /// Run `f` on a snapshot of the active controllers. Returns false when nothing was
    /// active.
    fn for_each_active(&mut self, mut f: impl FnMut(&mut AnimationController)) -> bool {
        if !self.needs_animate_layers() {
            return false;
        }
        for target in self.active_targets() {
            if let Some(controller) = self.controllers.get_mut(&target) {
                f(controller);
            }
            self.refresh_activation(target);
        }
        true
    }

    /// Tick every active controller.
    pub fn animate_layers(&mut self, monotonic_time: TimeTicks) -> bool {
        self.for_each_active(|controller| controller.animate(monotonic_time))
    }

    pub fn update_animation_state(
        &mut self,
        start_ready_animations: bool,
        mut events: Option<&mut Vec<AnimationEvent>>,
    ) -> bool {
        self.for_each_active(|controller| {
            controller.update_state(start_ready_animations, events.as_deref_mut())
        })
    }

    pub fn activate_animations(&mut self) -> bool {
        self.for_each_active(AnimationController::activate_animations)
    }

    pub fn create_events(&self, capacity: usize) -> Vec<AnimationEvent> {
        Vec::with_capacity(capacity)
    }

    /// Deliver events from the other schedule. Inactive controllers still receive
    /// events for impl-only animations.
    pub fn set_animation_events(&mut self, events: Vec<AnimationEvent>) {
        for event in &events {
            match self.controllers.get_mut(&event.target) {
                Some(controller) => controller.dispatch_event(event),
                None => debug!("registry: dropping {:?} event for unknown {}", event.kind, event.target),
            }
            self.refresh_activation(event.target);
        }
    }

    /// Collect the per-target commits of every controller. Targets without animations
    /// are included so the render side drops what it still holds for them.
    pub fn prepare_commit(&mut self) -> CommitDiff {
        let mut diff = CommitDiff::new();
        for controller in self.controllers.values_mut() {
            diff.push(controller.prepare_commit());
        }
        self.refresh_all();
        diff
    }

    /// Apply a diff produced by the control schedule. Controllers the diff does not
    /// mention are treated as having no control-side animations.
    pub fn apply_commit(&mut self, diff: CommitDiff) {
        let mut seen = IndexSet::with_capacity(diff.targets.len());
        for commit in diff.targets {
            let target = commit.target;
            seen.insert(target);
            match self.controllers.get_mut(&target) {
                Some(controller) => controller.apply_commit(commit),
                None => debug!("registry: commit for unknown {target} skipped"),
            }
        }
        for (target, controller) in self.controllers.iter_mut() {
            if !seen.contains(target) {
                controller.apply_commit(TargetCommit::empty(*target));
            }
        }
        self.refresh_all();
    }
}
