//! Per-target animation controller.
//!
//! Owns the animations attached to one render target on one schedule. Each frame the
//! host calls [`AnimationController::animate`] (start scan plus tick) and then
//! [`AnimationController::update_state`] (promotion, completion and events).

use std::fmt;

use hashbrown::HashSet;
use log::{debug, trace};

use crate::animation::{Animation, Direction, RunState};
use crate::commit::TargetCommit;
use crate::events::{AnimationEvent, AnimationEventKind, EventPayload};
use crate::geometry::BoxF;
use crate::ids::{AnimationId, GroupId, TargetId};
use crate::observers::{
    EventSink, ObserverSet, SharedEventSink, SharedValueProvider, SharedValueSink, ValueSink,
};
use crate::time::{TimeDelta, TimeTicks};
use crate::TargetProperty;

pub struct AnimationController {
    target: TargetId,
    /// Insertion order is the tie-break for starting and for event order.
    animations: Vec<Animation>,
    last_tick_time: Option<TimeTicks>,
    needs_to_start_animations: bool,
    scroll_offset_animation_was_interrupted: bool,
    observes_active: bool,
    observes_pending: bool,
    /// Ids already sent to the other schedule (control side only).
    pushed: HashSet<AnimationId>,
    value_sink: Option<SharedValueSink>,
    value_provider: Option<SharedValueProvider>,
    event_sink: Option<SharedEventSink>,
}

impl fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationController")
            .field("target", &self.target)
            .field("animations", &self.animations)
            .field("last_tick_time", &self.last_tick_time)
            .field("needs_to_start_animations", &self.needs_to_start_animations)
            .field("observes_active", &self.observes_active)
            .field("observes_pending", &self.observes_pending)
            .finish_non_exhaustive()
    }
}

fn will_send_or_has_received_finish_event(animation: &Animation) -> bool {
    animation.is_controlling_instance()
        || animation.is_impl_only()
        || animation.received_finished_event()
}

impl AnimationController {
    /// A controller with no animations and no attached observers.
    pub fn new(target: TargetId) -> Self {
        Self {
            target,
            animations: Vec::new(),
            last_tick_time: None,
            needs_to_start_animations: false,
            scroll_offset_animation_was_interrupted: false,
            observes_active: false,
            observes_pending: false,
            pushed: HashSet::new(),
            value_sink: None,
            value_provider: None,
            event_sink: None,
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn last_tick_time(&self) -> Option<TimeTicks> {
        self.last_tick_time
    }

    pub fn needs_to_start_animations(&self) -> bool {
        self.needs_to_start_animations
    }

    // --- Callback slots ---

    pub fn set_value_sink(&mut self, sink: SharedValueSink) {
        self.value_sink = Some(sink);
    }

    pub fn clear_value_sink(&mut self) {
        self.value_sink = None;
    }

    pub fn set_value_provider(&mut self, provider: SharedValueProvider) {
        self.value_provider = Some(provider);
    }

    pub fn clear_value_provider(&mut self) {
        self.value_provider = None;
    }

    pub fn set_event_sink(&mut self, sink: SharedEventSink) {
        self.event_sink = Some(sink);
    }

    pub fn clear_event_sink(&mut self) {
        self.event_sink = None;
    }

    /// Attach or detach one observer set. Values are only pushed to attached sets.
    pub fn set_observes(&mut self, observers: ObserverSet, observes: bool) {
        match observers {
            ObserverSet::Active => self.observes_active = observes,
            ObserverSet::Pending => self.observes_pending = observes,
        }
    }

    pub fn observes(&self, observers: ObserverSet) -> bool {
        match observers {
            ObserverSet::Active => self.observes_active,
            ObserverSet::Pending => self.observes_pending,
        }
    }

    pub fn has_value_observer(&self) -> bool {
        self.observes_active || self.observes_pending
    }

    // --- Mutation ---

    pub fn add_animation(&mut self, animation: Animation) {
        trace!(
            "{}: add {} ({:?}, {})",
            self.target,
            animation.id(),
            animation.target_property(),
            animation.group()
        );
        self.animations.push(animation);
        self.needs_to_start_animations = true;
    }

    pub fn remove_animation(&mut self, id: AnimationId) {
        self.remove_where(|a| a.id() == id);
    }

    pub fn remove_animations_for_property(&mut self, group: GroupId, property: TargetProperty) {
        self.remove_where(|a| a.group() == group && a.target_property() == property);
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&Animation) -> bool) {
        if self
            .animations
            .iter()
            .any(|a| predicate(a) && a.target_property() == TargetProperty::ScrollOffset)
        {
            self.scroll_offset_animation_was_interrupted = true;
        }
        self.animations.retain(|a| !predicate(a));
    }

    /// Pause animation `id` so that its active time reads `time_offset`.
    pub fn pause_animation(&mut self, id: AnimationId, time_offset: TimeDelta) {
        for animation in self.animations.iter_mut().filter(|a| a.id() == id) {
            animation.pause(time_offset);
        }
    }

    /// Abort every unfinished animation on `property`.
    pub fn abort_animations(&mut self, property: TargetProperty) {
        let now = self.last_tick_time.unwrap_or_default();
        for animation in &mut self.animations {
            if animation.target_property() == property && !animation.is_finished() {
                animation.abort(now);
            }
        }
    }

    /// Make the pending observer set's view the active one. Animations affecting
    /// neither set are dropped.
    pub fn activate_animations(&mut self) {
        for animation in &mut self.animations {
            let pending = animation.affects_pending_observers();
            animation.set_affects_active_observers(pending);
        }
        self.animations
            .retain(|a| a.affects_active_observers() || a.affects_pending_observers());
        self.scroll_offset_animation_was_interrupted = false;
    }

    // --- Per-frame ---

    /// Start eligible animations and push current values to the sink.
    pub fn animate(&mut self, monotonic_time: TimeTicks) {
        if !self.has_value_observer() {
            return;
        }
        if self.needs_to_start_animations {
            self.start_animations(monotonic_time);
        }
        self.tick_animations(monotonic_time);
        self.last_tick_time = Some(monotonic_time);
    }

    /// Promote, finish and retire animations at the last tick time.
    ///
    /// `events` is `None` on the control schedule. On the render schedule STARTED,
    /// FINISHED, ABORTED and impl-only PROPERTY_UPDATE events are appended to it.
    pub fn update_state(
        &mut self,
        start_ready_animations: bool,
        mut events: Option<&mut Vec<AnimationEvent>>,
    ) {
        if !self.observes_active {
            return;
        }
        // Animate has not run since observers were attached.
        let Some(now) = self.last_tick_time else {
            return;
        };
        if start_ready_animations {
            self.promote_started_animations(now, events.as_deref_mut());
        }
        self.mark_finished_animations(now);
        self.mark_animations_for_deletion(now, events.as_deref_mut());
        if self.needs_to_start_animations && start_ready_animations {
            self.start_animations(now);
            self.promote_started_animations(now, events.as_deref_mut());
        }
        self.accumulate_property_updates(now, events);
    }

    fn start_animations(&mut self, monotonic_time: TimeTicks) {
        self.needs_to_start_animations = false;

        let mut blocked_for_active: HashSet<TargetProperty> = HashSet::new();
        let mut blocked_for_pending: HashSet<TargetProperty> = HashSet::new();
        let mut waiting = Vec::with_capacity(self.animations.len());
        for (index, animation) in self.animations.iter().enumerate() {
            match animation.run_state() {
                RunState::Starting | RunState::Running => {
                    if animation.affects_active_observers() {
                        blocked_for_active.insert(animation.target_property());
                    }
                    if animation.affects_pending_observers() {
                        blocked_for_pending.insert(animation.target_property());
                    }
                }
                RunState::WaitingForTargetAvailability => waiting.push(index),
                _ => {}
            }
        }

        for index in waiting {
            // An earlier group may already have started this one.
            if self.animations[index].run_state() != RunState::WaitingForTargetAvailability {
                continue;
            }
            let group = self.animations[index].group();
            let mut enqueued = HashSet::new();
            let mut affects_active = false;
            let mut affects_pending = false;
            for animation in self.animations[index..].iter().filter(|a| a.group() == group) {
                enqueued.insert(animation.target_property());
                affects_active |= animation.affects_active_observers();
                affects_pending |= animation.affects_pending_observers();
            }

            // Every property is claimed even when the group cannot start.
            let mut null_intersection = true;
            for property in enqueued {
                if affects_active && !blocked_for_active.insert(property) {
                    null_intersection = false;
                }
                if affects_pending && !blocked_for_pending.insert(property) {
                    null_intersection = false;
                }
            }

            if null_intersection {
                debug!("{}: starting {} at {:?}", self.target, group, monotonic_time);
                for animation in self.animations[index..]
                    .iter_mut()
                    .filter(|a| a.group() == group)
                {
                    animation.set_run_state(RunState::Starting, monotonic_time);
                }
            } else {
                self.needs_to_start_animations = true;
            }
        }
    }

    fn tick_animations(&self, monotonic_time: TimeTicks) {
        for animation in &self.animations {
            if !matches!(
                animation.run_state(),
                RunState::Starting | RunState::Running | RunState::Paused
            ) {
                continue;
            }
            if !animation.in_effect(monotonic_time) {
                continue;
            }
            let trimmed = animation.trim_time_to_current_iteration(monotonic_time);
            let notify_active = animation.affects_active_observers();
            let notify_pending = animation.affects_pending_observers();
            let curve = animation.curve();
            match animation.target_property() {
                TargetProperty::Transform => {
                    if let Some(curve) = curve.as_transform() {
                        let transform = curve.get_value(trimmed);
                        self.notify_value_sink(notify_active, notify_pending, |sink, target, set| {
                            sink.set_transform(target, set, &transform)
                        });
                    }
                }
                TargetProperty::Opacity => {
                    if let Some(curve) = curve.as_float() {
                        let opacity = curve.get_value(trimmed);
                        self.notify_value_sink(notify_active, notify_pending, |sink, target, set| {
                            sink.set_opacity(target, set, opacity)
                        });
                    }
                }
                TargetProperty::Filter => {
                    if let Some(curve) = curve.as_filter() {
                        let filters = curve.get_value(trimmed);
                        self.notify_value_sink(notify_active, notify_pending, |sink, target, set| {
                            sink.set_filters(target, set, &filters)
                        });
                    }
                }
                TargetProperty::ScrollOffset => {
                    if let Some(curve) = curve.as_scroll_offset() {
                        let offset = curve.get_value(trimmed);
                        self.notify_value_sink(notify_active, notify_pending, |sink, target, set| {
                            sink.set_scroll_offset(target, set, offset)
                        });
                    }
                }
                // The value sink has no background color channel.
                TargetProperty::BackgroundColor => {}
            }
        }
    }

    fn notify_value_sink(
        &self,
        notify_active: bool,
        notify_pending: bool,
        mut f: impl FnMut(&mut dyn ValueSink, TargetId, ObserverSet),
    ) {
        let Some(sink) = &self.value_sink else {
            return;
        };
        let mut sink = sink.borrow_mut();
        if notify_active && self.observes_active {
            f(&mut *sink, self.target, ObserverSet::Active);
        }
        if notify_pending && self.observes_pending {
            f(&mut *sink, self.target, ObserverSet::Pending);
        }
    }

    fn notify_event_sink(&self, f: impl FnOnce(&mut dyn EventSink)) {
        if let Some(sink) = &self.event_sink {
            f(&mut *sink.borrow_mut());
        }
    }

    fn event_for(
        &self,
        kind: AnimationEventKind,
        animation: &Animation,
        monotonic_time: TimeTicks,
    ) -> AnimationEvent {
        let mut event = AnimationEvent::new(
            kind,
            self.target,
            animation.group(),
            animation.target_property(),
            monotonic_time,
        );
        event.is_impl_only = animation.is_impl_only();
        event
    }

    fn promote_started_animations(
        &mut self,
        monotonic_time: TimeTicks,
        mut events: Option<&mut Vec<AnimationEvent>>,
    ) {
        let mut impl_only = Vec::new();
        for index in 0..self.animations.len() {
            let animation = &mut self.animations[index];
            if animation.run_state() != RunState::Starting
                || !animation.affects_active_observers()
            {
                continue;
            }
            animation.set_run_state(RunState::Running, monotonic_time);
            if !animation.has_set_start_time() && !animation.needs_synchronized_start_time() {
                animation.set_start_time(monotonic_time);
            }
            let Some(events) = events.as_deref_mut() else {
                continue;
            };
            let animation = &self.animations[index];
            let start_time = animation.start_time().unwrap_or(monotonic_time);
            let event = self.event_for(AnimationEventKind::Started, animation, start_time);
            if event.is_impl_only {
                impl_only.push(event);
            } else {
                events.push(event);
            }
        }
        for event in &impl_only {
            self.notify_animation_started(event);
        }
    }

    fn mark_finished_animations(&mut self, monotonic_time: TimeTicks) {
        for animation in &mut self.animations {
            if !animation.is_finished() && animation.is_finished_at(monotonic_time) {
                animation.set_run_state(RunState::Finished, monotonic_time);
            }
        }
    }

    /// Retire aborted animations and whole groups whose members are all done.
    fn mark_animations_for_deletion(
        &mut self,
        monotonic_time: TimeTicks,
        mut events: Option<&mut Vec<AnimationEvent>>,
    ) {
        let mut impl_only_finished = Vec::new();
        let mut same_group = Vec::with_capacity(self.animations.len());
        for i in 0..self.animations.len() {
            let group = self.animations[i].group();
            if self.animations[i].run_state() == RunState::Aborted {
                if let Some(events) = events.as_deref_mut() {
                    if !self.animations[i].is_impl_only() {
                        events.push(self.event_for(
                            AnimationEventKind::Aborted,
                            &self.animations[i],
                            monotonic_time,
                        ));
                    }
                }
                self.animations[i].set_run_state(RunState::WaitingForDeletion, monotonic_time);
                continue;
            }

            // A control-side animation is only retired after the render side reported
            // FINISHED for it.
            let mut all_finished = false;
            if self.animations[i].run_state() == RunState::Finished
                && will_send_or_has_received_finish_event(&self.animations[i])
            {
                same_group.clear();
                all_finished = true;
                for (j, other) in self.animations.iter().enumerate() {
                    if other.group() != group {
                        continue;
                    }
                    if !other.is_finished()
                        || (other.run_state() == RunState::Finished
                            && !will_send_or_has_received_finish_event(other))
                    {
                        all_finished = false;
                        break;
                    }
                    if j >= i && other.run_state() == RunState::Finished {
                        same_group.push(j);
                    }
                }
            }

            if all_finished {
                debug!("{}: {} finished", self.target, group);
                for &j in &same_group {
                    if let Some(events) = events.as_deref_mut() {
                        let event = self.event_for(
                            AnimationEventKind::Finished,
                            &self.animations[j],
                            monotonic_time,
                        );
                        if event.is_impl_only {
                            impl_only_finished.push(event);
                        } else {
                            events.push(event);
                        }
                    }
                    self.animations[j].set_run_state(RunState::WaitingForDeletion, monotonic_time);
                }
            }
        }
        for event in &impl_only_finished {
            self.notify_animation_finished(event);
        }
    }

    /// Impl-only animations have no control-side twin, so their values travel back
    /// as events.
    fn accumulate_property_updates(
        &self,
        monotonic_time: TimeTicks,
        events: Option<&mut Vec<AnimationEvent>>,
    ) {
        let Some(events) = events else {
            return;
        };
        for animation in &self.animations {
            if !animation.is_impl_only() || !animation.in_effect(monotonic_time) {
                continue;
            }
            let trimmed = animation.trim_time_to_current_iteration(monotonic_time);
            let curve = animation.curve();
            let payload = match animation.target_property() {
                TargetProperty::Opacity => {
                    curve.as_float().map(|c| EventPayload::Opacity(c.get_value(trimmed)))
                }
                TargetProperty::Transform => curve
                    .as_transform()
                    .map(|c| EventPayload::Transform(c.get_value(trimmed))),
                TargetProperty::Filter => {
                    curve.as_filter().map(|c| EventPayload::Filters(c.get_value(trimmed)))
                }
                // Scroll offsets already flow back through the scroll path.
                TargetProperty::ScrollOffset | TargetProperty::BackgroundColor => None,
            };
            if let Some(payload) = payload {
                let event = self
                    .event_for(AnimationEventKind::PropertyUpdate, animation, monotonic_time)
                    .with_payload(payload);
                events.push(event);
            }
        }
    }

    // --- Events from the other schedule ---

    pub fn notify_animation_started(&mut self, event: &AnimationEvent) {
        if !event.is_impl_only {
            let matched = self.animations.iter_mut().find(|a| {
                a.group() == event.group
                    && a.target_property() == event.property
                    && a.needs_synchronized_start_time()
            });
            let Some(animation) = matched else {
                debug!("{}: ignoring STARTED for {} ({:?})", self.target, event.group, event.property);
                return;
            };
            animation.set_needs_synchronized_start_time(false);
            if !animation.has_set_start_time() {
                animation.set_start_time(event.monotonic_time);
            }
        }
        self.notify_event_sink(|sink| {
            sink.on_started(event.monotonic_time, event.property, event.group)
        });
    }

    pub fn notify_animation_finished(&mut self, event: &AnimationEvent) {
        if !event.is_impl_only {
            let matched = self
                .animations
                .iter_mut()
                .find(|a| a.group() == event.group && a.target_property() == event.property);
            let Some(animation) = matched else {
                debug!("{}: ignoring FINISHED for {} ({:?})", self.target, event.group, event.property);
                return;
            };
            animation.set_received_finished_event(true);
        }
        self.notify_event_sink(|sink| {
            sink.on_finished(event.monotonic_time, event.property, event.group)
        });
    }

    pub fn notify_animation_aborted(&mut self, event: &AnimationEvent) {
        if !event.is_impl_only {
            let mut matched = false;
            for animation in self
                .animations
                .iter_mut()
                .filter(|a| a.group() == event.group && a.target_property() == event.property)
            {
                animation.set_run_state(RunState::Aborted, event.monotonic_time);
                matched = true;
            }
            if !matched {
                debug!("{}: ignoring ABORTED for {} ({:?})", self.target, event.group, event.property);
                return;
            }
        }
        self.notify_event_sink(|sink| {
            sink.on_aborted(event.monotonic_time, event.property, event.group)
        });
    }

    /// Apply a value computed by an impl-only animation on the render schedule.
    pub fn notify_animation_property_update(&mut self, event: &AnimationEvent) {
        match &event.payload {
            Some(EventPayload::Opacity(opacity)) => {
                let opacity = *opacity;
                self.notify_value_sink(true, true, |sink, target, set| {
                    sink.set_opacity(target, set, opacity)
                });
            }
            Some(EventPayload::Transform(transform)) => {
                self.notify_value_sink(true, true, |sink, target, set| {
                    sink.set_transform(target, set, transform)
                });
            }
            Some(EventPayload::Filters(filters)) => {
                self.notify_value_sink(true, true, |sink, target, set| {
                    sink.set_filters(target, set, filters)
                });
            }
            None => debug!("{}: property update without payload", self.target),
        }
    }

    /// Route an event to its handler.
    pub fn dispatch_event(&mut self, event: &AnimationEvent) {
        match event.kind {
            AnimationEventKind::Started => self.notify_animation_started(event),
            AnimationEventKind::Finished => self.notify_animation_finished(event),
            AnimationEventKind::Aborted => self.notify_animation_aborted(event),
            AnimationEventKind::PropertyUpdate => self.notify_animation_property_update(event),
        }
    }

    // --- Commit ---

    /// Describe what the render-side twin must change to match this controller.
    ///
    /// Aborted animations are retired and waiting-for-deletion ones purged first.
    pub fn prepare_commit(&mut self) -> TargetCommit {
        let now = self.last_tick_time.unwrap_or_default();
        let mut aborted = Vec::new();
        for animation in &mut self.animations {
            if animation.run_state() == RunState::Aborted {
                if self.pushed.contains(&animation.id()) {
                    aborted.push(animation.id());
                }
                animation.set_run_state(RunState::WaitingForDeletion, now);
            }
        }
        self.purge_animations_marked_for_deletion();

        let provider_offset = self
            .value_provider
            .as_ref()
            .map(|provider| provider.scroll_offset_for_animation(self.target));
        let mut new_animations = Vec::new();
        let mut pause_states = Vec::new();
        for animation in &mut self.animations {
            if self.pushed.contains(&animation.id()) {
                pause_states.push(animation.pause_state());
                continue;
            }
            if let (Some(offset), Some(curve)) =
                (provider_offset, animation.curve_mut().as_scroll_offset_mut())
            {
                curve.set_initial_value(offset);
            }
            let mut copy = animation.clone_and_initialize(RunState::WaitingForTargetAvailability);
            copy.set_affects_active_observers(false);
            new_animations.push(copy);
        }

        self.pushed = self.animations.iter().map(Animation::id).collect();
        TargetCommit {
            target: self.target,
            new_animations,
            live_animations: self.animations.iter().map(Animation::id).collect(),
            aborted,
            pause_states,
            scroll_offset_animation_was_interrupted: std::mem::take(
                &mut self.scroll_offset_animation_was_interrupted,
            ),
        }
    }

    /// Bring this render-side controller in line with its control-side twin.
    pub fn apply_commit(&mut self, commit: TargetCommit) {
        let TargetCommit {
            new_animations,
            live_animations,
            aborted,
            pause_states,
            scroll_offset_animation_was_interrupted,
            ..
        } = commit;
        let now = self.last_tick_time.unwrap_or_default();

        for animation in &mut self.animations {
            if aborted.contains(&animation.id()) {
                animation.set_run_state(RunState::WaitingForDeletion, now);
            }
        }

        for mut animation in new_animations {
            if self.animation_by_id(animation.id()).is_some() {
                continue;
            }
            // Scroll animations start from the offset the render side is showing.
            if let Some(provider) = &self.value_provider {
                if let Some(curve) = animation.curve_mut().as_scroll_offset_mut() {
                    curve.set_initial_value(provider.scroll_offset_for_animation(self.target));
                }
            }
            self.add_animation(animation);
        }

        // Removed on the control side: stop affecting pending observers now and active
        // observers after the next activation.
        let live: HashSet<AnimationId> = live_animations.into_iter().collect();
        for animation in &mut self.animations {
            let completed = if animation.is_impl_only() {
                animation.run_state() == RunState::WaitingForDeletion
            } else {
                !live.contains(&animation.id())
            };
            if completed {
                animation.set_affects_pending_observers(false);
            }
        }
        self.animations.retain(|a| {
            !(a.run_state() == RunState::WaitingForDeletion && !a.affects_pending_observers())
        });

        for state in &pause_states {
            if let Some(animation) = self.animation_by_id_mut(state.id) {
                animation.apply_pause_state(state);
            }
        }
        self.scroll_offset_animation_was_interrupted = scroll_offset_animation_was_interrupted;
    }

    fn purge_animations_marked_for_deletion(&mut self) {
        self.animations
            .retain(|a| a.run_state() != RunState::WaitingForDeletion);
    }

    // --- Queries ---

    /// Most recently added animation on `property`.
    pub fn animation(&self, property: TargetProperty) -> Option<&Animation> {
        self.animations
            .iter()
            .rev()
            .find(|a| a.target_property() == property)
    }

    pub fn animation_mut(&mut self, property: TargetProperty) -> Option<&mut Animation> {
        self.animations
            .iter_mut()
            .rev()
            .find(|a| a.target_property() == property)
    }

    pub fn animation_by_id(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id() == id)
    }

    pub fn animation_by_id_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id() == id)
    }

    /// Whether the registry should tick this controller.
    pub fn is_active(&self) -> bool {
        self.animations
            .iter()
            .any(|a| a.run_state() != RunState::WaitingForDeletion)
    }

    pub fn has_active_animation(&self) -> bool {
        self.animations.iter().any(|a| !a.is_finished())
    }

    pub fn has_any_animation(&self) -> bool {
        !self.animations.is_empty()
    }

    pub fn is_animating_property(&self, property: TargetProperty) -> bool {
        self.animations
            .iter()
            .any(|a| !a.is_finished() && a.target_property() == property)
    }

    /// Whether an unfinished animation on `property` affects `observers`.
    pub fn is_potentially_animating_property(
        &self,
        property: TargetProperty,
        observers: ObserverSet,
    ) -> bool {
        self.animations.iter().any(|a| {
            !a.is_finished()
                && a.target_property() == property
                && match observers {
                    ObserverSet::Active => a.affects_active_observers(),
                    ObserverSet::Pending => a.affects_pending_observers(),
                }
        })
    }

    pub fn scroll_offset_animation_was_interrupted(&self) -> bool {
        self.scroll_offset_animation_was_interrupted
    }

    fn unfinished_transform_animations(&self) -> impl Iterator<Item = &Animation> {
        self.animations
            .iter()
            .filter(|a| !a.is_finished() && a.target_property() == TargetProperty::Transform)
    }

    pub fn has_filter_animation_that_inflates_bounds(&self) -> bool {
        self.animations.iter().any(|a| {
            !a.is_finished()
                && a.target_property() == TargetProperty::Filter
                && a.curve()
                    .as_filter()
                    .is_some_and(|c| c.has_filter_that_moves_pixels())
        })
    }

    pub fn has_transform_animation_that_inflates_bounds(&self) -> bool {
        self.is_animating_property(TargetProperty::Transform)
    }

    /// Union of the bounds `bbox` sweeps under every unfinished transform animation.
    ///
    /// Returns `None` when some animation's bounds cannot be computed. The result is
    /// only meaningful when a transform animation is present.
    pub fn transform_animation_bounds_for_box(&self, bbox: &BoxF) -> Option<BoxF> {
        debug_assert!(
            self.has_transform_animation_that_inflates_bounds(),
            "bounds are unknown without a transform animation"
        );
        let mut bounds: Option<BoxF> = None;
        for animation in self.unfinished_transform_animations() {
            let animated = animation.curve().as_transform()?.animated_bounds_for_box(bbox)?;
            match bounds.as_mut() {
                Some(acc) => acc.union(&animated),
                None => bounds = Some(animated),
            }
        }
        Some(bounds.unwrap_or_default())
    }

    pub fn has_animation_that_affects_scale(&self) -> bool {
        self.unfinished_transform_animations()
            .any(|a| a.curve().as_transform().is_some_and(|c| c.affects_scale()))
    }

    pub fn has_only_translation_transforms(&self) -> bool {
        self.unfinished_transform_animations()
            .all(|a| a.curve().as_transform().is_some_and(|c| c.is_translation()))
    }

    pub fn animations_preserve_axis_alignment(&self) -> bool {
        self.unfinished_transform_animations().all(|a| {
            a.curve()
                .as_transform()
                .is_some_and(|c| c.preserves_axis_alignment())
        })
    }

    /// Largest scale any transform animation affecting `observers` reaches at its end.
    pub fn maximum_target_scale(&self, observers: ObserverSet) -> Option<f64> {
        let mut max_scale = 0.0_f64;
        for animation in self.unfinished_transform_animations() {
            let affects = match observers {
                ObserverSet::Active => animation.affects_active_observers(),
                ObserverSet::Pending => animation.affects_pending_observers(),
            };
            if !affects {
                continue;
            }
            let forward_direction = match animation.direction() {
                Direction::Normal | Direction::Alternate => animation.playback_rate() >= 0.0,
                Direction::Reverse | Direction::AlternateReverse => animation.playback_rate() < 0.0,
            };
            let scale = animation
                .curve()
                .as_transform()?
                .maximum_target_scale(forward_direction)?;
            max_scale = max_scale.max(scale);
        }
        Some(max_scale)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::curve::{Keyframe, KeyframedFloatAnimationCurve, KeyframedTransformAnimationCurve};
    use crate::filter::FilterOperations;
    use crate::geometry::ScrollOffset;
    use crate::transform::{Transform, TransformOperations};

    #[derive(Default)]
    struct RecordingSink {
        opacity: Vec<(ObserverSet, f64)>,
        transforms: Vec<(ObserverSet, Transform)>,
    }

    impl ValueSink for RecordingSink {
        fn set_opacity(&mut self, _target: TargetId, observers: ObserverSet, opacity: f64) {
            self.opacity.push((observers, opacity));
        }

        fn set_transform(&mut self, _target: TargetId, observers: ObserverSet, transform: &Transform) {
            self.transforms.push((observers, *transform));
        }

        fn set_filters(&mut self, _: TargetId, _: ObserverSet, _: &FilterOperations) {}

        fn set_scroll_offset(&mut self, _: TargetId, _: ObserverSet, _: ScrollOffset) {}
    }

    fn ticks(s: f64) -> TimeTicks {
        TimeTicks::from_seconds(s)
    }

    fn opacity_animation(id: u32, group: u32) -> Animation {
        let mut curve = KeyframedFloatAnimationCurve::new();
        curve.add_keyframe(Keyframe::new(TimeDelta::ZERO, 0.0, None));
        curve.add_keyframe(Keyframe::new(TimeDelta::from_seconds(1.0), 1.0, None));
        Animation::new(curve.into(), AnimationId(id), GroupId(group), TargetProperty::Opacity)
    }

    fn scale_animation(id: u32, group: u32, to: f64) -> Animation {
        let mut curve = KeyframedTransformAnimationCurve::new();
        let mut from_ops = TransformOperations::new();
        from_ops.append_scale(1.0, 1.0, 1.0);
        let mut to_ops = TransformOperations::new();
        to_ops.append_scale(to, to, 1.0);
        curve.add_keyframe(Keyframe::new(TimeDelta::ZERO, from_ops, None));
        curve.add_keyframe(Keyframe::new(TimeDelta::from_seconds(1.0), to_ops, None));
        Animation::new(curve.into(), AnimationId(id), GroupId(group), TargetProperty::Transform)
    }

    fn controller_with_sink() -> (AnimationController, Rc<RefCell<RecordingSink>>) {
        let mut controller = AnimationController::new(TargetId(1));
        controller.set_observes(ObserverSet::Active, true);
        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        controller.set_value_sink(sink.clone());
        (controller, sink)
    }

    #[test]
    fn no_observer_means_no_tick() {
        let mut controller = AnimationController::new(TargetId(1));
        controller.add_animation(opacity_animation(1, 1));
        controller.animate(ticks(0.0));
        assert_eq!(controller.last_tick_time(), None);
        assert_eq!(
            controller.animations()[0].run_state(),
            RunState::WaitingForTargetAvailability
        );
    }

    #[test]
    fn group_starts_together() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(opacity_animation(1, 7));
        controller.add_animation(scale_animation(2, 7, 2.0));
        controller.animate(ticks(0.0));
        assert!(controller
            .animations()
            .iter()
            .all(|a| a.run_state() == RunState::Starting));

        let mut events = Vec::new();
        controller.update_state(true, Some(&mut events));
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == AnimationEventKind::Started));
        assert!(controller
            .animations()
            .iter()
            .all(|a| a.start_time() == Some(ticks(0.0))));
    }

    #[test]
    fn conflicting_group_waits() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(opacity_animation(1, 1));
        controller.add_animation(opacity_animation(2, 2));
        controller.animate(ticks(0.0));
        controller.update_state(true, None);
        assert_eq!(controller.animations()[0].run_state(), RunState::Running);
        assert_eq!(
            controller.animations()[1].run_state(),
            RunState::WaitingForTargetAvailability
        );
        assert!(controller.needs_to_start_animations());
    }

    #[test]
    fn ticks_only_attached_observer_sets() {
        let (mut controller, sink) = controller_with_sink();
        controller.set_observes(ObserverSet::Pending, true);
        let mut animation = opacity_animation(1, 1);
        animation.set_affects_pending_observers(false);
        controller.add_animation(animation);
        controller.animate(ticks(0.0));
        controller.update_state(true, None);
        controller.animate(ticks(0.5));
        let recorded = &sink.borrow().opacity;
        assert!(recorded.iter().all(|(set, _)| *set == ObserverSet::Active));
        assert_eq!(recorded.last(), Some(&(ObserverSet::Active, 0.5)));
    }

    #[test]
    fn abort_emits_event_and_retires() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(opacity_animation(1, 1));
        controller.animate(ticks(0.0));
        controller.update_state(true, None);
        controller.abort_animations(TargetProperty::Opacity);
        let mut events = Vec::new();
        controller.update_state(true, Some(&mut events));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AnimationEventKind::Aborted);
        assert_eq!(
            controller.animations()[0].run_state(),
            RunState::WaitingForDeletion
        );
        assert!(!controller.is_active());
    }

    #[test]
    fn removing_opacity_animation_leaves_scroll_flag_clear() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(opacity_animation(1, 1));
        controller.remove_animation(AnimationId(1));
        assert!(!controller.has_any_animation());
        assert!(!controller.scroll_offset_animation_was_interrupted());
    }

    #[test]
    fn activation_drops_animations_affecting_nothing() {
        let (mut controller, _) = controller_with_sink();
        let mut gone = opacity_animation(1, 1);
        gone.set_affects_pending_observers(false);
        let mut fresh = opacity_animation(2, 2);
        fresh.set_affects_active_observers(false);
        controller.add_animation(gone);
        controller.add_animation(fresh);
        assert!(controller.is_potentially_animating_property(
            TargetProperty::Opacity,
            ObserverSet::Pending
        ));

        controller.activate_animations();
        assert_eq!(controller.animations().len(), 1);
        assert_eq!(controller.animations()[0].id(), AnimationId(2));
        assert!(controller.animations()[0].affects_active_observers());
    }

    #[test]
    fn maximum_scale_over_transform_animations() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(scale_animation(1, 1, 2.0));
        controller.add_animation(scale_animation(2, 2, 3.0));
        assert_eq!(controller.maximum_target_scale(ObserverSet::Active), Some(3.0));
        assert!(controller.has_animation_that_affects_scale());
        assert!(!controller.has_only_translation_transforms());
        assert!(controller.animations_preserve_axis_alignment());

        let bounds = controller
            .transform_animation_bounds_for_box(&BoxF::from_rect(0.0, 0.0, 1.0, 1.0))
            .expect("scale bounds");
        assert_eq!(bounds, BoxF::new(0.0, 0.0, 0.0, 3.0, 3.0, 0.0));
    }

    #[test]
    fn latest_animation_wins_lookup() {
        let (mut controller, _) = controller_with_sink();
        controller.add_animation(opacity_animation(1, 1));
        controller.add_animation(opacity_animation(2, 2));
        assert_eq!(
            controller.animation(TargetProperty::Opacity).map(Animation::id),
            Some(AnimationId(2))
        );
        assert!(controller.animation(TargetProperty::Filter).is_none());
    }
}
