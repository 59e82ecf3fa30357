mod common;

use common::{opacity_animation, ticks, RecordingEvents, RecordingSink, SinkCall};
use compositor_animation_core::{
    Animation, AnimationController, AnimationEventKind, FillMode, GroupId, IdProvider, Keyframe,
    KeyframedTransformAnimationCurve, ObserverSet, RunState, TargetId, TargetProperty, TimeDelta,
    TransformOperations,
};

fn impl_only_opacity(group: GroupId) -> Animation {
    let mut animation = opacity_animation(group);
    animation.set_is_impl_only(true);
    animation
}

fn impl_only_translate(group: GroupId) -> Animation {
    impl_only_translate_over(group, 1.0)
}

fn impl_only_translate_over(group: GroupId, seconds: f64) -> Animation {
    let mut to = TransformOperations::new();
    to.append_translate(10.0, 0.0, 0.0);
    let curve = KeyframedTransformAnimationCurve::from_keyframes(
        vec![
            Keyframe::new(TimeDelta::ZERO, TransformOperations::new(), None),
            Keyframe::new(TimeDelta::from_seconds(seconds), to, None),
        ],
        None,
    )
    .unwrap();
    let mut animation = Animation::new(
        curve.into(),
        IdProvider::next_animation_id(),
        group,
        TargetProperty::Transform,
    );
    animation.set_is_impl_only(true);
    animation
}

fn observed(target: u32) -> (AnimationController, std::rc::Rc<std::cell::RefCell<RecordingSink>>) {
    let mut controller = AnimationController::new(TargetId(target));
    controller.set_observes(ObserverSet::Active, true);
    let sink = RecordingSink::shared();
    controller.set_value_sink(sink.clone());
    (controller, sink)
}

fn step(controller: &mut AnimationController, t: f64) {
    let mut events = Vec::new();
    controller.animate(ticks(t));
    controller.update_state(true, Some(&mut events));
}

#[test]
fn ticking_twice_at_the_same_time_is_idempotent() {
    let (mut controller, sink) = observed(1);
    controller.add_animation(impl_only_opacity(GroupId(1)));
    step(&mut controller, 0.0);

    controller.animate(ticks(0.5));
    let first_state = controller.animations()[0].clone();
    controller.animate(ticks(0.5));
    assert_eq!(controller.animations()[0], first_state);
    assert_eq!(sink.borrow().opacities(), vec![0.0, 0.5, 0.5]);
}

#[test]
fn opacity_runs_to_completion_without_fill() {
    let (mut controller, sink) = observed(1);
    let events_sink = RecordingEvents::shared();
    controller.set_event_sink(events_sink.clone());

    let group = IdProvider::next_group_id();
    let mut animation = impl_only_opacity(group);
    animation.set_fill_mode(FillMode::None);
    controller.add_animation(animation);

    step(&mut controller, 0.0);
    assert_eq!(events_sink.borrow().started, vec![(ticks(0.0), TargetProperty::Opacity, group)]);

    step(&mut controller, 0.5);
    step(&mut controller, 1.5);
    assert_eq!(sink.borrow().opacities(), vec![0.0, 0.5, 1.0]);
    assert_eq!(events_sink.borrow().finished, vec![(ticks(1.5), TargetProperty::Opacity, group)]);
    assert!(!controller.is_active());

    // Retired animations push nothing.
    controller.animate(ticks(2.0));
    assert_eq!(sink.borrow().opacities().len(), 3);
}

#[test]
fn fill_mode_gates_values_before_start() {
    for (fill, expect_value) in [(FillMode::None, false), (FillMode::Backwards, true)] {
        let (mut controller, sink) = observed(1);
        let mut animation = impl_only_opacity(GroupId(1));
        animation.set_fill_mode(fill);
        animation.set_start_time(ticks(5.0));
        controller.add_animation(animation);
        controller.animate(ticks(4.0));
        assert_eq!(!sink.borrow().calls.is_empty(), expect_value, "{fill:?}");
    }
}

#[test]
fn conflicting_animation_waits_until_first_retires() {
    let (mut controller, _sink) = observed(1);
    let first = impl_only_opacity(GroupId(1));
    let second = impl_only_opacity(GroupId(2));
    let second_id = second.id();
    controller.add_animation(first);
    controller.add_animation(second);

    step(&mut controller, 0.0);
    step(&mut controller, 0.5);
    assert_eq!(
        controller.animation_by_id(second_id).map(Animation::run_state),
        Some(RunState::WaitingForTargetAvailability)
    );

    step(&mut controller, 1.0);
    let second = controller.animation_by_id(second_id).unwrap();
    assert_eq!(second.run_state(), RunState::Running);
    assert_eq!(second.start_time(), Some(ticks(1.0)));
}

#[test]
fn group_waits_as_a_whole() {
    let (mut controller, _sink) = observed(1);
    controller.add_animation(impl_only_opacity(GroupId(1)));
    controller.add_animation(impl_only_opacity(GroupId(2)));
    controller.add_animation(impl_only_translate(GroupId(2)));

    step(&mut controller, 0.0);
    // Transform is free, but its group partner is blocked on opacity.
    assert_eq!(
        controller
            .animation(TargetProperty::Transform)
            .map(Animation::run_state),
        Some(RunState::WaitingForTargetAvailability)
    );

    step(&mut controller, 1.0);
    let group_two: Vec<_> = controller
        .animations()
        .iter()
        .filter(|a| a.group() == GroupId(2))
        .collect();
    assert_eq!(group_two.len(), 2);
    assert!(group_two
        .iter()
        .all(|a| a.run_state() == RunState::Running && a.start_time() == Some(ticks(1.0))));
}

#[test]
fn finished_member_waits_for_slower_group_partner() {
    let (mut controller, _sink) = observed(1);
    let events_sink = RecordingEvents::shared();
    controller.set_event_sink(events_sink.clone());
    let group = IdProvider::next_group_id();
    controller.add_animation(impl_only_opacity(group));
    controller.add_animation(impl_only_translate_over(group, 2.0));

    step(&mut controller, 0.0);
    step(&mut controller, 1.5);
    let run_state = |controller: &AnimationController, property| {
        controller.animation(property).map(Animation::run_state)
    };
    assert_eq!(run_state(&controller, TargetProperty::Opacity), Some(RunState::Finished));
    assert_eq!(run_state(&controller, TargetProperty::Transform), Some(RunState::Running));
    assert!(events_sink.borrow().finished.is_empty());

    step(&mut controller, 2.0);
    assert!(controller
        .animations()
        .iter()
        .all(|a| a.run_state() == RunState::WaitingForDeletion));
    assert_eq!(
        events_sink.borrow().finished,
        vec![
            (ticks(2.0), TargetProperty::Opacity, group),
            (ticks(2.0), TargetProperty::Transform, group),
        ]
    );
}

#[test]
fn aborted_group_member_is_not_reported_finished() {
    let (mut controller, _sink) = observed(1);
    let events_sink = RecordingEvents::shared();
    controller.set_event_sink(events_sink.clone());
    let group = IdProvider::next_group_id();
    controller.add_animation(impl_only_opacity(group));
    controller.add_animation(impl_only_translate_over(group, 2.0));

    step(&mut controller, 0.0);
    controller.animate(ticks(0.5));
    controller.abort_animations(TargetProperty::Transform);
    controller.update_state(true, Some(&mut Vec::new()));
    assert_eq!(
        controller
            .animation(TargetProperty::Transform)
            .map(Animation::run_state),
        Some(RunState::WaitingForDeletion)
    );

    step(&mut controller, 1.5);
    assert_eq!(
        events_sink.borrow().finished,
        vec![(ticks(1.5), TargetProperty::Opacity, group)]
    );
}

#[test]
fn paused_animation_holds_its_value() {
    let (mut controller, sink) = observed(1);
    let animation = impl_only_opacity(GroupId(1));
    let id = animation.id();
    controller.add_animation(animation);
    step(&mut controller, 0.0);

    controller.pause_animation(id, TimeDelta::from_seconds(0.25));
    sink.borrow_mut().take();
    step(&mut controller, 0.6);
    step(&mut controller, 3.0);
    assert_eq!(sink.borrow().opacities(), vec![0.25, 0.25]);
    assert!(controller.has_active_animation());
}

#[test]
fn both_observer_sets_receive_values() {
    let (mut controller, sink) = observed(4);
    controller.set_observes(ObserverSet::Pending, true);
    controller.add_animation(impl_only_opacity(GroupId(1)));
    controller.animate(ticks(0.0));
    assert_eq!(
        sink.borrow().calls,
        vec![
            SinkCall::Opacity(TargetId(4), ObserverSet::Active, 0.0),
            SinkCall::Opacity(TargetId(4), ObserverSet::Pending, 0.0),
        ]
    );
}

#[test]
fn impl_only_values_travel_as_property_updates() {
    let (mut controller, _sink) = observed(1);
    controller.add_animation(impl_only_opacity(GroupId(1)));
    controller.animate(ticks(0.0));
    let mut events = Vec::new();
    controller.update_state(true, Some(&mut events));
    controller.animate(ticks(0.25));
    controller.update_state(true, Some(&mut events));

    let updates: Vec<_> = events
        .iter()
        .filter(|e| e.kind == AnimationEventKind::PropertyUpdate)
        .collect();
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|e| e.is_impl_only));
}
