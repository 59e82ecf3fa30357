mod common;

use anyhow::{Context, Result};
use common::{approx, ticks};
use compositor_animation_core::{
    Animation, AnimationCurve, Direction, FillMode, GroupId, IdProvider, RunState, TargetProperty,
};
use compositor_test_fixtures as fixtures;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnimationFixture {
    curve: String,
    property: TargetProperty,
    iterations: f64,
    direction: Direction,
    fill_mode: FillMode,
    playback_rate: f64,
    start_time: f64,
    samples: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    time: f64,
    #[serde(default)]
    opacity: Option<f64>,
    #[serde(default)]
    translate: Option<[f64; 3]>,
}

fn build(fixture: &AnimationFixture) -> Result<Animation> {
    let curve: AnimationCurve = fixtures::curves::load(&fixture.curve)
        .with_context(|| format!("loading curve {}", fixture.curve))?;
    curve.validate()?;
    let mut animation = Animation::new(
        curve,
        IdProvider::next_animation_id(),
        GroupId(1),
        fixture.property,
    );
    animation.set_iterations(fixture.iterations);
    animation.set_direction(fixture.direction);
    animation.set_fill_mode(fixture.fill_mode);
    animation.set_playback_rate(fixture.playback_rate);
    animation.set_start_time(ticks(fixture.start_time));
    animation.set_run_state(RunState::Running, ticks(fixture.start_time));
    Ok(animation)
}

#[test]
fn every_curve_fixture_parses_and_validates() -> Result<()> {
    for name in fixtures::curves::keys() {
        let curve: AnimationCurve = fixtures::curves::load(&name)?;
        curve
            .validate()
            .with_context(|| format!("curve fixture {name}"))?;
        assert!(curve.duration().as_seconds() > 0.0, "{name}");
    }
    Ok(())
}

#[test]
fn animation_fixtures_match_expected_samples() -> Result<()> {
    for name in fixtures::animations::keys() {
        let fixture: AnimationFixture = fixtures::animations::load(&name)?;
        let animation = build(&fixture)?;
        for sample in &fixture.samples {
            let local = animation.trim_time_to_current_iteration(ticks(sample.time));
            if let Some(expected) = sample.opacity {
                let curve = animation.curve().as_float().context("opacity needs a float curve")?;
                approx(curve.get_value(local), expected, 1e-9);
            }
            if let Some([x, y, z]) = sample.translate {
                let curve = animation
                    .curve()
                    .as_transform()
                    .context("translate needs a transform curve")?;
                let value = curve.get_value(local);
                approx(value.get(0, 3), x, 1e-9);
                approx(value.get(1, 3), y, 1e-9);
                approx(value.get(2, 3), z, 1e-9);
            }
        }
    }
    Ok(())
}

#[test]
fn mismatched_transform_fixture_still_evaluates() -> Result<()> {
    let curve: AnimationCurve = fixtures::curves::load("rotate-scale-mismatch")?;
    let transform = curve.as_transform().context("transform curve")?;
    let mid = transform.get_value(transform.duration() * 0.5);
    assert!((0..4).all(|r| (0..4).all(|c| mid.get(r, c).is_finite())));
    Ok(())
}
