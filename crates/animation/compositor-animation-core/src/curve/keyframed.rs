//! Keyframed curves for color, float, transform and filter values.
//!
//! Evaluation clamps outside the keyframe range, applies the curve-level timing
//! function to the normalized position, locates the active segment with a linear
//! scan, applies the segment's own timing function, then blends the two keyframe
//! values with the value type's blend.

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, BlendError};
use crate::filter::FilterOperations;
use crate::geometry::{BoxF, Color};
use crate::time::TimeDelta;
use crate::timing::TimingFunction;
use crate::transform::{Transform, TransformOperations};
use crate::tween::{color_value_between, lerp};

/// A value type a keyframed curve can hold.
pub trait KeyframeValue: Clone + PartialEq {
    /// What the curve evaluates to.
    type Output: Clone;

    fn to_output(&self) -> Self::Output;

    fn blend(from: &Self, to: &Self, progress: f64) -> Result<Self::Output, BlendError>;
}

impl KeyframeValue for f64 {
    type Output = f64;

    fn to_output(&self) -> f64 {
        *self
    }

    fn blend(from: &f64, to: &f64, progress: f64) -> Result<f64, BlendError> {
        Ok(lerp(*from, *to, progress))
    }
}

impl KeyframeValue for Color {
    type Output = Color;

    fn to_output(&self) -> Color {
        *self
    }

    fn blend(from: &Color, to: &Color, progress: f64) -> Result<Color, BlendError> {
        Ok(color_value_between(progress, *from, *to))
    }
}

impl KeyframeValue for TransformOperations {
    type Output = Transform;

    fn to_output(&self) -> Transform {
        self.apply()
    }

    fn blend(from: &Self, to: &Self, progress: f64) -> Result<Transform, BlendError> {
        to.blend(from, progress)
    }
}

impl KeyframeValue for FilterOperations {
    type Output = FilterOperations;

    fn to_output(&self) -> FilterOperations {
        self.clone()
    }

    fn blend(from: &Self, to: &Self, progress: f64) -> Result<FilterOperations, BlendError> {
        Ok(to.blend(from, progress))
    }
}

/// One keyframe. The timing function shapes the segment that starts here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<V> {
    pub time: TimeDelta,
    pub value: V,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_function: Option<TimingFunction>,
}

impl<V> Keyframe<V> {
    pub fn new(time: TimeDelta, value: V, timing_function: Option<TimingFunction>) -> Self {
        Self {
            time,
            value,
            timing_function,
        }
    }
}

/// Keyframes sorted by strictly ascending time plus an optional curve-level easing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframedAnimationCurve<V> {
    keyframes: Vec<Keyframe<V>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timing_function: Option<TimingFunction>,
}

pub type KeyframedFloatAnimationCurve = KeyframedAnimationCurve<f64>;
pub type KeyframedColorAnimationCurve = KeyframedAnimationCurve<Color>;
pub type KeyframedTransformAnimationCurve = KeyframedAnimationCurve<TransformOperations>;
pub type KeyframedFilterAnimationCurve = KeyframedAnimationCurve<FilterOperations>;

impl<V> Default for KeyframedAnimationCurve<V> {
    fn default() -> Self {
        Self {
            keyframes: Vec::new(),
            timing_function: None,
        }
    }
}

impl<V: KeyframeValue> KeyframedAnimationCurve<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a keyframe list that must already be strictly ascending in time.
    pub fn from_keyframes(
        keyframes: Vec<Keyframe<V>>,
        timing_function: Option<TimingFunction>,
    ) -> crate::Result<Self> {
        let curve = Self {
            keyframes,
            timing_function,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Check the ordering invariant. Deserialized curves should be validated before use.
    pub fn validate(&self) -> crate::Result<()> {
        if self.keyframes.is_empty() {
            return Err(AnimationError::InvalidKeyframes {
                reason: "curve has no keyframes".to_string(),
            });
        }
        for (i, kf) in self.keyframes.iter().enumerate() {
            if !kf.time.as_seconds().is_finite() {
                return Err(AnimationError::InvalidKeyframes {
                    reason: format!("keyframe {i} has a non-finite time"),
                });
            }
        }
        if let Some(i) = self
            .keyframes
            .windows(2)
            .position(|pair| pair[1].time <= pair[0].time)
        {
            return Err(AnimationError::InvalidKeyframes {
                reason: format!(
                    "keyframe {} at {}s is not after keyframe {} at {}s",
                    i + 1,
                    self.keyframes[i + 1].time.as_seconds(),
                    i,
                    self.keyframes[i].time.as_seconds()
                ),
            });
        }
        Ok(())
    }

    /// Insert keeping times strictly ascending. A keyframe at an existing time replaces it.
    pub fn add_keyframe(&mut self, keyframe: Keyframe<V>) {
        // Keyframes usually arrive in order.
        match self.keyframes.last() {
            None => {
                self.keyframes.push(keyframe);
                return;
            }
            Some(last) if keyframe.time > last.time => {
                self.keyframes.push(keyframe);
                return;
            }
            Some(_) => {}
        }
        match self
            .keyframes
            .binary_search_by(|kf| kf.time.partial_cmp(&keyframe.time).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => self.keyframes[i] = keyframe,
            Err(i) => self.keyframes.insert(i, keyframe),
        }
    }

    pub fn set_timing_function(&mut self, timing_function: Option<TimingFunction>) {
        self.timing_function = timing_function;
    }

    pub fn timing_function(&self) -> Option<&TimingFunction> {
        self.timing_function.as_ref()
    }

    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    /// Last keyframe time minus first keyframe time.
    pub fn duration(&self) -> TimeDelta {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => TimeDelta::ZERO,
        }
    }

    /// Apply the curve-level timing function to the normalized position.
    fn transformed_animation_time(&self, t: f64) -> f64 {
        let Some(tf) = &self.timing_function else {
            return t;
        };
        let (first, last) = match (self.keyframes.first(), self.keyframes.last()) {
            (Some(f), Some(l)) => (f.time.as_seconds(), l.time.as_seconds()),
            _ => return t,
        };
        let duration = last - first;
        if duration <= 0.0 {
            return t;
        }
        let progress = (t - first) / duration;
        tf.get_value(progress) * duration + first
    }

    /// Index of the segment containing `t`. The last keyframe never starts a segment.
    fn active_keyframe(&self, t: f64) -> usize {
        let last_start = self.keyframes.len().saturating_sub(2);
        (0..last_start)
            .find(|&i| t < self.keyframes[i + 1].time.as_seconds())
            .unwrap_or(last_start)
    }

    fn transformed_keyframe_progress(&self, t: f64, i: usize) -> f64 {
        let from = &self.keyframes[i];
        let to = &self.keyframes[i + 1];
        let span = to.time.as_seconds() - from.time.as_seconds();
        let progress = (t - from.time.as_seconds()) / span;
        match &from.timing_function {
            Some(tf) => tf.get_value(progress),
            None => progress,
        }
    }

    /// Value at local time `t`.
    ///
    /// # Panics
    /// Panics if the curve has no keyframes.
    pub fn get_value(&self, t: TimeDelta) -> V::Output {
        assert!(
            !self.keyframes.is_empty(),
            "keyframed curve evaluated with no keyframes"
        );
        let first = &self.keyframes[0];
        let last = &self.keyframes[self.keyframes.len() - 1];
        if t <= first.time {
            return first.value.to_output();
        }
        if t >= last.time {
            return last.value.to_output();
        }

        let t = self.transformed_animation_time(t.as_seconds());
        let i = self.active_keyframe(t);
        let progress = self.transformed_keyframe_progress(t, i);
        let from = &self.keyframes[i];
        let to = &self.keyframes[i + 1];
        match V::blend(&from.value, &to.value, progress) {
            Ok(value) => value,
            Err(err) => {
                log::warn!(
                    "keyframe blend failed at {}s ({err}); holding segment start value",
                    from.time.as_seconds()
                );
                from.value.to_output()
            }
        }
    }

    /// (min, max) progress the segment starting at `i` can reach.
    fn segment_progress_range(&self, i: usize) -> (f64, f64) {
        self.keyframes[i]
            .timing_function
            .as_ref()
            .map_or((0.0, 1.0), TimingFunction::range)
    }
}

impl KeyframedTransformAnimationCurve {
    /// Bounds of `bbox` over the whole animation, or `None` when some segment cannot
    /// be bounded.
    ///
    /// # Panics
    /// Panics if the curve has fewer than two keyframes.
    pub fn animated_bounds_for_box(&self, bbox: &BoxF) -> Option<BoxF> {
        assert!(
            self.keyframes.len() >= 2,
            "transform bounds need at least two keyframes"
        );
        let mut bounds: Option<BoxF> = None;
        for i in 0..self.keyframes.len() - 1 {
            let (min_progress, max_progress) = self.segment_progress_range(i);
            let step = self.keyframes[i + 1].value.blended_bounds_for_box(
                bbox,
                &self.keyframes[i].value,
                min_progress,
                max_progress,
            )?;
            match bounds.as_mut() {
                Some(b) => b.union(&step),
                None => bounds = Some(step),
            }
        }
        bounds
    }

    pub fn affects_scale(&self) -> bool {
        self.keyframes.iter().any(|kf| kf.value.affects_scale())
    }

    pub fn is_translation(&self) -> bool {
        self.keyframes.iter().all(|kf| kf.value.is_translation())
    }

    pub fn preserves_axis_alignment(&self) -> bool {
        self.keyframes
            .iter()
            .all(|kf| kf.value.preserves_axis_alignment())
    }

    /// Largest absolute scale factor among the keyframes the animation moves toward.
    /// Playing forward skips the first keyframe; playing backward skips the last.
    ///
    /// # Panics
    /// Panics if the curve has fewer than two keyframes.
    pub fn maximum_target_scale(&self, forward_direction: bool) -> Option<f64> {
        assert!(
            self.keyframes.len() >= 2,
            "target scale needs at least two keyframes"
        );
        let (start, end) = if forward_direction {
            (1, self.keyframes.len())
        } else {
            (0, self.keyframes.len() - 1)
        };
        let mut max_scale = 0.0f64;
        for kf in &self.keyframes[start..end] {
            let [x, y, z] = kf.value.scale_component()?;
            max_scale = max_scale.max(x.abs().max(y.abs()).max(z.abs()));
        }
        Some(max_scale)
    }
}

impl KeyframedFilterAnimationCurve {
    pub fn has_filter_that_moves_pixels(&self) -> bool {
        self.keyframes
            .iter()
            .any(|kf| kf.value.has_filter_that_moves_pixels())
    }
}
