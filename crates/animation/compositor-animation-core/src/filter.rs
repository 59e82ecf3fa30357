//! Filter operation lists and their blending.

use serde::{Deserialize, Serialize};

use crate::geometry::{Color, Vector2d};
use crate::tween::{color_value_between, lerp, vector_value_between};

/// One filter primitive. Amounts use CSS units: fractions for the color filters,
/// degrees for hue rotation, pixels for blur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterOperation {
    Grayscale { amount: f64 },
    Sepia { amount: f64 },
    Saturate { amount: f64 },
    HueRotate { degrees: f64 },
    Invert { amount: f64 },
    Brightness { amount: f64 },
    Contrast { amount: f64 },
    Opacity { amount: f64 },
    Blur { radius: f64 },
    DropShadow {
        offset: Vector2d,
        blur: f64,
        color: Color,
    },
}

impl FilterOperation {
    /// The operation of the same type that leaves pixels unchanged.
    pub fn identity_like(&self) -> FilterOperation {
        match self {
            FilterOperation::Grayscale { .. } => FilterOperation::Grayscale { amount: 0.0 },
            FilterOperation::Sepia { .. } => FilterOperation::Sepia { amount: 0.0 },
            FilterOperation::Saturate { .. } => FilterOperation::Saturate { amount: 1.0 },
            FilterOperation::HueRotate { .. } => FilterOperation::HueRotate { degrees: 0.0 },
            FilterOperation::Invert { .. } => FilterOperation::Invert { amount: 0.0 },
            FilterOperation::Brightness { .. } => FilterOperation::Brightness { amount: 1.0 },
            FilterOperation::Contrast { .. } => FilterOperation::Contrast { amount: 1.0 },
            FilterOperation::Opacity { .. } => FilterOperation::Opacity { amount: 1.0 },
            FilterOperation::Blur { .. } => FilterOperation::Blur { radius: 0.0 },
            FilterOperation::DropShadow { .. } => FilterOperation::DropShadow {
                offset: Vector2d::default(),
                blur: 0.0,
                color: Color::TRANSPARENT,
            },
        }
    }

    pub fn same_type(&self, other: &FilterOperation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Whether the filter samples pixels outside the input bounds.
    pub fn moves_pixels(&self) -> bool {
        matches!(
            self,
            FilterOperation::Blur { .. } | FilterOperation::DropShadow { .. }
        )
    }

    /// Blend two operations of the same type. `None` when the types differ.
    pub fn blend(from: &FilterOperation, to: &FilterOperation, progress: f64) -> Option<FilterOperation> {
        let unit = |a: f64, b: f64| lerp(a, b, progress).clamp(0.0, 1.0);
        let non_negative = |a: f64, b: f64| lerp(a, b, progress).max(0.0);
        use FilterOperation as F;
        let blended = match (*from, *to) {
            (F::Grayscale { amount: a }, F::Grayscale { amount: b }) => F::Grayscale { amount: unit(a, b) },
            (F::Sepia { amount: a }, F::Sepia { amount: b }) => F::Sepia { amount: unit(a, b) },
            (F::Invert { amount: a }, F::Invert { amount: b }) => F::Invert { amount: unit(a, b) },
            (F::Opacity { amount: a }, F::Opacity { amount: b }) => F::Opacity { amount: unit(a, b) },
            (F::Saturate { amount: a }, F::Saturate { amount: b }) => F::Saturate {
                amount: non_negative(a, b),
            },
            (F::Brightness { amount: a }, F::Brightness { amount: b }) => F::Brightness {
                amount: non_negative(a, b),
            },
            (F::Contrast { amount: a }, F::Contrast { amount: b }) => F::Contrast {
                amount: non_negative(a, b),
            },
            (F::Blur { radius: a }, F::Blur { radius: b }) => F::Blur {
                radius: non_negative(a, b),
            },
            (F::HueRotate { degrees: a }, F::HueRotate { degrees: b }) => F::HueRotate {
                degrees: lerp(a, b, progress),
            },
            (
                F::DropShadow {
                    offset: fo,
                    blur: fb,
                    color: fc,
                },
                F::DropShadow {
                    offset: to,
                    blur: tb,
                    color: tc,
                },
            ) => F::DropShadow {
                offset: vector_value_between(progress, fo, to),
                blur: non_negative(fb, tb),
                color: color_value_between(progress, fc, tc),
            },
            _ => return None,
        };
        Some(blended)
    }
}

/// An ordered list of filter operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterOperations {
    operations: Vec<FilterOperation>,
}

impl From<Vec<FilterOperation>> for FilterOperations {
    fn from(operations: Vec<FilterOperation>) -> Self {
        Self { operations }
    }
}

impl FilterOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, op: FilterOperation) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[FilterOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn has_filter_that_moves_pixels(&self) -> bool {
        self.operations.iter().any(FilterOperation::moves_pixels)
    }

    /// Blend from `from` (progress 0) to `self` (progress 1).
    ///
    /// A type mismatch at any shared index returns `self` unchanged. The tail of the
    /// longer list blends against the identity of each operation's own type.
    pub fn blend(&self, from: &FilterOperations, progress: f64) -> FilterOperations {
        let shared = self.len().min(from.len());
        let mismatch = self.operations[..shared]
            .iter()
            .zip(&from.operations[..shared])
            .any(|(a, b)| !a.same_type(b));
        if mismatch {
            return self.clone();
        }

        let count = self.len().max(from.len());
        let mut blended = Vec::with_capacity(count);
        for i in 0..count {
            let (from_op, to_op) = match (from.operations.get(i), self.operations.get(i)) {
                (Some(f), Some(t)) => (*f, *t),
                (Some(f), None) => (*f, f.identity_like()),
                (None, Some(t)) => (t.identity_like(), *t),
                (None, None) => break,
            };
            if let Some(op) = FilterOperation::blend(&from_op, &to_op, progress) {
                blended.push(op);
            }
        }
        FilterOperations {
            operations: blended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_lists_blend_pairwise() {
        let from: FilterOperations = vec![
            FilterOperation::Grayscale { amount: 0.25 },
            FilterOperation::Blur { radius: 0.0 },
        ]
        .into();
        let to: FilterOperations = vec![
            FilterOperation::Grayscale { amount: 0.75 },
            FilterOperation::Blur { radius: 10.0 },
        ]
        .into();
        let mid = to.blend(&from, 0.5);
        assert_eq!(
            mid.operations(),
            &[
                FilterOperation::Grayscale { amount: 0.5 },
                FilterOperation::Blur { radius: 5.0 }
            ]
        );
    }

    #[test]
    fn mismatched_types_return_target() {
        let from: FilterOperations = vec![FilterOperation::Sepia { amount: 1.0 }].into();
        let to: FilterOperations = vec![FilterOperation::Invert { amount: 1.0 }].into();
        assert_eq!(to.blend(&from, 0.3), to);
    }

    #[test]
    fn longer_tail_blends_with_identity() {
        let from = FilterOperations::new();
        let to: FilterOperations = vec![FilterOperation::Brightness { amount: 3.0 }].into();
        let mid = to.blend(&from, 0.5);
        assert_eq!(mid.operations(), &[FilterOperation::Brightness { amount: 2.0 }]);

        let from: FilterOperations = vec![FilterOperation::Opacity { amount: 0.0 }].into();
        let to = FilterOperations::new();
        let mid = to.blend(&from, 0.25);
        assert_eq!(mid.operations(), &[FilterOperation::Opacity { amount: 0.25 }]);
    }

    #[test]
    fn amounts_are_clamped() {
        let from: FilterOperations = vec![FilterOperation::Invert { amount: 0.0 }].into();
        let to: FilterOperations = vec![FilterOperation::Invert { amount: 1.0 }].into();
        assert_eq!(
            to.blend(&from, 1.5).operations(),
            &[FilterOperation::Invert { amount: 1.0 }]
        );
        let from: FilterOperations = vec![FilterOperation::Blur { radius: 2.0 }].into();
        let to: FilterOperations = vec![FilterOperation::Blur { radius: 4.0 }].into();
        assert_eq!(
            to.blend(&from, -2.0).operations(),
            &[FilterOperation::Blur { radius: 0.0 }]
        );
    }

    #[test]
    fn pixel_moving_filters() {
        let ops: FilterOperations = vec![FilterOperation::Sepia { amount: 1.0 }].into();
        assert!(!ops.has_filter_that_moves_pixels());
        let ops: FilterOperations = vec![FilterOperation::DropShadow {
            offset: Vector2d::new(2.0, 2.0),
            blur: 3.0,
            color: Color::BLACK,
        }]
        .into();
        assert!(ops.has_filter_that_moves_pixels());
    }
}
