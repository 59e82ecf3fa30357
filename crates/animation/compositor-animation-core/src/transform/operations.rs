//! Typed transform operation lists and their blending.
//!
//! Two lists blend per operation when their types line up index for index (an empty
//! or all-identity list lines up with anything). Otherwise both lists are flattened
//! to matrices and blended through decomposition.

use serde::{Deserialize, Serialize};

use crate::error::BlendError;
use crate::geometry::{BoxF, Point3};
use crate::transform::Transform;
use crate::tween::lerp;

/// Tolerance for treating two rotation axes as parallel.
const ANGLE_EPSILON: f64 = 1e-4;

/// One transform primitive. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformOperation {
    Identity,
    Translate { x: f64, y: f64, z: f64 },
    Rotate { axis: [f64; 3], angle: f64 },
    Scale { x: f64, y: f64, z: f64 },
    Skew { x: f64, y: f64 },
    Perspective { depth: f64 },
    Matrix { matrix: Transform },
}

/// Discriminant of [`TransformOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformOperationKind {
    Identity,
    Translate,
    Rotate,
    Scale,
    Skew,
    Perspective,
    Matrix,
}

impl TransformOperation {
    pub fn kind(&self) -> TransformOperationKind {
        match self {
            TransformOperation::Identity => TransformOperationKind::Identity,
            TransformOperation::Translate { .. } => TransformOperationKind::Translate,
            TransformOperation::Rotate { .. } => TransformOperationKind::Rotate,
            TransformOperation::Scale { .. } => TransformOperationKind::Scale,
            TransformOperation::Skew { .. } => TransformOperationKind::Skew,
            TransformOperation::Perspective { .. } => TransformOperationKind::Perspective,
            TransformOperation::Matrix { .. } => TransformOperationKind::Matrix,
        }
    }

    pub fn to_transform(&self) -> Transform {
        match *self {
            TransformOperation::Identity => Transform::identity(),
            TransformOperation::Translate { x, y, z } => Transform::from_translation(x, y, z),
            TransformOperation::Rotate { axis, angle } => Transform::from_rotation(axis, angle),
            TransformOperation::Scale { x, y, z } => Transform::from_scale(x, y, z),
            TransformOperation::Skew { x, y } => Transform::from_skew(x, y),
            TransformOperation::Perspective { depth } => Transform::from_perspective_depth(depth),
            TransformOperation::Matrix { matrix } => matrix,
        }
    }

    pub fn is_identity(&self) -> bool {
        match *self {
            TransformOperation::Identity => true,
            TransformOperation::Translate { x, y, z } => x == 0.0 && y == 0.0 && z == 0.0,
            TransformOperation::Rotate { axis, angle } => {
                angle == 0.0 || axis.iter().all(|c| *c == 0.0)
            }
            TransformOperation::Scale { x, y, z } => x == 1.0 && y == 1.0 && z == 1.0,
            TransformOperation::Skew { x, y } => x == 0.0 && y == 0.0,
            TransformOperation::Perspective { depth } => depth == 0.0,
            TransformOperation::Matrix { matrix } => matrix.is_identity(),
        }
    }
}

/// `None` stands for "no operation at this index".
#[inline]
fn is_operation_identity(op: Option<&TransformOperation>) -> bool {
    op.map_or(true, TransformOperation::is_identity)
}

/// Kind that drives a pairwise blend: `to`'s kind unless `to` is identity.
fn interpolation_kind(
    from: Option<&TransformOperation>,
    to: Option<&TransformOperation>,
) -> TransformOperationKind {
    let driver = if is_operation_identity(to) { from } else { to };
    driver.map_or(TransformOperationKind::Identity, TransformOperation::kind)
}

/// Shared rotation axis and the starting angle along it, if the two rotations share one.
fn share_same_axis(
    from: Option<&TransformOperation>,
    to: Option<&TransformOperation>,
) -> Option<([f64; 3], f64)> {
    let from_identity = is_operation_identity(from);
    let to_identity = is_operation_identity(to);
    if from_identity && to_identity {
        return None;
    }

    let rotate = |op: Option<&TransformOperation>| match op {
        Some(TransformOperation::Rotate { axis, angle }) => Some((*axis, *angle)),
        _ => None,
    };

    if from_identity {
        let (axis, _) = rotate(to)?;
        return Some((axis, 0.0));
    }
    if to_identity {
        return rotate(from);
    }

    let (from_axis, from_angle) = rotate(from)?;
    let (to_axis, _) = rotate(to)?;
    let length_2 = from_axis.iter().map(|c| c * c).sum::<f64>();
    let other_length_2 = to_axis.iter().map(|c| c * c).sum::<f64>();
    if length_2 <= ANGLE_EPSILON || other_length_2 <= ANGLE_EPSILON {
        return None;
    }

    let dot = to_axis[0] * from_axis[0] + to_axis[1] * from_axis[1] + to_axis[2] * from_axis[2];
    let error = (1.0 - (dot * dot) / (length_2 * other_length_2)).abs();
    if error >= ANGLE_EPSILON {
        return None;
    }
    // Opposite axes: rotate the other way round.
    let angle_from = if dot > 0.0 { from_angle } else { -from_angle };
    Some((to_axis, angle_from))
}

fn matrix_blend(
    from: Option<&TransformOperation>,
    to: Option<&TransformOperation>,
    progress: f64,
) -> Result<Transform, BlendError> {
    let from_matrix = from.map_or_else(Transform::identity, TransformOperation::to_transform);
    let mut result = to.map_or_else(Transform::identity, TransformOperation::to_transform);
    result.blend(&from_matrix, progress)?;
    Ok(result)
}

/// Blend two operations of matching (or identity) kind.
pub fn blend_operations(
    from: Option<&TransformOperation>,
    to: Option<&TransformOperation>,
    progress: f64,
) -> Result<Transform, BlendError> {
    let mut result = Transform::identity();
    if is_operation_identity(from) && is_operation_identity(to) {
        return Ok(result);
    }
    let from = from.filter(|op| !op.is_identity());
    let to = to.filter(|op| !op.is_identity());

    match interpolation_kind(from, to) {
        TransformOperationKind::Translate => {
            let params = |op: Option<&TransformOperation>| match op {
                Some(TransformOperation::Translate { x, y, z }) => (*x, *y, *z),
                _ => (0.0, 0.0, 0.0),
            };
            let (fx, fy, fz) = params(from);
            let (tx, ty, tz) = params(to);
            result.translate(
                lerp(fx, tx, progress),
                lerp(fy, ty, progress),
                lerp(fz, tz, progress),
            );
        }
        TransformOperationKind::Rotate => {
            let to_angle = match to {
                Some(TransformOperation::Rotate { angle, .. }) => *angle,
                _ => 0.0,
            };
            match share_same_axis(from, to) {
                Some((axis, from_angle)) => {
                    result.rotate_about(axis, lerp(from_angle, to_angle, progress));
                }
                None => result = matrix_blend(from, to, progress)?,
            }
        }
        TransformOperationKind::Scale => {
            let params = |op: Option<&TransformOperation>| match op {
                Some(TransformOperation::Scale { x, y, z }) => (*x, *y, *z),
                _ => (1.0, 1.0, 1.0),
            };
            let (fx, fy, fz) = params(from);
            let (tx, ty, tz) = params(to);
            result.scale(
                lerp(fx, tx, progress),
                lerp(fy, ty, progress),
                lerp(fz, tz, progress),
            );
        }
        TransformOperationKind::Skew => {
            let params = |op: Option<&TransformOperation>| match op {
                Some(TransformOperation::Skew { x, y }) => (*x, *y),
                _ => (0.0, 0.0),
            };
            let (fx, fy) = params(from);
            let (tx, ty) = params(to);
            result.skew(lerp(fx, tx, progress), lerp(fy, ty, progress));
        }
        TransformOperationKind::Perspective => {
            let depth = |op: Option<&TransformOperation>| match op {
                Some(TransformOperation::Perspective { depth }) => *depth,
                _ => f64::MAX,
            };
            let from_depth = depth(from);
            let to_depth = depth(to);
            if from_depth == 0.0 || to_depth == 0.0 {
                return Err(BlendError::ZeroPerspectiveDepth);
            }
            let blended = lerp(1.0 / from_depth, 1.0 / to_depth, progress);
            if blended == 0.0 {
                return Err(BlendError::ZeroPerspectiveDepth);
            }
            result.apply_perspective_depth(1.0 / blended);
        }
        TransformOperationKind::Matrix => result = matrix_blend(from, to, progress)?,
        TransformOperationKind::Identity => {}
    }
    Ok(result)
}

/// Bounds of the arc swept by `point` rotating about `axis`: the box of the full circle.
fn bounding_box_for_arc(point: Point3, axis: [f64; 3]) -> BoxF {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len == 0.0 {
        return BoxF::new(point.x, point.y, point.z, 0.0, 0.0, 0.0);
    }
    let n = [axis[0] / len, axis[1] / len, axis[2] / len];
    let p = [point.x, point.y, point.z];
    let along = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
    let center = [n[0] * along, n[1] * along, n[2] * along];
    let radius = ((p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2) + (p[2] - center[2]).powi(2)).sqrt();
    let extent = |k: usize| radius * (1.0 - n[k] * n[k]).max(0.0).sqrt();
    let (ex, ey, ez) = (extent(0), extent(1), extent(2));
    BoxF::new(
        center[0] - ex,
        center[1] - ey,
        center[2] - ez,
        2.0 * ex,
        2.0 * ey,
        2.0 * ez,
    )
}

fn blended_bounds_for_operation(
    bbox: &BoxF,
    from: Option<&TransformOperation>,
    to: Option<&TransformOperation>,
    min_progress: f64,
    max_progress: f64,
) -> Option<BoxF> {
    if is_operation_identity(from) && is_operation_identity(to) {
        return Some(*bbox);
    }
    let from = from.filter(|op| !op.is_identity());
    let to = to.filter(|op| !op.is_identity());

    match interpolation_kind(from, to) {
        TransformOperationKind::Identity => Some(*bbox),
        TransformOperationKind::Translate | TransformOperationKind::Scale => {
            let from_transform = blend_operations(from, to, min_progress).ok()?;
            let to_transform = blend_operations(from, to, max_progress).ok()?;
            let mut bounds = from_transform.map_box(bbox);
            bounds.union(&to_transform.map_box(bbox));
            Some(bounds)
        }
        TransformOperationKind::Rotate => {
            let (axis, _) = share_same_axis(from, to)?;
            let mut corners = bbox.corners().into_iter();
            let first = corners.next()?;
            let mut bounds = bounding_box_for_arc(first, axis);
            for corner in corners {
                bounds.union(&bounding_box_for_arc(corner, axis));
            }
            Some(bounds)
        }
        TransformOperationKind::Skew
        | TransformOperationKind::Perspective
        | TransformOperationKind::Matrix => None,
    }
}

/// Number of pairwise blends; an all-identity side contributes no operations.
fn blend_count(
    from: &TransformOperations,
    from_identity: bool,
    to: &TransformOperations,
    to_identity: bool,
) -> usize {
    let from_len = if from_identity { 0 } else { from.len() };
    let to_len = if to_identity { 0 } else { to.len() };
    from_len.max(to_len)
}

/// An ordered list of transform operations, applied left to right.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformOperations {
    operations: Vec<TransformOperation>,
}

impl From<Vec<TransformOperation>> for TransformOperations {
    fn from(operations: Vec<TransformOperation>) -> Self {
        Self { operations }
    }
}

impl TransformOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[TransformOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn append_translate(&mut self, x: f64, y: f64, z: f64) {
        self.operations.push(TransformOperation::Translate { x, y, z });
    }

    pub fn append_rotate(&mut self, axis: [f64; 3], degrees: f64) {
        self.operations.push(TransformOperation::Rotate {
            axis,
            angle: degrees,
        });
    }

    pub fn append_scale(&mut self, x: f64, y: f64, z: f64) {
        self.operations.push(TransformOperation::Scale { x, y, z });
    }

    pub fn append_skew(&mut self, x_degrees: f64, y_degrees: f64) {
        self.operations.push(TransformOperation::Skew {
            x: x_degrees,
            y: y_degrees,
        });
    }

    pub fn append_perspective(&mut self, depth: f64) {
        self.operations.push(TransformOperation::Perspective { depth });
    }

    pub fn append_matrix(&mut self, matrix: Transform) {
        self.operations.push(TransformOperation::Matrix { matrix });
    }

    pub fn append_identity(&mut self) {
        self.operations.push(TransformOperation::Identity);
    }

    /// Product of all operations in list order.
    pub fn apply(&self) -> Transform {
        let mut result = Transform::identity();
        for op in &self.operations {
            result.pre_concat(&op.to_transform());
        }
        result
    }

    pub fn is_identity(&self) -> bool {
        self.operations.iter().all(TransformOperation::is_identity)
    }

    /// Whether the two lists can be blended operation by operation.
    pub fn matches_types(&self, other: &TransformOperations) -> bool {
        if self.is_empty() || other.is_empty() {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        self.operations
            .iter()
            .zip(&other.operations)
            .all(|(a, b)| a.kind() == b.kind() || a.is_identity() || b.is_identity())
    }

    /// Blend from `from` (progress 0) to `self` (progress 1).
    pub fn blend(&self, from: &TransformOperations, progress: f64) -> Result<Transform, BlendError> {
        let from_identity = from.is_identity();
        let to_identity = self.is_identity();
        if from_identity && to_identity {
            return Ok(Transform::identity());
        }

        if self.matches_types(from) {
            let count = blend_count(from, from_identity, self, to_identity);
            let mut result = Transform::identity();
            for i in 0..count {
                let from_op = if from_identity { None } else { from.operations.get(i) };
                let to_op = if to_identity { None } else { self.operations.get(i) };
                let blended = blend_operations(from_op, to_op, progress)?;
                result.pre_concat(&blended);
            }
            return Ok(result);
        }

        let mut result = self.apply();
        result.blend(&from.apply(), progress)?;
        Ok(result)
    }

    /// Conservative bounds of `bbox` under every blend between `from` and `self` for
    /// progress in `[min_progress, max_progress]`. `None` when no bound can be given.
    pub fn blended_bounds_for_box(
        &self,
        bbox: &BoxF,
        from: &TransformOperations,
        min_progress: f64,
        max_progress: f64,
    ) -> Option<BoxF> {
        let from_identity = from.is_identity();
        let to_identity = self.is_identity();
        if from_identity && to_identity {
            return Some(*bbox);
        }
        if !self.matches_types(from) {
            return None;
        }

        let count = blend_count(from, from_identity, self, to_identity);
        // Applied innermost first, so walk the list backwards.
        let mut bounds = *bbox;
        for i in (0..count).rev() {
            let from_op = if from_identity { None } else { from.operations.get(i) };
            let to_op = if to_identity { None } else { self.operations.get(i) };
            bounds = blended_bounds_for_operation(&bounds, from_op, to_op, min_progress, max_progress)?;
        }
        Some(bounds)
    }

    pub fn affects_scale(&self) -> bool {
        self.operations.iter().any(|op| match op {
            TransformOperation::Scale { .. } => true,
            TransformOperation::Matrix { matrix } => !matrix.is_identity_or_translation(),
            _ => false,
        })
    }

    pub fn is_translation(&self) -> bool {
        self.operations.iter().all(|op| match op {
            TransformOperation::Identity | TransformOperation::Translate { .. } => true,
            TransformOperation::Matrix { matrix } => matrix.is_identity_or_translation(),
            _ => false,
        })
    }

    pub fn preserves_axis_alignment(&self) -> bool {
        self.operations.iter().all(|op| match op {
            TransformOperation::Identity
            | TransformOperation::Translate { .. }
            | TransformOperation::Scale { .. } => true,
            TransformOperation::Matrix { matrix } => {
                matrix.is_identity() || matrix.is_scale_or_translation()
            }
            _ => false,
        })
    }

    /// The single scale operation's factors, or `(1, 1, 1)` when there is none.
    ///
    /// `None` when the scale cannot be read off the list (more than one scale, or a
    /// skew, perspective or matrix operation).
    pub fn scale_component(&self) -> Option<[f64; 3]> {
        let mut scale = [1.0; 3];
        let mut has_scale = false;
        for op in &self.operations {
            match op {
                TransformOperation::Scale { x, y, z } => {
                    if has_scale {
                        return None;
                    }
                    has_scale = true;
                    scale = [scale[0] * x, scale[1] * y, scale[2] * z];
                }
                TransformOperation::Skew { .. }
                | TransformOperation::Perspective { .. }
                | TransformOperation::Matrix { .. } => return None,
                TransformOperation::Identity
                | TransformOperation::Translate { .. }
                | TransformOperation::Rotate { .. } => {}
            }
        }
        Some(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn translate(x: f64, y: f64, z: f64) -> TransformOperations {
        let mut ops = TransformOperations::new();
        ops.append_translate(x, y, z);
        ops
    }

    #[test]
    fn matched_translate_blend_is_exact() {
        let from = translate(10.0, 0.0, 0.0);
        let to = translate(0.0, 20.0, 0.0);
        let t = to.blend(&from, 0.5).unwrap();
        assert_eq!(t, Transform::from_translation(5.0, 10.0, 0.0));
    }

    fn assert_same_matrix(actual: &Transform, expected: &Transform) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(actual.get(row, col), expected.get(row, col), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn matched_skew_blend_hits_both_endpoints() {
        let mut from = TransformOperations::new();
        from.append_skew(10.0, 20.0);
        let mut to = TransformOperations::new();
        to.append_skew(45.0, 45.0);

        assert_same_matrix(&to.blend(&from, 0.0).unwrap(), &from.apply());
        assert_same_matrix(&to.blend(&from, 1.0).unwrap(), &to.apply());
        assert_same_matrix(
            &to.blend(&TransformOperations::new(), 1.0).unwrap(),
            &to.apply(),
        );
        let mid = to.blend(&from, 0.5).unwrap();
        assert_same_matrix(&mid, &Transform::from_skew(27.5, 32.5));
    }

    #[test]
    fn empty_list_matches_and_blends_against_identity() {
        let mut to = TransformOperations::new();
        to.append_scale(3.0, 3.0, 3.0);
        let from = TransformOperations::new();
        assert!(to.matches_types(&from));
        let t = to.blend(&from, 0.5).unwrap();
        assert_eq!(t, Transform::from_scale(2.0, 2.0, 2.0));
    }

    #[test]
    fn identity_operation_matches_any_type() {
        let mut a = TransformOperations::new();
        a.append_identity();
        let mut b = TransformOperations::new();
        b.append_rotate([0.0, 0.0, 1.0], 90.0);
        assert!(a.matches_types(&b));
        let t = b.blend(&a, 0.5).unwrap();
        let expected = Transform::from_rotation([0.0, 0.0, 1.0], 45.0);
        assert_relative_eq!(*t.matrix(), *expected.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn rotate_opposite_axes_reverses_angle() {
        let mut from = TransformOperations::new();
        from.append_rotate([0.0, 0.0, -1.0], 90.0);
        let mut to = TransformOperations::new();
        to.append_rotate([0.0, 0.0, 1.0], 90.0);
        // -90 about +z to +90 about +z passes through zero.
        let t = to.blend(&from, 0.5).unwrap();
        assert_relative_eq!(*t.matrix(), *Transform::identity().matrix(), epsilon = 1e-12);
    }

    #[test]
    fn rotate_different_axes_uses_matrix_blend() {
        let mut from = TransformOperations::new();
        from.append_rotate([1.0, 0.0, 0.0], 90.0);
        let mut to = TransformOperations::new();
        to.append_rotate([0.0, 1.0, 0.0], 90.0);
        let start = to.blend(&from, 0.0).unwrap();
        assert_relative_eq!(*start.matrix(), *from.apply().matrix(), epsilon = 1e-9);
        let end = to.blend(&from, 1.0).unwrap();
        assert_relative_eq!(*end.matrix(), *to.apply().matrix(), epsilon = 1e-9);
    }

    #[test]
    fn mismatched_types_fall_back_to_decomposition() {
        let mut from = TransformOperations::new();
        from.append_translate(10.0, 0.0, 0.0);
        from.append_scale(2.0, 2.0, 1.0);
        let mut to = TransformOperations::new();
        to.append_scale(4.0, 4.0, 1.0);
        assert!(!to.matches_types(&from));
        let t = to.blend(&from, 0.5).unwrap();
        assert_relative_eq!(t.get(0, 3), 5.0, epsilon = 1e-9);
        assert_relative_eq!(t.get(0, 0), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn perspective_blends_inverse_depth() {
        let mut from = TransformOperations::new();
        from.append_perspective(100.0);
        let mut to = TransformOperations::new();
        to.append_perspective(200.0);
        let t = to.blend(&from, 0.5).unwrap();
        // 1/depth = (1/100 + 1/200) / 2
        assert_relative_eq!(t.get(3, 2), -0.0075, epsilon = 1e-12);
    }

    #[test]
    fn singular_matrix_blend_is_recoverable() {
        let mut from = TransformOperations::new();
        from.append_matrix(Transform::from_scale(0.0, 0.0, 0.0));
        let mut to = TransformOperations::new();
        to.append_translate(1.0, 0.0, 0.0);
        to.append_rotate([0.0, 0.0, 1.0], 10.0);
        assert_eq!(to.blend(&from, 0.5), Err(BlendError::SingularPerspective));
    }

    #[test]
    fn bounds_for_translate_and_scale() {
        let from = translate(0.0, 0.0, 0.0);
        let to = translate(10.0, 0.0, 0.0);
        let b = to
            .blended_bounds_for_box(&BoxF::from_rect(0.0, 0.0, 10.0, 10.0), &from, 0.0, 1.0)
            .unwrap();
        assert_eq!(b, BoxF::from_rect(0.0, 0.0, 20.0, 10.0));

        let mut scale = TransformOperations::new();
        scale.append_scale(2.0, 2.0, 1.0);
        let b = scale
            .blended_bounds_for_box(&BoxF::from_rect(1.0, 1.0, 1.0, 1.0), &TransformOperations::new(), 0.0, 1.0)
            .unwrap();
        assert_eq!(b, BoxF::from_rect(1.0, 1.0, 3.0, 3.0));
    }

    #[test]
    fn bounds_for_rotation_cover_circle() {
        let mut to = TransformOperations::new();
        to.append_rotate([0.0, 0.0, 1.0], 90.0);
        let b = to
            .blended_bounds_for_box(&BoxF::from_rect(1.0, 0.0, 0.0, 0.0), &TransformOperations::new(), 0.0, 1.0)
            .unwrap();
        assert_relative_eq!(b.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(b.width, 2.0, epsilon = 1e-12);
        assert_relative_eq!(b.height, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn bounds_unavailable_for_skew() {
        let mut to = TransformOperations::new();
        to.append_skew(10.0, 0.0);
        let b = to.blended_bounds_for_box(&BoxF::from_rect(0.0, 0.0, 1.0, 1.0), &TransformOperations::new(), 0.0, 1.0);
        assert!(b.is_none());
    }

    #[test]
    fn classification() {
        let mut ops = TransformOperations::new();
        ops.append_translate(1.0, 0.0, 0.0);
        assert!(ops.is_translation());
        assert!(ops.preserves_axis_alignment());
        assert!(!ops.affects_scale());
        ops.append_scale(2.0, 3.0, 1.0);
        assert!(!ops.is_translation());
        assert!(ops.affects_scale());
        assert_eq!(ops.scale_component(), Some([2.0, 3.0, 1.0]));
        ops.append_rotate([0.0, 0.0, 1.0], 10.0);
        assert!(!ops.preserves_axis_alignment());
        ops.append_skew(1.0, 0.0);
        assert_eq!(ops.scale_component(), None);
    }

    #[test]
    fn serde_round_trip_of_operation_list() {
        let json = r#"[{"type":"translate","x":1.0,"y":2.0,"z":0.0},{"type":"rotate","axis":[0.0,0.0,1.0],"angle":45.0}]"#;
        let ops: TransformOperations = serde_json::from_str(json).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops.operations()[1].kind(), TransformOperationKind::Rotate);
    }
}
