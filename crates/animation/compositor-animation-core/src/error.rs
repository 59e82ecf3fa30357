//! Error types for the animation core.

use serde::{Deserialize, Serialize};

use crate::curve::CurveKind;
use crate::ids::TargetId;
use crate::TargetProperty;

/// Errors surfaced by the host and registry APIs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// No controller is registered for the target.
    #[error("Target not registered: {target}")]
    TargetNotRegistered { target: TargetId },

    /// A controller already exists for the target.
    #[error("Target already registered: {target}")]
    TargetAlreadyRegistered { target: TargetId },

    /// The curve cannot drive the requested property.
    #[error("Curve kind {kind:?} cannot animate property {property:?}")]
    CurveKindMismatch {
        kind: CurveKind,
        property: TargetProperty,
    },

    /// Impl-only scroll animations were requested on a host that does not support them.
    #[error("Scroll offset animations are not supported by this host")]
    ScrollAnimationsUnsupported,

    /// A keyframe list failed validation.
    #[error("Invalid keyframes: {reason}")]
    InvalidKeyframes { reason: String },

    /// A transform blend could not be computed.
    #[error(transparent)]
    Blend(#[from] BlendError),
}

/// Recoverable numerical failures while blending transforms.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendError {
    /// The matrix has a zero homogeneous component and cannot be normalized.
    #[error("matrix cannot be decomposed")]
    NotDecomposable,

    /// The perspective sub-matrix is singular.
    #[error("perspective sub-matrix is singular")]
    SingularPerspective,

    /// A perspective operation with depth zero took part in the blend.
    #[error("perspective depth of zero cannot be blended")]
    ZeroPerspectiveDepth,
}

impl AnimationError {
    /// Check if the caller can carry on (e.g. by freezing the value) after this error.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Blend(_) | Self::ScrollAnimationsUnsupported)
    }

    /// Get error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::TargetNotRegistered { .. } | Self::TargetAlreadyRegistered { .. } => "registry",
            Self::CurveKindMismatch { .. } | Self::InvalidKeyframes { .. } => "validation",
            Self::ScrollAnimationsUnsupported => "host",
            Self::Blend(_) => "numeric",
        }
    }
}
