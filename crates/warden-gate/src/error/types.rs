//! Wiring error types.

use crate::role::RoleKind;
use axum::http::Method;
use thiserror::Error;

/// Result type for wiring operations.
pub type WardenResult<T> = Result<T, WardenError>;

/// Errors raised while composing route paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid percent escape in segment `{0}`")]
    InvalidEscape(String),

    #[error("illegal character {ch:?} in segment `{segment}`")]
    IllegalCharacter { segment: String, ch: char },

    #[error("parent segment `..` is not allowed in `{0}`")]
    ParentSegment(String),

    #[error("capture segment `{0}` has no name")]
    UnnamedCapture(String),

    #[error("`:` and `*` may only start a segment, found in `{0}`")]
    EmbeddedCapture(String),

    #[error("wildcard segment `{segment}` must be the last segment of `{path}`")]
    MisplacedWildcard { segment: String, path: String },
}

/// Errors raised while compiling a role set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("role set mixes kinds: expected {expected} at index {index}, found {found}")]
    MixedKinds {
        index: usize,
        expected: RoleKind,
        found: RoleKind,
    },
}

/// Umbrella error for route wiring.
#[derive(Debug, Error)]
pub enum WardenError {
    #[error("invalid route path: {0}")]
    Path(#[from] PathError),

    #[error("invalid role set: {0}")]
    Role(#[from] RoleError),

    #[error("invalid HTTP method token `{0}`")]
    InvalidMethod(String),

    #[error("HTTP method {0} cannot be routed")]
    UnsupportedMethod(Method),

    #[error("malformed route pattern `{0}`")]
    MalformedPattern(String),

    #[error("pattern already registered: {0}")]
    DuplicatePattern(String),

    #[error("capture `{segment}` in `{path}` conflicts with `{existing}` registered at the same position")]
    CaptureConflict {
        path: String,
        segment: String,
        existing: String,
    },
}

impl WardenError {
    /// Whether the error comes from composing the path rather than from the router table.
    pub fn is_composition_error(&self) -> bool {
        matches!(self, Self::Path(_) | Self::InvalidMethod(_) | Self::MalformedPattern(_))
    }
}
