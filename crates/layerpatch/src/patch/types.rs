//! Core types for patches and their operations.

use serde_json::Value;
use thiserror::Error;

pub use layerpatch_json_pointer::Path;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// A parent segment of an operation path did not resolve.
    #[error("NOT_FOUND")]
    NotFound,
    /// An array segment was not a valid index, or the index was out of range.
    #[error("INVALID_INDEX")]
    InvalidIndex,
    /// The operation targeted a container of the wrong kind.
    #[error("INVALID_TARGET")]
    InvalidTarget,
    /// A `test` operation did not match.
    #[error("TEST")]
    Test,
    /// A wire-format operation could not be decoded.
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

/// A single patch operation.
///
/// `Remove` and `Replace` may carry the prior value as a diagnostic artifact;
/// it is never consulted when applying or inverting a patch.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add {
        path: Path,
        value: Value,
    },
    Remove {
        path: Path,
        old_value: Option<Value>,
    },
    Replace {
        path: Path,
        value: Value,
        old_value: Option<Value>,
    },
    Move {
        path: Path,
        from: Path,
    },
    Copy {
        path: Path,
        from: Path,
    },
    Test {
        path: Path,
        value: Value,
    },
}

impl Op {
    /// Returns the operation name used on the wire.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
        }
    }

    /// Returns the target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path, .. }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    pub(crate) fn path_mut(&mut self) -> &mut Path {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path, .. }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }
}
