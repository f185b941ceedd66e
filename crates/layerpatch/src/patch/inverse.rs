//! Inverse-patch derivation for undo.
//!
//! Given the document a patch was derived from and the patch itself, this
//! produces the operations that exactly undo it. Forward operations are
//! visited in order and each inverse is prepended, so the inverse list undoes
//! the forward operations back to front.
//!
//! Prior values are always read by navigating the pre-patch document; the
//! `oldValue` a forward operation may carry is diagnostic only and is never
//! trusted. Passing a patch that was not derived from `from` is a
//! precondition violation with undefined results, by design not a checked
//! error.

use serde_json::Value;

use layerpatch_json_pointer::get;

use super::types::Op;

/// Derive the inverse of `patch` relative to the pre-patch document `from`.
pub fn create_inverse_patch(from: &Value, patch: &[Op]) -> Vec<Op> {
    let mut inverse = Vec::with_capacity(patch.len());
    for op in patch {
        inverse.push(invert_op(from, op));
    }
    // Prepend semantics: the last forward op is undone first.
    inverse.reverse();
    inverse
}

fn invert_op(from: &Value, op: &Op) -> Op {
    match op {
        Op::Add { path, value } => Op::Remove {
            path: path.clone(),
            old_value: Some(value.clone()),
        },
        Op::Remove { path, .. } => Op::Add {
            path: path.clone(),
            value: prior_value(from, path),
        },
        Op::Replace { path, value, .. } => Op::Replace {
            path: path.clone(),
            value: prior_value(from, path),
            old_value: Some(value.clone()),
        },
        Op::Move { path, from: origin } => Op::Move {
            path: origin.clone(),
            from: path.clone(),
        },
        Op::Copy { path, .. } => Op::Remove {
            path: path.clone(),
            old_value: None,
        },
        Op::Test { path, value } => Op::Test {
            path: path.clone(),
            value: value.clone(),
        },
    }
}

fn prior_value(from: &Value, path: &[String]) -> Value {
    get(from, path).cloned().unwrap_or(Value::Null)
}
