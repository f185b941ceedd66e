//! Structural diff: generate a patch that transforms one document into
//! another.
//!
//! The differ walks two documents together. Objects diff key-wise, producing
//! a minimal set of `remove`/`add`/`replace`/recursive operations; arrays are
//! handed to the [reconciler](crate::diff::reconcile), which recognizes
//! identity-bearing layer arrays and diffs them node-by-node instead of
//! positionally.

pub mod reconcile;

use serde_json::{Map, Value};

use layerpatch_util::deep_equal;

use crate::patch::types::{Op, Path};

pub use reconcile::{create_array_patch, create_node_patch};

/// Generate a patch that transforms `from` into `to`.
///
/// An equal pair produces the empty patch. A `null` on either side at the
/// root is treated as an absent document: `null` → value is a single `add`,
/// value → `null` a single `remove`.
pub fn create_patch(from: &Value, to: &Value) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_at(&mut ops, &[], from, to);
    ops
}

pub(crate) fn diff_at(ops: &mut Vec<Op>, path: &[String], from: &Value, to: &Value) {
    if deep_equal(from, to) {
        return;
    }
    match (from, to) {
        (Value::Null, _) => ops.push(Op::Add {
            path: path.to_vec(),
            value: to.clone(),
        }),
        (_, Value::Null) => ops.push(Op::Remove {
            path: path.to_vec(),
            old_value: Some(from.clone()),
        }),
        (Value::Array(f), Value::Array(t)) => reconcile::diff_array(ops, path, f, t),
        (Value::Object(f), Value::Object(t)) => diff_object(ops, path, f, t),
        _ => ops.push(Op::Replace {
            path: path.to_vec(),
            value: to.clone(),
            old_value: Some(from.clone()),
        }),
    }
}

fn diff_object(
    ops: &mut Vec<Op>,
    path: &[String],
    from: &Map<String, Value>,
    to: &Map<String, Value>,
) {
    for (key, old) in from {
        if !to.contains_key(key) {
            ops.push(Op::Remove {
                path: child_path(path, key),
                old_value: Some(old.clone()),
            });
        }
    }
    for (key, new) in to {
        match from.get(key) {
            None => ops.push(Op::Add {
                path: child_path(path, key),
                value: new.clone(),
            }),
            Some(old) if deep_equal(old, new) => {}
            Some(old) => match (old, new) {
                (Value::Array(f), Value::Array(t)) => {
                    reconcile::diff_array(ops, &child_path(path, key), f, t);
                }
                (Value::Object(_), Value::Object(_)) => {
                    diff_at(ops, &child_path(path, key), old, new);
                }
                _ => ops.push(Op::Replace {
                    path: child_path(path, key),
                    value: new.clone(),
                    old_value: Some(old.clone()),
                }),
            },
        }
    }
}

pub(crate) fn child_path(path: &[String], key: &str) -> Path {
    let mut p = path.to_vec();
    p.push(key.to_string());
    p
}
