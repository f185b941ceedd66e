//! Patch application.
//!
//! [`apply_patch`] never mutates its input: the document is deep-cloned first
//! and every operation runs against the clone, so a failed apply leaves the
//! caller's document untouched.
//!
//! Operations are not applied in patch order. They are partitioned into four
//! buckets applied as `remove`, `replace`, `add`, then `move`/`copy`/`test`.
//! Removals run highest array index first so a pending removal at a lower
//! index keeps its meaning; insertions run lowest index first so later
//! insertion points stay valid as the array grows. Operations whose final
//! segment is not an index (object keys, nested fields) run before the
//! index-addressed ones in the remove bucket and after them in the add
//! bucket: a nested edit targets a sibling array's pre-removal shape, and a
//! nested insertion targets the post-insertion shape.

use std::cmp::Ordering;

use serde_json::Value;

use layerpatch_json_pointer::{format_json_pointer, get, get_mut, is_child, is_valid_index};
use layerpatch_util::{clone, deep_equal};

use super::types::{Op, PatchError};

/// Apply a patch to a document, returning the new document.
///
/// # Errors
///
/// Fails with [`PatchError`] when an operation path does not resolve; the
/// input document is never partially modified.
pub fn apply_patch(doc: &Value, patch: &[Op]) -> Result<Value, PatchError> {
    let mut next = clone(doc);

    let mut removes: Vec<&Op> = Vec::new();
    let mut replaces: Vec<&Op> = Vec::new();
    let mut adds: Vec<&Op> = Vec::new();
    let mut rest: Vec<&Op> = Vec::new();
    for op in patch {
        match op {
            Op::Remove { .. } => removes.push(op),
            Op::Replace { .. } => replaces.push(op),
            Op::Add { .. } => adds.push(op),
            _ => rest.push(op),
        }
    }
    removes.sort_by(removal_order);
    adds.sort_by(insertion_order);

    for op in removes
        .into_iter()
        .chain(replaces)
        .chain(adds)
        .chain(rest)
    {
        apply_op(&mut next, op)?;
    }
    Ok(next)
}

/// Apply a single operation to the document in place.
pub fn apply_op(doc: &mut Value, op: &Op) -> Result<(), PatchError> {
    match op {
        Op::Add { path, value } => apply_add(doc, path, clone(value)),
        Op::Remove { path, .. } => apply_remove(doc, path).map(|_| ()),
        Op::Replace { path, value, .. } => apply_replace(doc, path, clone(value)),
        Op::Move { path, from } => apply_move(doc, path, from),
        Op::Copy { path, from } => apply_copy(doc, path, from),
        Op::Test { path, value } => apply_test(doc, path, value),
    }
}

// ── Bucket ordering ───────────────────────────────────────────────────────

/// Numeric value of the final path segment, if it is an array index.
fn tail_index(path: &[String]) -> Option<i64> {
    let seg = path.last()?;
    if is_valid_index(seg) {
        seg.parse().ok()
    } else {
        None
    }
}

fn removal_order(a: &&Op, b: &&Op) -> Ordering {
    let ia = tail_index(a.path()).unwrap_or(i64::MAX);
    let ib = tail_index(b.path()).unwrap_or(i64::MAX);
    ib.cmp(&ia)
        .then_with(|| format_json_pointer(b.path()).cmp(&format_json_pointer(a.path())))
}

fn insertion_order(a: &&Op, b: &&Op) -> Ordering {
    let ia = tail_index(a.path()).unwrap_or(i64::MAX);
    let ib = tail_index(b.path()).unwrap_or(i64::MAX);
    ia.cmp(&ib)
        .then_with(|| format_json_pointer(a.path()).cmp(&format_json_pointer(b.path())))
}

// ── Individual operations ─────────────────────────────────────────────────

fn split_last(path: &[String]) -> (&[String], &String) {
    let (parent, last) = path.split_at(path.len() - 1);
    (parent, &last[0])
}

fn apply_add(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent_path, key) = split_last(path);
    let parent = get_mut(doc, parent_path).ok_or(PatchError::NotFound)?;
    match parent {
        Value::Array(items) => {
            if key == "-" {
                items.push(value);
            } else {
                let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
                if idx > items.len() {
                    return Err(PatchError::InvalidIndex);
                }
                items.insert(idx, value);
            }
            Ok(())
        }
        Value::Object(map) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Value, PatchError> {
    if path.is_empty() {
        // Removing the root leaves no document behind.
        return Ok(std::mem::replace(doc, Value::Null));
    }
    let (parent_path, key) = split_last(path);
    let parent = get_mut(doc, parent_path).ok_or(PatchError::NotFound)?;
    match parent {
        Value::Array(items) => {
            let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
            if idx >= items.len() {
                return Err(PatchError::NotFound);
            }
            Ok(items.remove(idx))
        }
        Value::Object(map) => map.remove(key).ok_or(PatchError::NotFound),
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent_path, key) = split_last(path);
    let parent = get_mut(doc, parent_path).ok_or(PatchError::NotFound)?;
    match parent {
        Value::Array(items) => {
            let idx: usize = key.parse().map_err(|_| PatchError::InvalidIndex)?;
            let slot = items.get_mut(idx).ok_or(PatchError::NotFound)?;
            *slot = value;
            Ok(())
        }
        Value::Object(map) => {
            let slot = map.get_mut(key).ok_or(PatchError::NotFound)?;
            *slot = value;
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_move(doc: &mut Value, path: &[String], from: &[String]) -> Result<(), PatchError> {
    if is_child(from, path) {
        return Err(PatchError::InvalidTarget);
    }
    let value = apply_remove(doc, from)?;
    apply_add(doc, path, value)
}

fn apply_copy(doc: &mut Value, path: &[String], from: &[String]) -> Result<(), PatchError> {
    let value = get(doc, from).map(clone).ok_or(PatchError::NotFound)?;
    apply_add(doc, path, value)
}

fn apply_test(doc: &Value, path: &[String], value: &Value) -> Result<(), PatchError> {
    let actual = get(doc, path).ok_or(PatchError::NotFound)?;
    if deep_equal(actual, value) {
        Ok(())
    } else {
        Err(PatchError::Test)
    }
}
