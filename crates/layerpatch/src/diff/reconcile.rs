//! Identity-aware array reconciliation.
//!
//! A layer tree stores its children as arrays of nodes carrying a stable
//! `id`. Diffing those arrays positionally would turn a single node edit into
//! a cascade of index-shifted replacements; reconciling by identity instead
//! yields one operation per touched node, however deep the tree.
//!
//! An array qualifies for identity reconciliation only when every element on
//! both sides is an object with a string `id`. Mixed arrays degrade to
//! positional diffing, and both sides are classified by the same rule.

use indexmap::IndexMap;
use serde_json::Value;

use layerpatch_json_pointer::is_valid_index;
use layerpatch_util::deep_equal;

use super::{child_path, diff_at};
use crate::patch::types::Op;

/// Field carrying a node's stable identity.
pub const ID_KEY: &str = "id";

/// Field holding a node's child collection; identity arrays under this key
/// recurse through the reconciler node-by-node.
pub const CHILDREN_KEY: &str = "children";

/// Diff two arrays at `path`, picking identity or positional reconciliation.
pub fn create_array_patch(from: &[Value], to: &[Value], path: &[String]) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_array(&mut ops, path, from, to);
    ops
}

/// Per-field diff of a single identity-bearing node at `path`.
pub fn create_node_patch(from: &Value, to: &Value, path: &[String]) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_node_fields(&mut ops, path, from, to);
    ops
}

fn node_id(value: &Value) -> Option<&str> {
    value.as_object()?.get(ID_KEY)?.as_str()
}

fn is_identity_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|item| node_id(item).is_some())
}

pub(crate) fn diff_array(ops: &mut Vec<Op>, path: &[String], from: &[Value], to: &[Value]) {
    if is_identity_array(from) && is_identity_array(to) {
        diff_identity_array(ops, path, from, to);
    } else {
        diff_positional(ops, path, from, to);
    }
}

/// Index-by-index diff for arrays without identity. Does not attempt to
/// recognize reordering.
fn diff_positional(ops: &mut Vec<Op>, path: &[String], from: &[Value], to: &[Value]) {
    let max = from.len().max(to.len());
    for i in 0..max {
        let seg = i.to_string();
        match (from.get(i), to.get(i)) {
            (Some(old), None) => ops.push(Op::Remove {
                path: child_path(path, &seg),
                old_value: Some(old.clone()),
            }),
            (None, Some(new)) => ops.push(Op::Add {
                path: child_path(path, &seg),
                value: new.clone(),
            }),
            (Some(old), Some(new)) if !deep_equal(old, new) => ops.push(Op::Replace {
                path: child_path(path, &seg),
                value: new.clone(),
                old_value: Some(old.clone()),
            }),
            _ => {}
        }
    }
}

fn diff_identity_array(ops: &mut Vec<Op>, path: &[String], from: &[Value], to: &[Value]) {
    let array_start = ops.len();
    let from_ids: IndexMap<&str, (usize, &Value)> = from
        .iter()
        .enumerate()
        .filter_map(|(i, item)| node_id(item).map(|id| (id, (i, item))))
        .collect();
    let to_ids: IndexMap<&str, (usize, &Value)> = to
        .iter()
        .enumerate()
        .filter_map(|(i, item)| node_id(item).map(|id| (id, (i, item))))
        .collect();

    let has_removals = from_ids.keys().any(|id| !to_ids.contains_key(id));
    let has_additions = to_ids.keys().any(|id| !from_ids.contains_key(id));
    let order_changed = {
        let survivors = from_ids.keys().filter(|id| to_ids.contains_key(*id));
        let arrivals = to_ids.keys().filter(|id| from_ids.contains_key(*id));
        !survivors.eq(arrivals)
    };
    let has_edits = to_ids.iter().any(|(id, &(_, new))| {
        matches!(from_ids.get(id), Some(&(_, old)) if !deep_equal(old, new))
    });

    // Reordering collapses to a whole-array replace, as do removals combined
    // with insertions or node edits: once surviving nodes shift away from
    // their original indices, per-index bookkeeping cannot be made exact for
    // both application and inversion.
    if order_changed || (has_removals && (has_additions || has_edits)) {
        ops.push(Op::Replace {
            path: path.to_vec(),
            value: Value::Array(to.to_vec()),
            old_value: Some(Value::Array(from.to_vec())),
        });
        return;
    }

    if has_removals {
        // Descending original index, so earlier removals keep their meaning.
        let mut doomed: Vec<(usize, &Value)> = from_ids
            .iter()
            .filter(|(id, _)| !to_ids.contains_key(*id))
            .map(|(_, entry)| *entry)
            .collect();
        doomed.sort_by(|a, b| b.0.cmp(&a.0));
        for (index, element) in doomed {
            ops.push(Op::Remove {
                path: child_path(path, &index.to_string()),
                old_value: Some(element.clone()),
            });
        }
        return;
    }

    for (id, &(new_index, element)) in &to_ids {
        match from_ids.get(id) {
            None => ops.push(Op::Add {
                path: child_path(path, &new_index.to_string()),
                value: element.clone(),
            }),
            Some(&(old_index, old)) if !deep_equal(old, element) => {
                let start = ops.len();
                diff_node_fields(ops, &child_path(path, &new_index.to_string()), old, element);
                // Remove and replace buckets run before element insertions
                // land, so while insertions are pending the node still sits
                // at its original index for those operations.
                if has_additions && old_index != new_index {
                    // An index-addressed insertion inside a shifted node
                    // cannot be ordered against the sibling insertion that
                    // shifts it; the whole array is replaced instead.
                    if ops[start..].iter().any(is_indexed_add) {
                        ops.truncate(array_start);
                        ops.push(Op::Replace {
                            path: path.to_vec(),
                            value: Value::Array(to.to_vec()),
                            old_value: Some(Value::Array(from.to_vec())),
                        });
                        return;
                    }
                    retarget_preinsertion_ops(&mut ops[start..], path.len(), old_index);
                }
            }
            _ => {}
        }
    }
}

/// An `add` whose final segment is an array index. Such ops sort by that
/// index in the applier's add bucket, alongside element insertions.
fn is_indexed_add(op: &Op) -> bool {
    matches!(op, Op::Add { .. }) && op.path().last().is_some_and(|seg| is_valid_index(seg))
}

fn retarget_preinsertion_ops(ops: &mut [Op], depth: usize, index: usize) {
    for op in ops {
        if matches!(op, Op::Remove { .. } | Op::Replace { .. }) {
            op.path_mut()[depth] = index.to_string();
        }
    }
}

fn diff_node_fields(ops: &mut Vec<Op>, path: &[String], from: &Value, to: &Value) {
    let (Value::Object(f), Value::Object(t)) = (from, to) else {
        diff_at(ops, path, from, to);
        return;
    };
    for (key, old) in f {
        if !t.contains_key(key) {
            ops.push(Op::Remove {
                path: child_path(path, key),
                old_value: Some(old.clone()),
            });
        }
    }
    for (key, new) in t {
        match f.get(key) {
            None => ops.push(Op::Add {
                path: child_path(path, key),
                value: new.clone(),
            }),
            Some(old) if deep_equal(old, new) => {}
            Some(old) => match (old, new) {
                (Value::Array(fa), Value::Array(ta)) if key == CHILDREN_KEY => {
                    diff_array(ops, &child_path(path, key), fa, ta);
                }
                (Value::Array(fa), Value::Array(ta)) => {
                    diff_positional(ops, &child_path(path, key), fa, ta);
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arr(v: &Value) -> &[Value] {
        v.as_array().expect("array fixture")
    }

    fn path(s: &str) -> Vec<String> {
        layerpatch_json_pointer::parse_json_pointer(s)
    }

    #[test]
    fn reorder_collapses_to_whole_replace() {
        let from = json!([{"id": "a"}, {"id": "b"}]);
        let to = json!([{"id": "b"}, {"id": "a"}]);
        let ops = create_array_patch(arr(&from), arr(&to), &path("/children"));
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Op::Replace { path: p, value, .. } => {
                assert_eq!(p, &path("/children"));
                assert_eq!(value, &to);
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[test]
    fn simultaneous_add_and_remove_collapses() {
        let from = json!([{"id": "a"}, {"id": "b"}]);
        let to = json!([{"id": "a"}, {"id": "c"}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "replace");
    }

    #[test]
    fn pure_addition_is_one_add() {
        let from = json!([{"id": "a", "v": 1}]);
        let to = json!([{"id": "a", "v": 1}, {"id": "b", "v": 2}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(
            ops,
            vec![Op::Add {
                path: vec!["1".to_string()],
                value: json!({"id": "b", "v": 2}),
            }]
        );
    }

    #[test]
    fn pure_removal_is_descending_removes() {
        let from = json!([{"id": "a"}, {"id": "b"}, {"id": "c"}]);
        let to = json!([{"id": "b"}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].path(), &path("/2"));
        assert_eq!(ops[1].path(), &path("/0"));
        assert!(ops.iter().all(|op| op.op_name() == "remove"));
    }

    #[test]
    fn removed_element_carried_as_old_value() {
        let from = json!([{"id": "a", "x": 1}]);
        let to = json!([]);
        // `to` is empty, so this takes the positional path; the removed
        // element is still carried for diagnostics.
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(
            ops,
            vec![Op::Remove {
                path: vec!["0".to_string()],
                old_value: Some(json!({"id": "a", "x": 1})),
            }]
        );
    }

    #[test]
    fn in_place_edit_diffs_node_fields() {
        let from = json!([{"id": "a", "tag": "div", "cls": "x"}]);
        let to = json!([{"id": "a", "tag": "span", "cls": "x"}]);
        let ops = create_array_patch(arr(&from), arr(&to), &path("/children"));
        assert_eq!(
            ops,
            vec![Op::Replace {
                path: path("/children/0/tag"),
                value: json!("span"),
                old_value: Some(json!("div")),
            }]
        );
    }

    #[test]
    fn removal_does_not_descend_into_siblings() {
        let from = json!([
            {"id": "c1"},
            {"id": "c2", "children": [{"id": "g1"}]}
        ]);
        let to = json!([
            {"id": "c2", "children": [{"id": "g1"}]}
        ]);
        let ops = create_array_patch(arr(&from), arr(&to), &path("/children"));
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "remove");
        assert_eq!(ops[0].path(), &path("/children/0"));
    }

    #[test]
    fn nested_children_edit_stays_local() {
        let from = json!([
            {"id": "c1"},
            {"id": "c2", "children": [{"id": "g1", "v": 1}]}
        ]);
        let to = json!([
            {"id": "c1"},
            {"id": "c2", "children": [{"id": "g1", "v": 2}]}
        ]);
        let ops = create_array_patch(arr(&from), arr(&to), &path("/children"));
        assert_eq!(
            ops,
            vec![Op::Replace {
                path: path("/children/1/children/0/v"),
                value: json!(2),
                old_value: Some(json!(1)),
            }]
        );
    }

    #[test]
    fn node_gains_and_loses_fields() {
        let from = json!([{"id": "a", "gone": 1, "kept": 2}]);
        let to = json!([{"id": "a", "kept": 2, "fresh": 3}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.contains(&Op::Remove {
            path: path("/0/gone"),
            old_value: Some(json!(1)),
        }));
        assert!(ops.contains(&Op::Add { path: path("/0/fresh"), value: json!(3) }));
    }

    #[test]
    fn non_children_arrays_diff_positionally() {
        // An id-bearing array under any key other than `children` is still a
        // plain value array for the node diff.
        let from = json!([{"id": "a", "tags": ["x", "y"]}]);
        let to = json!([{"id": "a", "tags": ["x", "z"]}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(
            ops,
            vec![Op::Replace {
                path: path("/0/tags/1"),
                value: json!("z"),
                old_value: Some(json!("y")),
            }]
        );
    }

    #[test]
    fn mixed_array_degrades_to_positional() {
        // One element lacks an id, so the whole array is diffed by index:
        // no whole-array collapse even though the identity elements moved.
        let from = json!([{"id": "a"}, 5]);
        let to = json!([5, {"id": "a"}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.op_name() == "replace"));
    }

    #[test]
    fn removal_with_edit_collapses() {
        let from = json!([{"id": "a"}, {"id": "b", "v": 1}]);
        let to = json!([{"id": "b", "v": 2}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].op_name(), "replace");
        assert_eq!(ops[0].path(), &Vec::<String>::new());
    }

    #[test]
    fn addition_with_edit_retargets_pending_nodes() {
        // `a` is edited and shifted right by the insertion; its replace must
        // still point at the original index because replaces run before adds.
        let from = json!([{"id": "a", "v": 1}]);
        let to = json!([{"id": "x"}, {"id": "a", "v": 2}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.contains(&Op::Add { path: path("/0"), value: json!({"id": "x"}) }));
        assert!(ops.contains(&Op::Replace {
            path: path("/0/v"),
            value: json!(2),
            old_value: Some(json!(1)),
        }));
    }

    #[test]
    fn shifted_node_with_nested_insert_collapses() {
        // The nested child insertion would sort ahead of the sibling
        // insertion that shifts its parent, so no per-node patch exists.
        let from = json!([{"id": "a"}, {"id": "b", "children": [{"id": "g1"}]}]);
        let to = json!([
            {"id": "a"},
            {"id": "x"},
            {"id": "b", "children": [{"id": "g0"}, {"id": "g1"}]}
        ]);
        let ops = create_array_patch(arr(&from), arr(&to), &path("/children"));
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            Op::Replace { path: p, value, old_value } => {
                assert_eq!(p, &path("/children"));
                assert_eq!(value, &to);
                assert_eq!(old_value.as_ref(), Some(&from));
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[test]
    fn shifted_node_field_add_stays_per_node() {
        // A field addition has no index tail, so it runs after every element
        // insertion and needs no collapse.
        let from = json!([{"id": "a", "v": 1}]);
        let to = json!([{"id": "x"}, {"id": "a", "v": 1, "w": 2}]);
        let ops = create_array_patch(arr(&from), arr(&to), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.contains(&Op::Add { path: path("/0"), value: json!({"id": "x"}) }));
        assert!(ops.contains(&Op::Add { path: path("/1/w"), value: json!(2) }));
    }

    #[test]
    fn positional_growth_and_shrink() {
        let ops = create_array_patch(arr(&json!([1])), arr(&json!([1, 2, 3])), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.op_name() == "add"));

        let ops = create_array_patch(arr(&json!([1, 2, 3])), arr(&json!([1])), &[]);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.op_name() == "remove"));
    }
}
