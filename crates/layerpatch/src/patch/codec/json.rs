//! JSON wire codec for patch operations.
//!
//! The wire shape is the RFC 6902 one: `{"op", "path", "value"?, "from"?}`,
//! with an optional `oldValue` diagnostic on `remove` and `replace`. A full
//! patch serializes to a JSON array, suitable for persisting an undo-stack
//! entry or shipping a diff over the wire.

use serde_json::{json, Map, Value};

use layerpatch_json_pointer::{format_json_pointer, parse_json_pointer, Path};

use crate::patch::types::{Op, PatchError};

/// Serialize a single operation.
pub fn to_json(op: &Op) -> Value {
    match op {
        Op::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value,
        }),
        Op::Remove { path, old_value } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("remove"));
            m.insert("path".into(), encode_path(path));
            if let Some(old) = old_value {
                m.insert("oldValue".into(), old.clone());
            }
            Value::Object(m)
        }
        Op::Replace { path, value, old_value } => {
            let mut m = Map::new();
            m.insert("op".into(), json!("replace"));
            m.insert("path".into(), encode_path(path));
            m.insert("value".into(), value.clone());
            if let Some(old) = old_value {
                m.insert("oldValue".into(), old.clone());
            }
            Value::Object(m)
        }
        Op::Move { path, from } => json!({
            "op": "move",
            "path": encode_path(path),
            "from": encode_path(from),
        }),
        Op::Copy { path, from } => json!({
            "op": "copy",
            "path": encode_path(path),
            "from": encode_path(from),
        }),
        Op::Test { path, value } => json!({
            "op": "test",
            "path": encode_path(path),
            "value": value,
        }),
    }
}

/// Deserialize a single operation.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;
    let op_name = obj
        .get("op")
        .and_then(|v| v.as_str())
        .ok_or_else(|| PatchError::InvalidOp("missing 'op' field".into()))?;
    let path = decode_path(
        obj.get("path")
            .ok_or_else(|| PatchError::InvalidOp("missing 'path' field".into()))?,
    )?;

    match op_name {
        "add" => Ok(Op::Add {
            path,
            value: required_value(obj, "add")?,
        }),
        "remove" => Ok(Op::Remove {
            path,
            old_value: obj.get("oldValue").cloned(),
        }),
        "replace" => Ok(Op::Replace {
            path,
            value: required_value(obj, "replace")?,
            old_value: obj.get("oldValue").cloned(),
        }),
        "move" => Ok(Op::Move {
            path,
            from: required_from(obj, "move")?,
        }),
        "copy" => Ok(Op::Copy {
            path,
            from: required_from(obj, "copy")?,
        }),
        "test" => Ok(Op::Test {
            path,
            value: required_value(obj, "test")?,
        }),
        other => Err(PatchError::InvalidOp(format!("unknown op: {other}"))),
    }
}

/// Serialize a patch to a JSON array.
pub fn to_json_patch(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

/// Deserialize a JSON array into a patch.
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

fn encode_path(path: &[String]) -> Value {
    Value::String(format_json_pointer(path))
}

fn decode_path(v: &Value) -> Result<Path, PatchError> {
    let s = v
        .as_str()
        .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
    Ok(parse_json_pointer(s))
}

fn required_value(obj: &Map<String, Value>, op: &str) -> Result<Value, PatchError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires 'value'")))
}

fn required_from(obj: &Map<String, Value>, op: &str) -> Result<Path, PatchError> {
    decode_path(
        obj.get("from")
            .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires 'from'")))?,
    )
}
