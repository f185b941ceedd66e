use serde_json::{Map, Value};

/// Creates a deep clone of a JSON value by recursive construction.
///
/// Every nested array and object in the result is a fresh allocation; the
/// clone shares no structure with the input.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use layerpatch_util::clone;
///
/// let original = json!({"children": [{"id": "a"}]});
/// assert_eq!(clone(&original), original);
/// ```
pub fn clone(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(clone).collect()),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, val) in map {
                out.insert(key.clone(), clone(val));
            }
            Value::Object(out)
        }
    }
}
