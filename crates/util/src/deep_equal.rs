use serde_json::Value;

/// Performs a deep structural equality check between two JSON values.
///
/// Primitives compare by value; arrays require equal length and pairwise
/// equal elements in order; objects require the same key set with equal
/// values, key order irrelevant. Values of different kinds are never equal.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use layerpatch_util::deep_equal;
///
/// let a = json!({"tag": "div", "children": [1, 2]});
/// let b = json!({"children": [1, 2], "tag": "div"});
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &json!({"tag": "div", "children": [1, 3]})));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, va)| match b.get(key) {
                    Some(vb) => deep_equal(va, vb),
                    None => false,
                })
        }
        _ => false,
    }
}
