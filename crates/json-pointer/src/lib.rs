//! JSON Pointer (RFC 6901) utilities.
//!
//! Paths inside a document are represented as a list of string segments
//! ([`Path`]). The functions here convert between that representation and the
//! `/`-separated pointer syntax, and navigate `serde_json::Value` documents.
//!
//! # Example
//!
//! ```
//! use layerpatch_json_pointer::{parse_json_pointer, format_json_pointer, get};
//!
//! let path = parse_json_pointer("/children/0/id");
//! assert_eq!(path, vec!["children", "0", "id"]);
//! assert_eq!(format_json_pointer(&path), "/children/0/id");
//!
//! let doc = serde_json::json!({"children": [{"id": "hero"}]});
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("hero")));
//! ```

use serde_json::Value;
use thiserror::Error;

/// A parsed pointer: one string per path segment. Empty means the root.
pub type Path = Vec<String>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("NO_PARENT")]
    NoParent,
}

/// Unescapes a JSON Pointer path segment (`~1` → `/`, `~0` → `~`).
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a JSON Pointer path segment (`~` → `~0`, `/` → `~1`).
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // Order matters: ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a JSON Pointer string into path segments.
///
/// The empty string parses to the empty (root) path; otherwise the leading
/// `/` is stripped and each segment is unescaped.
///
/// ```
/// use layerpatch_json_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/a~0b/c~1d"), vec!["a~b", "c/d"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer[1..].split('/').map(unescape_component).collect()
}

/// Format path segments into a JSON Pointer string.
///
/// The root (empty) path formats to the empty string.
pub fn format_json_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(path.len() * 8);
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[String]) -> bool {
    path.is_empty()
}

/// Check if `parent` is a strict ancestor of `child`.
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && parent.iter().zip(child).all(|(a, b)| a == b)
}

/// Check if two paths address the same location.
pub fn is_path_equal(p1: &[String], p2: &[String]) -> bool {
    p1.len() == p2.len() && p1.iter().zip(p2).all(|(a, b)| a == b)
}

/// Get the parent path of a given path.
///
/// # Errors
///
/// Returns [`JsonPointerError::NoParent`] for the root path.
pub fn parent(path: &[String]) -> Result<Path, JsonPointerError> {
    if path.is_empty() {
        return Err(JsonPointerError::NoParent);
    }
    Ok(path[..path.len() - 1].to_vec())
}

/// Check if a segment is a valid array index: ASCII digits, no leading zero
/// except `"0"` itself.
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

/// Check if a segment consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Get a reference to the value at `path`, or `None` if the path does not
/// resolve. The `-` array sentinel never resolves to a value.
pub fn get<'a>(val: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = val;
    for step in path {
        match current {
            Value::Array(items) => {
                if !is_valid_index(step) {
                    return None;
                }
                let idx: usize = step.parse().ok()?;
                current = items.get(idx)?;
            }
            Value::Object(map) => {
                current = map.get(step)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Get a mutable reference to the value at `path`, or `None` if the path does
/// not resolve.
pub fn get_mut<'a>(val: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = val;
    for step in path {
        match current {
            Value::Array(items) => {
                if !is_valid_index(step) {
                    return None;
                }
                let idx: usize = step.parse().ok()?;
                current = items.get_mut(idx)?;
            }
            Value::Object(map) => {
                current = map.get_mut(step)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
