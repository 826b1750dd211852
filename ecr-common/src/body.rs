//! Structured response bodies.
//!
//! The resolver never sees raw bytes. It queries a parsed tree through
//! [`StructuredBody`], which is implemented here for `serde_json::Value`.
//!
//! # Search order
//!
//! [`StructuredBody::find_field`] walks the tree depth-first, pre-order,
//! over object *entries*:
//!
//! - entries of an object are visited in document order (the workspace
//!   builds `serde_json` with `preserve_order`);
//! - an entry matches when its key equals the requested name;
//! - a non-matching entry is searched into before its next sibling;
//! - array elements are visited in index order.
//!
//! The first match wins, so `{"a": {"code": "X"}, "code": "Y"}` finds `"X"`.

use serde_json::Value;

/// Read-only view over a parsed response body.
pub trait StructuredBody: Send + Sync {
    /// True if the top level of the body has a field called `name`.
    fn has_field(&self, name: &str) -> bool;

    /// Text of the first field called `name` anywhere in the tree.
    ///
    /// Returns `None` when no such field exists or its value has no text
    /// form (null, object, array).
    fn find_field(&self, name: &str) -> Option<String>;
}

impl StructuredBody for Value {
    fn has_field(&self, name: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(name))
    }

    fn find_field(&self, name: &str) -> Option<String> {
        find_first_field(self, name).and_then(value_text)
    }
}

/// Locate the first entry named `name` in `root`, using the order described
/// in the module docs. `root` itself is never a match since it has no key.
pub fn find_first_field<'a>(root: &'a Value, name: &str) -> Option<&'a Value> {
    let mut stack: Vec<(Option<&'a str>, &'a Value)> = Vec::new();
    push_children(&mut stack, root);

    while let Some((key, value)) = stack.pop() {
        if key == Some(name) {
            return Some(value);
        }
        push_children(&mut stack, value);
    }

    None
}

// Children go on in reverse so they pop in document order.
fn push_children<'a>(stack: &mut Vec<(Option<&'a str>, &'a Value)>, value: &'a Value) {
    match value {
        Value::Object(map) => {
            stack.extend(map.iter().rev().map(|(key, child)| (Some(key.as_str()), child)));
        }
        Value::Array(items) => {
            stack.extend(items.iter().rev().map(|child| (None, child)));
        }
        _ => {}
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Drop a namespace prefix from a body-supplied code.
///
/// Codes look like `"TypeName"` or `"prefix#TypeName"`; everything up to and
/// including the last `#` is removed.
pub fn strip_namespace(code: &str) -> &str {
    match code.rfind('#') {
        Some(idx) => &code[idx + 1..],
        None => code,
    }
}
