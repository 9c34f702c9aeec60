use serde_json::Value;

use crate::Rewriter;

/// Replace every string leaf of `value` with `f(leaf)`, in place.
///
/// Object keys, non-string scalars, array lengths and ordering are left
/// alone. Uses an explicit work stack so nesting depth is bounded by memory,
/// not by the call stack.
pub fn map_strings<F>(value: &mut Value, mut f: F)
where
    F: FnMut(&str) -> String,
{
    let mut stack: Vec<&mut Value> = vec![value];
    while let Some(node) = stack.pop() {
        match node {
            Value::String(s) => *s = f(s.as_str()),
            Value::Array(items) => stack.extend(items.iter_mut()),
            Value::Object(map) => stack.extend(map.values_mut()),
            Value::Null | Value::Bool(_) | Value::Number(_) => {},
        }
    }
}

/// Run `rewriter` over every string leaf of `value`.
pub fn rewrite_strings(rewriter: &Rewriter, value: &mut Value) {
    map_strings(value, |s| rewriter.rewrite(s));
}
