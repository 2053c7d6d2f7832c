//! Structural JSON comparison with ignored field paths.
//!
//! Both sides of the comparison are scrubbed of every ignored path before
//! the equality check, so a path only declared because the *request* carries
//! a volatile field also strips a stale copy of that field from the
//! expectation, and vice versa.

use serde_json::Value;

/// Structural equality of `expected` and `actual` after removing every
/// path in `ignored_fields` from both sides.
pub fn bodies_match(expected: &Value, actual: &Value, ignored_fields: &[String]) -> bool {
    if ignored_fields.is_empty() {
        return expected == actual;
    }
    scrub(expected.clone(), ignored_fields) == scrub(actual.clone(), ignored_fields)
}

/// Remove every ignored path from `value`.
fn scrub(mut value: Value, ignored_fields: &[String]) -> Value {
    for path in ignored_fields {
        let segments: Vec<&str> = path.split('.').collect();
        remove_path(&mut value, &segments);
    }
    value
}

/// Remove the field addressed by `segments`, dot-split from a path such as
/// `params.0.from`. Object keys are removed; array elements are nulled in
/// place so sibling indices keep their meaning for other ignored paths.
/// A path that does not exist is a no-op.
fn remove_path(value: &mut Value, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        match value {
            Value::Object(map) => {
                map.remove(*head);
            }
            Value::Array(items) => {
                if let Some(slot) = head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                    *slot = Value::Null;
                }
            }
            _ => {}
        }
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(child) = map.get_mut(*head) {
                remove_path(child, rest);
            }
        }
        Value::Array(items) => {
            if let Some(child) = head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                remove_path(child, rest);
            }
        }
        _ => {}
    }
}
