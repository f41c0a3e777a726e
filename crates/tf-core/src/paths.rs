//! Data path resolution over renderer object graphs
//!
//! Renderer payloads are deeply nested and shape-shift between releases, so
//! every field lookup goes through dotted path strings with a few extras:
//! bracket indices (`metadataRows[1]`), scanning array elements for a bare
//! key, and ordered candidate lists where the first resolvable path wins.
//! Resolution never fails hard - a missing segment is just "value absent".

use serde_json::Value;

/// Resolve a single dotted path against `root`.
///
/// Segment rules:
/// - `key` descends into an object member.
/// - `key[1][0]` descends into `key`, then applies the numeric indices.
/// - a bare `key` applied to an array scans the elements for the first one
///   that owns `key` (the common "array of one variant-tagged object" shape).
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cursor = root;

    for segment in path.split('.') {
        if segment.contains('[') {
            cursor = resolve_indexed(cursor, segment)?;
            continue;
        }

        match cursor {
            Value::Array(items) => {
                // Scan for an element that carries the key.
                let found = items.iter().find_map(|item| item.get(segment))?;
                cursor = found;
            }
            _ => {
                cursor = cursor.get(segment)?;
            }
        }
    }

    Some(cursor)
}

/// Resolve the first path of `paths` that fully resolves.
pub fn resolve_first<'a>(root: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| resolve(root, path))
}

/// Handle a `base[1][2]` segment: navigate to `base` (when present), then
/// apply each numeric index in order.
fn resolve_indexed<'a>(cursor: &'a Value, segment: &str) -> Option<&'a Value> {
    let base_end = segment.find('[').unwrap_or(segment.len());
    let base = &segment[..base_end];

    let mut cursor = if base.is_empty() {
        cursor
    } else {
        cursor.get(base)?
    };

    let mut rest = &segment[base_end..];
    while let Some(open) = rest.find('[') {
        let close = rest.find(']')?;
        let idx: usize = rest[open + 1..close].parse().ok()?;
        cursor = cursor.as_array()?.get(idx)?;
        rest = &rest[close + 1..];
    }

    Some(cursor)
}

/// Mutable twin of [`resolve`], used by side-effect actions that rewrite
/// payload regions in place. Same segment rules.
pub fn resolve_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut cursor = root;

    for segment in path.split('.') {
        if segment.contains('[') {
            cursor = resolve_indexed_mut(cursor, segment)?;
            continue;
        }

        match cursor {
            Value::Array(items) => {
                cursor = items.iter_mut().find_map(|item| item.get_mut(segment))?;
            }
            _ => {
                cursor = cursor.get_mut(segment)?;
            }
        }
    }

    Some(cursor)
}

fn resolve_indexed_mut<'a>(cursor: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    let base_end = segment.find('[').unwrap_or(segment.len());
    let base = &segment[..base_end];

    let mut cursor = if base.is_empty() {
        cursor
    } else {
        cursor.get_mut(base)?
    };

    let mut rest = &segment[base_end..];
    while let Some(open) = rest.find('[') {
        let close = rest.find(']')?;
        let idx: usize = rest[open + 1..close].parse().ok()?;
        cursor = cursor.as_array_mut()?.get_mut(idx)?;
        rest = &rest[close + 1..];
    }

    Some(cursor)
}

/// Flatten a rich-text value into a plain string where possible.
///
/// `{"simpleText": "..."}` yields the text; `{"runs": [{"text": ...}, ...]}`
/// joins the fragment texts with single spaces. Anything else is returned
/// unchanged - callers must tolerate non-string results for non-text fields
/// such as badge lists.
pub fn flatten_runs(value: &Value) -> Value {
    if let Some(simple) = value.get("simpleText") {
        return simple.clone();
    }

    let Some(runs) = value.get("runs").and_then(Value::as_array) else {
        return value.clone();
    };

    let parts: Vec<&str> = runs
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    Value::String(parts.join(" "))
}

/// Resolve the first candidate path and flatten the result. Once a path
/// resolves there is no fallback to later candidates, even if flattening
/// yields an unexpected type.
pub fn resolve_flattened(root: &Value, paths: &[&str]) -> Option<Value> {
    resolve_first(root, paths).map(flatten_runs)
}
