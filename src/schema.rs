//! JSON Schema scanning: walk a parsed document and collect `$ref` pointers.

use std::path::Path;

use serde_json::Value;

use crate::types::{Location, Reference};

/// The reserved key whose string value is a reference.
const REF_KEY: &str = "$ref";

/// Collect every local `$ref` in document order.
/// Values starting with `http://` or `https://` are skipped; a non-string
/// `$ref` value is walked like any other subtree.
pub fn extract_refs(document: &Value, source: &Path) -> Vec<Reference> {
    let mut references = Vec::new();
    walk(document, "", source, &mut references);
    references
}

/// Recursive descent over objects and arrays, threading the structural path.
fn walk(value: &Value, path: &str, source: &Path, out: &mut Vec<Reference>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = join_key(path, key);
                match child {
                    Value::String(target) if key == REF_KEY => push_ref(target, child_path, source, out),
                    _ => walk(child, &child_path, source, out),
                }
            }
        },
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &format!("{path}[{index}]"), source, out);
            }
        },
        _ => {},
    }
}

/// Record one `$ref` unless it points at a remote schema.
fn push_ref(target: &str, path: String, source: &Path, out: &mut Vec<Reference>) {
    if target.starts_with("http://") || target.starts_with("https://") {
        return;
    }
    out.push(Reference {
        location: Location::JsonPath(path),
        raw: target.to_owned(),
        source: source.to_path_buf(),
        target: target.to_owned(),
    });
}

/// Append an object key to a dotted path.
fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}
