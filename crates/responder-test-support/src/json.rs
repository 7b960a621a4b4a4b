//! Matching rules behind the JSON primitives.
//!
//! All functions compare decoded `serde_json::Value` trees. Paths in failures
//! are JSON Pointers (RFC 6901) into the response body.

use serde_json::{Map, Value};

use crate::error::{AssertResult, AssertionError};

/// Structure key that applies a nested structure to every array element.
pub const WILDCARD: &str = "*";

/// Build a one-entry JSON object.
#[must_use]
pub fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Append an escaped segment to a JSON Pointer.
#[must_use]
pub fn child_path(path: &str, segment: &str) -> String {
    format!("{path}/{}", segment.replace('~', "~0").replace('/', "~1"))
}

/// Render a pointer for display; the whole document is `/`.
#[must_use]
pub fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Whether some object anywhere in `haystack` maps `key` to `expected`.
#[must_use]
pub fn contains_pair(haystack: &Value, key: &str, expected: &Value) -> bool {
    match haystack {
        Value::Object(map) => {
            map.get(key).is_some_and(|found| found == expected)
                || map.values().any(|child| contains_pair(child, key, expected))
        }
        Value::Array(items) => items.iter().any(|child| contains_pair(child, key, expected)),
        _ => false,
    }
}

/// Whether `needle` equals `haystack` or any node nested inside it.
#[must_use]
pub fn contains_value(haystack: &Value, needle: &Value) -> bool {
    if haystack == needle {
        return true;
    }
    match haystack {
        Value::Object(map) => map.values().any(|child| contains_value(child, needle)),
        Value::Array(items) => items.iter().any(|child| contains_value(child, needle)),
        _ => false,
    }
}

/// Check that every pair of an object fragment appears somewhere in `body`.
///
/// Pairs are located independently, so `{"a": 1, "b": 2}` passes when `a`
/// and `b` live in different nested objects. A non-object fragment must equal
/// some node of the body.
///
/// # Errors
///
/// Returns [`AssertionError::FragmentMissing`] naming the first pair that
/// could not be found.
pub fn check_fragment(body: &Value, fragment: &Value) -> AssertResult<()> {
    let missing = match fragment {
        Value::Object(pairs) => pairs
            .iter()
            .find(|(key, value)| !contains_pair(body, key, value))
            .map(|(key, value)| single_entry(key, value.clone())),
        other => (!contains_value(body, other)).then(|| other.clone()),
    };
    match missing {
        Some(fragment) => Err(AssertionError::FragmentMissing {
            fragment: fragment.to_string(),
            body: body.to_string(),
        }),
        None => Ok(()),
    }
}

/// Check that `actual` carries every key named by `structure`.
///
/// A structure is either an array whose entries are key names or nested
/// structures, or an object mapping a key to the structure of its value.
/// The key `*` applies its structure to every element of an array. `null`
/// places no requirement.
///
/// # Errors
///
/// Returns [`AssertionError::StructureMismatch`] at the first missing key or
/// unexpected container type.
pub fn check_structure(actual: &Value, structure: &Value) -> AssertResult<()> {
    check_structure_at(actual, structure, "")
}

fn check_structure_at(actual: &Value, structure: &Value, path: &str) -> AssertResult<()> {
    match structure {
        Value::Null => Ok(()),
        Value::Array(entries) => {
            for entry in entries {
                match entry {
                    Value::String(key) if key == WILDCARD => {
                        require_array(actual, path)?;
                    }
                    Value::String(key) => {
                        require_key(actual, key, path)?;
                    }
                    Value::Object(_) => check_structure_at(actual, entry, path)?,
                    _ => return Err(invalid_structure(path)),
                }
            }
            Ok(())
        }
        Value::Object(nested) => {
            for (key, child) in nested {
                if key == WILDCARD {
                    for (index, item) in require_array(actual, path)?.iter().enumerate() {
                        check_structure_at(item, child, &child_path(path, &index.to_string()))?;
                    }
                } else {
                    let value = require_key(actual, key, path)?;
                    check_structure_at(value, child, &child_path(path, key))?;
                }
            }
            Ok(())
        }
        _ => Err(invalid_structure(path)),
    }
}

fn require_key<'a>(actual: &'a Value, key: &str, path: &str) -> AssertResult<&'a Value> {
    let object = actual
        .as_object()
        .ok_or_else(|| AssertionError::StructureMismatch {
            path: display_path(path),
            reason: "expected an object",
        })?;
    object
        .get(key)
        .ok_or_else(|| AssertionError::StructureMismatch {
            path: child_path(path, key),
            reason: "missing key",
        })
}

fn require_array<'a>(actual: &'a Value, path: &str) -> AssertResult<&'a Vec<Value>> {
    actual
        .as_array()
        .ok_or_else(|| AssertionError::StructureMismatch {
            path: display_path(path),
            reason: "expected an array",
        })
}

fn invalid_structure(path: &str) -> AssertionError {
    AssertionError::StructureMismatch {
        path: display_path(path),
        reason: "structure entries must be key names or nested structures",
    }
}

/// Check that `actual` is a superset of `subset`.
///
/// Objects match by key, arrays by index, everything else by equality.
/// Extra keys and trailing array elements in `actual` are ignored.
///
/// # Errors
///
/// Returns [`AssertionError::SubsetMismatch`] at the first location where the
/// expected value is absent or differs.
pub fn check_subset(actual: &Value, subset: &Value) -> AssertResult<()> {
    check_subset_at(actual, subset, "")
}

fn check_subset_at(actual: &Value, subset: &Value, path: &str) -> AssertResult<()> {
    match (subset, actual) {
        (Value::Object(expected), Value::Object(found)) => {
            for (key, value) in expected {
                let location = child_path(path, key);
                match found.get(key) {
                    Some(child) => check_subset_at(child, value, &location)?,
                    None => return Err(subset_mismatch(&location, value, None)),
                }
            }
            Ok(())
        }
        (Value::Array(expected), Value::Array(found)) => {
            for (index, value) in expected.iter().enumerate() {
                let location = child_path(path, &index.to_string());
                match found.get(index) {
                    Some(child) => check_subset_at(child, value, &location)?,
                    None => return Err(subset_mismatch(&location, value, None)),
                }
            }
            Ok(())
        }
        _ if subset == actual => Ok(()),
        _ => Err(subset_mismatch(path, subset, Some(actual))),
    }
}

fn subset_mismatch(path: &str, expected: &Value, actual: Option<&Value>) -> AssertionError {
    AssertionError::SubsetMismatch {
        path: display_path(path),
        expected: expected.to_string(),
        actual: actual.map(Value::to_string),
    }
}

/// Check that `actual` equals `expected`; object key order is irrelevant.
///
/// # Errors
///
/// Returns [`AssertionError::NotEqual`] with both documents rendered.
pub fn check_equals(actual: &Value, expected: &Value) -> AssertResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(AssertionError::NotEqual {
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "success": true,
            "status": 200,
            "data": {
                "user": {"id": 1, "name": "ada", "roles": ["admin", "dev"]},
                "posts": [{"id": 10, "title": "hello"}, {"id": 11, "title": "again"}]
            }
        })
    }

    #[test]
    fn pointers_escape_reserved_characters() {
        assert_eq!(child_path("", "a/b"), "/a~1b");
        assert_eq!(child_path("/x", "m~n"), "/x/m~0n");
        assert_eq!(display_path(""), "/");
    }

    #[test]
    fn fragment_pairs_are_found_at_any_depth() {
        let body = body();
        assert!(check_fragment(&body, &json!({"success": true})).is_ok());
        assert!(check_fragment(&body, &json!({"name": "ada", "title": "again"})).is_ok());
        assert!(check_fragment(&body, &json!({"roles": ["admin", "dev"]})).is_ok());
        assert!(check_fragment(&body, &json!("hello")).is_ok());

        let err = check_fragment(&body, &json!({"name": "ada", "id": 99}))
            .expect_err("missing pair must fail");
        match err {
            AssertionError::FragmentMissing { fragment, .. } => {
                assert_eq!(fragment, r#"{"id":99}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fragment_values_compare_exactly() {
        let body = body();
        assert!(check_fragment(&body, &json!({"roles": ["admin"]})).is_err());
        assert!(check_fragment(&body, &json!({"id": "1"})).is_err());
    }

    #[test]
    fn structure_checks_keys_nesting_and_wildcards() {
        let body = body();
        assert!(check_structure(&body, &json!(["success", "status", "data"])).is_ok());
        assert!(
            check_structure(
                &body,
                &json!({"data": {"user": ["id", "name"], "posts": {"*": ["id", "title"]}}})
            )
            .is_ok()
        );
        assert!(check_structure(&body, &json!(["data", {"data": ["posts"]}])).is_ok());
        assert!(check_structure(&body, &Value::Null).is_ok());

        let err = check_structure(&body, &json!({"data": {"posts": {"*": ["body"]}}}))
            .expect_err("missing nested key must fail");
        match err {
            AssertionError::StructureMismatch { path, reason } => {
                assert_eq!(path, "/data/posts/0/body");
                assert_eq!(reason, "missing key");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = check_structure(&body, &json!({"data": {"user": {"*": []}}}))
            .expect_err("wildcard over object must fail");
        assert!(matches!(
            err,
            AssertionError::StructureMismatch {
                reason: "expected an array",
                ..
            }
        ));

        assert!(check_structure(&body, &json!([1])).is_err());
    }

    #[test]
    fn subset_matches_objects_by_key_and_arrays_by_index() {
        let body = body();
        assert!(check_subset(&body, &json!({"data": {"user": {"id": 1}}})).is_ok());
        assert!(check_subset(&body, &json!({"data": {"posts": [{"id": 10}]}})).is_ok());

        let err = check_subset(&body, &json!({"data": {"posts": [{"id": 10}, {"id": 12}]}}))
            .expect_err("differing element must fail");
        match err {
            AssertionError::SubsetMismatch {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "/data/posts/1/id");
                assert_eq!(expected, "12");
                assert_eq!(actual.as_deref(), Some("11"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = check_subset(&body, &json!({"error": {"code": "X"}}))
            .expect_err("absent key must fail");
        assert!(matches!(
            err,
            AssertionError::SubsetMismatch { actual: None, .. }
        ));
    }

    #[test]
    fn subset_requires_matching_container_types() {
        let body = json!({"data": {"id": 1}});
        assert!(check_subset(&body, &json!({"data": [1]})).is_err());
        assert!(check_subset(&body, &json!({"data": {}})).is_ok());
    }

    #[test]
    fn equality_ignores_key_order_only() {
        let actual = json!({"a": 1, "b": {"c": [1, 2]}});
        assert!(check_equals(&actual, &json!({"b": {"c": [1, 2]}, "a": 1})).is_ok());
        assert!(check_equals(&actual, &json!({"a": 1})).is_err());
        assert!(check_equals(&actual, &json!({"a": 1, "b": {"c": [2, 1]}})).is_err());
    }
}
