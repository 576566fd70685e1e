// Response-shape reconciliation.
//
// Panel deployments disagree about list response shapes: the same
// endpoint may return a bare array, an object keyed by the resource
// name (`{"users": [...]}`), or a generic `{"data": [...]}` wrapper,
// depending on backend version. Each known shape is a pure function
// from the raw JSON value to `Option<&[Value]>`; the first match wins.
//
// This layer is deliberately total: an unrecognized payload or a decode
// failure degrades to an empty list rather than an error. Callers treat
// "empty" and "unrecognized" identically; the only trace of a masked
// problem is a debug log.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Extract a list of typed records from a response of unknown shape.
///
/// `named_key` is the resource-specific wrapper key (`"users"`,
/// `"nodes"`, `"inbounds"`); the generic `"data"` key is always tried
/// after it. Returns an empty vec for anything unrecognized.
pub fn normalize_records<T: DeserializeOwned>(value: &Value, named_key: &str) -> Vec<T> {
    let Some(items) = extract_list(value, named_key) else {
        debug!(named_key, "unrecognized response shape, treating as empty");
        return Vec::new();
    };

    decode_all(items, named_key)
}

/// Find the record array inside `value`, trying each shape in priority
/// order: bare array, `{named_key: [...]}`, `{"data": [...]}`.
fn extract_list<'a>(value: &'a Value, named_key: &str) -> Option<&'a [Value]> {
    bare_array(value)
        .or_else(|| keyed_array(value, named_key))
        .or_else(|| keyed_array(value, "data"))
}

/// Shape (a): a bare array of objects. An empty array qualifies; an
/// array whose first element is not an object does not (guards against
/// arrays of primitives).
fn bare_array(value: &Value) -> Option<&[Value]> {
    let items = value.as_array()?;
    match items.first() {
        None => Some(items),
        Some(first) if first.is_object() => Some(items),
        Some(_) => None,
    }
}

/// Shapes (b)/(c): an object whose `key` member is an array.
fn keyed_array<'a>(value: &'a Value, key: &str) -> Option<&'a [Value]> {
    value.as_object()?.get(key)?.as_array().map(Vec::as_slice)
}

/// Decode every element, degrading the whole batch to empty on the
/// first failure. Availability over completeness: a half-decoded list
/// would be indistinguishable from a filtered one.
fn decode_all<T: DeserializeOwned>(items: &[Value], named_key: &str) -> Vec<T> {
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item.clone()) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(named_key, error = %e, "record decode failed, degrading to empty list");
                return Vec::new();
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde::Deserialize;
    use serde_json::json;

    use super::normalize_records;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Rec {
        id: i64,
    }

    #[test]
    fn bare_array_of_objects() {
        let v = json!([{"id": 1}, {"id": 2}]);
        let recs: Vec<Rec> = normalize_records(&v, "users");
        assert_eq!(recs, vec![Rec { id: 1 }, Rec { id: 2 }]);
    }

    #[test]
    fn named_key_wrapper() {
        let v = json!({"users": [{"id": 7}]});
        let recs: Vec<Rec> = normalize_records(&v, "users");
        assert_eq!(recs, vec![Rec { id: 7 }]);
    }

    #[test]
    fn data_key_wrapper() {
        let v = json!({"data": [{"id": 9}]});
        let recs: Vec<Rec> = normalize_records(&v, "users");
        assert_eq!(recs, vec![Rec { id: 9 }]);
    }

    #[test]
    fn named_key_preferred_over_data() {
        let v = json!({"users": [{"id": 1}], "data": [{"id": 2}]});
        let recs: Vec<Rec> = normalize_records(&v, "users");
        assert_eq!(recs, vec![Rec { id: 1 }]);
    }

    #[test]
    fn same_records_across_all_shapes() {
        let inner = json!([{"id": 3}, {"id": 4}]);
        let shapes = [
            inner.clone(),
            json!({"users": inner.clone()}),
            json!({"data": inner}),
        ];
        for shape in &shapes {
            let recs: Vec<Rec> = normalize_records(shape, "users");
            assert_eq!(recs, vec![Rec { id: 3 }, Rec { id: 4 }]);
        }
    }

    #[test]
    fn empty_array_yields_empty() {
        let recs: Vec<Rec> = normalize_records(&json!([]), "users");
        assert!(recs.is_empty());
    }

    #[test]
    fn array_of_primitives_yields_empty() {
        let recs: Vec<Rec> = normalize_records(&json!([1, 2, 3]), "users");
        assert!(recs.is_empty());
    }

    #[test]
    fn unrecognized_object_yields_empty() {
        let recs: Vec<Rec> = normalize_records(&json!({"total": 5}), "users");
        assert!(recs.is_empty());
    }

    #[test]
    fn null_and_scalar_yield_empty() {
        let recs: Vec<Rec> = normalize_records(&json!(null), "users");
        assert!(recs.is_empty());
        let recs: Vec<Rec> = normalize_records(&json!("users"), "users");
        assert!(recs.is_empty());
    }

    #[test]
    fn named_key_holding_non_array_yields_empty() {
        let recs: Vec<Rec> = normalize_records(&json!({"users": {"id": 1}}), "users");
        assert!(recs.is_empty());
    }

    #[test]
    fn decode_failure_degrades_to_empty() {
        // Second element is missing the required field; the whole batch
        // degrades rather than returning a partial list.
        let v = json!([{"id": 1}, {"name": "no-id"}]);
        let recs: Vec<Rec> = normalize_records(&v, "users");
        assert!(recs.is_empty());
    }
}
