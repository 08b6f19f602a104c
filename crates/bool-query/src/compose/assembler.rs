//! Request body assembly.
//!
//! Merges finished queries, filters and aggregations into a copy of a base
//! request body. Two wire formats are supported: the current
//! `query.bool.filter` layout and the legacy `query.filtered` layout.

use serde_json::{Map, Value};

/// Assembles a request body in the current wire format.
///
/// Filters go to `query.bool.filter`. When filters are present, a query
/// carrying a `bool` clause contributes its contents to `query.bool`, and any
/// other query becomes `query.bool.must`. Without filters, the query is placed
/// at `query` as given. Aggregations go to `aggs`.
///
/// The base body is never modified; the result is an independent copy.
pub fn build(body: &Value, queries: &Value, filters: &Value, aggregations: &Value) -> Value {
    let mut cloned = body.clone();
    let has_filters = !is_empty(filters);
    let has_queries = !is_empty(queries);

    if has_filters {
        let mut filter_body = Value::Object(Map::new());
        set_path(&mut filter_body, &["query", "bool", "filter"], filters.clone());

        let mut query_body = Value::Object(Map::new());
        match queries.get("bool") {
            Some(bool_clause) if !is_empty(bool_clause) => {
                set_path(&mut query_body, &["query", "bool"], bool_clause.clone());
            }
            None if has_queries => {
                set_path(&mut query_body, &["query", "bool", "must"], queries.clone());
            }
            _ => {}
        }

        merge_deep(&mut cloned, filter_body);
        merge_deep(&mut cloned, query_body);
    } else if has_queries {
        set_path(&mut cloned, &["query"], queries.clone());
    }

    let has_aggregations = !is_empty(aggregations);
    if has_aggregations {
        set_path(&mut cloned, &["aggs"], aggregations.clone());
    }

    tracing::trace!(
        has_queries,
        has_filters,
        has_aggregations,
        "Assembled request body"
    );

    cloned
}

/// Assembles a request body in the legacy `filtered` wire format.
///
/// Filters go to `query.filtered.filter` and, alongside them, queries to
/// `query.filtered.query`. Without filters, the query is placed at `query`.
/// Aggregations go to `aggregations`.
pub fn build_v1(body: &Value, queries: &Value, filters: &Value, aggregations: &Value) -> Value {
    let mut cloned = body.clone();
    let has_filters = !is_empty(filters);
    let has_queries = !is_empty(queries);

    if has_filters {
        set_path(&mut cloned, &["query", "filtered", "filter"], filters.clone());
        if has_queries {
            set_path(&mut cloned, &["query", "filtered", "query"], queries.clone());
        }
    } else if has_queries {
        set_path(&mut cloned, &["query"], queries.clone());
    }

    let has_aggregations = !is_empty(aggregations);
    if has_aggregations {
        set_path(&mut cloned, &["aggregations"], aggregations.clone());
    }

    tracing::trace!(
        has_queries,
        has_filters,
        has_aggregations,
        "Assembled legacy request body"
    );

    cloned
}

/// Returns true for values that carry no content.
///
/// Only non-empty objects, arrays and strings count as content.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Sets `value` at `path`, creating intermediate objects as needed.
///
/// A non-object found along the path is replaced by an object.
pub(crate) fn set_path(target: &mut Value, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *target = value;
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let child = map.entry((*first).to_string()).or_insert(Value::Null);
        set_path(child, rest, value);
    }
}

/// Recursively merges `source` into `target`.
///
/// Objects are merged key by key. Any other source value, arrays included,
/// replaces the target value.
pub(crate) fn merge_deep(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(dest), Value::Object(src)) => {
            for (key, value) in src {
                match dest.get_mut(&key) {
                    Some(existing) => merge_deep(existing, value),
                    None => {
                        dest.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
