//! Appending clauses to an accumulator, including nested sub-queries.
//!
//! A nested push hands the caller's callback a fresh [`NestedBuilder`]. What
//! the callback produces is folded into the appended clause according to the
//! clause type and whether the accumulator is in filter context:
//!
//! - join types (`nested`, `has_parent`, `has_child`) always carry their own
//!   scored sub-query, assembled into a single `query` key
//! - other types (`bool`, `constant_score`, ...) receive `must` and `filter`
//!   keys, with `must` dropped in filter context

use heck::ToSnakeCase;
use serde_json::{Map, Value};

use crate::builder::NestedBuilder;
use crate::error::ComposeResult;
use crate::types::{BoolContext, BoolKey, ClauseArgs, FilterSet};

use super::assembler::build;
use super::clause::build_clause;

/// Clause types that evaluate a sub-query against related documents.
const JOIN_TYPES: [&str; 3] = ["nested", "has_parent", "has_child"];

/// Clause types whose redundant `filter.bool` is flattened in filter context.
const FLATTENED_FILTER_TYPES: [&str; 2] = ["bool", "constant_score"];

/// What a nested callback hands back.
pub trait NestedResult {
    /// Returns true if any query clause was added.
    fn has_query(&self) -> bool;
    /// Returns the reduced query, or `{}` if none was added.
    fn get_query(&self) -> Value;
    /// Returns true if any filter clause was added.
    fn has_filter(&self) -> bool;
    /// Returns the reduced filter, or `{}` if none was added.
    fn get_filter(&self) -> Value;
}

/// Returns true for clause types that join against related documents.
///
/// The type is snake-cased first, so `hasParent` and `has-child` match.
pub fn is_join_type(clause_type: &str) -> bool {
    let snake = clause_type.to_snake_case();
    JOIN_TYPES.contains(&snake.as_str())
}

/// Appends `{clause_type: build_clause(args)}` to the given bucket.
pub fn push_query(
    existing: &mut FilterSet,
    bool_key: BoolKey,
    clause_type: &str,
    args: &ClauseArgs,
) {
    append(existing, bool_key, clause_type, build_clause(args));
}

/// Appends a clause whose body is completed by a nested callback.
///
/// The callback runs synchronously and may itself push nested clauses. Any
/// error it returns is passed through unchanged and nothing is appended.
pub fn push_nested_query<F, R>(
    existing: &mut FilterSet,
    bool_key: BoolKey,
    clause_type: &str,
    args: &ClauseArgs,
    context: BoolContext,
    callback: F,
) -> ComposeResult<()>
where
    F: FnOnce(NestedBuilder) -> ComposeResult<R>,
    R: NestedResult,
{
    let is_join = is_join_type(clause_type);
    let in_filter_context = context.is_in_filter_context();

    tracing::debug!(
        clause_type,
        in_filter_context,
        is_join,
        "Evaluating nested clause"
    );

    let result = callback(NestedBuilder::for_clause(context, is_join))?;

    let mut nested = Map::new();
    if is_join {
        let body = build(
            &Value::Object(Map::new()),
            &result.get_query(),
            &result.get_filter(),
            &Value::Null,
        );
        if let Some(query) = body.get("query") {
            nested.insert("query".to_string(), query.clone());
        }
    } else {
        if !in_filter_context && result.has_query() {
            nested.insert("must".to_string(), result.get_query());
        }
        if result.has_filter() {
            nested.insert("filter".to_string(), result.get_filter());
        }
    }

    let mut clause = build_clause(args);
    let flattened = if FLATTENED_FILTER_TYPES.contains(&clause_type) && in_filter_context {
        nested
            .get("filter")
            .and_then(|filter| filter.get("bool"))
            .cloned()
    } else {
        None
    };

    match flattened {
        Some(inner_bool) => extend_object(&mut clause, inner_bool),
        None => extend_object(&mut clause, Value::Object(nested)),
    }

    append(existing, bool_key, clause_type, clause);
    Ok(())
}

/// Shallow-merges the keys of `source` into `target`. Non-object sources add nothing.
fn extend_object(target: &mut Value, source: Value) {
    if let (Value::Object(dest), Value::Object(src)) = (target, source) {
        dest.extend(src);
    }
}

fn append(existing: &mut FilterSet, bool_key: BoolKey, clause_type: &str, clause: Value) {
    let mut wrapped = Map::new();
    wrapped.insert(clause_type.to_string(), clause);
    existing.push(bool_key, Value::Object(wrapped));
}
