//! Folding clause buckets into a single `bool` clause.

use serde_json::{Map, Value};

use crate::types::{BoolKey, Clause, FilterSet};

/// Reduces a [`FilterSet`] to one clause.
///
/// A set holding exactly one `and` clause and nothing in `or`/`not` reduces
/// to that clause with no `bool` wrapper. Anything else becomes
/// `{"bool": {...}}` carrying only the non-empty buckets. A single `must`
/// clause is emitted bare, while `should` and `must_not` always keep their
/// array form. `minimum_should_match` is only emitted when it is truthy and
/// `or` holds more than one clause.
pub fn to_bool(filters: &FilterSet) -> Clause {
    let must = unwrap(&filters.and);
    let has_should = !filters.or.is_empty();
    let has_must_not = !filters.not.is_empty();

    if filters.and.len() == 1 && !has_should && !has_must_not {
        return filters.and[0].clone();
    }

    let mut cleaned = Map::new();

    if let Some(must) = must {
        cleaned.insert(BoolKey::And.bool_clause_key().to_string(), must);
    }
    if has_should {
        cleaned.insert(
            BoolKey::Or.bool_clause_key().to_string(),
            Value::Array(filters.or.clone()),
        );
    }
    if has_must_not {
        cleaned.insert(
            BoolKey::Not.bool_clause_key().to_string(),
            Value::Array(filters.not.clone()),
        );
    }
    if let Some(msm) = &filters.minimum_should_match {
        if is_truthy(msm) && filters.or.len() > 1 {
            cleaned.insert("minimum_should_match".to_string(), msm.clone());
        }
    }

    let mut clause = Map::new();
    clause.insert("bool".to_string(), Value::Object(cleaned));
    Value::Object(clause)
}

/// A bucket of more than one clause stays an array; one clause stands alone.
fn unwrap(bucket: &[Clause]) -> Option<Value> {
    match bucket {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(Value::Array(many.to_vec())),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
