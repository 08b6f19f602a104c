//! Leaf clause construction.

use serde_json::{Map, Value};

use crate::types::{ClauseArgs, Field};

/// Builds a single leaf clause from its arguments.
///
/// - field name and value: `{field: value}`
/// - pre-built clause: the clause itself
/// - field name only: `{"field": field}`
/// - nothing: an empty clause
///
/// Options are merged over the result last, so their keys win.
pub fn build_clause(args: &ClauseArgs) -> Value {
    let mut clause = match (&args.field, &args.value) {
        (Some(Field::Name(name)), Some(value)) => {
            let mut map = Map::new();
            map.insert(name.clone(), value.clone());
            map
        }
        (Some(Field::Clause(prebuilt)), _) => prebuilt.clone(),
        (Some(Field::Name(name)), None) => {
            let mut map = Map::new();
            map.insert("field".to_string(), Value::String(name.clone()));
            map
        }
        (None, _) => Map::new(),
    };

    for (key, value) in &args.opts {
        clause.insert(key.clone(), value.clone());
    }

    Value::Object(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_and_value() {
        let clause = build_clause(&ClauseArgs::field_value("user", "kimchy"));
        assert_eq!(clause, json!({"user": "kimchy"}));
    }

    #[test]
    fn test_opts_override_field() {
        let args = ClauseArgs::field_value("user", "kimchy")
            .with_opts(json!({"user": "elastic", "boost": 1.5}));
        assert_eq!(
            build_clause(&args),
            json!({"user": "elastic", "boost": 1.5})
        );
    }

    #[test]
    fn test_falsy_value_is_present() {
        assert_eq!(
            build_clause(&ClauseArgs::field_value("is_deleted", false)),
            json!({"is_deleted": false})
        );
        assert_eq!(
            build_clause(&ClauseArgs::field_value("count", 0)),
            json!({"count": 0})
        );
    }

    #[test]
    fn test_prebuilt_clause() {
        let args = ClauseArgs::clause(json!({"term": {"x": 1}})).with_opt("_name", "x-term");
        assert_eq!(
            build_clause(&args),
            json!({"term": {"x": 1}, "_name": "x-term"})
        );
    }

    #[test]
    fn test_field_without_value() {
        assert_eq!(
            build_clause(&ClauseArgs::field("user")),
            json!({"field": "user"})
        );
    }

    #[test]
    fn test_opts_only() {
        let args = ClauseArgs::new().with_opts(json!({"boost": 1.2}));
        assert_eq!(build_clause(&args), json!({"boost": 1.2}));
        assert_eq!(build_clause(&ClauseArgs::new()), json!({}));
    }
}
