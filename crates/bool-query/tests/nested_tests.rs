//! Tests for nested clauses and filter-context threading.
//!
//! Covers joins (`nested`, `has_parent`, `has_child`), nested `bool` and
//! `constant_score` clauses, multi-level nesting, and error propagation out
//! of nested callbacks.

use serde_json::json;

use helios_bool_query::{
    BodyBuilder, BoolContext, BoolKey, ClauseArgs, ComposeError, FilterSet, NestedBuilder,
    push_nested_query,
};

#[test]
fn test_nested_join_query_and_filter_compose_into_bool() {
    let body = BodyBuilder::new()
        .query_with("nested", ("path", "comments"), |nested| {
            Ok(nested
                .query("match", ("comments.text", "fast"))?
                .filter("term", ("comments.visible", true)))
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"nested": {
            "path": "comments",
            "query": {"bool": {
                "must": {"match": {"comments.text": "fast"}},
                "filter": {"term": {"comments.visible": true}}
            }}
        }}})
    );
}

#[test]
fn test_has_child_inside_filter_keeps_scored_query() {
    let body = BodyBuilder::new()
        .filter_with(
            "has_child",
            ClauseArgs::field_value("type", "answer").with_opt("score_mode", "max"),
            |child| {
                child
                    .query("match", ("body", "rust"))?
                    .or_query("term", ("accepted", true))
            },
        )
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"has_child": {
            "type": "answer",
            "score_mode": "max",
            "query": {"bool": {
                "must": {"match": {"body": "rust"}},
                "should": [{"term": {"accepted": true}}]
            }}
        }}}}})
    );
}

#[test]
fn test_camel_case_join_type_is_recognised() {
    let body = BodyBuilder::new()
        .filter_with("hasParent", ("parent_type", "question"), |parent| {
            parent.query("term", ("tag", "search"))
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"hasParent": {
            "parent_type": "question",
            "query": {"term": {"tag": "search"}}
        }}}}})
    );
}

#[test]
fn test_nested_bool_in_query_context() {
    let body = BodyBuilder::new()
        .query("match", ("title", "composition"))
        .query_with("bool", ClauseArgs::new(), |b| {
            Ok(b
                .or_query("term", ("lang", "en"))?
                .or_query("term", ("lang", "de"))?
                .filter("term", ("published", true)))
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"must": [
            {"match": {"title": "composition"}},
            {"bool": {
                "must": {"bool": {"should": [
                    {"term": {"lang": "en"}},
                    {"term": {"lang": "de"}}
                ]}},
                "filter": {"term": {"published": true}}
            }}
        ]}}})
    );
}

#[test]
fn test_nested_bool_in_filter_context_is_flattened() {
    let body = BodyBuilder::new()
        .filter("term", ("status", "active"))
        .filter_with("bool", ClauseArgs::new(), |b| {
            Ok(b
                .or_filter("term", ("region", "eu"))
                .or_filter("term", ("region", "us"))
                .filter_minimum_should_match(1, false))
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"bool": {"must": [
            {"term": {"status": "active"}},
            {"bool": {
                "should": [{"term": {"region": "eu"}}, {"term": {"region": "us"}}],
                "minimum_should_match": 1
            }}
        ]}}}}})
    );
}

#[test]
fn test_constant_score_in_filter_context_without_inner_bool() {
    let body = BodyBuilder::new()
        .filter_with(
            "constant_score",
            ClauseArgs::new().with_opt("boost", 2),
            |b| Ok(b.filter("term", ("user", "kimchy"))),
        )
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"constant_score": {
            "boost": 2,
            "filter": {"term": {"user": "kimchy"}}
        }}}}})
    );
}

#[test]
fn test_constant_score_in_filter_context_with_several_filters_is_flattened() {
    let body = BodyBuilder::new()
        .filter_with(
            "constant_score",
            ClauseArgs::new().with_opt("boost", 2),
            |b| {
                Ok(b
                    .filter("term", ("user", "kimchy"))
                    .not_filter("term", ("state", "archived")))
            },
        )
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"constant_score": {
            "boost": 2,
            "must": {"term": {"user": "kimchy"}},
            "must_not": [{"term": {"state": "archived"}}]
        }}}}})
    );
}

#[test]
fn test_constant_score_in_query_context_keeps_filter_bool() {
    let body = BodyBuilder::new()
        .query_with(
            "constant_score",
            ClauseArgs::new().with_opt("boost", 2),
            |b| {
                Ok(b
                    .filter("term", ("user", "kimchy"))
                    .filter("term", ("lang", "en")))
            },
        )
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"constant_score": {
            "boost": 2,
            "filter": {"bool": {"must": [
                {"term": {"user": "kimchy"}},
                {"term": {"lang": "en"}}
            ]}}
        }}})
    );
}

#[test]
fn test_two_levels_of_nesting() {
    let body = BodyBuilder::new()
        .query_with("nested", ("path", "orders"), |orders| {
            orders.query_with("nested", ("path", "orders.items"), |items| {
                Ok(items
                    .query("match", ("orders.items.name", "keyboard"))?
                    .filter("range", ("orders.items.qty", json!({"gte": 2}))))
            })
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"nested": {
            "path": "orders",
            "query": {"nested": {
                "path": "orders.items",
                "query": {"bool": {
                    "must": {"match": {"orders.items.name": "keyboard"}},
                    "filter": {"range": {"orders.items.qty": {"gte": 2}}}
                }}
            }}
        }}})
    );
}

#[test]
fn test_join_inside_filter_only_bool() {
    let body = BodyBuilder::new()
        .filter_with("bool", ClauseArgs::new(), |b| {
            b.filter("term", ("a", 1))
                .not_filter_with("nested", ("path", "tags"), |tags| {
                    tags.query("term", ("tags.name", "spam"))
                })
        })
        .unwrap()
        .build();

    assert_eq!(
        body,
        json!({"query": {"bool": {"filter": {"bool": {
            "must": {"term": {"a": 1}},
            "must_not": [{"nested": {
                "path": "tags",
                "query": {"term": {"tags.name": "spam"}}
            }}]
        }}}}})
    );
}

#[test]
fn test_query_inside_filter_bool_is_rejected() {
    let result = BodyBuilder::new().filter_with("bool", ClauseArgs::new(), |b| {
        b.query("match", ("title", "rust"))
    });

    match result {
        Err(ComposeError::QueryInFilterContext { clause_type }) => {
            assert_eq!(clause_type, "match");
        }
        other => panic!("expected QueryInFilterContext, got {:?}", other.map(|b| b.build())),
    }
}

#[test]
fn test_caller_error_propagates_unchanged() {
    #[derive(Debug)]
    struct LookupFailed;

    impl std::fmt::Display for LookupFailed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "synonym lookup failed")
        }
    }

    impl std::error::Error for LookupFailed {}

    let result = BodyBuilder::new().query_with("bool", ClauseArgs::new(), |_| {
        Err::<NestedBuilder, _>(ComposeError::callback(LookupFailed))
    });

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "synonym lookup failed");
    match err {
        ComposeError::Callback(source) => assert!(source.downcast_ref::<LookupFailed>().is_some()),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_push_with_custom_nested_result() {
    struct Fixed;

    impl helios_bool_query::NestedResult for Fixed {
        fn has_query(&self) -> bool {
            true
        }
        fn get_query(&self) -> serde_json::Value {
            json!({"match_all": {}})
        }
        fn has_filter(&self) -> bool {
            false
        }
        fn get_filter(&self) -> serde_json::Value {
            json!({})
        }
    }

    let mut accumulator = FilterSet::new();
    push_nested_query(
        &mut accumulator,
        BoolKey::And,
        "bool",
        &ClauseArgs::new(),
        BoolContext::query(),
        |_| Ok(Fixed),
    )
    .unwrap();

    // Filter context drops the scored part of a non-join clause.
    push_nested_query(
        &mut accumulator,
        BoolKey::Or,
        "bool",
        &ClauseArgs::new(),
        BoolContext::filter(),
        |_| Ok(Fixed),
    )
    .unwrap();

    assert_eq!(accumulator.and, vec![json!({"bool": {"must": {"match_all": {}}}})]);
    assert_eq!(accumulator.or, vec![json!({"bool": {}})]);
}
