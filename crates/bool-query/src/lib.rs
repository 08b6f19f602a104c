//! Helios Bool Query Composition
//!
//! This crate assembles the `bool` query trees of document-search request
//! bodies. Callers accumulate query clauses, filter clauses and aggregations;
//! the composition core merges them into a single request body, keeping
//! query context (scored) and filter context (unscored) apart through any
//! depth of nesting, including `nested`/`has_parent`/`has_child` joins that
//! carry their own scored sub-query.
//!
//! # Architecture
//!
//! - [`compose`] - the composition core: leaf clauses, bool reduction,
//!   nested pushes and body assembly
//! - [`builder`] - fluent accumulators feeding the core
//! - [`types`] - clause arguments, filter sets and the bool context
//! - [`config`] - wire format selection
//! - [`error`] - error types
//!
//! # Example
//!
//! ```
//! use helios_bool_query::BodyBuilder;
//! use serde_json::json;
//!
//! let body = BodyBuilder::new()
//!     .query("match", ("message", "this is a test"))
//!     .filter("term", ("user", "kimchy"))
//!     .filter_with("nested", ("path", "comments"), |nested| {
//!         nested.query("match", ("comments.text", "great"))
//!     })
//!     .unwrap()
//!     .aggregation("terms", "user")
//!     .size(10)
//!     .build();
//!
//! assert_eq!(body, json!({
//!     "size": 10,
//!     "query": {"bool": {
//!         "must": {"match": {"message": "this is a test"}},
//!         "filter": {"bool": {"must": [
//!             {"term": {"user": "kimchy"}},
//!             {"nested": {
//!                 "path": "comments",
//!                 "query": {"match": {"comments.text": "great"}}
//!             }}
//!         ]}}
//!     }},
//!     "aggs": {"agg_terms_user": {"terms": {"field": "user"}}}
//! }));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod builder;
pub mod compose;
pub mod config;
pub mod error;
pub mod types;

pub use builder::{
    AggregationBuilder, BodyBuilder, FilterBuilder, NestedBuilder, QueryBuilder, SortOrder,
    SubAggregationBuilder,
};
pub use compose::{
    NestedResult, build, build_clause, build_v1, push_nested_query, push_query, to_bool,
};
pub use config::{ComposerConfig, DslVersion};
pub use error::{ComposeError, ComposeResult};
pub use types::{BoolContext, BoolKey, Clause, ClauseArgs, Field, FilterSet};
