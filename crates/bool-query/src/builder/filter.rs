//! Filter clause accumulation.

use serde_json::{Value, json};

use crate::compose::{NestedResult, push_nested_query, push_query, to_bool};
use crate::error::ComposeResult;
use crate::types::{BoolContext, BoolKey, ClauseArgs, FilterSet};

use super::NestedBuilder;

/// Accumulates filter clauses.
///
/// Filters never score, so nested pushes from this builder always run in
/// filter context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBuilder {
    filters: FilterSet,
}

impl FilterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `must` filter clause.
    pub fn filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::And, filter_type, args.into())
    }

    /// Alias for [`FilterBuilder::filter`].
    pub fn and_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::And, filter_type, args.into())
    }

    /// Adds a `should` filter clause.
    pub fn or_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::Or, filter_type, args.into())
    }

    /// Adds a `must_not` filter clause.
    pub fn not_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::Not, filter_type, args.into())
    }

    /// Adds a `must` filter clause completed by a nested callback.
    pub fn filter_with<F, R>(
        self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::And, filter_type, args.into(), nested)
    }

    /// Alias for [`FilterBuilder::filter_with`].
    pub fn and_filter_with<F, R>(
        self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::And, filter_type, args.into(), nested)
    }

    /// Adds a `should` filter clause completed by a nested callback.
    pub fn or_filter_with<F, R>(
        self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::Or, filter_type, args.into(), nested)
    }

    /// Adds a `must_not` filter clause completed by a nested callback.
    pub fn not_filter_with<F, R>(
        self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::Not, filter_type, args.into(), nested)
    }

    /// Sets `minimum_should_match` for the filter.
    ///
    /// Only stored when more than one `should` clause has been added, unless
    /// `override_count` is set.
    pub fn filter_minimum_should_match(
        mut self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> Self {
        if override_count || self.filters.or.len() > 1 {
            self.filters.minimum_should_match = Some(value.into());
        }
        self
    }

    /// Returns the accumulated buckets.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn push(mut self, key: BoolKey, filter_type: &str, args: ClauseArgs) -> Self {
        push_query(&mut self.filters, key, filter_type, &args);
        self
    }

    fn push_with<F, R>(
        mut self,
        key: BoolKey,
        filter_type: &str,
        args: ClauseArgs,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        push_nested_query(
            &mut self.filters,
            key,
            filter_type,
            &args,
            BoolContext::filter(),
            nested,
        )?;
        Ok(self)
    }
}

impl NestedResult for FilterBuilder {
    fn has_query(&self) -> bool {
        false
    }

    fn get_query(&self) -> Value {
        json!({})
    }

    fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    fn get_filter(&self) -> Value {
        if self.has_filter() {
            to_bool(&self.filters)
        } else {
            json!({})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_filter() {
        let builder = FilterBuilder::new().filter("term", ("user", "kimchy"));
        assert!(builder.has_filter());
        assert_eq!(builder.get_filter(), json!({"term": {"user": "kimchy"}}));
    }

    #[test]
    fn test_and_or_not_filters() {
        let builder = FilterBuilder::new()
            .filter("term", ("user", "kimchy"))
            .and_filter("range", ("age", json!({"gte": 18})))
            .or_filter("term", ("tag", "a"))
            .not_filter("exists", "deleted_at");

        assert_eq!(
            builder.get_filter(),
            json!({"bool": {
                "must": [{"term": {"user": "kimchy"}}, {"range": {"age": {"gte": 18}}}],
                "should": [{"term": {"tag": "a"}}],
                "must_not": [{"exists": {"field": "deleted_at"}}]
            }})
        );
    }

    #[test]
    fn test_nested_bool_filter_is_flattened() {
        let builder = FilterBuilder::new()
            .filter_with("bool", ClauseArgs::new(), |b| {
                Ok(b.filter("term", ("a", 1)).not_filter("term", ("b", 2)))
            })
            .unwrap();

        assert_eq!(
            builder.get_filter(),
            json!({"bool": {
                "must": {"term": {"a": 1}},
                "must_not": [{"term": {"b": 2}}]
            }})
        );
    }

    #[test]
    fn test_nested_filter_rejects_scored_query() {
        let result = FilterBuilder::new()
            .filter_with("bool", ClauseArgs::new(), |b| b.query("match", ("a", "x")));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_join_inside_filter_keeps_query() {
        let builder = FilterBuilder::new()
            .filter_with("nested", ("path", "comments"), |b| {
                b.query("match", ("comments.author", "alice"))
            })
            .unwrap();

        assert_eq!(
            builder.get_filter(),
            json!({"nested": {
                "path": "comments",
                "query": {"match": {"comments.author": "alice"}}
            }})
        );
    }
}
