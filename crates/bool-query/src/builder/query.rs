//! Query clause accumulation.

use serde_json::{Value, json};

use crate::compose::{NestedResult, push_nested_query, push_query, to_bool};
use crate::error::ComposeResult;
use crate::types::{BoolContext, BoolKey, ClauseArgs, FilterSet};

use super::NestedBuilder;

/// Accumulates query clauses.
///
/// Pushes run in the context the builder was created with: query context for
/// a top-level builder, or the enclosing context when created for a nested
/// join inside a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    queries: FilterSet,
    context: BoolContext,
}

impl QueryBuilder {
    /// Creates a builder in query context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder whose nested pushes run in the given context.
    pub fn with_context(context: BoolContext) -> Self {
        Self {
            queries: FilterSet::new(),
            context,
        }
    }

    /// Returns the context nested pushes run in.
    pub fn context(&self) -> BoolContext {
        self.context
    }

    /// Adds a `must` query clause.
    pub fn query(self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::And, query_type, args.into())
    }

    /// Alias for [`QueryBuilder::query`].
    pub fn and_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::And, query_type, args.into())
    }

    /// Adds a `should` query clause.
    pub fn or_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::Or, query_type, args.into())
    }

    /// Adds a `must_not` query clause.
    pub fn not_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.push(BoolKey::Not, query_type, args.into())
    }

    /// Adds a `must` query clause completed by a nested callback.
    pub fn query_with<F, R>(
        self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::And, query_type, args.into(), nested)
    }

    /// Alias for [`QueryBuilder::query_with`].
    pub fn and_query_with<F, R>(
        self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::And, query_type, args.into(), nested)
    }

    /// Adds a `should` query clause completed by a nested callback.
    pub fn or_query_with<F, R>(
        self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::Or, query_type, args.into(), nested)
    }

    /// Adds a `must_not` query clause completed by a nested callback.
    pub fn not_query_with<F, R>(
        self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.push_with(BoolKey::Not, query_type, args.into(), nested)
    }

    /// Sets `minimum_should_match` for the query.
    ///
    /// Only stored when more than one `should` clause has been added, unless
    /// `override_count` is set.
    pub fn query_minimum_should_match(
        mut self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> Self {
        if override_count || self.queries.or.len() > 1 {
            self.queries.minimum_should_match = Some(value.into());
        }
        self
    }

    /// Returns the accumulated buckets.
    pub fn queries(&self) -> &FilterSet {
        &self.queries
    }

    fn push(mut self, key: BoolKey, query_type: &str, args: ClauseArgs) -> Self {
        push_query(&mut self.queries, key, query_type, &args);
        self
    }

    fn push_with<F, R>(
        mut self,
        key: BoolKey,
        query_type: &str,
        args: ClauseArgs,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        push_nested_query(&mut self.queries, key, query_type, &args, self.context, nested)?;
        Ok(self)
    }
}

impl NestedResult for QueryBuilder {
    fn has_query(&self) -> bool {
        !self.queries.is_empty()
    }

    fn get_query(&self) -> Value {
        if self.has_query() {
            to_bool(&self.queries)
        } else {
            json!({})
        }
    }

    fn has_filter(&self) -> bool {
        false
    }

    fn get_filter(&self) -> Value {
        json!({})
    }
}
