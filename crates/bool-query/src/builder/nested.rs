//! The builder handed to nested callbacks.

use serde_json::{Value, json};

use crate::compose::NestedResult;
use crate::error::{ComposeError, ComposeResult};
use crate::types::{BoolContext, ClauseArgs};

use super::{FilterBuilder, QueryBuilder};

/// Builder passed to a nested callback.
///
/// Filter methods are always available. Query methods are only available in
/// the [`NestedBuilder::Full`] variant and fail with
/// [`ComposeError::QueryInFilterContext`] otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedBuilder {
    /// Inside a filter, for a clause that is not a join.
    FilterOnly(FilterBuilder),
    /// Query and filter methods both available.
    Full {
        /// Scored clauses.
        queries: QueryBuilder,
        /// Unscored clauses.
        filters: FilterBuilder,
    },
}

impl NestedBuilder {
    /// Picks the variant for a nested clause.
    ///
    /// Scoring is meaningless inside a filter, except for joins which always
    /// carry their own scored sub-query.
    pub fn for_clause(context: BoolContext, is_join: bool) -> Self {
        if context.is_in_filter_context() && !is_join {
            NestedBuilder::FilterOnly(FilterBuilder::new())
        } else {
            NestedBuilder::Full {
                queries: QueryBuilder::with_context(context),
                filters: FilterBuilder::new(),
            }
        }
    }

    /// Returns true if query methods are available.
    pub fn accepts_queries(&self) -> bool {
        matches!(self, NestedBuilder::Full { .. })
    }

    /// Adds a `must` query clause.
    pub fn query(self, query_type: &str, args: impl Into<ClauseArgs>) -> ComposeResult<Self> {
        self.try_map_queries(query_type, |q| Ok(q.query(query_type, args)))
    }

    /// Alias for [`NestedBuilder::query`].
    pub fn and_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> ComposeResult<Self> {
        self.try_map_queries(query_type, |q| Ok(q.and_query(query_type, args)))
    }

    /// Adds a `should` query clause.
    pub fn or_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> ComposeResult<Self> {
        self.try_map_queries(query_type, |q| Ok(q.or_query(query_type, args)))
    }

    /// Adds a `must_not` query clause.
    pub fn not_query(self, query_type: &str, args: impl Into<ClauseArgs>) -> ComposeResult<Self> {
        self.try_map_queries(query_type, |q| Ok(q.not_query(query_type, args)))
    }

    /// Adds a `must` query clause completed by a further nested callback.
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
        self.try_map_queries(query_type, |q| q.query_with(query_type, args, nested))
    }

    /// Alias for [`NestedBuilder::query_with`].
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
        self.try_map_queries(query_type, |q| q.and_query_with(query_type, args, nested))
    }

    /// Adds a `should` query clause completed by a further nested callback.
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
        self.try_map_queries(query_type, |q| q.or_query_with(query_type, args, nested))
    }

    /// Adds a `must_not` query clause completed by a further nested callback.
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
        self.try_map_queries(query_type, |q| q.not_query_with(query_type, args, nested))
    }

    /// Sets `minimum_should_match` on the nested query.
    pub fn query_minimum_should_match(
        self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> ComposeResult<Self> {
        self.try_map_queries("minimum_should_match", |q| {
            Ok(q.query_minimum_should_match(value, override_count))
        })
    }

    /// Adds a `must` filter clause.
    pub fn filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.map_filters(|f| f.filter(filter_type, args))
    }

    /// Alias for [`NestedBuilder::filter`].
    pub fn and_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.map_filters(|f| f.and_filter(filter_type, args))
    }

    /// Adds a `should` filter clause.
    pub fn or_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.map_filters(|f| f.or_filter(filter_type, args))
    }

    /// Adds a `must_not` filter clause.
    pub fn not_filter(self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.map_filters(|f| f.not_filter(filter_type, args))
    }

    /// Adds a `must` filter clause completed by a further nested callback.
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
        self.try_map_filters(|f| f.filter_with(filter_type, args, nested))
    }

    /// Alias for [`NestedBuilder::filter_with`].
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
        self.try_map_filters(|f| f.and_filter_with(filter_type, args, nested))
    }

    /// Adds a `should` filter clause completed by a further nested callback.
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
        self.try_map_filters(|f| f.or_filter_with(filter_type, args, nested))
    }

    /// Adds a `must_not` filter clause completed by a further nested callback.
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
        self.try_map_filters(|f| f.not_filter_with(filter_type, args, nested))
    }

    /// Sets `minimum_should_match` on the nested filter.
    pub fn filter_minimum_should_match(
        self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> Self {
        self.map_filters(|f| f.filter_minimum_should_match(value, override_count))
    }

    fn map_filters(self, f: impl FnOnce(FilterBuilder) -> FilterBuilder) -> Self {
        match self {
            NestedBuilder::FilterOnly(filters) => NestedBuilder::FilterOnly(f(filters)),
            NestedBuilder::Full { queries, filters } => NestedBuilder::Full {
                queries,
                filters: f(filters),
            },
        }
    }

    fn try_map_filters(
        self,
        f: impl FnOnce(FilterBuilder) -> ComposeResult<FilterBuilder>,
    ) -> ComposeResult<Self> {
        Ok(match self {
            NestedBuilder::FilterOnly(filters) => NestedBuilder::FilterOnly(f(filters)?),
            NestedBuilder::Full { queries, filters } => NestedBuilder::Full {
                queries,
                filters: f(filters)?,
            },
        })
    }

    fn try_map_queries(
        self,
        clause_type: &str,
        f: impl FnOnce(QueryBuilder) -> ComposeResult<QueryBuilder>,
    ) -> ComposeResult<Self> {
        match self {
            NestedBuilder::FilterOnly(_) => Err(ComposeError::QueryInFilterContext {
                clause_type: clause_type.to_string(),
            }),
            NestedBuilder::Full { queries, filters } => Ok(NestedBuilder::Full {
                queries: f(queries)?,
                filters,
            }),
        }
    }
}

impl NestedResult for NestedBuilder {
    fn has_query(&self) -> bool {
        match self {
            NestedBuilder::FilterOnly(_) => false,
            NestedBuilder::Full { queries, .. } => queries.has_query(),
        }
    }

    fn get_query(&self) -> Value {
        match self {
            NestedBuilder::FilterOnly(_) => json!({}),
            NestedBuilder::Full { queries, .. } => queries.get_query(),
        }
    }

    fn has_filter(&self) -> bool {
        match self {
            NestedBuilder::FilterOnly(filters) | NestedBuilder::Full { filters, .. } => {
                filters.has_filter()
            }
        }
    }

    fn get_filter(&self) -> Value {
        match self {
            NestedBuilder::FilterOnly(filters) | NestedBuilder::Full { filters, .. } => {
                filters.get_filter()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selection() {
        assert!(NestedBuilder::for_clause(BoolContext::query(), false).accepts_queries());
        assert!(NestedBuilder::for_clause(BoolContext::query(), true).accepts_queries());
        assert!(NestedBuilder::for_clause(BoolContext::filter(), true).accepts_queries());
        assert!(!NestedBuilder::for_clause(BoolContext::filter(), false).accepts_queries());
    }

    #[test]
    fn test_full_builder_keeps_both_sides() {
        let builder = NestedBuilder::for_clause(BoolContext::query(), false)
            .query("match", ("title", "rust"))
            .unwrap()
            .filter("term", ("lang", "en"));

        assert!(builder.has_query());
        assert!(builder.has_filter());
        assert_eq!(builder.get_query(), json!({"match": {"title": "rust"}}));
        assert_eq!(builder.get_filter(), json!({"term": {"lang": "en"}}));
    }

    #[test]
    fn test_and_variants_with_nested_callbacks() {
        let builder = NestedBuilder::for_clause(BoolContext::query(), false)
            .and_query_with("nested", ("path", "tags"), |tags| {
                tags.query("term", ("tags.name", "rust"))
            })
            .unwrap()
            .and_filter_with("bool", ClauseArgs::new(), |b| {
                Ok(b.or_filter("term", ("a", 1)).or_filter("term", ("a", 2)))
            })
            .unwrap();

        assert_eq!(
            builder.get_query(),
            json!({"nested": {"path": "tags", "query": {"term": {"tags.name": "rust"}}}})
        );
        assert_eq!(
            builder.get_filter(),
            json!({"bool": {"should": [{"term": {"a": 1}}, {"term": {"a": 2}}]}})
        );
    }

    #[test]
    fn test_filter_only_builder_rejects_nested_and_query() {
        let err = NestedBuilder::for_clause(BoolContext::filter(), false)
            .and_query_with("bool", ClauseArgs::new(), Ok)
            .unwrap_err();
        assert!(matches!(
            err,
            ComposeError::QueryInFilterContext { ref clause_type } if clause_type == "bool"
        ));
    }

    #[test]
    fn test_filter_only_builder_rejects_queries() {
        let err = NestedBuilder::for_clause(BoolContext::filter(), false)
            .or_query("term", ("a", 1))
            .unwrap_err();
        assert!(matches!(err, ComposeError::QueryInFilterContext { .. }));
    }

    #[test]
    fn test_filter_only_builder_reports_no_query() {
        let builder =
            NestedBuilder::for_clause(BoolContext::filter(), false).filter("term", ("a", 1));
        assert!(!builder.has_query());
        assert_eq!(builder.get_query(), json!({}));
        assert_eq!(builder.get_filter(), json!({"term": {"a": 1}}));
    }
}
