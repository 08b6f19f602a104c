//! Request body builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::compose::{self, NestedResult};
use crate::config::{ComposerConfig, DslVersion};
use crate::error::ComposeResult;
use crate::types::ClauseArgs;

use super::{
    AggregationBuilder, FilterBuilder, NestedBuilder, QueryBuilder, SubAggregationBuilder,
};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Returns the wire name of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Builds a complete search request body.
///
/// Queries, filters and aggregations accumulate independently and are only
/// merged when [`BodyBuilder::build`] is called. Building never consumes or
/// changes the builder, so a partially built body can be built repeatedly
/// and extended further.
#[derive(Debug, Clone, Default)]
pub struct BodyBuilder {
    body: Map<String, Value>,
    queries: QueryBuilder,
    filters: FilterBuilder,
    aggregations: AggregationBuilder,
    config: ComposerConfig,
}

impl BodyBuilder {
    /// Creates an empty builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with the given configuration.
    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Starts from an existing body. Non-object values start from an empty body.
    pub fn from_body(body: Value) -> Self {
        let body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            body,
            ..Default::default()
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Adds a `must` query clause.
    pub fn query(mut self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.queries = self.queries.query(query_type, args);
        self
    }

    /// Alias for [`BodyBuilder::query`].
    pub fn and_query(mut self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.queries = self.queries.and_query(query_type, args);
        self
    }

    /// Adds a `should` query clause.
    pub fn or_query(mut self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.queries = self.queries.or_query(query_type, args);
        self
    }

    /// Adds a `must_not` query clause.
    pub fn not_query(mut self, query_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.queries = self.queries.not_query(query_type, args);
        self
    }

    /// Adds a `must` query clause completed by a nested callback.
    pub fn query_with<F, R>(
        mut self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.queries = self.queries.query_with(query_type, args, nested)?;
        Ok(self)
    }

    /// Adds a `should` query clause completed by a nested callback.
    pub fn or_query_with<F, R>(
        mut self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.queries = self.queries.or_query_with(query_type, args, nested)?;
        Ok(self)
    }

    /// Adds a `must_not` query clause completed by a nested callback.
    pub fn not_query_with<F, R>(
        mut self,
        query_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.queries = self.queries.not_query_with(query_type, args, nested)?;
        Ok(self)
    }

    /// Sets `minimum_should_match` for the query.
    pub fn query_minimum_should_match(
        mut self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> Self {
        self.queries = self.queries.query_minimum_should_match(value, override_count);
        self
    }

    /// Returns true if any query clause was added.
    pub fn has_query(&self) -> bool {
        self.queries.has_query()
    }

    /// Returns the reduced query, or `{}`.
    pub fn get_query(&self) -> Value {
        self.queries.get_query()
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    /// Adds a `must` filter clause.
    pub fn filter(mut self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.filters = self.filters.filter(filter_type, args);
        self
    }

    /// Alias for [`BodyBuilder::filter`].
    pub fn and_filter(mut self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.filters = self.filters.and_filter(filter_type, args);
        self
    }

    /// Adds a `should` filter clause.
    pub fn or_filter(mut self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.filters = self.filters.or_filter(filter_type, args);
        self
    }

    /// Adds a `must_not` filter clause.
    pub fn not_filter(mut self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.filters = self.filters.not_filter(filter_type, args);
        self
    }

    /// Adds a `must` filter clause completed by a nested callback.
    pub fn filter_with<F, R>(
        mut self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.filters = self.filters.filter_with(filter_type, args, nested)?;
        Ok(self)
    }

    /// Adds a `should` filter clause completed by a nested callback.
    pub fn or_filter_with<F, R>(
        mut self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.filters = self.filters.or_filter_with(filter_type, args, nested)?;
        Ok(self)
    }

    /// Adds a `must_not` filter clause completed by a nested callback.
    pub fn not_filter_with<F, R>(
        mut self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.filters = self.filters.not_filter_with(filter_type, args, nested)?;
        Ok(self)
    }

    /// Sets `minimum_should_match` for the filter.
    pub fn filter_minimum_should_match(
        mut self,
        value: impl Into<Value>,
        override_count: bool,
    ) -> Self {
        self.filters = self.filters.filter_minimum_should_match(value, override_count);
        self
    }

    /// Returns true if any filter clause was added.
    pub fn has_filter(&self) -> bool {
        self.filters.has_filter()
    }

    /// Returns the reduced filter, or `{}`.
    pub fn get_filter(&self) -> Value {
        self.filters.get_filter()
    }

    // ------------------------------------------------------------------------
    // Aggregations
    // ------------------------------------------------------------------------

    /// Adds an aggregation under its default name `agg_<type>_<field>`.
    pub fn aggregation(mut self, agg_type: &str, field: impl Into<ClauseArgs>) -> Self {
        self.aggregations = self.aggregations.aggregation(agg_type, field);
        self
    }

    /// Adds an aggregation under an explicit name.
    pub fn aggregation_named(
        mut self,
        agg_type: &str,
        field: impl Into<ClauseArgs>,
        name: &str,
    ) -> Self {
        self.aggregations = self.aggregations.aggregation_named(agg_type, field, name);
        self
    }

    /// Adds an aggregation with sub-aggregations or a filter built by a callback.
    pub fn aggregation_with<F>(
        mut self,
        agg_type: &str,
        field: impl Into<ClauseArgs>,
        name: Option<&str>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(SubAggregationBuilder) -> ComposeResult<SubAggregationBuilder>,
    {
        self.aggregations = self
            .aggregations
            .aggregation_with(agg_type, field, name, nested)?;
        Ok(self)
    }

    /// Returns true if any aggregation was added.
    pub fn has_aggregations(&self) -> bool {
        self.aggregations.has_aggregations()
    }

    /// Returns all aggregations keyed by name.
    pub fn get_aggregations(&self) -> Value {
        self.aggregations.get_aggregations()
    }

    // ------------------------------------------------------------------------
    // Body options
    // ------------------------------------------------------------------------

    /// Sorts by `field`. Sorting again by the same field replaces its entry.
    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        let entry = json!({ field: { "order": order.as_str() } });
        let sorts = self
            .body
            .entry("sort")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !sorts.is_array() {
            *sorts = Value::Array(Vec::new());
        }
        if let Value::Array(items) = sorts {
            match items.iter_mut().find(|item| item.get(field).is_some()) {
                Some(existing) => *existing = entry,
                None => items.push(entry),
            }
        }
        self
    }

    /// Sets the offset of the first hit.
    pub fn from(mut self, from: u64) -> Self {
        self.body.insert("from".to_string(), json!(from));
        self
    }

    /// Sets the number of hits to return.
    pub fn size(mut self, size: u64) -> Self {
        self.body.insert("size".to_string(), json!(size));
        self
    }

    /// Sets an arbitrary top-level body option, e.g. `_source` or `track_total_hits`.
    pub fn raw_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    // ------------------------------------------------------------------------
    // Assembly
    // ------------------------------------------------------------------------

    /// Builds the body in the configured wire format.
    pub fn build(&self) -> Value {
        match self.config.dsl_version {
            DslVersion::Current => self.build_current(),
            DslVersion::V1 => self.build_v1(),
        }
    }

    /// Builds the body in the current `query.bool.filter` format.
    pub fn build_current(&self) -> Value {
        tracing::debug!(
            queries = self.has_query(),
            filters = self.has_filter(),
            aggregations = self.has_aggregations(),
            "Building request body"
        );
        compose::build(
            &Value::Object(self.body.clone()),
            &self.get_query(),
            &self.get_filter(),
            &self.get_aggregations(),
        )
    }

    /// Builds the body in the legacy `query.filtered` format.
    pub fn build_v1(&self) -> Value {
        tracing::debug!(
            queries = self.has_query(),
            filters = self.has_filter(),
            aggregations = self.has_aggregations(),
            "Building legacy request body"
        );
        compose::build_v1(
            &Value::Object(self.body.clone()),
            &self.get_query(),
            &self.get_filter(),
            &self.get_aggregations(),
        )
    }
}
