//! Aggregation accumulation.

use serde_json::{Map, Value};

use crate::compose::{NestedResult, build_clause};
use crate::error::ComposeResult;
use crate::types::{ClauseArgs, Field};

use super::{FilterBuilder, NestedBuilder};

/// Accumulates named aggregations.
///
/// Each aggregation is stored as `{name: {type: {field, ...opts}}}`. An
/// unnamed aggregation is called `agg_<type>_<field>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationBuilder {
    aggregations: Map<String, Value>,
}

impl AggregationBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an aggregation under its default name.
    ///
    /// `field` is usually a field name; options go in its `opts`, where an
    /// `_meta` option is lifted out to the aggregation's `meta`.
    pub fn aggregation(self, agg_type: &str, field: impl Into<ClauseArgs>) -> Self {
        self.insert(agg_type, field.into(), None, Map::new())
    }

    /// Adds an aggregation under an explicit name.
    pub fn aggregation_named(
        self,
        agg_type: &str,
        field: impl Into<ClauseArgs>,
        name: &str,
    ) -> Self {
        self.insert(agg_type, field.into(), Some(name), Map::new())
    }

    /// Adds an aggregation with sub-aggregations or a filter built by a callback.
    pub fn aggregation_with<F>(
        self,
        agg_type: &str,
        field: impl Into<ClauseArgs>,
        name: Option<&str>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(SubAggregationBuilder) -> ComposeResult<SubAggregationBuilder>,
    {
        let result = nested(SubAggregationBuilder::default())?;

        let mut nested_clause = Map::new();
        if result.has_filter() {
            nested_clause.insert("filter".to_string(), result.get_filter());
        }
        if result.has_aggregations() {
            nested_clause.insert("aggs".to_string(), result.get_aggregations());
        }

        Ok(self.insert(agg_type, field.into(), name, nested_clause))
    }

    /// Returns true if any aggregation was added.
    pub fn has_aggregations(&self) -> bool {
        !self.aggregations.is_empty()
    }

    /// Returns all aggregations keyed by name.
    pub fn get_aggregations(&self) -> Value {
        Value::Object(self.aggregations.clone())
    }

    fn insert(
        mut self,
        agg_type: &str,
        mut args: ClauseArgs,
        name: Option<&str>,
        nested_clause: Map<String, Value>,
    ) -> Self {
        let name = match name {
            Some(name) => name.to_string(),
            None => default_name(agg_type, &args),
        };

        let meta = args.opts.remove("_meta");
        // Aggregation bodies never take a value, only a field.
        args.value = None;

        let mut inner = Map::new();
        inner.insert(agg_type.to_string(), build_clause(&args));
        if let Some(meta) = meta {
            inner.insert("meta".to_string(), meta);
        }
        inner.extend(nested_clause);

        tracing::trace!(name = %name, agg_type, "Adding aggregation");
        self.aggregations.insert(name, Value::Object(inner));
        self
    }
}

fn default_name(agg_type: &str, args: &ClauseArgs) -> String {
    match &args.field {
        Some(Field::Name(field)) => format!("agg_{}_{}", agg_type, field),
        _ => format!("agg_{}", agg_type),
    }
}

/// Builder handed to an aggregation callback: sub-aggregations plus filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubAggregationBuilder {
    aggregations: AggregationBuilder,
    filters: FilterBuilder,
}

impl SubAggregationBuilder {
    /// Adds a sub-aggregation under its default name.
    pub fn aggregation(mut self, agg_type: &str, field: impl Into<ClauseArgs>) -> Self {
        self.aggregations = self.aggregations.aggregation(agg_type, field);
        self
    }

    /// Adds a sub-aggregation under an explicit name.
    pub fn aggregation_named(
        mut self,
        agg_type: &str,
        field: impl Into<ClauseArgs>,
        name: &str,
    ) -> Self {
        self.aggregations = self.aggregations.aggregation_named(agg_type, field, name);
        self
    }

    /// Adds a sub-aggregation with its own nested callback.
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

    /// Adds a `must` filter clause, e.g. for a `filter` aggregation.
    pub fn filter(mut self, filter_type: &str, args: impl Into<ClauseArgs>) -> Self {
        self.filters = self.filters.filter(filter_type, args);
        self
    }

    /// Alias for [`SubAggregationBuilder::filter`].
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

    /// Alias for [`SubAggregationBuilder::filter_with`].
    pub fn and_filter_with<F, R>(
        mut self,
        filter_type: &str,
        args: impl Into<ClauseArgs>,
        nested: F,
    ) -> ComposeResult<Self>
    where
        F: FnOnce(NestedBuilder) -> ComposeResult<R>,
        R: NestedResult,
    {
        self.filters = self.filters.and_filter_with(filter_type, args, nested)?;
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
        self.filters = self
            .filters
            .filter_minimum_should_match(value, override_count);
        self
    }

    /// Returns true if any sub-aggregation was added.
    pub fn has_aggregations(&self) -> bool {
        self.aggregations.has_aggregations()
    }

    /// Returns the sub-aggregations keyed by name.
    pub fn get_aggregations(&self) -> Value {
        self.aggregations.get_aggregations()
    }

    /// Returns true if any filter clause was added.
    pub fn has_filter(&self) -> bool {
        self.filters.has_filter()
    }

    /// Returns the reduced filter.
    pub fn get_filter(&self) -> Value {
        self.filters.get_filter()
    }
}
