//! Core types shared by the composition functions and the builders.
//!
//! Clauses are plain [`serde_json::Value`]s. The composition engine treats
//! them as opaque except for the reserved keys it injects itself
//! (`query`, `filter`, `must`, `bool`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single query clause, e.g. `{"term": {"user": "kimchy"}}`.
pub type Clause = Value;

/// The field part of a clause's arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A field name, e.g. `"user"`.
    Name(String),
    /// A pre-built clause, e.g. `{"term": {"user": "kimchy"}}`.
    Clause(Map<String, Value>),
}

/// The field/value/options triple a leaf clause is built from.
///
/// Any part may be absent. Absence is the only special case: a present
/// `false` or `0` value is still a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseArgs {
    /// Field name or pre-built clause.
    pub field: Option<Field>,
    /// Value placed under the field name.
    pub value: Option<Value>,
    /// Options merged over the clause; these keys win on conflict.
    pub opts: Map<String, Value>,
}

impl ClauseArgs {
    /// Creates empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments naming a field with no value, e.g. for `exists`.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field: Some(Field::Name(name.into())),
            ..Default::default()
        }
    }

    /// Arguments with a field name and a value.
    pub fn field_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: Some(Field::Name(name.into())),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Arguments wrapping a pre-built clause.
    ///
    /// Non-object values are not clauses and leave the field absent.
    pub fn clause(clause: Value) -> Self {
        let field = match clause {
            Value::Object(map) => Some(Field::Clause(map)),
            _ => None,
        };
        Self {
            field,
            ..Default::default()
        }
    }

    /// Merges the keys of `opts` into the options. Non-object values are ignored.
    pub fn with_opts(mut self, opts: Value) -> Self {
        if let Value::Object(map) = opts {
            self.opts.extend(map);
        }
        self
    }

    /// Sets a single option.
    pub fn with_opt(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.opts.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for ClauseArgs {
    fn from(name: &str) -> Self {
        ClauseArgs::field(name)
    }
}

impl From<String> for ClauseArgs {
    fn from(name: String) -> Self {
        ClauseArgs::field(name)
    }
}

impl From<Value> for ClauseArgs {
    fn from(clause: Value) -> Self {
        ClauseArgs::clause(clause)
    }
}

impl<V: Into<Value>> From<(&str, V)> for ClauseArgs {
    fn from((name, value): (&str, V)) -> Self {
        ClauseArgs::field_value(name, value)
    }
}

impl<V: Into<Value>> From<(&str, V, Value)> for ClauseArgs {
    fn from((name, value, opts): (&str, V, Value)) -> Self {
        ClauseArgs::field_value(name, value).with_opts(opts)
    }
}

/// The boolean role of a clause bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolKey {
    /// Emitted as `must`.
    And,
    /// Emitted as `should`.
    Or,
    /// Emitted as `must_not`.
    Not,
}

impl BoolKey {
    /// The key this bucket is emitted under inside a `bool` clause.
    pub fn bool_clause_key(&self) -> &'static str {
        match self {
            BoolKey::And => "must",
            BoolKey::Or => "should",
            BoolKey::Not => "must_not",
        }
    }
}

/// The three clause buckets of one boolean accumulation plus its
/// `minimum_should_match` option.
///
/// All three buckets are always present, possibly empty. Insertion order is
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Clauses that must match.
    #[serde(default)]
    pub and: Vec<Clause>,
    /// Clauses of which some should match.
    #[serde(default)]
    pub or: Vec<Clause>,
    /// Clauses that must not match.
    #[serde(default)]
    pub not: Vec<Clause>,
    /// Only emitted when `or` holds more than one clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<Value>,
}

impl FilterSet {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for the given role.
    pub fn bucket(&self, key: BoolKey) -> &[Clause] {
        match key {
            BoolKey::And => &self.and,
            BoolKey::Or => &self.or,
            BoolKey::Not => &self.not,
        }
    }

    /// Appends a clause to the bucket for the given role.
    pub fn push(&mut self, key: BoolKey, clause: Clause) {
        match key {
            BoolKey::And => self.and.push(clause),
            BoolKey::Or => self.or.push(clause),
            BoolKey::Not => self.not.push(clause),
        }
    }

    /// Returns true if no bucket holds a clause.
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty() && self.not.is_empty()
    }
}

/// Whether clauses are currently being composed in filter context.
///
/// Passed explicitly through every push so each nesting level decides on
/// its own input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolContext {
    in_filter_context: bool,
}

impl BoolContext {
    /// Query context: clauses contribute to scoring.
    pub const fn query() -> Self {
        Self {
            in_filter_context: false,
        }
    }

    /// Filter context: clauses only decide match/no-match.
    pub const fn filter() -> Self {
        Self {
            in_filter_context: true,
        }
    }

    /// Returns true in filter context.
    pub fn is_in_filter_context(&self) -> bool {
        self.in_filter_context
    }
}
