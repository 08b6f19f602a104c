//! Composer configuration.
//!
//! # Example
//!
//! ```
//! use helios_bool_query::config::{ComposerConfig, DslVersion};
//!
//! let config = ComposerConfig::from_json_str(r#"{ "dsl_version": "v1" }"#).unwrap();
//! assert_eq!(config.dsl_version, DslVersion::V1);
//!
//! assert_eq!(ComposerConfig::default().dsl_version, DslVersion::Current);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, ComposeResult};

/// Query DSL wire format produced by [`BodyBuilder::build`](crate::BodyBuilder::build).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DslVersion {
    /// `query.bool.filter` layout with aggregations under `aggs`.
    #[default]
    Current,
    /// Legacy `query.filtered` layout with aggregations under `aggregations`.
    V1,
}

/// Configuration for body assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Wire format to assemble (default: `current`).
    #[serde(default)]
    pub dsl_version: DslVersion,
}

impl ComposerConfig {
    /// Parses a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> ComposeResult<Self> {
        serde_json::from_str(json).map_err(|e| ComposeError::InvalidConfig {
            message: e.to_string(),
        })
    }
}
