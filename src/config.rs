//! Group configuration documents and their loader.
//!
//! A group config is the JSON shape
//! `{ "filters": { "<id>": { "filter_data": ..., "weight": n, "priority": n } }, "version": "..." }`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::build::build_filter;
use crate::error::SiftError;
use crate::registry::Registry;
use crate::types::error::BuildError;
use crate::types::group::GroupFilter;

/// One rule entry in a group config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// The rule's nested-array form, as consumed by
    /// [`build_filter`](crate::build_filter).
    pub filter_data: Value,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub priority: i32,
}

/// A whole campaign/targeting configuration: rules keyed by id, plus an
/// opaque document version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub filters: HashMap<String, FilterConfig>,
    #[serde(default)]
    pub version: String,
}

impl GroupConfig {
    /// Parse a config document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError`] on malformed JSON.
    pub fn from_json(input: &str) -> Result<Self, SiftError> {
        let config = serde_json::from_str(input).map_err(BuildError::from)?;
        Ok(config)
    }

    /// Read and parse a config document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError`] on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, SiftError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }
}

/// Build a [`GroupFilter`] from a parsed config. Rules are added in sorted
/// id order, so identical documents produce identical groups.
///
/// # Errors
///
/// A rule that fails to build aborts the whole group, with the offending
/// rule's id attached.
pub fn build_group(
    registry: &Registry,
    config: &GroupConfig,
    batch: bool,
) -> Result<GroupFilter, BuildError> {
    let mut group = GroupFilter::new(batch);
    let mut ids: Vec<&String> = config.filters.keys().collect();
    ids.sort();
    for id in ids {
        let entry = &config.filters[id];
        let filter =
            build_filter(registry, &entry.filter_data).map_err(|source| BuildError::Filter {
                id: id.clone(),
                source: Box::new(source),
            })?;
        group.add(filter, id.clone(), entry.priority, entry.weight);
    }
    tracing::debug!(
        filters = group.len(),
        version = %config.version,
        "group config built"
    );
    Ok(group)
}
