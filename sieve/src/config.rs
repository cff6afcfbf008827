//! Capability configuration: what an endpoint lets a query string do.
//!
//! Allow-lists are opt-in. A config with no `sortable_fields` and no
//! `filterable_fields` runs in open mode, where any field may be sorted or
//! filtered and every value stays a string.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::operator::Operator;
use crate::query::SortClause;
use crate::value::ValueType;
use crate::{Error, Result};

/// Page size applied when neither the query nor the config names one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a query may request unless the config raises it.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Per-endpoint capability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SieveConfig {
    /// Page size used when the query string omits `pageSize`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Hard cap on `pageSize`. Requests above it are clamped, not rejected.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Fields that may appear in `sorts`. `None` permits every field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable_fields: Option<HashSet<String>>,

    /// Sort applied when the query yields no usable sort clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortClause>,

    /// External field name to storage name, applied to surviving clauses.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_mappings: HashMap<String, String>,

    /// Fields that may appear in `filters`, with their allowed operators
    /// and declared value type. `None` permits every field with every
    /// operator, values untyped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable_fields: Option<Vec<FilterableField>>,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u64 {
    MAX_PAGE_SIZE
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            sortable_fields: None,
            default_sort: None,
            field_mappings: HashMap::new(),
            filterable_fields: None,
        }
    }
}

impl SieveConfig {
    /// Open-mode configuration with stock page sizing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a field may appear in sort clauses. Open mode permits all.
    pub fn is_sortable(&self, field: &str) -> bool {
        self.sortable_fields
            .as_ref()
            .is_none_or(|fields| fields.contains(field))
    }

    /// Storage-layer name for an external field, when a mapping exists.
    pub fn mapped_field(&self, field: &str) -> String {
        self.field_mappings
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Save the configuration as TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// One entry of the filterable-fields allow-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterableField {
    /// External field name as it appears in query strings.
    pub field: String,

    /// Operator tokens permitted for this field.
    pub operators: HashSet<Operator>,

    /// Declared value type, used to coerce raw values.
    #[serde(default)]
    pub value_type: ValueType,
}

impl FilterableField {
    pub fn new(
        field: impl Into<String>,
        operators: impl IntoIterator<Item = Operator>,
        value_type: ValueType,
    ) -> Self {
        Self {
            field: field.into(),
            operators: operators.into_iter().collect(),
            value_type,
        }
    }

    /// Whether an operator is in this field's allow set.
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.contains(&operator)
    }
}
