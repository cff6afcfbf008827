//! Query micro-language for collection endpoints.
//!
//! # Syntax Overview
//!
//! Four reserved query-string keys: `page`, `pageSize`, `sorts`, `filters`.
//!
//! - **Pagination**: `page=2&pageSize=50` (1-based, size clamped to a cap)
//! - **Sorts**: `sorts=-createdAt,price` (comma list, `-` prefix = descending)
//! - **Filters**: `filters=name@=Test\, Inc.,price>=10` (comma list of
//!   `field<op>value` expressions, `\,` escapes a literal comma)
//! - **Operators**: `==`, `!=`, `>`, `<`, `>=`, `<=`, `@=`, `_=`, `_-=`,
//!   their negated `!` forms, `==null`/`!=null`, and the `*` spellings
//!   `@=*`/`_=*`
//!
//! Parsing never throws: problems collect in a [`ParseOutcome`] alongside
//! the best-effort [`Query`].

mod parser;
mod serializer;
pub mod url;

pub use parser::{parse_pairs, parse_query, ParseOutcome, RawQuery};


use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::operator::{Comparison, Operator};
use crate::value::FilterValue;

/// A parsed, validated collection query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// 1-based page number.
    pub page: u64,

    /// Items per page, already clamped to the configured cap.
    pub page_size: u64,

    /// Sort clauses, primary first.
    pub sorts: Vec<SortClause>,

    /// Filter clauses in input order. A field may appear more than once.
    pub filters: Vec<FilterClause>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sorts: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl Query {
    /// True when every component still holds its stock default.
    pub fn is_default(&self) -> bool {
        *self == Query::default()
    }

    /// Items to skip for storage layers that speak offset/limit.
    /// Saturates instead of overflowing when the page number is enormous.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Items to fetch for storage layers that speak offset/limit.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Number of pages a collection of `total_items` spans.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.page_size.max(1))
    }

    /// Whether a page precedes this one.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a page follows this one in a collection of `total_items`.
    pub fn has_next(&self, total_items: u64) -> bool {
        self.page < self.total_pages(total_items)
    }

    /// Apply a partial update, producing a new query. Present patch fields
    /// replace the current value wholesale; sequences are never merged
    /// element-wise.
    pub fn merge(&self, patch: &QueryPatch) -> Query {
        Query {
            page: patch.page.unwrap_or(self.page),
            page_size: patch.page_size.unwrap_or(self.page_size),
            sorts: patch.sorts.clone().unwrap_or_else(|| self.sorts.clone()),
            filters: patch
                .filters
                .clone()
                .unwrap_or_else(|| self.filters.clone()),
        }
    }
}

/// One sort instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    /// Field to sort by (the storage name once mappings are applied).
    pub field: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}

/// One filter instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field to filter on (the storage name once mappings are applied).
    pub field: String,

    /// The operator token exactly as written; `@=*` round-trips as `@=*`.
    pub operator: Operator,

    /// Typed value. Always `Null` for `==null` and `!=null`.
    pub value: FilterValue,
}

impl FilterClause {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Comparison semantics of the operator.
    pub fn comparison(&self) -> Comparison {
        self.operator.comparison()
    }

    /// True when the operator negates its comparison.
    pub fn is_negated(&self) -> bool {
        self.operator.is_negated()
    }

    /// True for the contains/starts-with/ends-with family.
    pub fn is_case_insensitive(&self) -> bool {
        self.operator.is_case_insensitive()
    }
}

/// A partial query. `None` fields keep the current value on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPatch {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sorts: Option<Vec<SortClause>>,
    pub filters: Option<Vec<FilterClause>>,
}

impl QueryPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.page_size.is_none()
            && self.sorts.is_none()
            && self.filters.is_none()
    }
}
