//! Canonical query-string rendering.
//!
//! Serialization is minimal: any component that still holds its default is
//! omitted, so a fully-default query renders as the empty string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::query::{FilterClause, Query, SortDirection};
use crate::value::{self, FilterValue};

/// Characters left verbatim when encoding the `filters` value: the RFC 3986
/// unreserved set. Everything else, operator punctuation included, is
/// percent-encoded so the whole list travels as one query-string value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

impl Query {
    /// Render the canonical query string against a default page size:
    /// `page` is omitted at 1, `pageSize` when equal to the default, and
    /// `sorts`/`filters` when empty.
    pub fn to_query_string_with(&self, default_page_size: u64) -> String {
        let mut parts = Vec::new();

        if self.page != 1 {
            parts.push(format!("page={}", self.page));
        }
        if self.page_size != default_page_size {
            parts.push(format!("pageSize={}", self.page_size));
        }
        if !self.sorts.is_empty() {
            let tokens: Vec<String> = self
                .sorts
                .iter()
                .map(|s| match s.direction {
                    SortDirection::Asc => s.field.clone(),
                    SortDirection::Desc => format!("-{}", s.field),
                })
                .collect();
            parts.push(format!("sorts={}", tokens.join(",")));
        }
        if !self.filters.is_empty() {
            let exprs: Vec<String> = self.filters.iter().map(render_filter).collect();
            let joined = exprs.join(",");
            parts.push(format!(
                "filters={}",
                utf8_percent_encode(&joined, QUERY_VALUE)
            ));
        }

        parts.join("&")
    }

    /// [`to_query_string_with`](Query::to_query_string_with) against the
    /// stock default page size of 20.
    pub fn to_query_string(&self) -> String {
        self.to_query_string_with(DEFAULT_PAGE_SIZE)
    }
}

fn render_filter(clause: &FilterClause) -> String {
    let rendered = match &clause.value {
        FilterValue::Str(s) => value::escape_commas(s),
        other => other.to_string(),
    };
    format!("{}{}{}", clause.field, clause.operator.token(), rendered)
}
