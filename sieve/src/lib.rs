//! SIEVE: query-string micro-language for collection endpoints
//!
//! Parses `page`/`pageSize`/`sorts`/`filters` parameters into structured,
//! capability-checked queries, and serializes them back to canonical URLs.

pub mod config;
pub mod error;
pub mod operator;
pub mod query;
pub mod value;

pub use config::{FilterableField, SieveConfig, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use error::{Error, ParseError, Result};
pub use operator::{Comparison, Operator};
pub use query::url::{parse_url_query, update_url};
pub use query::{parse_pairs, parse_query, FilterClause, ParseOutcome, Query, QueryPatch, RawQuery, SortClause, SortDirection};
pub use value::{FilterValue, ValueType};
