//! Parsing raw query-string parameters into structured queries.
//!
//! Nothing here returns `Err`. Every failure becomes a [`ParseError`] or a
//! warning inside the [`ParseOutcome`], and the parts of the query that did
//! parse are kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SieveConfig;
use crate::error::ParseError;
use crate::operator::Operator;
use crate::query::{FilterClause, Query, SortClause, SortDirection};
use crate::value::{self, FilterValue};

/// Raw values of the four reserved query-string keys, percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sorts: Option<String>,
    pub filters: Option<String>,
}

impl RawQuery {
    /// Collect the reserved keys from decoded key/value pairs. The first
    /// occurrence of each key wins; everything else is ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = RawQuery::default();
        for (key, val) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "pageSize" => &mut raw.page_size,
                "sorts" => &mut raw.sorts,
                "filters" => &mut raw.filters,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(val.into());
            }
        }
        raw
    }

    /// Decode a raw query string (without the leading `?`).
    pub fn from_query_string(query: &str) -> Self {
        Self::from_pairs(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
    }

    /// True when none of the reserved keys were present.
    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.page_size.is_none()
            && self.sorts.is_none()
            && self.filters.is_none()
    }
}

/// Everything a parse produced: the best-effort query plus the errors and
/// warnings collected along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub query: Query,

    /// Hard failures. Any entry means the request should be rejected.
    pub errors: Vec<ParseError>,

    /// Clauses dropped by an allow-list. Parsing continued without them.
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    /// True when no errors were collected. Warnings do not count.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The parsed query, or an [`Error::InvalidQuery`](crate::Error)
    /// carrying every collected error.
    pub fn into_result(self) -> crate::Result<Query> {
        if self.errors.is_empty() {
            Ok(self.query)
        } else {
            Err(crate::Error::InvalidQuery(self.errors))
        }
    }
}

/// Parse raw parameters against a capability configuration.
pub fn parse_query(raw: &RawQuery, config: &SieveConfig) -> ParseOutcome {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let (page, page_size) = parse_pagination(raw, config, &mut errors);
    let sorts = parse_sorts(raw.sorts.as_deref(), config, &mut warnings);
    let filters = parse_filters(raw.filters.as_deref(), config, &mut errors, &mut warnings);

    debug!(
        page,
        page_size,
        sorts = sorts.len(),
        filters = filters.len(),
        errors = errors.len(),
        warnings = warnings.len(),
        "parsed query parameters"
    );

    ParseOutcome {
        query: Query {
            page,
            page_size,
            sorts,
            filters,
        },
        errors,
        warnings,
    }
}

/// Collect the reserved keys from decoded pairs, then parse.
pub fn parse_pairs<I, K, V>(pairs: I, config: &SieveConfig) -> ParseOutcome
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    parse_query(&RawQuery::from_pairs(pairs), config)
}

fn parse_pagination(
    raw: &RawQuery,
    config: &SieveConfig,
    errors: &mut Vec<ParseError>,
) -> (u64, u64) {
    let page = match raw.page.as_deref() {
        None => 1,
        Some(s) => match parse_truncated(s) {
            Some(n) if n >= 1 => n as u64,
            _ => {
                errors.push(ParseError::invalid_pagination(
                    "page",
                    format!("Invalid page value '{s}'. Pages are numbered from 1."),
                ));
                1
            }
        },
    };

    let page_size = match raw.page_size.as_deref() {
        None => config.default_page_size,
        Some(s) => match parse_truncated(s) {
            Some(n) if n >= 1 => (n as u64).min(config.max_page_size),
            _ => {
                errors.push(ParseError::invalid_pagination(
                    "pageSize",
                    format!("Invalid pageSize value '{s}'. Page sizes start at 1."),
                ));
                config.default_page_size
            }
        },
    };

    (page, page_size)
}

/// Truncating integer parse: `1.5` parses as 1, `abc` as nothing.
fn parse_truncated(s: &str) -> Option<i64> {
    let n = s.trim().parse::<f64>().ok()?;
    if !n.is_finite() {
        return None;
    }
    Some(n.trunc() as i64)
}

fn parse_sorts(
    raw: Option<&str>,
    config: &SieveConfig,
    warnings: &mut Vec<String>,
) -> Vec<SortClause> {
    let mut sorts = Vec::new();

    if let Some(raw) = raw {
        for token in raw.split(',') {
            let token = token.trim();
            let (field, direction) = match token.strip_prefix('-') {
                Some(rest) => (rest.trim(), SortDirection::Desc),
                None => (token, SortDirection::Asc),
            };
            if field.is_empty() {
                continue;
            }
            if !config.is_sortable(field) {
                debug!(field, "dropping unsortable field");
                warnings.push(format!("Field '{field}' is not sortable. Ignored."));
                continue;
            }
            sorts.push(SortClause {
                field: config.mapped_field(field),
                direction,
            });
        }
    }

    if sorts.is_empty() {
        if let Some(default) = &config.default_sort {
            sorts.push(default.clone());
        }
    }

    sorts
}

fn parse_filters(
    raw: Option<&str>,
    config: &SieveConfig,
    errors: &mut Vec<ParseError>,
    warnings: &mut Vec<String>,
) -> Vec<FilterClause> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut filters = Vec::new();
    for expr in value::split_escaped(raw) {
        if expr.is_empty() {
            continue;
        }

        let Some((at, operator)) = Operator::find_in(expr) else {
            errors.push(ParseError::invalid_filter(
                None,
                format!("No valid operator found in filter: {expr}"),
            ));
            continue;
        };

        // Fields and values are taken verbatim: no trimming.
        let field = &expr[..at];
        let raw_value = value::unescape_commas(&expr[at + operator.token().len()..]);

        let mut declared_type = None;
        if let Some(allowed) = &config.filterable_fields {
            match allowed.iter().find(|f| f.field == field) {
                None => {
                    debug!(field, "dropping unfilterable field");
                    warnings.push(format!("Field '{field}' is not filterable. Ignored."));
                    continue;
                }
                Some(entry) => {
                    if !entry.allows(operator) {
                        errors.push(ParseError::invalid_filter(
                            Some(field),
                            format!(
                                "Operator '{operator}' is not allowed for filter field '{field}'."
                            ),
                        ));
                        continue;
                    }
                    declared_type = Some(entry.value_type);
                }
            }
        }

        let val = if operator.is_null_comparison() {
            FilterValue::Null
        } else {
            match declared_type {
                Some(ty) => match FilterValue::coerce(raw_value, ty) {
                    Ok(v) => v,
                    Err(bad) => {
                        errors.push(ParseError::invalid_filter(
                            Some(field),
                            format!("Invalid numeric value '{bad}' for filter field '{field}'."),
                        ));
                        continue;
                    }
                },
                None => FilterValue::Str(raw_value),
            }
        };

        filters.push(FilterClause {
            field: config.mapped_field(field),
            operator,
            value: val,
        });
    }

    filters
}
