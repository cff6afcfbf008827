//! CLI command implementations.

use std::collections::HashMap;
use std::path::Path;

use sieve::{
    parse_query, parse_url_query, update_url, Error, FilterClause, FilterableField, Operator,
    ParseOutcome, QueryPatch, RawQuery, SieveConfig, SortClause, SortDirection, ValueType,
};

/// Load the capability configuration, or fall back to open mode.
fn load_config(path: Option<&str>) -> sieve::Result<SieveConfig> {
    match path {
        Some(path) => SieveConfig::load_from(Path::new(path)),
        None => Ok(SieveConfig::default()),
    }
}

/// Inputs with a `?` are URLs; everything else is a bare query string.
fn parse_input(input: &str, config: &SieveConfig) -> ParseOutcome {
    if input.contains('?') {
        parse_url_query(input, config)
    } else {
        parse_query(&RawQuery::from_query_string(input), config)
    }
}

/// Parse a query string or URL and print the outcome.
pub fn parse(input: &str, config_path: Option<&str>, format: &str) -> sieve::Result<()> {
    let config = load_config(config_path)?;
    let outcome = parse_input(input, &config);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
        }
        _ => {
            let query = &outcome.query;
            println!("Page:      {}", query.page);
            println!("Page size: {}", query.page_size);

            if query.sorts.is_empty() {
                println!("Sorts:     (none)");
            } else {
                println!("Sorts:");
                for sort in &query.sorts {
                    let direction = match sort.direction {
                        SortDirection::Asc => "asc",
                        SortDirection::Desc => "desc",
                    };
                    println!("  {} {}", sort.field, direction);
                }
            }

            if query.filters.is_empty() {
                println!("Filters:   (none)");
            } else {
                println!("Filters:");
                for filter in &query.filters {
                    println!("  {}", describe_filter(filter));
                }
            }

            if !outcome.errors.is_empty() {
                println!();
                println!("Errors:");
                for error in &outcome.errors {
                    println!("  - {}", error);
                }
            }
            if !outcome.warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &outcome.warnings {
                    println!("  - {}", warning);
                }
            }
        }
    }

    Ok(())
}

fn describe_filter(filter: &FilterClause) -> String {
    let mut out = format!("{} {}", filter.field, filter.operator.token());
    if !filter.value.is_null() {
        out.push(' ');
        out.push_str(&filter.value.to_string());
    }
    if filter.is_case_insensitive() {
        out.push_str("  (case-insensitive)");
    }
    out
}

/// Validate a query string or URL. Errors surface through the exit code.
pub fn check(input: &str, config_path: Option<&str>, quiet: bool) -> sieve::Result<()> {
    let config = load_config(config_path)?;
    let outcome = parse_input(input, &config);

    if !quiet {
        for warning in &outcome.warnings {
            eprintln!("Warning: {}", warning);
        }
    }

    let query = outcome.into_result()?;
    if !quiet {
        println!(
            "OK: page {} (size {}), {} sort(s), {} filter(s)",
            query.page,
            query.page_size,
            query.sorts.len(),
            query.filters.len()
        );
    }
    Ok(())
}

/// Merge flag-supplied changes into a URL's query parameters.
pub fn update(
    url: &str,
    config_path: Option<&str>,
    page: Option<u64>,
    page_size: Option<u64>,
    sorts: Option<&str>,
    filters: Option<&str>,
) -> sieve::Result<()> {
    let config = load_config(config_path)?;
    let mut patch = QueryPatch {
        page,
        page_size,
        ..Default::default()
    };

    // The --sorts and --filters flags speak the same micro-language as the
    // wire, so they go through the parser against the active config.
    if sorts.is_some() || filters.is_some() {
        let raw = RawQuery {
            sorts: sorts.map(str::to_string),
            filters: filters.map(str::to_string),
            ..Default::default()
        };
        let outcome = parse_query(&raw, &config);
        for warning in &outcome.warnings {
            eprintln!("Warning: {}", warning);
        }
        let parsed = outcome.into_result()?;
        if sorts.is_some() {
            patch.sorts = Some(parsed.sorts);
        }
        if filters.is_some() {
            patch.filters = Some(parsed.filters);
        }
    }

    println!("{}", update_url(url, &patch, &config));
    Ok(())
}

/// Write a starter capability configuration file.
pub fn init(path: &str, force: bool) -> sieve::Result<()> {
    let path = Path::new(path);
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    starter_config().save_to(path)?;
    println!("Wrote starter configuration to {}", path.display());
    println!("Try: svq parse \"sorts=-createdAt&filters=status==active\" --config {}", path.display());
    Ok(())
}

/// A representative catalog endpoint: sortable timestamps and price,
/// filterable status/price/name, camelCase mapped to snake_case.
fn starter_config() -> SieveConfig {
    SieveConfig {
        default_sort: Some(SortClause::desc("created_at")),
        sortable_fields: Some(
            ["createdAt", "price", "stock"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        field_mappings: HashMap::from([("createdAt".to_string(), "created_at".to_string())]),
        filterable_fields: Some(vec![
            FilterableField::new(
                "status",
                [Operator::Equals, Operator::NotEquals],
                ValueType::String,
            ),
            FilterableField::new(
                "price",
                [
                    Operator::GreaterThan,
                    Operator::GreaterOrEqual,
                    Operator::LessThan,
                    Operator::LessOrEqual,
                ],
                ValueType::Number,
            ),
            FilterableField::new(
                "name",
                [
                    Operator::Contains,
                    Operator::ContainsCi,
                    Operator::StartsWith,
                    Operator::StartsWithCi,
                ],
                ValueType::String,
            ),
        ]),
        ..Default::default()
    }
}

/// Print the operator grammar.
pub fn operators() -> sieve::Result<()> {
    println!("{:<8} {:<16} FLAGS", "TOKEN", "COMPARISON");
    println!("{}", "-".repeat(44));
    for op in Operator::all() {
        let mut flags = Vec::new();
        if op.is_negated() {
            flags.push("negated");
        }
        if op.is_case_insensitive() {
            flags.push("case-insensitive");
        }
        println!("{:<8} {:<16} {}", op.token(), op.comparison(), flags.join(", "));
    }
    Ok(())
}
