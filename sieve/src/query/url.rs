//! URL-level helpers: read a query out of a URL, or rewrite one in place.
//!
//! Both helpers take absolute and relative URLs alike, so they work on the
//! strings an application actually holds: `https://api.test/items?page=2`
//! or just `/items?page=2`.

use url::form_urlencoded;

use crate::config::SieveConfig;
use crate::query::{parse_query, ParseOutcome, QueryPatch, RawQuery};

/// The query-string keys the micro-language owns.
const RESERVED_KEYS: [&str; 4] = ["page", "pageSize", "sorts", "filters"];

/// Parse the reserved parameters out of a URL. A URL without a query
/// component parses as an all-defaults query.
pub fn parse_url_query(url: &str, config: &SieveConfig) -> ParseOutcome {
    let raw = match query_component(url) {
        Some(q) => RawQuery::from_query_string(q),
        None => RawQuery::default(),
    };
    parse_query(&raw, config)
}

/// Rewrite a URL's reserved parameters by merging `patch` into whatever
/// query the URL already encodes. Every other query parameter is kept, in
/// its original order, ahead of the rewritten reserved ones.
///
/// When the merged query serializes to the empty string, the URL is
/// returned unchanged: an all-defaults patch never scrubs reserved keys
/// that were already spelled out.
pub fn update_url(base_url: &str, patch: &QueryPatch, config: &SieveConfig) -> String {
    let current = parse_url_query(base_url, config).query;
    let merged = current.merge(patch);
    let reserved = merged.to_query_string_with(config.default_page_size);
    if reserved.is_empty() {
        return base_url.to_string();
    }

    let existing = query_component(base_url).unwrap_or("");
    let mut keep = form_urlencoded::Serializer::new(String::new());
    for (key, val) in form_urlencoded::parse(existing.as_bytes()) {
        if !RESERVED_KEYS.contains(&key.as_ref()) {
            keep.append_pair(&key, &val);
        }
    }
    let keep = keep.finish();

    let query = if keep.is_empty() {
        reserved
    } else {
        format!("{keep}&{reserved}")
    };
    replace_query(base_url, &query)
}

/// The raw query component of an absolute or relative URL, fragment
/// excluded.
fn query_component(url: &str) -> Option<&str> {
    let without_fragment = match url.split_once('#') {
        Some((head, _)) => head,
        None => url,
    };
    without_fragment.split_once('?').map(|(_, query)| query)
}

/// Swap the query component of a URL, keeping the path and fragment.
fn replace_query(url: &str, query: &str) -> String {
    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let base = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(head, _)| head);

    match fragment {
        Some(frag) => format!("{base}?{query}#{frag}"),
        None => format!("{base}?{query}"),
    }
}
