use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::{Dependency, Locator};

/// The revisions API models Go modules as git repositories.
const GO_FETCHER: &str = "go";
const GIT_FETCHER: &str = "git";

/// Bytes escaped in a query value: everything but `A-Z a-z 0-9 - _ . ~`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Canonical locator string the revisions API expects for `dep`.
///
/// The dependency itself is never modified; the fetcher rewrite happens on a copy.
pub fn canonical(dep: &Dependency) -> String {
    if dep.locator.fetcher == GO_FETCHER {
        Locator {
            fetcher: GIT_FETCHER.to_string(),
            ..dep.locator.clone()
        }
        .to_string()
    } else {
        dep.locator.to_string()
    }
}

/// Query-escaped locator token, or `None` for unresolved dependencies.
pub fn encode(dep: &Dependency) -> Option<String> {
    if !dep.resolved {
        return None;
    }
    Some(query_escape(&canonical(dep)))
}

/// Escape `value` for a query string, with spaces written as `+`.
pub fn query_escape(value: &str) -> String {
    // '%' itself is escaped to "%25", so "%20" only ever comes from a space.
    utf8_percent_encode(value, QUERY_VALUE)
        .to_string()
        .replace("%20", "+")
}
