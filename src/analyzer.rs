//! Lexical table-reference scan.
//!
//! Finds the identifiers that follow `FROM` and `JOIN` so the store can warm
//! exactly those tables before the query reaches the engine. This is a
//! best-effort heuristic: subqueries, CTE names, comments and string literals
//! can all produce extra or missing matches. Extra matches are skipped by the
//! engine when they are not cataloged; missing ones surface as a query error
//! from the embedded engine.

use std::sync::LazyLock;

use regex::Regex;

static TABLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:from|join)\s+"?([a-z0-9_]+)"?"#).unwrap());

/// Table names referenced by `sql`, lower-cased, in order of appearance.
///
/// Duplicates are preserved.
pub fn required_tables(sql: &str) -> Vec<String> {
    let lowered = sql.to_lowercase();
    TABLE_REFERENCE
        .captures_iter(&lowered)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
