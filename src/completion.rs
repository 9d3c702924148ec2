//! Tab completion for the interactive console.

use std::collections::BTreeSet;

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::store::{MetadataStore, StoreResult};

const KEYWORDS: &str = include_str!("../resources/completion.txt");

/// Bundled reserved keywords, lower-cased.
pub fn keywords() -> impl Iterator<Item = String> {
    KEYWORDS
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
}

/// Every table name, every column name and the bundled keywords,
/// lower-cased, sorted and deduplicated.
pub fn completion_candidates(store: &MetadataStore) -> StoreResult<Vec<String>> {
    let mut candidates = BTreeSet::new();
    for table in store.list_tables() {
        for column in store.list_columns(&table)? {
            candidates.insert(column.to_lowercase());
        }
        candidates.insert(table.to_lowercase());
    }
    candidates.extend(keywords());
    Ok(candidates.into_iter().collect())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// rustyline helper completing the word under the cursor.
#[derive(Debug, Clone, Default)]
pub struct QueryHelper {
    candidates: Vec<String>,
}

impl QueryHelper {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Start of the word ending at `pos` and the matching candidates.
    ///
    /// Matching ignores case; a word typed in upper case is completed in
    /// upper case.
    pub fn candidates_at(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = &line[..pos];
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| !is_word_char(*c))
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(0);
        let word = &head[start..];
        if word.is_empty() {
            return (pos, Vec::new());
        }

        let lowered = word.to_lowercase();
        let upper = word.chars().any(char::is_alphabetic)
            && word.chars().all(|c| !c.is_lowercase());
        let matches = self
            .candidates
            .iter()
            .filter(|candidate| candidate.starts_with(&lowered))
            .map(|candidate| {
                if upper {
                    candidate.to_uppercase()
                } else {
                    candidate.clone()
                }
            })
            .collect();
        (start, matches)
    }
}

impl Completer for QueryHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.candidates_at(line, pos))
    }
}

impl Hinter for QueryHelper {
    type Hint = String;
}

impl Highlighter for QueryHelper {}

impl Validator for QueryHelper {}

impl Helper for QueryHelper {}
