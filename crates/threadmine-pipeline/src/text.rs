//! Text normalization and lexicon term matching.

/// Lower-case, unify curly apostrophes and collapse whitespace runs.
pub(crate) fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split normalized text into word tokens (alphanumerics and inner apostrophes).
pub(crate) fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Sentence-like spans split on `.`, `!` and `?`, trimmed, empties removed.
pub(crate) fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_single_token(term: &str) -> bool {
    term.chars().all(|c| c.is_alphanumeric() || c == '\'')
}

/// Counts lexicon terms in one piece of text.
///
/// Single-word terms match whole tokens. Anything else (multi-word phrases,
/// hyphenated terms) matches as a substring bounded by non-alphanumerics.
pub(crate) struct TermCounter<'a> {
    normalized: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> TermCounter<'a> {
    pub(crate) fn new(normalized: &'a str) -> Self {
        Self {
            normalized,
            tokens: tokenize(normalized),
        }
    }

    pub(crate) fn count(&self, term: &str) -> usize {
        if term.is_empty() {
            return 0;
        }
        if is_single_token(term) {
            return self.tokens.iter().filter(|t| **t == term).count();
        }
        self.count_phrase(term)
    }

    fn count_phrase(&self, phrase: &str) -> usize {
        let bytes = self.normalized.as_bytes();
        let mut count = 0;
        let mut next_allowed = 0;
        for (start, _) in self.normalized.match_indices(phrase) {
            if start < next_allowed {
                continue;
            }
            let end = start + phrase.len();
            let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
            let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
            if before_ok && after_ok {
                count += 1;
                next_allowed = end;
            }
        }
        count
    }

    pub(crate) fn count_all(&self, terms: &[String]) -> usize {
        terms.iter().map(|t| self.count(t)).sum()
    }

    pub(crate) fn contains_any(&self, terms: &[String]) -> bool {
        terms.iter().any(|t| self.count(t) > 0)
    }

    /// Terms present at least once, in table order, without repeats.
    pub(crate) fn matching(&self, terms: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for term in terms {
            if self.count(term) > 0 && !found.contains(term) {
                found.push(term.clone());
            }
        }
        found
    }
}
