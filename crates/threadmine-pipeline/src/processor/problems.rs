//! Problem detection and per-problem heuristics.

use std::collections::{HashMap, HashSet};

use threadmine_core::Lexicon;

use crate::text::{normalize, TermCounter};
use crate::types::{ProblemStatement, TextOrigin};

const MIN_PROBLEM_CHARS: usize = 20;
const MAX_PROBLEM_CHARS: usize = 500;
const DOMAIN_HIT_THRESHOLD: usize = 2;
const SCORE_BASELINE: i64 = 5;
const DEFAULT_USER_ESTIMATE: u64 = 5_000;
const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_CHARS: usize = 4;
const DEDUP_PREFIX_CHARS: usize = 50;

pub(super) struct Span {
    text: String,
    origin: TextOrigin,
}

impl Span {
    pub(super) fn new(text: &str, origin: TextOrigin) -> Self {
        Self {
            text: text.to_string(),
            origin,
        }
    }
}

/// Returns the deduplicated problems and the number of candidates found
/// before deduplication.
pub(super) fn extract(spans: &[Span], lexicon: &Lexicon) -> (Vec<ProblemStatement>, usize) {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut candidates = 0;

    for span in spans {
        let normalized = normalize(&span.text);
        let counter = TermCounter::new(&normalized);
        if !counter.contains_any(&lexicon.problem_phrases) {
            continue;
        }

        let len = span.text.chars().count();
        if !(MIN_PROBLEM_CHARS..=MAX_PROBLEM_CHARS).contains(&len) {
            continue;
        }
        candidates += 1;

        let key: String = span
            .text
            .to_lowercase()
            .chars()
            .take(DEDUP_PREFIX_CHARS)
            .collect();
        if !seen.insert(key) {
            continue;
        }

        problems.push(ProblemStatement {
            text: span.text.clone(),
            severity: bounded_score(&counter, &lexicon.high_severity, &lexicon.low_severity),
            urgency: bounded_score(&counter, &lexicon.urgent, &lexicon.non_urgent),
            domain: classify_domain(&counter, lexicon),
            estimated_user_count: estimate_users(&counter, lexicon, span.origin),
            keywords: extract_keywords(&normalized, &lexicon.stop_words),
            origin: span.origin,
        });
    }

    (problems, candidates)
}

/// Baseline 5, +1 per raising term, -1 per lowering term, clamped to 1..=10.
fn bounded_score(counter: &TermCounter<'_>, raise: &[String], lower: &[String]) -> u8 {
    let up = i64::try_from(counter.count_all(raise)).unwrap_or(i64::MAX);
    let down = i64::try_from(counter.count_all(lower)).unwrap_or(i64::MAX);
    let score = SCORE_BASELINE.saturating_add(up).saturating_sub(down).clamp(1, 10);
    u8::try_from(score).unwrap_or(10)
}

/// First domain, in table order, with at least two keyword hits.
pub(super) fn classify_domain(counter: &TermCounter<'_>, lexicon: &Lexicon) -> String {
    lexicon
        .domains
        .iter()
        .find(|d| counter.count_all(&d.keywords) >= DOMAIN_HIT_THRESHOLD)
        .map_or_else(|| "general".to_string(), |d| d.name.clone())
}

fn estimate_users(counter: &TermCounter<'_>, lexicon: &Lexicon, origin: TextOrigin) -> u64 {
    let base = lexicon
        .scale_words
        .iter()
        .find(|s| counter.contains_any(&s.phrases))
        .map_or(DEFAULT_USER_ESTIMATE, |s| s.users);
    match origin {
        TextOrigin::Root => base,
        TextOrigin::Reply => base / 2,
    }
}

/// The five most frequent tokens longer than three chars; ties keep first
/// occurrence order.
pub(super) fn extract_keywords(normalized: &str, stop_words: &[String]) -> Vec<String> {
    let stripped: String = normalized
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in stripped.split_whitespace() {
        if word.chars().count() < MIN_KEYWORD_CHARS || stop_words.iter().any(|s| s == word) {
            continue;
        }
        let entry = counts.entry(word).or_insert(0);
        if *entry == 0 {
            order.push(word);
        }
        *entry += 1;
    }

    // `order` is first-occurrence order, and the sort is stable.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}
