//! Thread → [`ProcessedContent`] analysis. Pure: no I/O, deterministic for a
//! fixed clock.

mod context;
mod problems;
mod quality;

use chrono::{DateTime, Utc};
use threadmine_core::Lexicon;

use crate::error::PipelineError;
use crate::fingerprint::content_hash;
use crate::text::{normalize, split_sentences, TermCounter};
use crate::types::{ProcessedContent, ProcessingMetadata, Reply, TextOrigin, Thread};

use problems::Span;

pub const PROCESSOR_VERSION: &str = "1.0";

/// Shortest sentence span kept for problem detection (exclusive).
const MIN_SPAN_CHARS: usize = 10;

/// Which replies take part in problem extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorSettings {
    pub min_reply_score: i64,
    pub max_analyzed_replies: usize,
    /// Reply bodies must be longer than this (chars).
    pub min_reply_chars: usize,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            min_reply_score: 1,
            max_analyzed_replies: 10,
            min_reply_chars: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentProcessor {
    lexicon: Lexicon,
    settings: ProcessorSettings,
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::new(Lexicon::default())
    }
}

impl ContentProcessor {
    #[must_use]
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon: lexicon.normalized(),
            settings: ProcessorSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ProcessorSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn settings(&self) -> ProcessorSettings {
        self.settings
    }

    /// Analyse a thread against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Processing`] if the thread has no id or no text.
    /// A thread without problems is not an error.
    pub fn process(
        &self,
        thread: &Thread,
        category: &str,
    ) -> Result<ProcessedContent, PipelineError> {
        self.process_at(thread, category, Utc::now())
    }

    /// Analyse a thread as of `now`. Same input and `now` give the same output.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Processing`] if the thread has no id or no text.
    pub fn process_at(
        &self,
        thread: &Thread,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<ProcessedContent, PipelineError> {
        validate_thread(thread)?;

        let replies = self.analyzed_replies(thread);
        let spans = collect_spans(thread, &replies);

        let (problems, candidates_found) = problems::extract(&spans, &self.lexicon);

        let root_text = root_text(thread);
        let mut full_text = root_text.clone();
        for reply in &replies {
            full_text.push('\n');
            full_text.push_str(&reply.body);
        }
        let normalized = normalize(&full_text);
        let counter = TermCounter::new(&normalized);

        let context = context::build(thread, category, replies.len(), &counter, &self.lexicon, now);
        let quality = quality::score(&quality::QualityInputs {
            normalized: &normalized,
            counter: &counter,
            problems: &problems,
            body: &thread.body,
            thread_score: thread.score,
            lexicon: &self.lexicon,
        });

        tracing::debug!(
            thread_id = %thread.id,
            spans = spans.len(),
            candidates = candidates_found,
            problems = problems.len(),
            quality = quality.overall,
            "processed thread"
        );

        Ok(ProcessedContent {
            content_hash: content_hash(thread),
            problems,
            context,
            quality,
            metadata: ProcessingMetadata {
                processed_at: now,
                processor_version: PROCESSOR_VERSION.to_string(),
                sentences_analyzed: spans.len(),
                replies_analyzed: replies.len(),
                candidates_found,
            },
        })
    }

    fn analyzed_replies<'t>(&self, thread: &'t Thread) -> Vec<&'t Reply> {
        thread
            .replies
            .iter()
            .filter(|r| r.score >= self.settings.min_reply_score)
            .filter(|r| r.body.trim().chars().count() > self.settings.min_reply_chars)
            .take(self.settings.max_analyzed_replies)
            .collect()
    }
}

fn validate_thread(thread: &Thread) -> Result<(), PipelineError> {
    if thread.id.trim().is_empty() {
        return Err(PipelineError::Processing {
            thread_id: String::from("<missing>"),
            message: "thread has no id".to_string(),
        });
    }
    if thread.title.trim().is_empty() && thread.body.trim().is_empty() {
        return Err(PipelineError::Processing {
            thread_id: thread.id.clone(),
            message: "thread has neither title nor body".to_string(),
        });
    }
    Ok(())
}

fn root_text(thread: &Thread) -> String {
    format!("{}. {}", thread.title.trim(), thread.body.trim())
}

fn collect_spans(thread: &Thread, replies: &[&Reply]) -> Vec<Span> {
    let root = root_text(thread);
    let mut spans: Vec<Span> = split_sentences(&root)
        .filter(|s| s.chars().count() > MIN_SPAN_CHARS)
        .map(|s| Span::new(s, TextOrigin::Root))
        .collect();
    for reply in replies {
        spans.extend(
            split_sentences(&reply.body)
                .filter(|s| s.chars().count() > MIN_SPAN_CHARS)
                .map(|s| Span::new(s, TextOrigin::Reply)),
        );
    }
    spans
}
