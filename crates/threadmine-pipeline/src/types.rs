use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use threadmine_core::{AppConfig, SortStrategy, SourceConfig};
use uuid::Uuid;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Discussion input
// ---------------------------------------------------------------------------

/// A reply under a root post, as returned by the discussion source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub score: i64,
    /// Epoch seconds.
    #[serde(default)]
    pub created_at: i64,
}

/// A root post plus the replies attached to it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    /// Name of the discussion source the thread came from.
    #[serde(default)]
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub upvote_ratio: f64,
    /// Epoch seconds.
    pub created_at: i64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

// ---------------------------------------------------------------------------
// Processing output
// ---------------------------------------------------------------------------

/// Where a sentence was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOrigin {
    Root,
    Reply,
}

/// One inferred pain point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatement {
    pub text: String,
    /// 1..=10
    pub severity: u8,
    /// 1..=10
    pub urgency: u8,
    pub domain: String,
    pub estimated_user_count: u64,
    pub keywords: Vec<String>,
    pub origin: TextOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingState {
    Hot,
    Rising,
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Frustrated,
    Excited,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub score: i64,
    pub reply_count: u32,
    pub upvote_ratio: f64,
    /// Score per hour of thread age.
    pub virality: f64,
    pub replies_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalContext {
    pub posted_at: DateTime<Utc>,
    pub age_hours: f64,
    pub trending: TrendingState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentContext {
    pub source_name: String,
    pub category: String,
    pub thread_id: String,
    pub author: String,
    pub permalink: String,
    pub url: String,
    pub engagement: Engagement,
    pub temporal: TemporalContext,
    pub sentiment: Sentiment,
    pub urgency_indicators: Vec<String>,
}

/// Sub-scores and their mean, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    pub readability: u8,
    pub specificity: u8,
    pub actionability: u8,
    pub authenticity: u8,
    pub overall: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub processed_at: DateTime<Utc>,
    pub processor_version: String,
    pub sentences_analyzed: usize,
    pub replies_analyzed: usize,
    pub candidates_found: usize,
}

/// Analysis of one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedContent {
    pub content_hash: String,
    pub problems: Vec<ProblemStatement>,
    pub context: ContentContext,
    pub quality: QualityScore,
    pub metadata: ProcessingMetadata,
}

// ---------------------------------------------------------------------------
// Generated ideas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaScoring {
    /// Sole rank key.
    pub overall: f64,
    pub pain_severity: f64,
    pub market_size: f64,
    pub competition: f64,
    pub implementation_difficulty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdea {
    pub name: String,
    pub elevator_pitch: String,
    pub target_audience: String,
    pub pain_point_solved: String,
    pub solution_approach: String,
    pub scoring: IdeaScoring,
    pub tags: Vec<String>,
    pub category: String,
    pub source_names: Vec<String>,
    pub source_links: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }
}

/// One category's batch handed to the idea generator.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub category: &'a str,
    pub content: &'a [ProcessedContent],
    pub config: &'a GenerationConfig,
    /// Idea quota for this category.
    pub max_ideas: usize,
}

/// Raw generator output. Ideas are validated before they are trusted.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub ideas: Vec<serde_json::Value>,
    pub tokens_used: u64,
    pub cost: f64,
}

// ---------------------------------------------------------------------------
// Run configuration and outcome
// ---------------------------------------------------------------------------

/// Parameters for one pipeline run. Not modified once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub sources: Vec<SourceConfig>,
    pub generation: GenerationConfig,
    pub max_ideas: usize,
    pub dedup_enabled: bool,
    /// Wall-clock budget for fetch, process, generate and persist.
    pub max_duration: Duration,
    /// Sleep between consecutive category generation calls.
    pub generation_delay: Duration,
    /// Keep ideas gathered before a timeout instead of discarding them.
    pub retain_partial_on_timeout: bool,
    pub reply_sort: SortStrategy,
}

impl PipelineConfig {
    #[must_use]
    pub fn new(sources: Vec<SourceConfig>) -> Self {
        Self {
            sources,
            generation: GenerationConfig::default(),
            max_ideas: 20,
            dedup_enabled: true,
            max_duration: Duration::from_secs(300),
            generation_delay: Duration::from_millis(1000),
            retain_partial_on_timeout: false,
            reply_sort: SortStrategy::Top,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig, sources: Vec<SourceConfig>) -> Self {
        Self {
            sources,
            generation: GenerationConfig {
                model: config.generation_model.clone(),
                temperature: config.generation_temperature,
                max_tokens: config.generation_max_tokens,
            },
            max_ideas: config.max_ideas,
            dedup_enabled: config.dedup_enabled,
            max_duration: Duration::from_secs(config.max_duration_secs),
            generation_delay: Duration::from_millis(config.generation_delay_ms),
            retain_partial_on_timeout: config.retain_partial_on_timeout,
            reply_sort: config.reply_sort,
        }
    }
}

/// Run stages in execution order. `Failed` sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Started,
    FetchingSources,
    Filtering,
    Deduplicating,
    ContentProcessing,
    Grouping,
    Generating,
    MergingRanking,
    Persisting,
    Completed,
    Failed,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineStage::Started => "started",
            PipelineStage::FetchingSources => "fetching_sources",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Deduplicating => "deduplicating",
            PipelineStage::ContentProcessing => "content_processing",
            PipelineStage::Grouping => "grouping",
            PipelineStage::Generating => "generating",
            PipelineStage::MergingRanking => "merging_ranking",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Completed => "completed",
            PipelineStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorKind {
    SourceFetch,
    Processing,
    Generation,
    Persistence,
    Timeout,
}

/// A recorded per-unit failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub kind: RunErrorKind,
    /// Source name, thread id or category the error belongs to.
    pub scope: Option<String>,
    pub message: String,
}

impl From<&PipelineError> for RunError {
    fn from(err: &PipelineError) -> Self {
        let (kind, scope) = match err {
            PipelineError::SourceFetch { source_name, .. } => {
                (RunErrorKind::SourceFetch, Some(source_name.clone()))
            }
            PipelineError::Processing { thread_id, .. } => {
                (RunErrorKind::Processing, Some(thread_id.clone()))
            }
            PipelineError::Generation { category, .. } => {
                (RunErrorKind::Generation, Some(category.clone()))
            }
            PipelineError::Persistence(_) => (RunErrorKind::Persistence, None),
            PipelineError::Timeout { .. } => (RunErrorKind::Timeout, None),
        };
        Self {
            kind,
            scope,
            message: err.to_string(),
        }
    }
}

/// Outcome of one run. Grows additively while the run executes.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub batch_id: Uuid,
    pub success: bool,
    pub stage: PipelineStage,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    pub sources_processed: usize,
    pub threads_fetched: usize,
    pub threads_processed: usize,
    pub threads_skipped_duplicate: usize,
    /// Ideas kept after ranking.
    pub ideas_generated: usize,
    /// Generated ideas that failed validation.
    pub ideas_rejected: usize,
    /// Storage writes that failed. Not mirrored in `errors`.
    pub persistence_failures: usize,
    pub tokens_used: u64,
    pub cost: f64,
    pub errors: Vec<RunError>,
    pub ideas: Vec<ProductIdea>,
}

impl PipelineResult {
    #[must_use]
    pub fn started(batch_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            batch_id,
            success: false,
            stage: PipelineStage::Started,
            started_at,
            completed_at: None,
            elapsed_ms: 0,
            sources_processed: 0,
            threads_fetched: 0,
            threads_processed: 0,
            threads_skipped_duplicate: 0,
            ideas_generated: 0,
            ideas_rejected: 0,
            persistence_failures: 0,
            tokens_used: 0,
            cost: 0.0,
            errors: Vec::new(),
            ideas: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, err: &PipelineError) {
        self.errors.push(RunError::from(err));
    }

    #[must_use]
    pub fn has_error(&self, kind: RunErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

/// Persisted summary of a run, without idea bodies.
#[derive(Debug, Clone, Serialize)]
pub struct RunLog {
    pub batch_id: Uuid,
    pub success: bool,
    pub stage: PipelineStage,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    pub sources_processed: usize,
    pub threads_processed: usize,
    pub ideas_generated: usize,
    pub tokens_used: u64,
    pub cost: f64,
    pub errors: Vec<RunError>,
}

impl From<&PipelineResult> for RunLog {
    fn from(result: &PipelineResult) -> Self {
        Self {
            batch_id: result.batch_id,
            success: result.success,
            stage: result.stage,
            started_at: result.started_at,
            completed_at: result.completed_at,
            elapsed_ms: result.elapsed_ms,
            sources_processed: result.sources_processed,
            threads_processed: result.threads_processed,
            ideas_generated: result.ideas_generated,
            tokens_used: result.tokens_used,
            cost: result.cost,
            errors: result.errors.clone(),
        }
    }
}

/// Dedup record written once a thread has been analysed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerprintRecord {
    /// Root-text fingerprint, the dedup key.
    pub fingerprint: String,
    /// Full fingerprint of title, body and leading replies.
    pub content_hash: String,
    pub thread_id: String,
    pub source_name: String,
    pub problem_count: usize,
    pub quality: u8,
    pub processed_at: DateTime<Utc>,
}
