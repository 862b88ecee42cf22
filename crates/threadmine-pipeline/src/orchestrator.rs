//! Pipeline run: fetch, filter, dedupe, process, generate, rank, persist.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use threadmine_core::SourceConfig;
use tokio::time::Instant;
use uuid::Uuid;

use crate::aggregator::rank_ideas;
use crate::collaborators::{IdeaGenerator, PipelineStore, ThreadSource};
use crate::error::{BoxError, PipelineError};
use crate::fingerprint::root_fingerprint;
use crate::processor::ContentProcessor;
use crate::types::{
    FingerprintRecord, GenerationRequest, PipelineConfig, PipelineResult, PipelineStage,
    ProcessedContent, RunLog, Thread,
};
use crate::validate::{validate_ideas, IdeaDefaults};

/// Replies at or below this many characters are dropped when fetched.
const MIN_FETCHED_REPLY_CHARS: usize = 20;

/// Runs the extraction and generation pipeline against injected collaborators.
pub struct PipelineOrchestrator {
    source: Arc<dyn ThreadSource>,
    generator: Arc<dyn IdeaGenerator>,
    store: Arc<dyn PipelineStore>,
    processor: ContentProcessor,
}

impl PipelineOrchestrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn ThreadSource>,
        generator: Arc<dyn IdeaGenerator>,
        store: Arc<dyn PipelineStore>,
        processor: ContentProcessor,
    ) -> Self {
        Self {
            source,
            generator,
            store,
            processor,
        }
    }

    /// Execute one run under `config.max_duration`.
    ///
    /// Never fails: per-unit errors are collected in [`PipelineResult::errors`]
    /// and only the timeout ends a run early. A zero budget counts as already
    /// expired. The run log is written after the budget, whatever the outcome.
    pub async fn run(&self, config: &PipelineConfig) -> PipelineResult {
        let clock = Instant::now();
        let mut result = PipelineResult::started(Uuid::new_v4(), Utc::now());
        let budget_ms = millis(config.max_duration.as_millis());

        tracing::info!(
            batch_id = %result.batch_id,
            sources = config.sources.len(),
            max_ideas = config.max_ideas,
            budget_ms,
            "pipeline run started"
        );

        let timed_out = if config.max_duration.is_zero() {
            true
        } else {
            tokio::time::timeout(config.max_duration, self.execute(config, &mut result))
                .await
                .is_err()
        };

        if timed_out {
            let err = PipelineError::Timeout { budget_ms };
            tracing::warn!(
                batch_id = %result.batch_id,
                stage = %result.stage,
                retain_partial = config.retain_partial_on_timeout,
                error = %err,
                "pipeline run timed out"
            );
            result.record(&err);
            if config.retain_partial_on_timeout {
                result.ideas = rank_ideas(std::mem::take(&mut result.ideas), config.max_ideas);
            } else {
                result.ideas.clear();
            }
            result.ideas_generated = result.ideas.len();
            result.success = false;
            result.stage = PipelineStage::Failed;
        } else {
            result.success = result.stage >= PipelineStage::Generating;
            result.stage = PipelineStage::Completed;
        }

        result.completed_at = Some(Utc::now());
        result.elapsed_ms = millis(clock.elapsed().as_millis());

        let log = RunLog::from(&result);
        if let Err(e) = self.store.insert_run_log(&log).await {
            persistence_failed(&mut result, "run_log", &e);
        }

        tracing::info!(
            batch_id = %result.batch_id,
            success = result.success,
            elapsed_ms = result.elapsed_ms,
            threads_processed = result.threads_processed,
            ideas = result.ideas.len(),
            errors = result.errors.len(),
            "pipeline run finished"
        );

        result
    }

    async fn execute(&self, config: &PipelineConfig, result: &mut PipelineResult) {
        enter(result, PipelineStage::FetchingSources);
        let mut processed: Vec<ProcessedContent> = Vec::new();
        for source in &config.sources {
            processed.extend(self.process_source(config, source, result).await);
        }

        enter(result, PipelineStage::Grouping);
        let groups = group_by_category(processed);

        enter(result, PipelineStage::Generating);
        self.generate(config, &groups, result).await;

        enter(result, PipelineStage::MergingRanking);
        let merged = std::mem::take(&mut result.ideas);
        result.ideas = rank_ideas(merged, config.max_ideas);
        result.ideas_generated = result.ideas.len();

        enter(result, PipelineStage::Persisting);
        if !result.ideas.is_empty() {
            if let Err(e) = self.store.insert_ideas(result.batch_id, &result.ideas).await {
                persistence_failed(result, "ideas", &e);
            }
        }
    }

    /// Fetch, filter, dedupe and process one source. Failures stay local.
    async fn process_source(
        &self,
        config: &PipelineConfig,
        source: &SourceConfig,
        result: &mut PipelineResult,
    ) -> Vec<ProcessedContent> {
        let threads = self.fetch_threads(source, result).await;

        enter(result, PipelineStage::Filtering);
        let fetched = threads.len();
        let threads: Vec<Thread> = threads
            .into_iter()
            .filter(|t| !t.pinned && t.score >= source.min_post_score)
            .collect();
        tracing::debug!(
            source = %source.name,
            fetched,
            kept = threads.len(),
            min_score = source.min_post_score,
            "filtered threads"
        );

        enter(result, PipelineStage::Deduplicating);
        let mut fresh: Vec<(Thread, String)> = Vec::with_capacity(threads.len());
        for thread in threads {
            let fingerprint = root_fingerprint(&thread);
            if config.dedup_enabled && self.already_seen(&fingerprint, &thread.id).await {
                tracing::debug!(source = %source.name, thread_id = %thread.id, "skipping already processed thread");
                result.threads_skipped_duplicate += 1;
                continue;
            }
            fresh.push((thread, fingerprint));
        }

        enter(result, PipelineStage::ContentProcessing);
        let mut processed = Vec::with_capacity(fresh.len());
        for (mut thread, fingerprint) in fresh {
            if thread.source.is_empty() {
                thread.source.clone_from(&source.name);
            }
            self.attach_replies(config, source, &mut thread, result).await;

            let content = match self.processor.process(&thread, &source.category) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(source = %source.name, thread_id = %thread.id, error = %e, "thread processing failed");
                    result.record(&e);
                    continue;
                }
            };

            if !self.store_thread(config, &thread, &fingerprint, &content, result).await {
                tracing::debug!(thread_id = %thread.id, "fingerprint claimed by another run, dropping");
                result.threads_skipped_duplicate += 1;
                continue;
            }

            result.threads_processed += 1;
            processed.push(content);
        }

        tracing::info!(
            source = %source.name,
            category = %source.category,
            processed = processed.len(),
            "source complete"
        );
        processed
    }

    /// List threads for every sort strategy, keeping the first copy of each id.
    async fn fetch_threads(&self, source: &SourceConfig, result: &mut PipelineResult) -> Vec<Thread> {
        let limit = source.per_strategy_limit();
        let mut seen = HashSet::new();
        let mut threads = Vec::new();
        let mut listed = false;

        for &sort in &source.sort_strategies {
            match self
                .source
                .list_threads(&source.name, sort, limit, source.time_range)
                .await
            {
                Ok(batch) => {
                    listed = true;
                    tracing::debug!(source = %source.name, sort = %sort, count = batch.len(), "listed threads");
                    for thread in batch {
                        if seen.insert(thread.id.clone()) {
                            threads.push(thread);
                        }
                    }
                }
                Err(e) => {
                    let err = PipelineError::SourceFetch {
                        source_name: source.name.clone(),
                        message: format!("listing {sort} threads: {e}"),
                    };
                    tracing::warn!(source = %source.name, sort = %sort, error = %e, "thread listing failed");
                    result.record(&err);
                }
            }
        }

        if listed {
            result.sources_processed += 1;
        }
        result.threads_fetched += threads.len();
        threads
    }

    /// Fail-open: a lookup error counts as "not seen".
    async fn already_seen(&self, fingerprint: &str, thread_id: &str) -> bool {
        match self.store.fingerprint_exists(fingerprint).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(thread_id, error = %e, "fingerprint lookup failed, treating as new");
                false
            }
        }
    }

    async fn attach_replies(
        &self,
        config: &PipelineConfig,
        source: &SourceConfig,
        thread: &mut Thread,
        result: &mut PipelineResult,
    ) {
        if source.max_replies == 0 {
            return;
        }
        match self
            .source
            .list_replies(&source.name, &thread.id, config.reply_sort, source.max_replies)
            .await
        {
            Ok(replies) => {
                thread.replies = replies
                    .into_iter()
                    .filter(|r| {
                        r.score >= source.min_reply_score
                            && r.body.trim().chars().count() > MIN_FETCHED_REPLY_CHARS
                    })
                    .take(source.max_replies)
                    .collect();
            }
            Err(e) => {
                let err = PipelineError::SourceFetch {
                    source_name: source.name.clone(),
                    message: format!("listing replies for {}: {e}", thread.id),
                };
                tracing::warn!(source = %source.name, thread_id = %thread.id, error = %e, "reply fetch failed, processing without replies");
                result.record(&err);
            }
        }
    }

    /// Write the fingerprint and the raw thread. Returns `false` only when
    /// dedup is on and another writer already holds the fingerprint.
    async fn store_thread(
        &self,
        config: &PipelineConfig,
        thread: &Thread,
        fingerprint: &str,
        content: &ProcessedContent,
        result: &mut PipelineResult,
    ) -> bool {
        let record = FingerprintRecord {
            fingerprint: fingerprint.to_string(),
            content_hash: content.content_hash.clone(),
            thread_id: thread.id.clone(),
            source_name: thread.source.clone(),
            problem_count: content.problems.len(),
            quality: content.quality.overall,
            processed_at: content.metadata.processed_at,
        };
        match self.store.insert_fingerprint(&record).await {
            Ok(false) if config.dedup_enabled => return false,
            Ok(_) => {}
            Err(e) => persistence_failed(result, "fingerprint", &e),
        }

        if let Err(e) = self.store.insert_temp_thread(thread).await {
            persistence_failed(result, "temp_thread", &e);
        }
        true
    }

    /// One generator call per category, in order, with a delay between calls.
    async fn generate(
        &self,
        config: &PipelineConfig,
        groups: &[(String, Vec<ProcessedContent>)],
        result: &mut PipelineResult,
    ) {
        if groups.is_empty() {
            tracing::info!(batch_id = %result.batch_id, "no processed content, nothing to generate");
            return;
        }
        let quota = config.max_ideas.div_ceil(groups.len());

        for (idx, (category, content)) in groups.iter().enumerate() {
            if idx > 0 && !config.generation_delay.is_zero() {
                tokio::time::sleep(config.generation_delay).await;
            }

            let request = GenerationRequest {
                category,
                content,
                config: &config.generation,
                max_ideas: quota,
            };
            let output = match self.generator.generate(request).await {
                Ok(output) => output,
                Err(e) => {
                    let err = PipelineError::Generation {
                        category: category.clone(),
                        message: e.to_string(),
                    };
                    tracing::warn!(category = %category, error = %e, "idea generation failed");
                    result.record(&err);
                    continue;
                }
            };

            result.tokens_used += output.tokens_used;
            result.cost += output.cost;

            let defaults = batch_defaults(category, content);
            let (ideas, rejected) = validate_ideas(&output.ideas, &defaults);
            tracing::info!(
                category = %category,
                items = content.len(),
                quota,
                accepted = ideas.len(),
                rejected = rejected.len(),
                tokens = output.tokens_used,
                "generated ideas"
            );
            result.ideas_rejected += rejected.len();
            result.ideas.extend(ideas);
        }
    }
}

fn enter(result: &mut PipelineResult, stage: PipelineStage) {
    result.stage = stage;
    tracing::info!(batch_id = %result.batch_id, stage = %stage, "pipeline stage");
}

fn persistence_failed(result: &mut PipelineResult, what: &str, err: &BoxError) {
    let err = PipelineError::Persistence(format!("{what}: {err}"));
    tracing::warn!(batch_id = %result.batch_id, error = %err, "storage write failed, continuing");
    result.persistence_failures += 1;
}

/// Group by `context.category`, categories in first-seen order.
fn group_by_category(processed: Vec<ProcessedContent>) -> Vec<(String, Vec<ProcessedContent>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<ProcessedContent>)> = Vec::new();
    for content in processed {
        let category = content.context.category.clone();
        if let Some(&i) = index.get(&category) {
            groups[i].1.push(content);
        } else {
            index.insert(category.clone(), groups.len());
            groups.push((category, vec![content]));
        }
    }
    groups
}

fn batch_defaults(category: &str, content: &[ProcessedContent]) -> IdeaDefaults {
    let mut source_names: Vec<String> = Vec::new();
    let mut source_links = Vec::with_capacity(content.len());
    for item in content {
        if !source_names.contains(&item.context.source_name) {
            source_names.push(item.context.source_name.clone());
        }
        let link = if item.context.url.is_empty() {
            &item.context.permalink
        } else {
            &item.context.url
        };
        if !link.is_empty() {
            source_links.push(link.clone());
        }
    }
    IdeaDefaults {
        category: category.to_string(),
        source_names,
        source_links,
        now: Utc::now(),
    }
}

fn millis(ms: u128) -> u64 {
    u64::try_from(ms).unwrap_or(u64::MAX)
}
