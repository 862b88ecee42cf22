//! In-memory collaborators for orchestrator tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use threadmine_core::{SortStrategy, SourceConfig, TimeRange};
use threadmine_pipeline::{
    BoxError, FingerprintRecord, GenerationOutput, GenerationRequest, IdeaGenerator,
    PipelineStore, ProductIdea, Reply, RunLog, Thread, ThreadSource,
};

pub const NOW_ISH: i64 = 1_700_000_000;

pub fn source(name: &str, category: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        category: category.to_string(),
        sort_strategies: vec![SortStrategy::Hot],
        max_threads: 10,
        max_replies: 5,
        min_post_score: 10,
        min_reply_score: 2,
        time_range: None,
    }
}

pub fn thread(id: &str, source: &str, score: i64) -> Thread {
    Thread {
        id: id.to_string(),
        source: source.to_string(),
        title: format!("Struggling with client invoices, thread {id}"),
        body: "Matching every payment by hand is time-consuming and frustrating.".to_string(),
        author: "op".to_string(),
        score,
        reply_count: 0,
        upvote_ratio: 0.9,
        created_at: NOW_ISH,
        permalink: format!("/r/{source}/comments/{id}"),
        url: format!("https://reddit.com/r/{source}/comments/{id}"),
        pinned: false,
        replies: Vec::new(),
    }
}

pub fn reply(id: &str, body: &str, score: i64) -> Reply {
    Reply {
        id: id.to_string(),
        author: "someone".to_string(),
        body: body.to_string(),
        score,
        created_at: NOW_ISH,
    }
}

pub fn idea_json(name: &str, audience: &str, overall: f64) -> Value {
    json!({
        "name": name,
        "elevatorPitch": format!("{name} in one line"),
        "targetAudience": audience,
        "painPointSolved": "Manual reconciliation",
        "solutionApproach": "Automate it",
        "scoring": {
            "overall": overall,
            "painSeverity": 70,
            "marketSize": 60,
            "competition": 40,
            "implementationDifficulty": 30
        }
    })
}

// ---------------------------------------------------------------------------
// Thread source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ListCall {
    pub source: String,
    pub sort: SortStrategy,
    pub limit: usize,
    pub time_range: Option<TimeRange>,
}

#[derive(Default)]
pub struct FakeSource {
    threads: HashMap<(String, SortStrategy), Result<Vec<Thread>, String>>,
    replies: HashMap<String, Result<Vec<Reply>, String>>,
    pub calls: Mutex<Vec<ListCall>>,
}

impl FakeSource {
    #[must_use]
    pub fn with_threads(mut self, source: &str, sort: SortStrategy, threads: Vec<Thread>) -> Self {
        self.threads.insert((source.to_string(), sort), Ok(threads));
        self
    }

    #[must_use]
    pub fn failing_listing(mut self, source: &str, sort: SortStrategy, message: &str) -> Self {
        self.threads
            .insert((source.to_string(), sort), Err(message.to_string()));
        self
    }

    #[must_use]
    pub fn with_replies(mut self, thread_id: &str, replies: Vec<Reply>) -> Self {
        self.replies.insert(thread_id.to_string(), Ok(replies));
        self
    }

    #[must_use]
    pub fn failing_replies(mut self, thread_id: &str, message: &str) -> Self {
        self.replies
            .insert(thread_id.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ListCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThreadSource for FakeSource {
    async fn list_threads(
        &self,
        source: &str,
        sort: SortStrategy,
        limit: usize,
        time_range: Option<TimeRange>,
    ) -> Result<Vec<Thread>, BoxError> {
        self.calls.lock().unwrap().push(ListCall {
            source: source.to_string(),
            sort,
            limit,
            time_range,
        });
        match self.threads.get(&(source.to_string(), sort)) {
            Some(Ok(threads)) => Ok(threads.iter().take(limit).cloned().collect()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Ok(Vec::new()),
        }
    }

    async fn list_replies(
        &self,
        _source: &str,
        thread_id: &str,
        _sort: SortStrategy,
        limit: usize,
    ) -> Result<Vec<Reply>, BoxError> {
        match self.replies.get(thread_id) {
            Some(Ok(replies)) => Ok(replies.iter().take(limit).cloned().collect()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Idea generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Behavior {
    Ideas(GenerationOutput),
    Fail(String),
    /// Sleep before answering with nothing.
    Hang(Duration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCall {
    pub category: String,
    pub max_ideas: usize,
    pub items: usize,
}

#[derive(Default)]
pub struct FakeGenerator {
    behaviors: HashMap<String, Behavior>,
    pub calls: Mutex<Vec<GenerationCall>>,
}

impl FakeGenerator {
    #[must_use]
    pub fn ideas(mut self, category: &str, ideas: Vec<Value>, tokens_used: u64, cost: f64) -> Self {
        self.behaviors.insert(
            category.to_string(),
            Behavior::Ideas(GenerationOutput {
                ideas,
                tokens_used,
                cost,
            }),
        );
        self
    }

    #[must_use]
    pub fn failing(mut self, category: &str, message: &str) -> Self {
        self.behaviors
            .insert(category.to_string(), Behavior::Fail(message.to_string()));
        self
    }

    #[must_use]
    pub fn hanging(mut self, category: &str, delay: Duration) -> Self {
        self.behaviors
            .insert(category.to_string(), Behavior::Hang(delay));
        self
    }

    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdeaGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<GenerationOutput, BoxError> {
        self.calls.lock().unwrap().push(GenerationCall {
            category: request.category.to_string(),
            max_ideas: request.max_ideas,
            items: request.content.len(),
        });
        let behavior = self.behaviors.get(request.category).cloned();
        match behavior {
            Some(Behavior::Ideas(output)) => Ok(output),
            Some(Behavior::Fail(message)) => Err(message.into()),
            Some(Behavior::Hang(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(GenerationOutput::default())
            }
            None => Ok(GenerationOutput::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    fingerprints: Mutex<HashSet<String>>,
    /// Fingerprints another writer claims between our lookup and our insert.
    raced: HashSet<String>,
    fail_lookups: bool,
    fail_writes: bool,
    pub records: Mutex<Vec<FingerprintRecord>>,
    pub temp_threads: Mutex<Vec<Thread>>,
    pub ideas: Mutex<Vec<(uuid::Uuid, Vec<ProductIdea>)>>,
    pub run_logs: Mutex<Vec<RunLog>>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_fingerprint(self, fingerprint: String) -> Self {
        self.fingerprints.lock().unwrap().insert(fingerprint);
        self
    }

    #[must_use]
    pub fn racing_on(mut self, fingerprint: String) -> Self {
        self.raced.insert(fingerprint);
        self
    }

    #[must_use]
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    #[must_use]
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn temp_threads(&self) -> Vec<Thread> {
        self.temp_threads.lock().unwrap().clone()
    }

    pub fn run_logs(&self) -> Vec<RunLog> {
        self.run_logs.lock().unwrap().clone()
    }

    pub fn stored_ideas(&self) -> Vec<(uuid::Uuid, Vec<ProductIdea>)> {
        self.ideas.lock().unwrap().clone()
    }

    fn write_guard(&self) -> Result<(), BoxError> {
        if self.fail_writes {
            Err("store unavailable".into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PipelineStore for MemoryStore {
    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, BoxError> {
        if self.fail_lookups {
            return Err("lookup timed out".into());
        }
        Ok(self.fingerprints.lock().unwrap().contains(fingerprint))
    }

    async fn insert_fingerprint(&self, record: &FingerprintRecord) -> Result<bool, BoxError> {
        self.write_guard()?;
        if self.raced.contains(&record.fingerprint) {
            return Ok(false);
        }
        let inserted = self
            .fingerprints
            .lock()
            .unwrap()
            .insert(record.fingerprint.clone());
        if inserted {
            self.records.lock().unwrap().push(record.clone());
        }
        Ok(inserted)
    }

    async fn insert_temp_thread(&self, thread: &Thread) -> Result<(), BoxError> {
        self.write_guard()?;
        self.temp_threads.lock().unwrap().push(thread.clone());
        Ok(())
    }

    async fn insert_ideas(&self, batch_id: uuid::Uuid, ideas: &[ProductIdea]) -> Result<(), BoxError> {
        self.write_guard()?;
        self.ideas.lock().unwrap().push((batch_id, ideas.to_vec()));
        Ok(())
    }

    async fn insert_run_log(&self, log: &RunLog) -> Result<(), BoxError> {
        self.write_guard()?;
        self.run_logs.lock().unwrap().push(log.clone());
        Ok(())
    }
}
