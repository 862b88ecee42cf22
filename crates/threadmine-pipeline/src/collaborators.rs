//! External services the orchestrator depends on.
//!
//! Each is injected as an `Arc<dyn Trait>` so tests can substitute fakes.
//! Errors are opaque; the orchestrator records them against the unit of work
//! that failed and moves on.

use async_trait::async_trait;
use threadmine_core::{SortStrategy, TimeRange};

use crate::error::BoxError;
use crate::types::{
    FingerprintRecord, GenerationOutput, GenerationRequest, ProductIdea, Reply, RunLog, Thread,
};

/// Discussion-source client. Rate limiting belongs to the implementation.
#[async_trait]
pub trait ThreadSource: Send + Sync {
    /// List root posts for `source`. Returned threads need not carry replies.
    async fn list_threads(
        &self,
        source: &str,
        sort: SortStrategy,
        limit: usize,
        time_range: Option<TimeRange>,
    ) -> Result<Vec<Thread>, BoxError>;

    async fn list_replies(
        &self,
        source: &str,
        thread_id: &str,
        sort: SortStrategy,
        limit: usize,
    ) -> Result<Vec<Reply>, BoxError>;
}

/// Turns one category's processed content into raw idea objects.
#[async_trait]
pub trait IdeaGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<GenerationOutput, BoxError>;
}

/// Storage for dedup fingerprints, raw threads, ideas and run logs.
#[async_trait]
pub trait PipelineStore: Send + Sync {
    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, BoxError>;

    /// Insert unless the fingerprint is already present. Returns `true` when
    /// this call inserted it, `false` when another writer got there first.
    async fn insert_fingerprint(&self, record: &FingerprintRecord) -> Result<bool, BoxError>;

    async fn insert_temp_thread(&self, thread: &Thread) -> Result<(), BoxError>;

    async fn insert_ideas(
        &self,
        batch_id: uuid::Uuid,
        ideas: &[ProductIdea],
    ) -> Result<(), BoxError>;

    async fn insert_run_log(&self, log: &RunLog) -> Result<(), BoxError>;
}
