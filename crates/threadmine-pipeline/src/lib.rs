//! Discussion-to-idea pipeline for threadmine.
//!
//! Turns discussion threads into scored problem statements
//! ([`ContentProcessor`]), hands them per category to an external idea
//! generator, and validates, dedupes and ranks what comes back
//! ([`rank_ideas`]). [`PipelineOrchestrator`] drives a full run under a
//! wall-clock budget against injected [`collaborators`].

pub mod aggregator;
pub mod collaborators;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod processor;
pub mod types;
pub mod validate;

mod text;

pub use aggregator::rank_ideas;
pub use collaborators::{IdeaGenerator, PipelineStore, ThreadSource};
pub use error::{BoxError, PipelineError, ValidationError};
pub use fingerprint::{content_hash, root_fingerprint, thread_fingerprint};
pub use orchestrator::PipelineOrchestrator;
pub use processor::{ContentProcessor, ProcessorSettings, PROCESSOR_VERSION};
pub use types::{
    ContentContext, FingerprintRecord, GenerationConfig, GenerationOutput, GenerationRequest,
    IdeaScoring, PipelineConfig, PipelineResult, PipelineStage, ProblemStatement,
    ProcessedContent, ProductIdea, QualityScore, Reply, RunError, RunErrorKind, RunLog, Thread,
};
pub use validate::{validate_idea, validate_ideas, IdeaDefaults};
