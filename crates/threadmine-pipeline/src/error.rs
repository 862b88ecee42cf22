use thiserror::Error;

/// Opaque error returned by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-unit failures inside a pipeline run.
///
/// Only [`PipelineError::Timeout`] ends a run; every other variant is recorded
/// in the run result and the run moves on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source fetch failed for {source_name}: {message}")]
    SourceFetch {
        source_name: String,
        message: String,
    },

    #[error("could not process thread {thread_id}: {message}")]
    Processing { thread_id: String, message: String },

    #[error("idea generation failed for category {category}: {message}")]
    Generation { category: String, message: String },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("pipeline exceeded its {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}

/// Why a generated idea was rejected before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("idea is not a JSON object")]
    NotAnObject,

    #[error("missing or empty field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' has the wrong type: {reason}")]
    WrongType { field: &'static str, reason: String },

    #[error("field '{field}' is {value}, outside 0..=100")]
    OutOfRange { field: &'static str, value: String },
}
