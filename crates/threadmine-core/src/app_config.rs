use std::path::PathBuf;

use crate::sources::SortStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from `THREADMINE_*` environment variables.
///
/// Per-run pipeline parameters are derived from this plus the sources file.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub sources_path: PathBuf,
    /// `None` means the built-in lexicon is used.
    pub lexicon_path: Option<PathBuf>,
    pub max_ideas: usize,
    pub max_duration_secs: u64,
    pub dedup_enabled: bool,
    pub generation_delay_ms: u64,
    pub retain_partial_on_timeout: bool,
    pub reply_sort: SortStrategy,
    pub generation_model: String,
    pub generation_temperature: f32,
    pub generation_max_tokens: u32,
}
