//! Shared configuration for threadmine: environment settings, the discussion
//! source list, and the heuristic tables used by the content processor.

pub mod app_config;
pub mod config;
pub mod lexicon;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lexicon::{load_lexicon, DomainVocabulary, Lexicon, ScaleWord};
pub use sources::{load_sources, SortStrategy, SourceConfig, SourcesFile, TimeRange};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
