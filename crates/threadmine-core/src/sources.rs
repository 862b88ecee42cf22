use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Listing order requested from a discussion source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    Hot,
    New,
    Top,
    Rising,
}

impl std::fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortStrategy::Hot => write!(f, "hot"),
            SortStrategy::New => write!(f, "new"),
            SortStrategy::Top => write!(f, "top"),
            SortStrategy::Rising => write!(f, "rising"),
        }
    }
}

impl FromStr for SortStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(SortStrategy::Hot),
            "new" => Ok(SortStrategy::New),
            "top" => Ok(SortStrategy::Top),
            "rising" => Ok(SortStrategy::Rising),
            other => Err(format!("unknown sort strategy '{other}'")),
        }
    }
}

/// Time window for `top`-style listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimeRange::Hour => "hour",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
            TimeRange::All => "all",
        };
        f.write_str(s)
    }
}

fn default_max_threads() -> usize {
    25
}

fn default_max_replies() -> usize {
    20
}

fn default_min_post_score() -> i64 {
    10
}

fn default_min_reply_score() -> i64 {
    2
}

/// One configured discussion source (e.g. a subreddit) and its fetch limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Category the source's threads are grouped under for generation.
    pub category: String,
    pub sort_strategies: Vec<SortStrategy>,
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,
    #[serde(default = "default_max_replies")]
    pub max_replies: usize,
    #[serde(default = "default_min_post_score")]
    pub min_post_score: i64,
    #[serde(default = "default_min_reply_score")]
    pub min_reply_score: i64,
    #[serde(default)]
    pub time_range: Option<TimeRange>,
}

impl SourceConfig {
    /// Threads requested per sort strategy: the cap split evenly, never zero.
    #[must_use]
    pub fn per_strategy_limit(&self) -> usize {
        let strategies = self.sort_strategies.len().max(1);
        (self.max_threads / strategies).max(1)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the source list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_sources(&sources_file)?;

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if source.category.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' has an empty category",
                source.name
            )));
        }

        if source.sort_strategies.is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' needs at least one sort strategy",
                source.name
            )));
        }

        if source.max_threads == 0 {
            return Err(ConfigError::Validation(format!(
                "source '{}' has max_threads 0; must be at least 1",
                source.name
            )));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
