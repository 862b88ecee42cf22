//! `process` and `rank`: the pure parts of the pipeline, driven from files.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use threadmine_core::{load_lexicon, AppConfig, Lexicon};
use threadmine_pipeline::{
    rank_ideas, validate_ideas, ContentProcessor, IdeaDefaults, ProductIdea, Thread,
    ValidationError,
};

/// The configured lexicon, or the built-in one when no path is set.
///
/// # Errors
///
/// Returns an error if the configured lexicon file cannot be loaded.
pub(crate) fn effective_lexicon(config: &AppConfig) -> anyhow::Result<Lexicon> {
    match &config.lexicon_path {
        Some(path) => load_lexicon(path)
            .with_context(|| format!("loading lexicon from {}", path.display())),
        None => Ok(Lexicon::default()),
    }
}

pub(crate) fn run_process(
    config: &AppConfig,
    input: &Path,
    category: &str,
    pretty: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let thread: Thread = serde_json::from_str(&raw)
        .with_context(|| format!("parsing thread JSON in {}", input.display()))?;

    let processor = ContentProcessor::new(effective_lexicon(config)?);
    let content = processor.process(&thread, category)?;
    tracing::info!(
        thread_id = %thread.id,
        problems = content.problems.len(),
        quality = content.quality.overall,
        "processed thread"
    );

    let out = if pretty {
        serde_json::to_string_pretty(&content)?
    } else {
        serde_json::to_string(&content)?
    };
    println!("{out}");
    Ok(())
}

pub(crate) fn run_rank(
    config: &AppConfig,
    input: &Path,
    max: Option<usize>,
    category: &str,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let max = max.unwrap_or(config.max_ideas);
    let (ideas, rejected) = rank_raw_ideas(&raw, max, category)?;

    println!("{}", serde_json::to_string_pretty(&ideas)?);
    eprintln!("kept {} idea(s), rejected {}", ideas.len(), rejected.len());
    for err in &rejected {
        eprintln!("  rejected: {err}");
    }
    Ok(())
}

/// Parse a JSON array of raw ideas, validate each, and rank the survivors.
pub(crate) fn rank_raw_ideas(
    raw: &str,
    max: usize,
    category: &str,
) -> anyhow::Result<(Vec<ProductIdea>, Vec<ValidationError>)> {
    let value: serde_json::Value = serde_json::from_str(raw).context("parsing ideas JSON")?;
    let items = value
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("expected a JSON array of ideas"))?;

    let defaults = IdeaDefaults {
        category: category.to_string(),
        source_names: Vec::new(),
        source_links: Vec::new(),
        now: Utc::now(),
    };
    let (ideas, rejected) = validate_ideas(items, &defaults);
    Ok((rank_ideas(ideas, max), rejected))
}
