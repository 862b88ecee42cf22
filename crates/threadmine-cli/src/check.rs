//! `sources` and `lexicon`: configuration checks.

use threadmine_core::{load_sources, AppConfig, Lexicon};

use crate::analyze::effective_lexicon;

pub(crate) fn run_sources(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_sources(&config.sources_path)?;
    println!(
        "{} source(s) in {}",
        file.sources.len(),
        config.sources_path.display()
    );
    for source in &file.sources {
        let sorts: Vec<String> = source.sort_strategies.iter().map(ToString::to_string).collect();
        println!(
            "  {:<20} category={:<12} sorts=[{}] threads/sort={} min_score={}",
            source.name,
            source.category,
            sorts.join(","),
            source.per_strategy_limit(),
            source.min_post_score,
        );
    }
    Ok(())
}

pub(crate) fn run_lexicon(config: &AppConfig) -> anyhow::Result<()> {
    let lexicon = effective_lexicon(config)?;
    let origin = config
        .lexicon_path
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
    println!("lexicon: {origin}");
    for (table, size) in table_sizes(&lexicon) {
        println!("  {table:<20} {size}");
    }
    Ok(())
}

pub(crate) fn table_sizes(lexicon: &Lexicon) -> Vec<(String, usize)> {
    let mut sizes = vec![
        ("problem_phrases".to_string(), lexicon.problem_phrases.len()),
        ("high_severity".to_string(), lexicon.high_severity.len()),
        ("low_severity".to_string(), lexicon.low_severity.len()),
        ("urgent".to_string(), lexicon.urgent.len()),
        ("non_urgent".to_string(), lexicon.non_urgent.len()),
        ("scale_words".to_string(), lexicon.scale_words.len()),
        ("frustration_words".to_string(), lexicon.frustration_words.len()),
        ("excitement_words".to_string(), lexicon.excitement_words.len()),
        ("action_words".to_string(), lexicon.action_words.len()),
        ("promotional_phrases".to_string(), lexicon.promotional_phrases.len()),
        ("stop_words".to_string(), lexicon.stop_words.len()),
    ];
    for domain in &lexicon.domains {
        sizes.push((format!("domain:{}", domain.name), domain.keywords.len()));
    }
    sizes
}
