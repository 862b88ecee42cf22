use std::path::Path;

use super::*;

fn source(name: &str, category: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        category: category.to_string(),
        sort_strategies: vec![SortStrategy::Hot, SortStrategy::Top],
        max_threads: 25,
        max_replies: 20,
        min_post_score: 10,
        min_reply_score: 2,
        time_range: None,
    }
}

#[test]
fn per_strategy_limit_splits_cap_evenly() {
    let mut s = source("smallbusiness", "business");
    s.max_threads = 25;
    assert_eq!(s.per_strategy_limit(), 12);
}

#[test]
fn per_strategy_limit_never_zero() {
    let mut s = source("smallbusiness", "business");
    s.max_threads = 1;
    s.sort_strategies = vec![SortStrategy::Hot, SortStrategy::New, SortStrategy::Top];
    assert_eq!(s.per_strategy_limit(), 1);
}

#[test]
fn validate_rejects_empty_name() {
    let file = SourcesFile {
        sources: vec![source("  ", "business")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_empty_category() {
    let file = SourcesFile {
        sources: vec![source("productivity", " ")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("empty category"));
}

#[test]
fn validate_rejects_missing_sort_strategies() {
    let mut s = source("productivity", "productivity");
    s.sort_strategies.clear();
    let file = SourcesFile { sources: vec![s] };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("at least one sort strategy"));
}

#[test]
fn validate_rejects_zero_max_threads() {
    let mut s = source("productivity", "productivity");
    s.max_threads = 0;
    let file = SourcesFile { sources: vec![s] };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("max_threads 0"));
}

#[test]
fn validate_rejects_duplicate_name_case_insensitive() {
    let file = SourcesFile {
        sources: vec![source("SaaS", "tech"), source("saas", "business")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate source name"));
}

#[test]
fn validate_accepts_valid_sources() {
    let file = SourcesFile {
        sources: vec![source("smallbusiness", "business"), source("webdev", "tech")],
    };
    assert!(validate_sources(&file).is_ok());
}

#[test]
fn sources_yaml_applies_defaults() {
    let yaml = r"
sources:
  - name: personalfinance
    category: finance
    sort_strategies: [hot, top]
    time_range: week
";
    let file: SourcesFile = serde_yaml::from_str(yaml).expect("parse");
    let s = &file.sources[0];
    assert_eq!(s.sort_strategies, vec![SortStrategy::Hot, SortStrategy::Top]);
    assert_eq!(s.max_threads, 25);
    assert_eq!(s.max_replies, 20);
    assert_eq!(s.min_post_score, 10);
    assert_eq!(s.min_reply_score, 2);
    assert_eq!(s.time_range, Some(TimeRange::Week));
}

#[test]
fn load_sources_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("sources.yaml");
    assert!(
        path.exists(),
        "sources.yaml missing at {path:?}, required for this test"
    );
    let file = load_sources(&path).expect("failed to load sources.yaml");
    assert!(
        !file.sources.is_empty(),
        "sources.yaml should contain at least one source"
    );
}

#[test]
fn load_sources_missing_file_is_io_error() {
    let err = load_sources(Path::new("/nonexistent/threadmine/sources.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }));
}

#[test]
fn sort_strategy_round_trips_through_display() {
    for s in [
        SortStrategy::Hot,
        SortStrategy::New,
        SortStrategy::Top,
        SortStrategy::Rising,
    ] {
        assert_eq!(s.to_string().parse::<SortStrategy>().unwrap(), s);
    }
    assert!("sideways".parse::<SortStrategy>().is_err());
}
