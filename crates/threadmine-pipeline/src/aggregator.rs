//! Merge, dedupe and rank generated ideas.

use std::collections::HashSet;

use crate::types::ProductIdea;

/// Sort by `scoring.overall` descending (stable, so equal scores keep input
/// order), drop later ideas sharing a `(name, target_audience)` key, and keep
/// at most `max`.
#[must_use]
pub fn rank_ideas(mut ideas: Vec<ProductIdea>, max: usize) -> Vec<ProductIdea> {
    ideas.sort_by(|a, b| b.scoring.overall.total_cmp(&a.scoring.overall));

    let mut seen = HashSet::new();
    ideas.retain(|idea| seen.insert(dedup_key(idea)));
    ideas.truncate(max);
    ideas
}

fn dedup_key(idea: &ProductIdea) -> (String, String) {
    (
        idea.name.trim().to_lowercase(),
        idea.target_audience.trim().to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdeaScoring;
    use chrono::DateTime;

    fn idea(name: &str, audience: &str, overall: f64) -> ProductIdea {
        ProductIdea {
            name: name.to_string(),
            elevator_pitch: format!("{name} pitch"),
            target_audience: audience.to_string(),
            pain_point_solved: "pain".to_string(),
            solution_approach: "approach".to_string(),
            scoring: IdeaScoring {
                overall,
                pain_severity: 50.0,
                market_size: 50.0,
                competition: 50.0,
                implementation_difficulty: 50.0,
            },
            tags: Vec::new(),
            category: "business".to_string(),
            source_names: Vec::new(),
            source_links: Vec::new(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    fn names(ideas: &[ProductIdea]) -> Vec<&str> {
        ideas.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn sorts_descending_by_overall() {
        let ranked = rank_ideas(
            vec![idea("a", "x", 40.0), idea("b", "x", 90.0), idea("c", "x", 65.0)],
            10,
        );
        assert_eq!(names(&ranked), ["b", "c", "a"]);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let ranked = rank_ideas(
            vec![idea("first", "x", 70.0), idea("second", "y", 70.0), idea("third", "z", 70.0)],
            10,
        );
        assert_eq!(names(&ranked), ["first", "second", "third"]);
    }

    #[test]
    fn duplicate_key_keeps_highest_ranked() {
        let ranked = rank_ideas(
            vec![
                idea("InvoiceMatch", "Freelancers", 60.0),
                idea("  invoicematch ", "FREELANCERS", 85.0),
                idea("InvoiceMatch", "Agencies", 50.0),
            ],
            10,
        );
        assert_eq!(ranked.len(), 2);
        assert!((ranked[0].scoring.overall - 85.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].target_audience, "Agencies");
    }

    #[test]
    fn truncates_after_dedup() {
        let ranked = rank_ideas(
            vec![
                idea("a", "x", 90.0),
                idea("a", "x", 80.0),
                idea("b", "x", 70.0),
                idea("c", "x", 60.0),
            ],
            2,
        );
        assert_eq!(names(&ranked), ["a", "b"]);
    }

    #[test]
    fn output_is_bounded_sorted_and_unique() {
        let input: Vec<ProductIdea> = (0..30)
            .map(|i| idea(&format!("idea{}", i % 7), "team", f64::from(i * 37 % 101)))
            .collect();
        let ranked = rank_ideas(input, 5);
        assert!(ranked.len() <= 5);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].scoring.overall >= w[1].scoring.overall));
        let keys: HashSet<_> = ranked.iter().map(dedup_key).collect();
        assert_eq!(keys.len(), ranked.len());
    }

    #[test]
    fn zero_max_yields_nothing() {
        assert!(rank_ideas(vec![idea("a", "x", 10.0)], 0).is_empty());
    }
}
