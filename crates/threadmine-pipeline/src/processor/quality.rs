//! Thread quality: mean of four bounded sub-scores.

use threadmine_core::Lexicon;

use crate::text::{split_sentences, tokenize, TermCounter};
use crate::types::{ProblemStatement, QualityScore};

const SUBSTANTIAL_BODY_CHARS: usize = 100;
const COMMUNITY_VALIDATED_SCORE: i64 = 10;

pub(super) struct QualityInputs<'a> {
    pub normalized: &'a str,
    pub counter: &'a TermCounter<'a>,
    pub problems: &'a [ProblemStatement],
    pub body: &'a str,
    pub thread_score: i64,
    pub lexicon: &'a Lexicon,
}

pub(super) fn score(inputs: &QualityInputs<'_>) -> QualityScore {
    let readability = readability(inputs.normalized);
    let specificity = specificity(inputs.problems);
    let actionability = actionability(inputs.counter, &inputs.lexicon.action_words);
    let authenticity = authenticity(inputs);

    let sum = u16::from(readability)
        + u16::from(specificity)
        + u16::from(actionability)
        + u16::from(authenticity);
    // Rounded mean of four values in 0..=100 stays in 0..=100.
    let overall = u8::try_from((sum + 2) / 4).unwrap_or(100);

    QualityScore {
        readability,
        specificity,
        actionability,
        authenticity,
        overall,
    }
}

/// 90 for 15-20 words per sentence, 70 for 10-25, otherwise 50.
#[allow(clippy::cast_precision_loss)]
pub(super) fn readability(normalized: &str) -> u8 {
    let sentences = split_sentences(normalized).count();
    if sentences == 0 {
        return 50;
    }
    let words = tokenize(normalized).len();
    let per_sentence = words as f64 / sentences as f64;
    if (15.0..=20.0).contains(&per_sentence) {
        90
    } else if (10.0..=25.0).contains(&per_sentence) {
        70
    } else {
        50
    }
}

/// Keyword count of the most severe problem, times ten.
pub(super) fn specificity(problems: &[ProblemStatement]) -> u8 {
    let mut top: Option<&ProblemStatement> = None;
    for problem in problems {
        if top.is_none_or(|t| problem.severity > t.severity) {
            top = Some(problem);
        }
    }
    top.map_or(0, |p| {
        let keywords = u8::try_from(p.keywords.len()).unwrap_or(u8::MAX);
        keywords.saturating_mul(10).min(100)
    })
}

pub(super) fn actionability(counter: &TermCounter<'_>, action_words: &[String]) -> u8 {
    let hits = counter.count_all(action_words);
    u8::try_from(hits.saturating_mul(20).min(100)).unwrap_or(100)
}

fn authenticity(inputs: &QualityInputs<'_>) -> u8 {
    let mut score = 70;
    if inputs.body.trim().chars().count() > SUBSTANTIAL_BODY_CHARS {
        score += 10;
    }
    if inputs.thread_score >= COMMUNITY_VALIDATED_SCORE {
        score += 10;
    }
    if !inputs.counter.contains_any(&inputs.lexicon.promotional_phrases) {
        score += 10;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalize;
    use crate::types::TextOrigin;

    fn problem(severity: u8, keywords: usize) -> ProblemStatement {
        ProblemStatement {
            text: "placeholder problem statement".to_string(),
            severity,
            urgency: 5,
            domain: "general".to_string(),
            estimated_user_count: 5_000,
            keywords: (0..keywords).map(|i| format!("word{i}")).collect(),
            origin: TextOrigin::Root,
        }
    }

    #[test]
    fn readability_bands() {
        let ideal = normalize(&format!("{}.", "word ".repeat(16)));
        assert_eq!(readability(&ideal), 90);
        let ok = normalize(&format!("{}.", "word ".repeat(11)));
        assert_eq!(readability(&ok), 70);
        let short = normalize("Too short. Really.");
        assert_eq!(readability(&short), 50);
        assert_eq!(readability(""), 50);
    }

    #[test]
    fn specificity_uses_most_severe_problem() {
        let problems = vec![problem(5, 5), problem(8, 2), problem(8, 4)];
        assert_eq!(specificity(&problems), 20);
        assert_eq!(specificity(&[]), 0);
    }

    #[test]
    fn actionability_caps_at_hundred() {
        let lexicon = Lexicon::default().normalized();
        let text = normalize("need want build fix automate improve");
        let counter = TermCounter::new(&text);
        assert_eq!(actionability(&counter, &lexicon.action_words), 100);
        let text = normalize("need to fix");
        let counter = TermCounter::new(&text);
        assert_eq!(actionability(&counter, &lexicon.action_words), 40);
    }

    #[test]
    fn authenticity_rewards_substance_validation_and_no_promotion() {
        let lexicon = Lexicon::default().normalized();
        let body = "x".repeat(150);
        let text = normalize("plain honest question about invoices");
        let counter = TermCounter::new(&text);
        let inputs = QualityInputs {
            normalized: &text,
            counter: &counter,
            problems: &[],
            body: &body,
            thread_score: 25,
            lexicon: &lexicon,
        };
        assert_eq!(authenticity(&inputs), 100);

        let promo = normalize("check out my app, use my code SAVE10");
        let promo_counter = TermCounter::new(&promo);
        let inputs = QualityInputs {
            normalized: &promo,
            counter: &promo_counter,
            problems: &[],
            body: "short",
            thread_score: 1,
            lexicon: &lexicon,
        };
        assert_eq!(authenticity(&inputs), 70);
    }

    #[test]
    fn overall_is_bounded_mean() {
        let lexicon = Lexicon::default().normalized();
        let text = normalize("need want build fix automate improve");
        let counter = TermCounter::new(&text);
        let problems = vec![problem(9, 5)];
        let q = score(&QualityInputs {
            normalized: &text,
            counter: &counter,
            problems: &problems,
            body: "",
            thread_score: 0,
            lexicon: &lexicon,
        });
        // readability 50, specificity 50, actionability 100, authenticity 80
        assert_eq!(q.overall, 70);
        assert!(q.overall <= 100);
    }
}
