//! Engagement, timing and sentiment around a thread.

use chrono::{DateTime, Utc};
use threadmine_core::Lexicon;

use crate::text::TermCounter;
use crate::types::{ContentContext, Engagement, Sentiment, TemporalContext, Thread, TrendingState};

pub(super) fn build(
    thread: &Thread,
    category: &str,
    replies_analyzed: usize,
    counter: &TermCounter<'_>,
    lexicon: &Lexicon,
    now: DateTime<Utc>,
) -> ContentContext {
    let age_hours = age_hours(thread.created_at, now);

    ContentContext {
        source_name: thread.source.clone(),
        category: category.to_string(),
        thread_id: thread.id.clone(),
        author: thread.author.clone(),
        permalink: thread.permalink.clone(),
        url: thread.url.clone(),
        engagement: Engagement {
            score: thread.score,
            reply_count: thread.reply_count,
            upvote_ratio: thread.upvote_ratio,
            virality: virality(thread.score, age_hours),
            replies_analyzed,
        },
        temporal: TemporalContext {
            posted_at: DateTime::from_timestamp(thread.created_at, 0).unwrap_or_default(),
            age_hours,
            trending: trending(age_hours, thread.score),
        },
        sentiment: sentiment(
            counter.count_all(&lexicon.frustration_words),
            counter.count_all(&lexicon.excitement_words),
        ),
        urgency_indicators: counter.matching(&lexicon.urgent),
    }
}

/// Hours since `created_at`; a post dated in the future counts as brand new.
#[allow(clippy::cast_precision_loss)]
pub(super) fn age_hours(created_at: i64, now: DateTime<Utc>) -> f64 {
    let secs = now.timestamp().saturating_sub(created_at).max(0);
    secs as f64 / 3600.0
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn virality(score: i64, age_hours: f64) -> f64 {
    score as f64 / age_hours.max(1.0)
}

pub(super) fn trending(age_hours: f64, score: i64) -> TrendingState {
    if age_hours < 6.0 && score >= 100 {
        TrendingState::Hot
    } else if age_hours < 24.0 && score >= 20 {
        TrendingState::Rising
    } else if age_hours < 72.0 {
        TrendingState::Stable
    } else {
        TrendingState::Declining
    }
}

pub(super) fn sentiment(frustration: usize, excitement: usize) -> Sentiment {
    match frustration.cmp(&excitement) {
        std::cmp::Ordering::Greater => Sentiment::Frustrated,
        std::cmp::Ordering::Less => Sentiment::Excited,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn age_is_measured_in_hours() {
        let now = at(1_700_000_000);
        let hours = age_hours(1_700_000_000 - 7_200, now);
        assert!((hours - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn future_posts_have_zero_age() {
        let now = at(1_700_000_000);
        assert!(age_hours(1_700_003_600, now).abs() < f64::EPSILON);
    }

    #[test]
    fn virality_floors_age_at_one_hour() {
        assert!((virality(120, 0.25) - 120.0).abs() < f64::EPSILON);
        assert!((virality(120, 4.0) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trending_thresholds() {
        assert_eq!(trending(2.0, 150), TrendingState::Hot);
        assert_eq!(trending(2.0, 50), TrendingState::Rising);
        assert_eq!(trending(12.0, 150), TrendingState::Rising);
        assert_eq!(trending(12.0, 5), TrendingState::Stable);
        assert_eq!(trending(48.0, 500), TrendingState::Stable);
        assert_eq!(trending(100.0, 500), TrendingState::Declining);
    }

    #[test]
    fn sentiment_compares_counts() {
        assert_eq!(sentiment(3, 1), Sentiment::Frustrated);
        assert_eq!(sentiment(0, 2), Sentiment::Excited);
        assert_eq!(sentiment(1, 1), Sentiment::Neutral);
    }
}
