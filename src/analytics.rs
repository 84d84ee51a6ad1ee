// src/analytics.rs

use crate::constants::*;
use crate::models::{DifficultyLevel, ProgressEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;

// --- Aggregates ---

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBreakdown {
    /// `None` is the bucket for events recorded without a level.
    pub level: Option<DifficultyLevel>,
    pub correct: u32,
    pub total: u32,
    /// Rounded percentage, 0 when the bucket has no questions.
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    pub total_sessions: usize,
    pub total_correct: u32,
    pub total_questions: u32,
    pub overall_accuracy: u32,
    pub per_level: Vec<LevelBreakdown>,
    pub score: u32,
}

fn parse_date(date: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(fallback)
}

fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Most recent first. ISO-8601 dates compare lexicographically, so this is
/// a plain string sort; insertion order is kept for equal timestamps.
pub fn sort_events_desc(events: &[ProgressEvent]) -> Vec<ProgressEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Composite 0-100 score over the most recent events: mean per-session
/// accuracy plus a bonus for practicing in a tight time window. Expects
/// events most recent first. The window size, day normalization and bonus
/// ceiling are fixed heuristics, not a validated model.
pub fn learning_score(events: &[ProgressEvent]) -> u32 {
    if events.is_empty() {
        return 0;
    }

    let recent = &events[..events.len().min(SCORE_RECENT_WINDOW)];
    let accuracy = recent
        .iter()
        .map(|e| {
            if e.total > 0 {
                e.correct as f64 / e.total as f64
            } else {
                0.0
            }
        })
        .sum::<f64>()
        / recent.len() as f64;

    let now = Utc::now();
    let newest = parse_date(&recent[0].date, now);
    let oldest = parse_date(&recent[recent.len() - 1].date, now);
    let days = ((newest - oldest).num_milliseconds() as f64 / DAY_MILLIS as f64)
        .round()
        .max(1.0);

    let consistency_bonus = (1.0 - days / CONSISTENCY_SPAN_DAYS).clamp(0.0, 1.0) * CONSISTENCY_BONUS_MAX;

    ((accuracy + consistency_bonus).clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Everything the parent dashboard shows, recomputed from the raw event
/// log on every call.
pub fn aggregate(events: &[ProgressEvent]) -> AggregateTotals {
    let events = sort_events_desc(events);

    let total_sessions = events.len();
    let total_correct: u32 = events.iter().map(|e| e.correct).sum();
    let total_questions: u32 = events.iter().map(|e| e.total).sum();
    let overall_accuracy = percent(total_correct, total_questions);

    let mut per_level = Vec::new();
    let buckets = DifficultyLevel::ORDERED
        .iter()
        .map(|level| Some(*level))
        .chain(std::iter::once(None));
    for bucket in buckets {
        let mut correct = 0u32;
        let mut total = 0u32;
        let mut seen = false;
        for event in events.iter().filter(|e| e.level == bucket) {
            correct += event.correct;
            total += event.total;
            seen = true;
        }
        if seen {
            per_level.push(LevelBreakdown {
                level: bucket,
                correct,
                total,
                accuracy: percent(correct, total),
            });
        }
    }

    let score = learning_score(&events);

    AggregateTotals {
        total_sessions,
        total_correct,
        total_questions,
        overall_accuracy,
        per_level,
        score,
    }
}

// --- Recommendations ---

/// Rule-based next-step guidance from the recent event window. `now` is
/// injected so the staleness rule is testable without clock mocking.
pub fn recommendations_at(events: &[ProgressEvent], now: DateTime<Utc>) -> Vec<String> {
    let events = sort_events_desc(events);
    let mut recs = Vec::new();

    if events.is_empty() {
        recs.push("Start with 3 short sessions (5-10 minutes) per week to build a rhythm.".to_string());
        recs.push("Begin with \"Easy\" and only move up once accuracy stays around 85%.".to_string());
        return recs;
    }

    let recent = &events[..events.len().min(RECO_RECENT_WINDOW)];
    let recent_total: u32 = recent.iter().map(|e| e.total).sum();
    let recent_correct: u32 = recent.iter().map(|e| e.correct).sum();
    let recent_accuracy = if recent_total > 0 {
        recent_correct as f64 / recent_total as f64 * 100.0
    } else {
        0.0
    };

    if recent_accuracy < RECO_ACCURACY_LOW {
        recs.push(
            "Recent accuracy below 60%: repeat \"Easy\" or \"Medium\" and use the step-by-step help."
                .to_string(),
        );
        recs.push("Train in short blocks: five problems, then a break.".to_string());
    } else if recent_accuracy >= RECO_ACCURACY_HIGH {
        recs.push(
            "Recent accuracy at 85% or above: raise the difficulty or try an \"Exam\" round."
                .to_string(),
        );
        recs.push("Add one puzzle session per week.".to_string());
    } else {
        recs.push(
            "Good direction: stay on the current level for 2-3 more sessions, then move up."
                .to_string(),
        );
    }

    let last = parse_date(&events[0].date, now);
    let days_since = ((now - last).num_milliseconds() as f64 / DAY_MILLIS as f64).round() as i64;
    if days_since >= RECO_STALE_DAYS {
        recs.push(
            "Tip: a small daily routine (5-10 minutes) works better than rare long sessions."
                .to_string(),
        );
    }

    recs
}

pub fn recommendations(events: &[ProgressEvent]) -> Vec<String> {
    recommendations_at(events, Utc::now())
}
