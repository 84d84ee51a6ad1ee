// src/offline_problems.rs

use crate::constants::*;
use crate::models::{DifficultyLevel, MathProblem, OfflineProblem, OfflineProblemBank};
use crate::repository;
use chrono::Utc;
use log::{debug, info};
use rusqlite::Connection;
use std::collections::HashSet;

// --- Generator Helpers ---

fn make_add(a: i64, b: i64) -> (String, i64) {
    (format!("{} + {} = ?", a, b), a + b)
}

fn make_sub(a: i64, b: i64) -> (String, i64) {
    (format!("{} - {} = ?", a, b), a - b)
}

fn make_mul(a: i64, b: i64) -> (String, i64) {
    (format!("{} × {} = ?", a, b), a * b)
}

// a divisible by b
fn make_div(a: i64, b: i64) -> (String, i64) {
    (format!("{} ÷ {} = ?", a, b), a / b)
}

#[allow(clippy::too_many_arguments)]
fn build_problem(
    id: String,
    question: String,
    answer: i64,
    steps: Vec<String>,
    hints: Vec<String>,
    explanation: String,
    level: DifficultyLevel,
) -> OfflineProblem {
    OfflineProblem {
        id,
        question,
        answer: answer.to_string(),
        options: None,
        steps,
        explanation,
        hints,
        offline_level: Some(level),
    }
}

/// Deterministically synthesizes the seed corpus: exactly
/// `BANK_SEED_SIZE` problems covering all four tiers, identical on every
/// call. Selection varies by day, generation never does.
pub fn generate_bank_problems() -> Vec<OfflineProblem> {
    let mut problems: Vec<OfflineProblem> = Vec::new();
    let mut i = 1;

    // Easy: small additions and subtractions up to 20
    for a in 1..=10 {
        for b in 1..=2 {
            let (question, answer) = make_add(a, b);
            problems.push(build_problem(
                format!("offline-easy-{}", i),
                question,
                answer,
                vec![
                    format!("Count {} and {} together.", a, b),
                    format!("The result is {}.", answer),
                ],
                vec![
                    "You can count on your fingers.".to_string(),
                    format!("First {}, then {} more.", a, b),
                ],
                format!("Adding {} and {} gives {}.", a, b, answer),
                DifficultyLevel::Easy,
            ));
            i += 1;
        }
    }
    for a in 10..=20 {
        let b = 1 + (a % 5);
        let (question, answer) = make_sub(a, b);
        problems.push(build_problem(
            format!("offline-easy-{}", i),
            question,
            answer,
            vec![
                format!("Start at {}.", a),
                format!("Count {} backwards.", b),
                format!("You land on {}.", answer),
            ],
            vec![
                "Counting backwards helps.".to_string(),
                "You can take small steps.".to_string(),
            ],
            format!("Taking {} away from {} leaves {}.", b, a, answer),
            DifficultyLevel::Easy,
        ));
        i += 1;
    }

    // Medium: additions and subtractions up to 100, easy times tables
    for a in (12..=30).step_by(3) {
        let (question, answer) = make_add(a, 17);
        problems.push(build_problem(
            format!("offline-medium-{}", i),
            question,
            answer,
            vec![
                format!("First {} + 10 = {}.", a, a + 10),
                format!("Then + 7 = {}.", answer),
            ],
            vec![
                "Split 17 into 10 and 7.".to_string(),
                "Work in two steps.".to_string(),
            ],
            format!("{} + 17 = {} (add 10, then 7).", a, answer),
            DifficultyLevel::Medium,
        ));
        i += 1;
    }
    for a in (40..=80).step_by(5) {
        let (question, answer) = make_sub(a, 18);
        problems.push(build_problem(
            format!("offline-medium-{}", i),
            question,
            answer,
            vec![
                format!("Subtract 10 first: {} - 10 = {}.", a, a - 10),
                format!("Then subtract 8: {}.", answer),
            ],
            vec![
                "Split 18 into 10 and 8.".to_string(),
                "Do it step by step.".to_string(),
            ],
            format!("{} - 18 = {}.", a, answer),
            DifficultyLevel::Medium,
        ));
        i += 1;
    }
    for a in 2..=10 {
        let (question, answer) = make_mul(a, 3);
        problems.push(build_problem(
            format!("offline-medium-{}", i),
            question,
            answer,
            vec![
                format!("{} × 3 means: {} + {} + {}.", a, a, a, a),
                format!("That is {}.", answer),
            ],
            vec![
                "Think of repeated addition.".to_string(),
                "Three times the same number.".to_string(),
            ],
            format!("{} × 3 = {}.", a, answer),
            DifficultyLevel::Medium,
        ));
        i += 1;
    }

    // Hard: times tables and division facts
    for a in 6..=12 {
        let (question, answer) = make_mul(a, 7);
        problems.push(build_problem(
            format!("offline-hard-{}", i),
            question,
            answer,
            vec![format!("Remember: 7 × {} = {}.", a, answer)],
            vec![
                "Use rows you already know (like 7 × 10) and adjust.".to_string(),
                "You can also take 7 × 5 and add the rest.".to_string(),
            ],
            format!("{} times 7 is {}.", a, answer),
            DifficultyLevel::Hard,
        ));
        i += 1;
    }
    for b in 2..=6 {
        let a = b * 12;
        let (question, answer) = make_div(a, b);
        problems.push(build_problem(
            format!("offline-hard-{}", i),
            question,
            answer,
            vec![
                format!("Ask: which number × {} = {}?", b, a),
                format!("That is {}.", answer),
            ],
            vec![
                "Division undoes multiplication.".to_string(),
                "Look for the matching times-table fact.".to_string(),
            ],
            format!("{} divided by {} is {}.", a, b, answer),
            DifficultyLevel::Hard,
        ));
        i += 1;
    }

    // Exam tier: fixed mixed-operation set
    let mixed: [(&str, i64, &[&str], &[&str], &str); 5] = [
        (
            "25 + 37 = ?",
            62,
            &["25 + 30 = 55", "55 + 7 = 62"],
            &["37 = 30 + 7", "Tens first, then ones."],
            "Add 30 first, then 7.",
        ),
        (
            "80 - 46 = ?",
            34,
            &["80 - 40 = 40", "40 - 6 = 34"],
            &["46 = 40 + 6", "Subtract in two steps."],
            "Take away 40 first, then 6.",
        ),
        (
            "9 × 6 = ?",
            54,
            &["9 × 6 = 54"],
            &["6 × 10 = 60, then 6 less."],
            "9 × 6 is 54.",
        ),
        (
            "56 ÷ 7 = ?",
            8,
            &["Which number × 7 = 56?", "That is 8."],
            &["7 × 8 = 56"],
            "56 divided by 7 is 8.",
        ),
        (
            "(12 + 8) - 5 = ?",
            15,
            &["12 + 8 = 20", "20 - 5 = 15"],
            &["Solve the brackets first.", "Then minus 5."],
            "Add first, then subtract.",
        ),
    ];
    for (q, a, steps, hints, exp) in mixed {
        problems.push(build_problem(
            format!("offline-exam-{}", i),
            q.to_string(),
            a,
            steps.iter().map(|s| s.to_string()).collect(),
            hints.iter().map(|s| s.to_string()).collect(),
            exp.to_string(),
            DifficultyLevel::Exam,
        ));
        i += 1;
    }

    // Pad with simple additions until the corpus is full.
    while problems.len() < BANK_SEED_SIZE {
        let a = 1 + (problems.len() as i64 % 10);
        let b = 1 + (problems.len() as i64 % 3);
        let (question, answer) = make_add(a, b);
        problems.push(build_problem(
            format!("offline-fill-{}", i),
            question,
            answer,
            vec![
                format!("Count {} and {} together.", a, b),
                format!("The result is {}.", answer),
            ],
            vec!["Count slowly.".to_string(), "You can do it!".to_string()],
            format!("{} + {} = {}.", a, b, answer),
            DifficultyLevel::Easy,
        ));
        i += 1;
    }

    problems.truncate(BANK_SEED_SIZE);
    problems
}

// --- Bank Lifecycle ---

/// Returns the stored bank when it is structurally valid, otherwise seeds
/// a fresh one and persists it.
pub fn ensure_offline_bank(conn: &Connection) -> OfflineProblemBank {
    if let Some(bank) = repository::load_offline_bank(conn) {
        if bank.version == BANK_VERSION && bank.problems.len() >= BANK_MIN_SIZE {
            return bank;
        }
        info!("Stored offline bank is stale or invalid, reseeding");
    } else {
        info!("Seeding offline problem bank");
    }

    let bank = OfflineProblemBank {
        created_at: Utc::now().to_rfc3339(),
        version: BANK_VERSION,
        problems: generate_bank_problems(),
    };
    repository::save_offline_bank(conn, &bank);
    bank
}

/// Days since the Unix epoch, UTC. Injected into the selection so tests
/// can simulate days without mocking the clock.
pub fn current_day_index() -> i64 {
    Utc::now().timestamp().div_euclid(DAY_SECONDS)
}

/// Deterministic rotating selection: the same day yields the same
/// problems, consecutive days advance cyclically through the pool.
/// Problems tagged with `level` are preferred; an empty pool falls back to
/// the whole bank.
pub fn offline_problems_for_day(
    conn: &Connection,
    level: DifficultyLevel,
    count: usize,
    day_index: i64,
) -> Vec<MathProblem> {
    let bank = ensure_offline_bank(conn);
    let pool: Vec<&OfflineProblem> = bank
        .problems
        .iter()
        .filter(|p| p.offline_level == Some(level))
        .collect();
    let source: Vec<&OfflineProblem> = if pool.is_empty() {
        bank.problems.iter().collect()
    } else {
        pool
    };
    if source.is_empty() {
        return Vec::new();
    }

    let start = day_index.rem_euclid(source.len() as i64) as usize;
    (0..count)
        .map(|offset| source[(start + offset) % source.len()].to_problem())
        .collect()
}

/// Today's offline selection for a session screen.
pub fn offline_problems(conn: &Connection, level: DifficultyLevel, count: usize) -> Vec<MathProblem> {
    offline_problems_for_day(conn, level, count, current_day_index())
}

/// Folds freshly fetched problems into the bank so future offline sessions
/// can reuse them. Deduplicates by id, keeps new content at the front and
/// caps the bank to stop it from growing without bound.
pub fn cache_problems(conn: &Connection, problems: &[MathProblem]) {
    if problems.is_empty() {
        return;
    }

    let mut bank = ensure_offline_bank(conn);
    let existing: HashSet<String> = bank.problems.iter().map(|p| p.id.clone()).collect();

    let new: Vec<OfflineProblem> = problems
        .iter()
        .filter(|p| !p.id.is_empty() && !existing.contains(&p.id))
        .map(|p| OfflineProblem::from_problem(p.clone(), None))
        .collect();
    if new.is_empty() {
        return;
    }

    debug!("Caching {} fetched problems into the offline bank", new.len());
    let mut merged = new;
    merged.extend(bank.problems);
    merged.truncate(BANK_CAP);
    bank.problems = merged;
    repository::save_offline_bank(conn, &bank);
}
