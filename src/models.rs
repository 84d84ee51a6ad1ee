// src/models.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// --- Difficulty ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy = 1,
    Medium = 2,
    Hard = 3,
    Exam = 4,
}

impl DifficultyLevel {
    /// Progression order used by the level map and per-level breakdowns.
    pub const ORDERED: [DifficultyLevel; 4] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Exam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::Exam => "Exam",
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(DifficultyLevel::Easy),
            "Medium" => Ok(DifficultyLevel::Medium),
            "Hard" => Ok(DifficultyLevel::Hard),
            "Exam" => Ok(DifficultyLevel::Exam),
            _ => Ok(DifficultyLevel::Easy), // Default fallback
        }
    }
}

impl ToString for DifficultyLevel {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

// --- Session Outcomes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Learning,
    Exam,
}

/// One completed practice or exam session, as reported by a session screen.
/// The repository stamps it with an id and timestamp on append.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub level: Option<DifficultyLevel>,
    pub topic: Option<String>,
    pub correct: u32,
    pub total: u32,
    #[serde(default)]
    pub wrong_problem_ids: Vec<String>,
}

/// One stored record of the progress event log. Append-only, capped,
/// most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub date: String,
    pub level: Option<DifficultyLevel>,
    pub topic: Option<String>,
    pub correct: u32,
    pub total: u32,
    #[serde(default)]
    pub wrong_problem_ids: Vec<String>,
}

/// Legacy exam-result record, kept for backward compatibility with the
/// older history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub date: String,
    pub score: u32,
    pub total: u32,
    pub level: DifficultyLevel,
}

// --- Problems ---

/// A problem in the shape the generator produces; session screens never
/// need to know whether it came from the network or the offline bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathProblem {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub steps: Vec<String>,
    pub explanation: String,
    pub hints: Vec<String>,
}

/// Bank entry: a problem plus its assigned difficulty tag. Problems cached
/// from the generator carry no tag and only serve the full-pool fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineProblem {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub steps: Vec<String>,
    pub explanation: String,
    pub hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_level: Option<DifficultyLevel>,
}

impl OfflineProblem {
    pub fn from_problem(problem: MathProblem, offline_level: Option<DifficultyLevel>) -> Self {
        OfflineProblem {
            id: problem.id,
            question: problem.question,
            answer: problem.answer,
            options: problem.options,
            steps: problem.steps,
            explanation: problem.explanation,
            hints: problem.hints,
            offline_level,
        }
    }

    pub fn to_problem(&self) -> MathProblem {
        MathProblem {
            id: self.id.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            options: self.options.clone(),
            steps: self.steps.clone(),
            explanation: self.explanation.clone(),
            hints: self.hints.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineProblemBank {
    pub created_at: String,
    pub version: u32,
    pub problems: Vec<OfflineProblem>,
}

// --- Parent Area ---

/// The single local parent credential. Created on first setup, destroyed
/// wholesale on reset, never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentAuthRecord {
    pub username: String,
    pub password_salt: String,
    pub password_hash_hex: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Setup,
    Login,
    Dashboard,
}

// --- Profile ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub birthday: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}
