// src/lib.rs

pub mod analytics;
pub mod constants;
pub mod crypto;
pub mod database;
pub mod models;
pub mod offline_problems;
pub mod parent_auth;
pub mod repository;
pub mod store;

pub use analytics::{AggregateTotals, LevelBreakdown};
pub use models::{
    DifficultyLevel, GateState, HistoryItem, MathProblem, OfflineProblem, OfflineProblemBank,
    ParentAuthRecord, ProgressEvent, SessionKind, SessionOutcome, UserProfile,
};
pub use parent_auth::AuthError;
