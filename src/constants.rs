// src/constants.rs

// --- Time Constants ---
pub const DAY_SECONDS: i64 = 86400;
pub const DAY_MILLIS: i64 = DAY_SECONDS * 1000;

// --- Storage Keys ---
// One namespaced key per persisted entity, one JSON blob each.
pub const KEY_UNLOCKED_LEVELS: &str = "math_trainer_unlocked_levels";
pub const KEY_HISTORY: &str = "math_trainer_history";
pub const KEY_PROFILE: &str = "math_trainer_profile";
pub const KEY_PROGRESS_EVENTS: &str = "math_trainer_progress_events";
pub const KEY_OFFLINE_BANK: &str = "math_trainer_offline_bank";
pub const KEY_PARENT_AUTH: &str = "math_trainer_parent_auth";
pub const KEY_BANNER_DISMISSED: &str = "math_trainer_banner_dismissed";
pub const KEY_PRIVACY_ACCEPTED: &str = "math_trainer_privacy_accepted";

// --- Log Caps ---
pub const PROGRESS_EVENT_CAP: usize = 500;
pub const HISTORY_CAP: usize = 50;

// --- Offline Problem Bank ---
pub const BANK_VERSION: u32 = 1;
pub const BANK_SEED_SIZE: usize = 100; // Generated corpus size
pub const BANK_MIN_SIZE: usize = 50; // Below this a stored bank is rebuilt
pub const BANK_CAP: usize = 200; // Hard cap after caching fetched problems

// --- Parent Auth ---
pub const SALT_BYTES: usize = 16;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const RESET_CONFIRMATION: &str = "RESET";
pub const MASK_MAX_CHARS: usize = 8;

// --- Learning Score Heuristics ---
pub const SCORE_RECENT_WINDOW: usize = 10; // Events considered
pub const CONSISTENCY_SPAN_DAYS: f64 = 30.0; // Normalization span
pub const CONSISTENCY_BONUS_MAX: f64 = 0.15; // Up to 15 percentage points

// --- Recommendation Heuristics ---
pub const RECO_RECENT_WINDOW: usize = 5;
pub const RECO_ACCURACY_LOW: f64 = 60.0; // Percent
pub const RECO_ACCURACY_HIGH: f64 = 85.0; // Percent
pub const RECO_STALE_DAYS: i64 = 3;
