// src/repository.rs

use crate::constants::*;
use crate::models::{
    DifficultyLevel, HistoryItem, OfflineProblemBank, ParentAuthRecord, ProgressEvent,
    SessionOutcome, UserProfile,
};
use crate::store;
use chrono::Utc;
use log::debug;
use rusqlite::Connection;
use uuid::Uuid;

// --- Unlocked Levels ---

/// A fresh install starts with only the easiest tier unlocked.
pub fn load_unlocked_levels(conn: &Connection) -> Vec<DifficultyLevel> {
    store::load(conn, KEY_UNLOCKED_LEVELS).unwrap_or_else(|| vec![DifficultyLevel::Easy])
}

pub fn save_unlocked_levels(conn: &Connection, levels: &[DifficultyLevel]) {
    store::save(conn, KEY_UNLOCKED_LEVELS, &levels);
}

/// Unlocks `level` if it is not already unlocked. Returns true when the
/// level was newly added.
pub fn unlock_level(conn: &Connection, level: DifficultyLevel) -> bool {
    let mut levels = load_unlocked_levels(conn);
    if levels.contains(&level) {
        return false;
    }
    debug!("Unlocking level {}", level.as_str());
    levels.push(level);
    save_unlocked_levels(conn, &levels);
    true
}

// --- Legacy History ---

pub fn load_history(conn: &Connection) -> Vec<HistoryItem> {
    store::load(conn, KEY_HISTORY).unwrap_or_default()
}

/// Prepends `item` and keeps the most recent entries, capped.
pub fn append_history(conn: &Connection, item: HistoryItem) {
    let mut history = load_history(conn);
    history.insert(0, item);
    history.truncate(HISTORY_CAP);
    store::save(conn, KEY_HISTORY, &history);
}

// --- Progress Event Log ---

/// All retained events, most recent first.
pub fn load_progress_events(conn: &Connection) -> Vec<ProgressEvent> {
    store::load(conn, KEY_PROGRESS_EVENTS).unwrap_or_default()
}

/// Prepends `event` and truncates the log to the retention cap. Events are
/// never mutated once stored.
pub fn append_progress_event(conn: &Connection, event: ProgressEvent) {
    let mut events = load_progress_events(conn);
    events.insert(0, event);
    events.truncate(PROGRESS_EVENT_CAP);
    store::save(conn, KEY_PROGRESS_EVENTS, &events);
}

/// Stamps a session outcome with a fresh id and the current time, appends
/// it to the log and returns the stored event.
pub fn record_session_outcome(conn: &Connection, outcome: SessionOutcome) -> ProgressEvent {
    let event = ProgressEvent {
        id: Uuid::new_v4().to_string(),
        kind: outcome.kind,
        date: Utc::now().to_rfc3339(),
        level: outcome.level,
        topic: outcome.topic,
        correct: outcome.correct,
        total: outcome.total,
        wrong_problem_ids: outcome.wrong_problem_ids,
    };
    debug!(
        "Recording {:?} session: {}/{}",
        event.kind, event.correct, event.total
    );
    append_progress_event(conn, event.clone());
    event
}

/// Records a finished exam in both logs: the legacy history list and the
/// progress event log. The two writes are independent and not atomic; a
/// crash between them leaves advisory data slightly inconsistent, which is
/// accepted.
pub fn record_exam_result(conn: &Connection, outcome: SessionOutcome) -> ProgressEvent {
    append_history(
        conn,
        HistoryItem {
            date: Utc::now().to_rfc3339(),
            score: outcome.correct,
            total: outcome.total,
            level: outcome.level.unwrap_or(DifficultyLevel::Easy),
        },
    );
    record_session_outcome(conn, outcome)
}

// --- Profile ---

pub fn save_profile(conn: &Connection, profile: &UserProfile) {
    store::save(conn, KEY_PROFILE, profile);
}

pub fn load_profile(conn: &Connection) -> Option<UserProfile> {
    store::load(conn, KEY_PROFILE)
}

// --- Parent Auth ---

pub fn save_parent_auth(conn: &Connection, record: &ParentAuthRecord) {
    store::save(conn, KEY_PARENT_AUTH, record);
}

pub fn load_parent_auth(conn: &Connection) -> Option<ParentAuthRecord> {
    store::load(conn, KEY_PARENT_AUTH)
}

pub fn clear_parent_auth(conn: &Connection) {
    store::remove(conn, KEY_PARENT_AUTH);
}

// --- Offline Bank ---

pub fn save_offline_bank(conn: &Connection, bank: &OfflineProblemBank) {
    store::save(conn, KEY_OFFLINE_BANK, bank);
}

pub fn load_offline_bank(conn: &Connection) -> Option<OfflineProblemBank> {
    store::load(conn, KEY_OFFLINE_BANK)
}

// --- Flags ---

pub fn set_banner_dismissed(conn: &Connection) {
    store::save(conn, KEY_BANNER_DISMISSED, &true);
}

pub fn is_banner_dismissed(conn: &Connection) -> bool {
    store::load(conn, KEY_BANNER_DISMISSED).unwrap_or(false)
}

pub fn set_privacy_accepted(conn: &Connection) {
    store::save(conn, KEY_PRIVACY_ACCEPTED, &true);
}

pub fn is_privacy_accepted(conn: &Connection) -> bool {
    store::load(conn, KEY_PRIVACY_ACCEPTED).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::models::SessionKind;
    use chrono::{Duration, TimeZone};

    fn outcome(correct: u32, total: u32) -> SessionOutcome {
        SessionOutcome {
            kind: SessionKind::Learning,
            level: Some(DifficultyLevel::Easy),
            topic: None,
            correct,
            total,
            wrong_problem_ids: Vec::new(),
        }
    }

    #[test]
    fn test_unlocked_levels_default_to_easy() {
        let conn = database::open_in_memory().unwrap();
        assert_eq!(load_unlocked_levels(&conn), vec![DifficultyLevel::Easy]);
    }

    #[test]
    fn test_unlock_level_is_idempotent() {
        let conn = database::open_in_memory().unwrap();
        assert!(unlock_level(&conn, DifficultyLevel::Medium));
        assert!(!unlock_level(&conn, DifficultyLevel::Medium));
        assert_eq!(
            load_unlocked_levels(&conn),
            vec![DifficultyLevel::Easy, DifficultyLevel::Medium]
        );
    }

    #[test]
    fn test_profile_round_trip() {
        let conn = database::open_in_memory().unwrap();
        let profile = UserProfile {
            name: "Tuka".to_string(),
            birthday: "2016-02-01".to_string(),
            language: Some("de".to_string()),
            gender: None,
        };
        save_profile(&conn, &profile);
        assert_eq!(load_profile(&conn), Some(profile));
    }

    #[test]
    fn test_history_prepends_and_caps_at_50() {
        let conn = database::open_in_memory().unwrap();
        let base = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut last_date = String::new();
        for i in 0..55 {
            last_date = (base + Duration::days(i)).to_rfc3339();
            append_history(
                &conn,
                HistoryItem {
                    date: last_date.clone(),
                    score: 3,
                    total: 5,
                    level: DifficultyLevel::Easy,
                },
            );
        }

        let history = load_history(&conn);
        assert_eq!(history.len(), 50);
        assert_eq!(history[0].date, last_date);
    }

    #[test]
    fn test_progress_events_capped_at_500_most_recent_first() {
        let conn = database::open_in_memory().unwrap();

        let mut last_id = String::new();
        for i in 0..505 {
            last_id = record_session_outcome(&conn, outcome(i % 6, 5)).id;
        }

        let events = load_progress_events(&conn);
        assert_eq!(events.len(), 500);
        assert_eq!(events[0].id, last_id);
    }

    #[test]
    fn test_progress_event_ids_are_unique() {
        let conn = database::open_in_memory().unwrap();
        let a = record_session_outcome(&conn, outcome(4, 5));
        let b = record_session_outcome(&conn, outcome(5, 5));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_exam_result_writes_both_logs() {
        let conn = database::open_in_memory().unwrap();
        let exam = SessionOutcome {
            kind: SessionKind::Exam,
            level: Some(DifficultyLevel::Medium),
            topic: Some("division".to_string()),
            correct: 4,
            total: 5,
            wrong_problem_ids: vec!["p-9".to_string()],
        };
        record_exam_result(&conn, exam);

        let history = load_history(&conn);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 4);
        assert_eq!(history[0].level, DifficultyLevel::Medium);

        let events = load_progress_events(&conn);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SessionKind::Exam);
        assert_eq!(events[0].wrong_problem_ids, vec!["p-9".to_string()]);
    }

    #[test]
    fn test_parent_auth_round_trip_and_clear() {
        let conn = database::open_in_memory().unwrap();
        assert!(load_parent_auth(&conn).is_none());

        let record = ParentAuthRecord {
            username: "MamaPapa".to_string(),
            password_salt: "00".repeat(16),
            password_hash_hex: "11".repeat(32),
        };
        save_parent_auth(&conn, &record);
        assert_eq!(load_parent_auth(&conn).unwrap().username, "MamaPapa");

        clear_parent_auth(&conn);
        assert!(load_parent_auth(&conn).is_none());
    }

    #[test]
    fn test_flags_default_to_false() {
        let conn = database::open_in_memory().unwrap();
        assert!(!is_banner_dismissed(&conn));
        assert!(!is_privacy_accepted(&conn));

        set_banner_dismissed(&conn);
        set_privacy_accepted(&conn);
        assert!(is_banner_dismissed(&conn));
        assert!(is_privacy_accepted(&conn));
    }
}
