// src/parent_auth.rs

use crate::constants::*;
use crate::crypto;
use crate::models::{GateState, ParentAuthRecord};
use crate::repository;
use log::info;
use rusqlite::Connection;
use thiserror::Error;

/// Caller-visible failures of the parent gate. Storage faults never show
/// up here; they degrade inside the store layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must be at least {} characters", PASSWORD_MIN_LEN)]
    WeakPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("username or password is incorrect")]
    InvalidCredentials,
    #[error("secure password hashing is not available on this device")]
    CryptoUnavailable,
}

/// Must be checked before offering setup or login; when false the whole
/// parent area stays disabled (fail closed).
pub fn is_available() -> bool {
    crypto::is_crypto_available()
}

/// Minimum length only, no composition rules.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Builds the single local credential record: fresh random salt, digest of
/// `salt:password`. The caller persists it via the repository.
pub fn create_parent_auth_record(
    username: &str,
    password: &str,
) -> Result<ParentAuthRecord, AuthError> {
    let clean_user = username.trim();
    if clean_user.is_empty() {
        return Err(AuthError::EmptyUsername);
    }
    validate_password_strength(password)?;

    let salt = crypto::random_salt_hex(SALT_BYTES).map_err(|_| AuthError::CryptoUnavailable)?;
    let password_hash_hex = crypto::sha256_hex(&format!("{}:{}", salt, password));

    Ok(ParentAuthRecord {
        username: clean_user.to_string(),
        password_salt: salt,
        password_hash_hex,
    })
}

/// Never errors: any mismatch or internal failure reads as `false`, so a
/// wrong username is indistinguishable from a wrong password.
pub fn verify_parent_credentials(
    record: &ParentAuthRecord,
    username: &str,
    password: &str,
) -> bool {
    if username.trim() != record.username {
        return false;
    }
    let computed = crypto::sha256_hex(&format!("{}:{}", record.password_salt, password));
    crypto::safe_compare_hex(&computed, &record.password_hash_hex)
}

/// Display-safe partial reveal for the login hint. Not a security control.
pub fn mask_username(username: &str) -> String {
    let chars: Vec<char> = username.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 2 {
        return format!("{}*", chars[0]);
    }
    let visible: String = chars[..2].iter().collect();
    let masked = (chars.len() - 2).min(MASK_MAX_CHARS);
    format!("{}{}", visible, "*".repeat(masked))
}

// --- Gate State Machine ---

/// Initial state when the parent area opens: `Setup` until a credential
/// record exists, `Login` afterwards.
pub fn gate_state(conn: &Connection) -> GateState {
    if repository::load_parent_auth(conn).is_some() {
        GateState::Login
    } else {
        GateState::Setup
    }
}

/// First-time setup: validates, creates and persists the credential record,
/// then opens the dashboard directly.
pub fn setup_parent_access(
    conn: &Connection,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<GateState, AuthError> {
    if !is_available() {
        return Err(AuthError::CryptoUnavailable);
    }
    if username.trim().is_empty() {
        return Err(AuthError::EmptyUsername);
    }
    validate_password_strength(password)?;
    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }

    let record = create_parent_auth_record(username, password)?;
    repository::save_parent_auth(conn, &record);
    info!("Parent access configured for {}", mask_username(&record.username));
    Ok(GateState::Dashboard)
}

/// Login against the stored record. A missing record (reset in the
/// meantime) sends the caller back to setup.
pub fn login_parent(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<GateState, AuthError> {
    let record = match repository::load_parent_auth(conn) {
        Some(record) => record,
        None => return Ok(GateState::Setup),
    };

    if verify_parent_credentials(&record, username, password) {
        Ok(GateState::Dashboard)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Destroys the credential record, gated by a literal confirmation input.
/// Returns `None` when the confirmation does not match; there is no
/// password recovery, only this full reset.
pub fn reset_parent_access(conn: &Connection, confirmation: &str) -> Option<GateState> {
    if confirmation != RESET_CONFIRMATION {
        return None;
    }
    repository::clear_parent_auth(conn);
    info!("Parent access reset");
    Some(GateState::Setup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    #[test]
    fn test_create_then_verify_round_trip() {
        let record = create_parent_auth_record("MamaPapa", "secret6").unwrap();
        assert!(verify_parent_credentials(&record, "MamaPapa", "secret6"));
        assert!(!verify_parent_credentials(&record, "MamaPapa", "secret7"));
        assert!(!verify_parent_credentials(&record, "PapaMama", "secret6"));
    }

    #[test]
    fn test_create_trims_username() {
        let record = create_parent_auth_record("  MamaPapa  ", "secret6").unwrap();
        assert_eq!(record.username, "MamaPapa");
        assert!(verify_parent_credentials(&record, " MamaPapa ", "secret6"));
    }

    #[test]
    fn test_create_rejects_empty_username() {
        assert_eq!(
            create_parent_auth_record("   ", "secret6"),
            Err(AuthError::EmptyUsername)
        );
    }

    #[test]
    fn test_create_rejects_weak_password() {
        assert_eq!(
            create_parent_auth_record("MamaPapa", "12345"),
            Err(AuthError::WeakPassword)
        );
    }

    #[test]
    fn test_record_shape() {
        let record = create_parent_auth_record("MamaPapa", "secret6").unwrap();
        assert_eq!(record.password_salt.len(), SALT_BYTES * 2);
        assert_eq!(record.password_hash_hex.len(), 64);
    }

    #[test]
    fn test_mask_username() {
        assert_eq!(mask_username(""), "");
        assert_eq!(mask_username("A"), "A*");
        assert_eq!(mask_username("Al"), "A*");
        assert_eq!(mask_username("Alex"), "Al**");
        assert_eq!(mask_username("MamaPapa"), "Ma******");
        assert_eq!(mask_username("VeryLongParentName"), "Ve********");
    }

    #[test]
    fn test_gate_setup_then_dashboard() {
        let conn = database::open_in_memory().unwrap();
        assert_eq!(gate_state(&conn), GateState::Setup);

        let state = setup_parent_access(&conn, "MamaPapa", "secret6", "secret6").unwrap();
        assert_eq!(state, GateState::Dashboard);

        let record = repository::load_parent_auth(&conn).unwrap();
        assert_eq!(record.username, "MamaPapa");
        assert_eq!(record.password_hash_hex.len(), 64);
        assert!(record
            .password_hash_hex
            .chars()
            .all(|c| c.is_ascii_hexdigit()));

        // Next open lands on login, not setup.
        assert_eq!(gate_state(&conn), GateState::Login);
    }

    #[test]
    fn test_setup_rejects_password_mismatch() {
        let conn = database::open_in_memory().unwrap();
        assert_eq!(
            setup_parent_access(&conn, "MamaPapa", "secret6", "secret7"),
            Err(AuthError::PasswordMismatch)
        );
        assert_eq!(gate_state(&conn), GateState::Setup);
    }

    #[test]
    fn test_login_success_and_failure() {
        let conn = database::open_in_memory().unwrap();
        setup_parent_access(&conn, "MamaPapa", "secret6", "secret6").unwrap();

        assert_eq!(
            login_parent(&conn, "MamaPapa", "secret6"),
            Ok(GateState::Dashboard)
        );
        assert_eq!(
            login_parent(&conn, "MamaPapa", "wrong-pass"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            login_parent(&conn, "Wrong", "secret6"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_login_without_record_returns_to_setup() {
        let conn = database::open_in_memory().unwrap();
        assert_eq!(
            login_parent(&conn, "MamaPapa", "secret6"),
            Ok(GateState::Setup)
        );
    }

    #[test]
    fn test_reset_requires_literal_confirmation() {
        let conn = database::open_in_memory().unwrap();
        setup_parent_access(&conn, "MamaPapa", "secret6", "secret6").unwrap();

        assert_eq!(reset_parent_access(&conn, "reset"), None);
        assert!(repository::load_parent_auth(&conn).is_some());

        assert_eq!(reset_parent_access(&conn, "RESET"), Some(GateState::Setup));
        assert!(repository::load_parent_auth(&conn).is_none());
        assert_eq!(gate_state(&conn), GateState::Setup);
    }
}
