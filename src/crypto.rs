// src/crypto.rs

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Lowercase hex SHA-256 digest of `text`.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Fresh salt from the OS entropy source, hex encoded.
pub fn random_salt_hex(byte_length: usize) -> Result<String, rand::Error> {
    let mut bytes = vec![0u8; byte_length];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

/// True iff the platform can supply the entropy the credential vault needs.
/// The digest itself is pure code and cannot be absent.
pub fn is_crypto_available() -> bool {
    let mut probe = [0u8; 16];
    OsRng.try_fill_bytes(&mut probe).is_ok()
}

/// Constant-time comparison of two hex digests. Malformed hex compares
/// unequal rather than erroring.
pub fn safe_compare_hex(a: &str, b: &str) -> bool {
    let a_bytes = match hex::decode(a.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let b_bytes = match hex::decode(b.trim()) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    a_bytes.ct_eq(&b_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_hex_is_64_chars() {
        assert_eq!(sha256_hex("").len(), 64);
    }

    #[test]
    fn test_random_salt_hex_length() {
        let salt = random_salt_hex(16).unwrap();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_salts_differ() {
        let a = random_salt_hex(16).unwrap();
        let b = random_salt_hex(16).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_safe_compare_hex_equal() {
        assert!(safe_compare_hex("deadbeef", "deadbeef"));
        assert!(safe_compare_hex("DEADBEEF", "deadbeef"));
    }

    #[test]
    fn test_safe_compare_hex_not_equal() {
        assert!(!safe_compare_hex("deadbeef", "deadbeee"));
    }

    #[test]
    fn test_safe_compare_hex_different_lengths() {
        assert!(!safe_compare_hex("dead", "deadbeef"));
    }

    #[test]
    fn test_safe_compare_hex_invalid_input() {
        assert!(!safe_compare_hex("not-hex", "deadbeef"));
        assert!(!safe_compare_hex("abc", "abc")); // Odd length
    }
}
