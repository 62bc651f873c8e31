//! Password digests.
//!
//! Digests are Argon2id PHC strings (`$argon2id$v=19$...`) with a random
//! per-user salt embedded in the string itself, so verification needs nothing
//! but the stored digest.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use log::warn;

use crate::app_response::AppResponse;

/// Hashes `password` with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, AppResponse> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    digest_with_salt(password, &salt)
}

/// Deterministic digest for a given password and salt.
pub fn digest_with_salt(password: &str, salt: &SaltString) -> Result<String, AppResponse> {
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), salt)?
        .to_string();
    Ok(digest)
}

/// `false` for a wrong password and for a digest that does not parse.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let parsed = match PasswordHash::new(digest) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password digest is not a valid PHC string: {e}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_salt() -> SaltString {
        SaltString::from_b64("c29tZXNhbHRmb3J0ZXN0cw").unwrap()
    }

    #[test]
    fn same_password_and_salt_give_same_digest() {
        let first = digest_with_salt("pw1", &fixed_salt()).unwrap();
        let second = digest_with_salt("pw1", &fixed_salt()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn verify_round_trip() {
        let digest = digest_with_salt("pw1", &fixed_salt()).unwrap();
        assert!(verify_password("pw1", &digest));
        assert!(!verify_password("pw2", &digest));
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn random_salts_differ_but_both_verify() {
        let a = hash_password("shared").unwrap();
        let b = hash_password("shared").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("shared", &a));
        assert!(verify_password("shared", &b));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        // Unsalted SHA-256 hex from the old scheme is rejected too.
        let legacy = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
        assert!(!verify_password("test", legacy));
        assert!(!verify_password("test", ""));
    }
}
