//! Password hashing for the student and parent portal accounts.
//!
//! Passwords are never stored. The stored form is `base64(salt)$base64(sha512(salt || password))`.

use base64::{Engine, prelude::BASE64_STANDARD};
use sha2::{Digest, Sha512};

const SALT_LEN: usize = 16;

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let salted = [salt, password.as_bytes()].concat();
    Sha512::digest(salted).to_vec()
}

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::fill(&mut salt);

    format!(
        "{}${}",
        BASE64_STANDARD.encode(salt),
        BASE64_STANDARD.encode(digest(&salt, password))
    )
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, hash)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (BASE64_STANDARD.decode(salt), BASE64_STANDARD.decode(hash)) else {
        return false;
    };

    digest(&salt, password) == hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let stored = hash_password("std7123");
        assert!(verify_password("std7123", &stored));
        assert!(!verify_password("std7124", &stored));
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("prnt3123"), hash_password("prnt3123"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", "!!$!!"));
    }
}
