//! PBKDF2-HMAC-SHA256 password hashes.
//!
//! Stored form: `PBKDF2WithHmacSHA256:<iterations>:<salt b64>:<hash b64>`.
//! The iteration count travels with the hash so it can be raised later
//! without invalidating existing users.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::CryptoError;

pub const HASH_ALGORITHM: &str = "PBKDF2WithHmacSHA256";
pub const PBKDF2_ITERATIONS: u32 = 210_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

/// Generate a cryptographically random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Hash a password with a fresh salt.
pub fn hash_password(password: &str) -> String {
    hash_password_with(password, &generate_salt(), PBKDF2_ITERATIONS)
}

pub fn hash_password_with(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut hash = derive(password, salt, iterations);
    let encoded = format!(
        "{HASH_ALGORITHM}:{iterations}:{}:{}",
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    );
    hash.zeroize();
    encoded
}

/// Check a password against a stored hash in constant time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CryptoError> {
    let mut parts = stored.split(':');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(CryptoError::MalformedHash);
    };

    if algorithm != HASH_ALGORITHM {
        return Err(CryptoError::UnsupportedAlgorithm(algorithm.into()));
    }
    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    if iterations == 0 {
        return Err(CryptoError::MalformedHash);
    }
    let salt = STANDARD.decode(salt).map_err(|_| CryptoError::MalformedHash)?;
    let expected = STANDARD.decode(expected).map_err(|_| CryptoError::MalformedHash)?;
    if expected.len() != HASH_LENGTH {
        return Err(CryptoError::MalformedHash);
    }

    let mut actual = derive(password, &salt, iterations);
    let matches: bool = actual[..].ct_eq(&expected[..]).into();
    actual.zeroize();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the tests fast; the format is the same.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password_with("secret", &[7u8; SALT_LENGTH], TEST_ITERATIONS);
        assert!(verify_password("secret", &stored).unwrap());
    }

    #[test]
    fn wrong_password_fails() {
        let stored = hash_password_with("secret", &[7u8; SALT_LENGTH], TEST_ITERATIONS);
        assert!(!verify_password("Secret", &stored).unwrap());
    }

    #[test]
    fn hash_is_deterministic_for_same_salt() {
        let a = hash_password_with("secret", &[1u8; SALT_LENGTH], TEST_ITERATIONS);
        let b = hash_password_with("secret", &[1u8; SALT_LENGTH], TEST_ITERATIONS);
        let c = hash_password_with("secret", &[2u8; SALT_LENGTH], TEST_ITERATIONS);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn stored_form_carries_parameters() {
        let stored = hash_password_with("secret", &[1u8; SALT_LENGTH], TEST_ITERATIONS);
        assert!(stored.starts_with("PBKDF2WithHmacSHA256:1000:"));
        assert_eq!(stored.split(':').count(), 4);
    }

    #[test]
    fn default_hash_uses_random_salt() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn malformed_hash_is_error() {
        assert!(matches!(
            verify_password("secret", "not-a-hash"),
            Err(CryptoError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("secret", "MD5:1:AAAA:AAAA"),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            verify_password("secret", "PBKDF2WithHmacSHA256:0:AAAA:AAAA"),
            Err(CryptoError::MalformedHash)
        ));
    }
}
