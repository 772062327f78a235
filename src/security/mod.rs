//! Credential handling: password hashing, e-mail validation and the
//! configured administrator check.

pub mod email;
pub mod password;

pub use email::is_valid_email;
pub use password::{hash_password, verify_password, Argon2Params, PasswordError};

/// Constant-time byte comparison; length mismatch returns early.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Administrator credentials come from configuration, not from the store.
pub fn admin_matches(
    email: &str,
    password: &str,
    expected_email: &str,
    expected_password: &str,
) -> bool {
    // Evaluate both so timing doesn't reveal which half was wrong.
    let email_ok = ct_eq(email.as_bytes(), expected_email.as_bytes());
    let password_ok = ct_eq(password.as_bytes(), expected_password.as_bytes());
    !expected_email.is_empty() && email_ok & password_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_eq_basic() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"ab"));
        assert!(ct_eq(b"", b""));
    }

    #[test]
    fn admin_requires_both_halves() {
        assert!(admin_matches("admin@coeso.com.br", "s3nha", "admin@coeso.com.br", "s3nha"));
        assert!(!admin_matches("admin@coeso.com.br", "errada", "admin@coeso.com.br", "s3nha"));
        assert!(!admin_matches("outro@coeso.com.br", "s3nha", "admin@coeso.com.br", "s3nha"));
        // Unconfigured admin never matches, even with empty input.
        assert!(!admin_matches("", "", "", ""));
    }
}
