use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::storage::{StorageError, Store};

const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A password must be 8+ characters with at least one ASCII uppercase
/// letter, lowercase letter, digit, and symbol.
pub fn password_is_valid(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return false;
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    has_upper && has_lower && has_digit && has_symbol
}

/// Only gmail.com addresses are accepted; the local part is limited to
/// letters, digits and `._%+-`.
pub fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain != "gmail.com" || local.is_empty() {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
}

/// Deterministic digest of the password: SHA-256 over the UTF-8 bytes,
/// lowercase hex. Login compares digests for equality, so there is no
/// per-user salt.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub const SUGGESTION_COUNT: usize = 5;
const SHORT_SUFFIX_ATTEMPTS: u32 = 40;
const WIDE_SUFFIX_ATTEMPTS: u32 = 80;

/// Offer alternative usernames when the requested one is taken: the base
/// plus a random 3-4 digit suffix, each candidate checked against the
/// registry one at a time. The loop is bounded: after a fixed number of
/// short-suffix attempts the range widens to 6 digits, and past that a UUID tail makes
/// a collision unrealistic, so exactly `SUGGESTION_COUNT` distinct unused
/// names always come back.
pub async fn suggest_usernames(store: &Store, base: &str) -> Result<Vec<String>, StorageError> {
    let mut suggestions: Vec<String> = Vec::with_capacity(SUGGESTION_COUNT);
    let mut attempts = 0u32;
    while suggestions.len() < SUGGESTION_COUNT {
        attempts += 1;
        let candidate = if attempts <= SHORT_SUFFIX_ATTEMPTS {
            format!("{base}{}", random_in(100, 9999))
        } else if attempts <= WIDE_SUFFIX_ATTEMPTS {
            format!("{base}{}", random_in(100_000, 999_999))
        } else {
            let tail = Uuid::new_v4().simple().to_string();
            format!("{base}{}", &tail[..8])
        };
        if suggestions.contains(&candidate) {
            continue;
        }
        if !store.username_exists(&candidate).await? {
            suggestions.push(candidate);
        }
    }
    Ok(suggestions)
}

// ThreadRng is not Send; sample in a plain fn so no handler holds it
// across an await point.
fn random_in(lo: u32, hi: u32) -> u32 {
    use rand::Rng;
    rand::rng().random_range(lo..=hi)
}
