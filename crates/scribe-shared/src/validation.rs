//! Field rules that the `validator` derive cannot express on its own.

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\",./<>?\\|`~";

/// Require at least one lowercase, uppercase, digit and special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let checks: [(fn(char) -> bool, &'static str); 4] = [
        (|c| c.is_ascii_lowercase(), "Password must contain at least one lowercase letter"),
        (|c| c.is_ascii_uppercase(), "Password must contain at least one uppercase letter"),
        (|c| c.is_ascii_digit(), "Password must contain at least one digit"),
        (
            |c| SPECIAL_CHARACTERS.contains(c),
            "Password must contain at least one special character",
        ),
    ];

    for (check, message) in checks {
        if !password.chars().any(check) {
            return Err(ValidationError::new("password_strength").with_message(message.into()));
        }
    }
    Ok(())
}

/// Tell an absent field from an explicit `null`.
///
/// Use together with `#[serde(default)]`: absent gives `None`, `null`
/// gives `Some(None)`, a value gives `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(validate_password_strength("Sup3r$ecret").is_ok());
    }

    #[test]
    fn each_missing_class_is_reported() {
        for weak in ["SUP3R$ECRET", "sup3r$ecret", "Super$ecret", "Sup3rSecret"] {
            assert!(validate_password_strength(weak).is_err(), "{weak} should fail");
        }
    }
}
