use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted by the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "@$!%*?&";

/// First password rule that failed, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("password must be at least 8 characters long")]
    TooShort,
    #[error("password must contain at least one lowercase letter")]
    NoLowercase,
    #[error("password must contain at least one uppercase letter")]
    NoUppercase,
    #[error("password must contain at least one digit")]
    NoDigit,
    #[error("password must contain at least one special character (@$!%*?&)")]
    NoSpecialChar,
}

/// Checks password strength. Only the first failing rule is reported:
/// length, lowercase, uppercase, digit, special character.
pub fn validate(password: &str) -> Result<(), PolicyViolation> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PolicyViolation::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PolicyViolation::NoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::NoDigit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PolicyViolation::NoSpecialChar);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_validation() {
        assert!(validate("Abc12345$").is_ok());
        assert!(validate("zZ9&zZ9&").is_ok());

        assert_eq!(validate("Ab1$"), Err(PolicyViolation::TooShort));
        assert_eq!(validate("ABCDEFG1$"), Err(PolicyViolation::NoLowercase));
        assert_eq!(validate("abcdefg1$"), Err(PolicyViolation::NoUppercase));
        assert_eq!(validate("Abcdefgh$"), Err(PolicyViolation::NoDigit));
        assert_eq!(validate("Abcdefg12"), Err(PolicyViolation::NoSpecialChar));
    }

    #[test]
    fn reports_first_rule_only() {
        // short and digit-less: length wins
        assert_eq!(validate("abc"), Err(PolicyViolation::TooShort));
        // no lowercase, no digit, no special: lowercase wins
        assert_eq!(validate("ABCDEFGHIJ"), Err(PolicyViolation::NoLowercase));
        // no uppercase and no special: uppercase wins
        assert_eq!(validate("abcdefgh1"), Err(PolicyViolation::NoUppercase));
    }

    #[test]
    fn special_set_is_fixed() {
        assert_eq!(validate("Abcdefg1#"), Err(PolicyViolation::NoSpecialChar));
        for special in SPECIAL_CHARACTERS.chars() {
            assert!(validate(&format!("Abcdefg1{special}")).is_ok());
        }
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(validate("Ab1$é"), Err(PolicyViolation::TooShort));
        assert!(validate("Ab1$éééé").is_ok());
    }
}
