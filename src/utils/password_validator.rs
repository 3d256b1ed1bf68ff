// utils/password_validator.rs

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during password validation
#[derive(Error, Debug)]
pub enum PasswordValidationError {
    #[error("Password must be at least {0} characters long")]
    TooShort(usize),
    #[error("Password must contain at least one uppercase letter")]
    NoUppercase,
    #[error("Password must contain at least one lowercase letter")]
    NoLowercase,
    #[error("Password must contain at least one number")]
    NoNumber,
}

static UPPERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

pub struct PasswordValidator {
    min_length: usize,
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordValidator {
    /// Validates a password, reporting the first unmet requirement
    pub fn validate_with_details(&self, password: &str) -> Result<(), PasswordValidationError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordValidationError::TooShort(self.min_length));
        }
        if !UPPERCASE_REGEX.is_match(password) {
            return Err(PasswordValidationError::NoUppercase);
        }
        if !LOWERCASE_REGEX.is_match(password) {
            return Err(PasswordValidationError::NoLowercase);
        }
        if !NUMBER_REGEX.is_match(password) {
            return Err(PasswordValidationError::NoNumber);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_conforming_password() {
        assert!(PasswordValidator::default()
            .validate_with_details("Sufficient1")
            .is_ok());
    }

    #[test]
    fn reports_the_first_unmet_requirement() {
        let validator = PasswordValidator::default();
        assert!(matches!(
            validator.validate_with_details("short"),
            Err(PasswordValidationError::TooShort(8))
        ));
        assert!(matches!(
            validator.validate_with_details("nouppercase1"),
            Err(PasswordValidationError::NoUppercase)
        ));
        assert!(matches!(
            validator.validate_with_details("NOLOWERCASE1"),
            Err(PasswordValidationError::NoLowercase)
        ));
        assert!(matches!(
            validator.validate_with_details("NoNumberHere"),
            Err(PasswordValidationError::NoNumber)
        ));
    }
}
