//! User input validation
//!
//! Every rule is checked and all violations are reported together, so a
//! client fixing a signup form sees the whole list at once.

use thiserror::Error;

use super::entity::LoginUser;
use crate::domain::FieldViolation;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Outcome of validating a whole input value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<(&'static str, UserValidationError)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    fn push(&mut self, field: &'static str, result: Result<(), UserValidationError>) {
        if let Err(e) = result {
            self.violations.push((field, e));
        }
    }

    pub fn into_field_violations(self) -> Vec<FieldViolation> {
        self.violations
            .into_iter()
            .map(|(field, e)| FieldViolation::new(field, e.to_string()))
            .collect()
    }
}

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - 3 to 50 characters
/// - Only alphanumeric characters, underscores, and hyphens
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if let Some(c) = username
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
    {
        return Err(UserValidationError::InvalidUsernameCharacter(c));
    }

    Ok(())
}

/// Validate a password (8 to 128 characters)
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if len > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate registration input, collecting every violation
pub fn validate_login_user(input: &LoginUser) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    errors.push("username", validate_username(&input.username));
    errors.push("password", validate_password(&input.password));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
