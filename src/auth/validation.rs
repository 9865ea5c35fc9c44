//! Input validation for CloudVault accounts.

use thiserror::Error;

use crate::DriveError;

/// Maximum user id length.
pub const MAX_USER_ID_LENGTH: usize = 32;

/// Maximum security question length.
pub const MAX_QUESTION_LENGTH: usize = 200;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// User id is empty.
    #[error("user id cannot be empty")]
    UserIdEmpty,

    /// User id is too long.
    #[error("user id must be at most {MAX_USER_ID_LENGTH} characters")]
    UserIdTooLong,

    /// User id contains invalid characters.
    #[error("user id can only contain alphanumeric characters, '_', '-' and '.'")]
    UserIdInvalidChars,

    /// Security question is empty.
    #[error("security question cannot be empty")]
    QuestionEmpty,

    /// Security question is too long.
    #[error("security question must be at most {MAX_QUESTION_LENGTH} characters")]
    QuestionTooLong,

    /// Security answer is empty.
    #[error("security answer cannot be empty")]
    AnswerEmpty,
}

impl From<ValidationError> for DriveError {
    fn from(e: ValidationError) -> Self {
        DriveError::InvalidName(e.to_string())
    }
}

/// Validate a user id.
///
/// # Examples
///
/// ```
/// use cloudvault::auth::validation::validate_user_id;
///
/// assert!(validate_user_id("bob").is_ok());
/// assert!(validate_user_id("").is_err());
/// assert!(validate_user_id("bad id").is_err());
/// ```
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.is_empty() {
        return Err(ValidationError::UserIdEmpty);
    }
    if user_id.chars().count() > MAX_USER_ID_LENGTH {
        return Err(ValidationError::UserIdTooLong);
    }
    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(ValidationError::UserIdInvalidChars);
    }
    Ok(())
}

/// Validate a security question and its answer.
pub fn validate_security_pair(question: &str, answer: &str) -> Result<(), ValidationError> {
    if question.trim().is_empty() {
        return Err(ValidationError::QuestionEmpty);
    }
    if question.chars().count() > MAX_QUESTION_LENGTH {
        return Err(ValidationError::QuestionTooLong);
    }
    if normalize_answer(answer).is_empty() {
        return Err(ValidationError::AnswerEmpty);
    }
    Ok(())
}

/// Canonical form of a security answer (trimmed, lowercase).
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
