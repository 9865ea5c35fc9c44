//! Error types for CloudVault.

use thiserror::Error;

use crate::auth::PasswordError;

/// Common error type for CloudVault.
///
/// Every variant is recoverable; operations report them to the caller and
/// leave all structures unchanged.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Directory, file, or version absent.
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate sibling name, globally duplicated file name, or a restore collision.
    #[error("name already in use: {0}")]
    NameConflict(String),

    /// Empty or otherwise malformed name.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Acting user does not own the target.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No account with this user id.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// User id already taken.
    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    /// Security answer did not match.
    #[error("incorrect security answer")]
    WrongAnswer,

    /// Invalid credentials.
    #[error("invalid credentials")]
    AuthFailed,

    /// Parent navigation requested from the root directory.
    #[error("already at the root directory")]
    AtRoot,

    /// Pop from an empty recycle bin or dequeue from an empty history.
    #[error("{0} is empty")]
    EmptyCollection(&'static str),

    /// Permission label other than `view` or `edit`.
    #[error("invalid permission '{0}' (expected view or edit)")]
    InvalidPermission(String),

    /// Operation requires a logged-in session.
    #[error("login required")]
    LoginRequired,

    /// Password policy or hashing failure.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CloudVault operations.
pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_display() {
        let err = DriveError::NotFound("directory 'Photos'".to_string());
        assert_eq!(err.to_string(), "directory 'Photos' not found");
    }

    #[test]
    fn test_name_conflict_display() {
        let err = DriveError::NameConflict("a.txt".to_string());
        assert_eq!(err.to_string(), "name already in use: a.txt");
    }

    #[test]
    fn test_empty_collection_display() {
        let err = DriveError::EmptyCollection("recycle bin");
        assert_eq!(err.to_string(), "recycle bin is empty");
    }

    #[test]
    fn test_user_errors_display() {
        assert_eq!(
            DriveError::UserNotFound("nouser".to_string()).to_string(),
            "user 'nouser' not found"
        );
        assert_eq!(
            DriveError::DuplicateUser("bob".to_string()).to_string(),
            "user 'bob' already exists"
        );
    }

    #[test]
    fn test_password_error_conversion() {
        let err: DriveError = PasswordError::TooShort.into();
        assert!(matches!(err, DriveError::Password(PasswordError::TooShort)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DriveError = io_err.into();
        assert!(matches!(err, DriveError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(DriveError::AtRoot)
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
