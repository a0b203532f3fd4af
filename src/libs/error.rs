//! Domain errors shared by the stores and services.
//!
//! Every variant belongs to exactly one [`ErrorKind`]. The menu uses the kind
//! to decide whether an error is reported and the loop continues, or whether
//! the operation is logged and aborted.

use super::password::PolicyViolation;
use thiserror::Error;

/// Error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad password, status, field or empty input.
    Validation,
    /// Unknown username or task.
    NotFound,
    /// Username collision.
    Duplicate,
    /// Credential or answer mismatch, lockout, unknown token.
    Auth,
    /// Connectivity, query or hashing failure.
    Storage,
}

#[derive(Debug, Error)]
pub enum TmsError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Invalid status '{0}'. Please enter 'C' for Complete or 'N' for Not Done")]
    InvalidStatus(String),

    #[error("Invalid field '{0}'. Please select either T, D, or S")]
    InvalidField(String),

    #[error("Both security answers are required")]
    MissingSecurityAnswers,

    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("Username not found")]
    UserNotFound,

    #[error("Task {0} not found")]
    TaskNotFound(i64),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Security question answers are incorrect")]
    WrongAnswers,

    #[error("Too many failed attempts. Please try again in {retry_after} seconds")]
    LockedOut { retry_after: i64 },

    #[error("Session is invalid or has expired")]
    InvalidToken,

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Hashing error: {0}")]
    Hashing(String),
}

impl TmsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Policy(_)
            | Self::EmptyField(_)
            | Self::FieldTooLong { .. }
            | Self::InvalidStatus(_)
            | Self::InvalidField(_)
            | Self::MissingSecurityAnswers => ErrorKind::Validation,
            Self::UserNotFound | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateUsername(_) => ErrorKind::Duplicate,
            Self::InvalidCredentials | Self::WrongAnswers | Self::LockedOut { .. } | Self::InvalidToken => ErrorKind::Auth,
            Self::Storage(_) | Self::Hashing(_) => ErrorKind::Storage,
        }
    }

    /// Whether the menu should report the error and keep going.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }
}

pub type TmsResult<T> = std::result::Result<T, TmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(TmsError::InvalidStatus("X".into()).kind(), ErrorKind::Validation);
        assert_eq!(TmsError::Policy(PolicyViolation::TooShort).kind(), ErrorKind::Validation);
        assert_eq!(TmsError::TaskNotFound(4).kind(), ErrorKind::NotFound);
        assert_eq!(TmsError::DuplicateUsername("alice".into()).kind(), ErrorKind::Duplicate);
        assert_eq!(TmsError::LockedOut { retry_after: 3 }.kind(), ErrorKind::Auth);
        assert_eq!(TmsError::Storage(rusqlite::Error::InvalidQuery).kind(), ErrorKind::Storage);
        assert!(!TmsError::Hashing("bad".into()).is_recoverable());
        assert!(TmsError::WrongAnswers.is_recoverable());
    }
}
