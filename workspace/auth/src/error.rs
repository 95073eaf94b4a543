use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Input rejected by the account manager before anything reaches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email required")]
    EmailRequired,

    #[error("superuser must have is_staff=True")]
    SuperuserNotStaff,

    #[error("superuser must have is_superuser=True")]
    SuperuserNotSuperuser,
}

/// Error types for the auth module
#[derive(Error, Debug)]
pub enum AuthError {
    /// Guard-clause failure; nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Extra fields that do not map onto the user entity
    #[error("Invalid fields: {0}")]
    InvalidFields(String),

    /// Error from the database operations, passed through as reported
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Error from the password hasher
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

impl AuthError {
    /// True when storage rejected a write because the email is already taken.
    pub fn is_conflict(&self) -> bool {
        match self {
            AuthError::Database(db_err) => {
                matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}

/// Type alias for Result with AuthError
pub type Result<T> = std::result::Result<T, AuthError>;
