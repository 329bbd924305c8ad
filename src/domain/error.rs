use thiserror::Error;

/// Per-request error taxonomy. None of these are fatal to the process;
/// every variant maps to a recoverable HTTP outcome in the API layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Insufficient role")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Downgrade a storage-layer unique-constraint violation to a
    /// user-visible validation error. Any other database error passes
    /// through unchanged. This keeps the loser of an insert race on the
    /// normal validation path instead of surfacing a raw storage error.
    pub fn unique_violation_as_validation(e: sea_orm::DbErr, message: &str) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                Self::Validation(message.to_string())
            }
            _ => Self::Database(e),
        }
    }
}

impl From<bcrypt::BcryptError> for DomainError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::Crypto(e.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for DomainError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Crypto(e.to_string())
    }
}
