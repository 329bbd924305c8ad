pub mod error;

pub use error::DomainError;

/// Convenience alias used across handlers.
pub type DomainResult<T> = Result<T, DomainError>;
