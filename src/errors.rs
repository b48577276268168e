//! Error types for company operations.

use crate::{CompanyId, ValidationErrors};

/// Errors that can occur during data store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    /// An internal storage system error occurred.
    Internal(String),
}

impl std::fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Internal error: {}", self.message())
    }
}

impl DataStoreError {
    /// The underlying failure, without the "Internal error" prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Internal(msg) => msg,
        }
    }
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        DataStoreError::Internal(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DataStoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DataStoreError::Internal(e.to_string())
    }
}

impl std::error::Error for DataStoreError {}

/// Errors surfaced by the company service and its HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// No company has the requested identifier.
    #[error("company {0} not found")]
    NotFound(CompanyId),
    /// A caller-supplied identifier is not a positive 32-bit integer.
    #[error("invalid company id {0}")]
    InvalidId(i64),
    /// A create payload failed one or more validation rules.
    #[error("{0}")]
    Validation(ValidationErrors),
    /// The store failed; never recovered locally.
    #[error(transparent)]
    Storage(#[from] DataStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlx_errors_are_internal() {
        let err = DataStoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DataStoreError::Internal(_)));
        let err = DataStoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DataStoreError::Internal(_)));
    }

    #[test]
    fn message_drops_the_prefix() {
        let err = DataStoreError::Internal("disk full".to_string());
        assert_eq!(err.message(), "disk full");
    }

    #[test]
    fn storage_error_message_is_transparent() {
        let err = CompanyError::from(DataStoreError::Internal("disk full".to_string()));
        assert_eq!(err.to_string(), "Internal error: disk full");
    }

    #[test]
    fn not_found_names_the_id() {
        let err = CompanyError::NotFound(CompanyId::new(999));
        assert_eq!(err.to_string(), "company 999 not found");
    }
}
