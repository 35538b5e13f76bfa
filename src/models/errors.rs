use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cafe not found: {id}")]
    CafeNotFound { id: String },

    #[error("No cafe at location: {location}")]
    NoCafeAtLocation { location: String },

    #[error("No cafes in the database")]
    EmptyStore,

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Forbidden: api key mismatch")]
    Forbidden,

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Item not found")]
    NotFound,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Database error: {source}")]
    Database { source: sqlx::Error },

    #[error("Schema setup failed: {message}")]
    Schema { message: String },
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                RepositoryError::ConnectionFailed
            }
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation()
                    || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation) =>
            {
                RepositoryError::ConstraintViolation {
                    message: db_err.message().to_string(),
                }
            }
            other => RepositoryError::Database { source: other },
        }
    }
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
