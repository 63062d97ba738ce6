use thiserror::Error;

/// Failures surfaced by the stores and the coordinator.
///
/// Variants map one-to-one onto client-facing statuses in [`crate::web`];
/// adapters return them and the coordinator forwards them unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpCheckError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Request canceled: {operation} exceeded its deadline")]
    Canceled { operation: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Resource store error: {0}")]
    ResourceStore(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HttpCheckError {
    pub fn canceled(operation: impl Into<String>) -> Self {
        Self::Canceled {
            operation: operation.into(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for HttpCheckError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                HttpCheckError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::RowNotFound => HttpCheckError::NotFound("HTTP check not found".into()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => HttpCheckError::StoreUnavailable(err.to_string()),
            _ => HttpCheckError::Database(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for HttpCheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            HttpCheckError::StoreUnavailable(err.to_string())
        } else {
            HttpCheckError::ResourceStore(err.to_string())
        }
    }
}

impl From<config::ConfigError> for HttpCheckError {
    fn from(err: config::ConfigError) -> Self {
        HttpCheckError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HttpCheckError>;
