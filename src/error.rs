use thiserror::Error;

/// The single error type returned by every template operation.
///
/// Driver errors are flattened to their message at the crate boundary, so callers match on
/// these variants instead of on `rusqlite` or `tokio_postgres` types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataAccessError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Row mapping error: {0}")]
    MappingError(String),

    #[error("Expected exactly one row but the query returned none")]
    EmptyResult,

    #[error("Expected exactly one row but the query returned {actual}")]
    IncorrectResultSize { actual: usize },
}

impl DataAccessError {
    /// True for the two single-row cardinality failures.
    #[must_use]
    pub fn is_result_size_error(&self) -> bool {
        matches!(
            self,
            DataAccessError::EmptyResult | DataAccessError::IncorrectResultSize { .. }
        )
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DataAccessError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::InvalidParameterCount(given, expected) => {
                DataAccessError::ParameterError(format!(
                    "statement expects {expected} parameters but {given} were bound"
                ))
            }
            rusqlite::Error::InvalidParameterName(name) => {
                DataAccessError::ParameterError(format!("unknown parameter name: {name}"))
            }
            rusqlite::Error::ToSqlConversionFailure(e) => {
                DataAccessError::ParameterError(e.to_string())
            }
            other => DataAccessError::ExecutionError(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for DataAccessError {
    fn from(err: tokio_postgres::Error) -> Self {
        // `Display` on tokio_postgres::Error hides the server message behind "db error".
        match err.as_db_error() {
            Some(db) => DataAccessError::ExecutionError(format!("{}: {}", db.code().code(), db)),
            None => DataAccessError::ExecutionError(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for DataAccessError {
    fn from(err: tokio::task::JoinError) -> Self {
        DataAccessError::ExecutionError(format!("blocking task join error: {err}"))
    }
}
