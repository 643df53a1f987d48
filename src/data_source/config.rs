use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DataAccessError;
use crate::types::DatabaseType;

/// Serializable description of a data source.
///
/// ```rust
/// use sql_template::DataSourceConfig;
///
/// let cfg = DataSourceConfig::from_json_str(
///     r#"{ "db_type": "sqlite", "url": "app.db", "busy_timeout_ms": 5000 }"#,
/// );
/// # #[cfg(feature = "sqlite")]
/// assert_eq!(cfg.unwrap().busy_timeout_ms, Some(5000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub db_type: DatabaseType,
    /// File path for `SQLite`, connection string for `PostgreSQL`.
    pub url: String,
    /// `SQLite` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
}

impl DataSourceConfig {
    #[must_use]
    pub fn new(db_type: DatabaseType, url: impl Into<String>) -> Self {
        Self {
            db_type,
            url: url.into(),
            busy_timeout_ms: None,
        }
    }

    /// Parse a config from JSON.
    ///
    /// # Errors
    /// Returns `DataAccessError::ConfigError` if the JSON is malformed or names an unknown
    /// `db_type` (including a backend whose feature is not compiled in).
    pub fn from_json_str(json: &str) -> Result<Self, DataAccessError> {
        serde_json::from_str(json)
            .map_err(|e| DataAccessError::ConfigError(format!("invalid data source config: {e}")))
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sqlite")]
    #[test]
    fn parses_sqlite_config() {
        let cfg = DataSourceConfig::from_json_str(
            r#"{ "db_type": "sqlite", "url": "app.db", "busy_timeout_ms": 250 }"#,
        )
        .unwrap();
        assert_eq!(cfg.url, "app.db");
        assert_eq!(cfg.busy_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = DataSourceConfig::from_json_str(r#"{ "db_type": "oracle", "url": "x" }"#)
            .unwrap_err();
        assert!(matches!(err, DataAccessError::ConfigError(_)));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn round_trips_through_json() {
        let cfg = DataSourceConfig::new(DatabaseType::Sqlite, "a.db");
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"db_type":"sqlite","url":"a.db"}"#);
    }
}
