use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::data_source::DataSource;
use crate::error::DataAccessError;

use super::connection::SqliteConnection;

/// Options for opening `SQLite` connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Forwarded to `sqlite3_busy_timeout` on every connection.
    pub busy_timeout: Option<Duration>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            busy_timeout: None,
        }
    }

    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    #[must_use]
    pub fn build(self) -> SqliteDataSource {
        SqliteDataSource::new(self.finish())
    }
}

/// Data source that opens a fresh `SQLite` connection for every call.
///
/// Because nothing is pooled, an in-memory path (`:memory:`) gives each call its own empty
/// database. Use a file path for anything that must outlive one call.
#[derive(Debug, Clone)]
pub struct SqliteDataSource {
    options: SqliteOptions,
}

impl SqliteDataSource {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        if options.db_path == ":memory:" {
            warn!("sqlite data source opened on :memory:; data will not survive between calls");
        }
        Self { options }
    }

    #[must_use]
    pub fn builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }

    fn open(options: &SqliteOptions) -> Result<rusqlite::Connection, DataAccessError> {
        let conn = rusqlite::Connection::open(&options.db_path).map_err(|e| {
            DataAccessError::ConnectionError(format!(
                "failed to open SQLite database {}: {e}",
                options.db_path
            ))
        })?;
        if let Some(timeout) = options.busy_timeout {
            conn.busy_timeout(timeout).map_err(|e| {
                DataAccessError::ConnectionError(format!("failed to set busy timeout: {e}"))
            })?;
        }
        Ok(conn)
    }
}

#[async_trait]
impl DataSource for SqliteDataSource {
    type Connection = SqliteConnection;

    async fn get_connection(&self) -> Result<SqliteConnection, DataAccessError> {
        let options = self.options.clone();
        debug!(db_path = %options.db_path, "opening sqlite connection");
        let conn = tokio::task::spawn_blocking(move || Self::open(&options)).await??;
        Ok(SqliteConnection::new(conn))
    }
}
