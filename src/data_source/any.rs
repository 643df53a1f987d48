use async_trait::async_trait;

use super::{DataSource, DataSourceConfig, DbConnection};
use crate::error::DataAccessError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
use crate::postgres::{PostgresConnection, PostgresDataSource, PostgresOptions};
#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteConnection, SqliteDataSource, SqliteOptions};

/// A data source for whichever backend a `DataSourceConfig` names.
#[derive(Debug, Clone)]
pub enum AnyDataSource {
    /// `SQLite` data source
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteDataSource),
    /// `PostgreSQL` data source
    #[cfg(feature = "postgres")]
    Postgres(PostgresDataSource),
}

/// A connection from an [`AnyDataSource`].
#[derive(Debug)]
pub enum AnyConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
}

impl AnyDataSource {
    /// Build the data source described by `config`.
    ///
    /// # Errors
    /// Returns `DataAccessError::ConfigError` if the URL is empty or cannot be parsed.
    pub fn from_config(config: &DataSourceConfig) -> Result<Self, DataAccessError> {
        if config.url.trim().is_empty() {
            return Err(DataAccessError::ConfigError(
                "data source url must not be empty".into(),
            ));
        }
        match config.db_type {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => {
                let mut options = SqliteOptions::new(config.url.clone());
                options.busy_timeout = config.busy_timeout();
                Ok(AnyDataSource::Sqlite(SqliteDataSource::new(options)))
            }
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => {
                let options = PostgresOptions::from_url(&config.url)?;
                Ok(AnyDataSource::Postgres(PostgresDataSource::new(options)))
            }
        }
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            AnyDataSource::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            AnyDataSource::Postgres(_) => DatabaseType::Postgres,
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteDataSource> for AnyDataSource {
    fn from(ds: SqliteDataSource) -> Self {
        AnyDataSource::Sqlite(ds)
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresDataSource> for AnyDataSource {
    fn from(ds: PostgresDataSource) -> Self {
        AnyDataSource::Postgres(ds)
    }
}

#[async_trait]
impl DataSource for AnyDataSource {
    type Connection = AnyConnection;

    async fn get_connection(&self) -> Result<AnyConnection, DataAccessError> {
        match self {
            #[cfg(feature = "sqlite")]
            AnyDataSource::Sqlite(ds) => ds.get_connection().await.map(AnyConnection::Sqlite),
            #[cfg(feature = "postgres")]
            AnyDataSource::Postgres(ds) => {
                ds.get_connection().await.map(AnyConnection::Postgres)
            }
        }
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "sqlite")]
            AnyDataSource::Sqlite(ds) => ds.placeholder_style(),
            #[cfg(feature = "postgres")]
            AnyDataSource::Postgres(ds) => ds.placeholder_style(),
        }
    }
}

#[async_trait]
impl DbConnection for AnyConnection {
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DataAccessError> {
        match self {
            #[cfg(feature = "sqlite")]
            AnyConnection::Sqlite(conn) => conn.execute_dml(sql, params).await,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(conn) => conn.execute_dml(sql, params).await,
        }
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DataAccessError> {
        match self {
            #[cfg(feature = "sqlite")]
            AnyConnection::Sqlite(conn) => conn.execute_select(sql, params).await,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(conn) => conn.execute_select(sql, params).await,
        }
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DataAccessError> {
        match self {
            #[cfg(feature = "sqlite")]
            AnyConnection::Sqlite(conn) => conn.execute_batch(sql).await,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(conn) => conn.execute_batch(sql).await,
        }
    }
}
