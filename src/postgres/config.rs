use async_trait::async_trait;
use tokio_postgres::NoTls;
use tracing::{debug, warn};

use crate::data_source::DataSource;
use crate::error::DataAccessError;
use crate::translation::PlaceholderStyle;

use super::connection::PostgresConnection;

/// Options for connecting to `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub config: tokio_postgres::Config,
}

impl PostgresOptions {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self { config }
    }

    /// Parse a libpq-style (`host=… user=…`) or URL-style (`postgres://…`) connection string.
    ///
    /// # Errors
    /// Returns `DataAccessError::ConfigError` if the string cannot be parsed.
    pub fn from_url(url: &str) -> Result<Self, DataAccessError> {
        let config = url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| DataAccessError::ConfigError(format!("invalid Postgres URL: {e}")))?;
        Ok(Self { config })
    }
}

/// Fluent builder for `PostgresOptions`.
#[derive(Debug, Clone, Default)]
pub struct PostgresOptionsBuilder {
    config: tokio_postgres::Config,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.config.host(host);
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port(port);
        self
    }

    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.config.user(user);
        self
    }

    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.config.password(password);
        self
    }

    #[must_use]
    pub fn dbname(mut self, dbname: &str) -> Self {
        self.config.dbname(dbname);
        self
    }

    #[must_use]
    pub fn finish(self) -> PostgresOptions {
        PostgresOptions::new(self.config)
    }

    #[must_use]
    pub fn build(self) -> PostgresDataSource {
        PostgresDataSource::new(self.finish())
    }
}

/// Data source that opens a new `PostgreSQL` session for every call.
#[derive(Debug, Clone)]
pub struct PostgresDataSource {
    options: PostgresOptions,
}

impl PostgresDataSource {
    #[must_use]
    pub fn new(options: PostgresOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn builder() -> PostgresOptionsBuilder {
        PostgresOptionsBuilder::new()
    }

    #[must_use]
    pub fn options(&self) -> &PostgresOptions {
        &self.options
    }
}

#[async_trait]
impl DataSource for PostgresDataSource {
    type Connection = PostgresConnection;

    async fn get_connection(&self) -> Result<PostgresConnection, DataAccessError> {
        let cfg = &self.options.config;
        debug!(
            hosts = ?cfg.get_hosts(),
            db = ?cfg.get_dbname(),
            user = ?cfg.get_user(),
            "opening postgres connection"
        );
        let (client, connection) = cfg
            .connect(NoTls)
            .await
            .map_err(|e| DataAccessError::ConnectionError(e.to_string()))?;
        // The driver task finishes once the client is dropped at the end of the call.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "postgres connection task ended with an error");
            }
        });
        Ok(PostgresConnection::new(client))
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_urls() {
        let opts = PostgresOptions::from_url("host=localhost user=app dbname=app_db").unwrap();
        assert_eq!(opts.config.get_user(), Some("app"));
        assert_eq!(opts.config.get_dbname(), Some("app_db"));
    }

    #[test]
    fn rejects_garbage_urls() {
        assert!(matches!(
            PostgresOptions::from_url("postgres://user@host:notaport/db"),
            Err(DataAccessError::ConfigError(_))
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let ds = PostgresDataSource::builder()
            .host("db.internal")
            .port(5433)
            .user("svc")
            .dbname("orders")
            .build();
        assert_eq!(ds.options().config.get_ports(), &[5433]);
        assert_eq!(ds.placeholder_style(), PlaceholderStyle::Numbered);
    }
}
