use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::data_source::DbConnection;
use crate::error::DataAccessError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::Params;
use super::query::build_result_set;

/// One `SQLite` connection, closed when dropped.
///
/// The connection is moved onto the blocking pool for each statement and handed back when
/// the statement finishes.
pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection) -> Self {
        Self { conn: Some(conn) }
    }

    /// Run `func` against the raw `rusqlite` connection on the blocking pool.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `DataAccessError::ExecutionError` if the blocking
    /// task panics (the connection is lost with it) or the connection was already lost.
    pub async fn with_connection<F, R>(&mut self, func: F) -> Result<R, DataAccessError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, DataAccessError> + Send + 'static,
        R: Send + 'static,
    {
        let conn = self.conn.take().ok_or_else(|| {
            DataAccessError::ExecutionError("sqlite connection lost by an earlier panic".into())
        })?;
        let (conn, result) = run_blocking(conn, func).await?;
        self.conn = Some(conn);
        result
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("open", &self.conn.is_some())
            .finish()
    }
}

async fn run_blocking<F, R>(
    mut conn: rusqlite::Connection,
    func: F,
) -> Result<(rusqlite::Connection, Result<R, DataAccessError>), DataAccessError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, DataAccessError> + Send + 'static,
    R: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || {
        let result = func(&mut conn);
        (conn, result)
    })
    .await?)
}

#[async_trait]
impl DbConnection for SqliteConnection {
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DataAccessError> {
        let sql_owned = sql.to_owned();
        let params = Params::convert(params);
        let affected = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(&sql_owned)?;
                Ok(stmt.execute(params.bind())?)
            })
            .await?;
        debug!(affected, "sqlite dml executed");
        Ok(affected)
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DataAccessError> {
        let sql_owned = sql.to_owned();
        let params = Params::convert(params);
        let result_set = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(&sql_owned)?;
                build_result_set(&mut stmt, &params)
            })
            .await?;
        debug!(rows = result_set.len(), "sqlite select executed");
        Ok(result_set)
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DataAccessError> {
        let sql_owned = sql.to_owned();
        self.with_connection(move |conn| Ok(conn.execute_batch(&sql_owned)?))
            .await
    }
}
