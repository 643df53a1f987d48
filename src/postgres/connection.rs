use std::fmt;

use async_trait::async_trait;
use tokio_postgres::Client;
use tracing::debug;

use crate::data_source::DbConnection;
use crate::error::DataAccessError;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::params::{Params, check_param_types};
use super::query::build_result_set;

/// One `PostgreSQL` session; dropping it closes the session.
pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Borrow the raw client for driver features the template does not cover.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

#[async_trait]
impl DbConnection for PostgresConnection {
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DataAccessError> {
        let stmt = self.client.prepare(sql).await?;
        check_param_types(stmt.params(), params)?;
        let bound = Params::convert(params);
        let affected = self.client.execute(&stmt, bound.as_refs()).await?;
        debug!(affected, "postgres dml executed");
        usize::try_from(affected).map_err(|e| {
            DataAccessError::ExecutionError(format!("affected-row count overflow: {e}"))
        })
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DataAccessError> {
        let stmt = self.client.prepare(sql).await?;
        check_param_types(stmt.params(), params)?;
        let bound = Params::convert(params);
        let rows = self.client.query(&stmt, bound.as_refs()).await?;
        debug!(rows = rows.len(), "postgres select executed");
        build_result_set(&stmt, &rows)
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DataAccessError> {
        self.client.batch_execute(sql).await?;
        Ok(())
    }
}
