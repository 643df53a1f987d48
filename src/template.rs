use tracing::{debug, error};

use crate::data_source::{DataSource, DbConnection};
use crate::error::DataAccessError;
use crate::mapper::RowMapper;
use crate::results::ResultSet;
use crate::translation::{count_placeholders, translate_placeholders};
use crate::types::RowValues;

/// Executes parameterized SQL against a borrowed [`DataSource`].
///
/// Every call acquires its own connection and drops it before returning, on success and on
/// failure. Failures are logged once at `error` level and returned as [`DataAccessError`].
#[derive(Debug, Clone)]
pub struct SqlTemplate<D> {
    data_source: D,
}

impl<D: DataSource> SqlTemplate<D> {
    #[must_use]
    pub fn new(data_source: D) -> Self {
        Self { data_source }
    }

    #[must_use]
    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    /// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
    ///
    /// # Errors
    /// Returns `DataAccessError` if connecting, binding, or executing fails.
    pub async fn update(&self, sql: &str, args: &[RowValues]) -> Result<usize, DataAccessError> {
        let result = async {
            check_arity(sql, args)?;
            let sql = translate_placeholders(sql, self.data_source.placeholder_style());
            let mut conn = self.data_source.get_connection().await?;
            conn.execute_dml(&sql, args).await
        }
        .await;
        log_failure("update", sql, result)
    }

    /// Execute a query and map every row, in cursor order.
    ///
    /// # Errors
    /// Returns `DataAccessError` if connecting, binding, executing, or fetching fails, or the
    /// mapper's error for the first row it rejects.
    pub async fn query<T, M>(
        &self,
        sql: &str,
        mapper: M,
        args: &[RowValues],
    ) -> Result<Vec<T>, DataAccessError>
    where
        M: RowMapper<T>,
    {
        let result_set = self.select(sql, args).await?;
        let mapped = result_set
            .results
            .iter()
            .map(|row| mapper.map_row(row))
            .collect::<Result<Vec<T>, _>>();
        log_failure("query", sql, mapped)
    }

    /// Execute a query that must return exactly one row and map it.
    ///
    /// # Errors
    /// Returns `DataAccessError::EmptyResult` for zero rows,
    /// `DataAccessError::IncorrectResultSize` for more than one, and otherwise the same errors
    /// as [`SqlTemplate::query`].
    pub async fn query_for_object<T, M>(
        &self,
        sql: &str,
        mapper: M,
        args: &[RowValues],
    ) -> Result<T, DataAccessError>
    where
        M: RowMapper<T>,
    {
        let mut results = self.query(sql, mapper, args).await?;
        let outcome = match results.len() {
            0 => Err(DataAccessError::EmptyResult),
            1 => results.pop().ok_or(DataAccessError::EmptyResult),
            actual => Err(DataAccessError::IncorrectResultSize { actual }),
        };
        log_failure("query_for_object", sql, outcome)
    }

    /// Run a parameterless script (schema setup, seed data).
    ///
    /// # Errors
    /// Returns `DataAccessError` if connecting or any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), DataAccessError> {
        let result = async {
            let mut conn = self.data_source.get_connection().await?;
            conn.execute_batch(sql).await
        }
        .await;
        log_failure("execute_batch", sql, result)
    }

    /// Execute a query and return the raw rows without mapping.
    ///
    /// # Errors
    /// Returns `DataAccessError` if connecting, binding, executing, or fetching fails.
    pub async fn select(&self, sql: &str, args: &[RowValues]) -> Result<ResultSet, DataAccessError> {
        let result = async {
            check_arity(sql, args)?;
            let sql = translate_placeholders(sql, self.data_source.placeholder_style());
            let mut conn = self.data_source.get_connection().await?;
            conn.execute_select(&sql, args).await
        }
        .await;
        let result_set = log_failure("select", sql, result)?;
        debug!(sql, rows = result_set.len(), "query fetched rows");
        Ok(result_set)
    }
}

/// Fail early when the SQL uses `?` markers and the argument count disagrees.
fn check_arity(sql: &str, args: &[RowValues]) -> Result<(), DataAccessError> {
    let expected = count_placeholders(sql);
    if expected > 0 && expected != args.len() {
        return Err(DataAccessError::ParameterError(format!(
            "statement has {expected} placeholders but {} arguments were given",
            args.len()
        )));
    }
    Ok(())
}

fn log_failure<T>(
    operation: &'static str,
    sql: &str,
    result: Result<T, DataAccessError>,
) -> Result<T, DataAccessError> {
    if let Err(err) = &result {
        error!(operation, sql, error = %err, "data access failed");
    }
    result
}
