//! Connection factories and the per-call connection surface.
//!
//! A [`DataSource`] is owned by the caller; the template only borrows it to open one
//! [`DbConnection`] per operation and drops that connection before returning.

mod any;
mod config;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DataAccessError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::RowValues;

pub use any::{AnyConnection, AnyDataSource};
pub use config::DataSourceConfig;

/// Factory for database connections.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Connection: DbConnection;

    /// Open (or check out) a connection for a single template call.
    ///
    /// # Errors
    /// Returns `DataAccessError::ConnectionError` if the driver cannot connect.
    async fn get_connection(&self) -> Result<Self::Connection, DataAccessError>;

    /// Placeholder style the driver expects; the template rewrites bare `?` markers to it.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Positional
    }
}

/// The statement surface the template needs from a live connection.
///
/// Implementations prepare `sql`, bind `params` positionally (index `i` binds to placeholder
/// `i + 1`), execute, and release the prepared statement before returning.
#[async_trait]
pub trait DbConnection: Send {
    /// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
    ///
    /// # Errors
    /// Returns `DataAccessError` if preparing, binding, or executing fails.
    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DataAccessError>;

    /// Execute a query and drain its cursor into a `ResultSet`.
    ///
    /// # Errors
    /// Returns `DataAccessError` if preparing, binding, executing, or fetching fails.
    async fn execute_select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, DataAccessError>;

    /// Run a parameterless script of one or more statements.
    ///
    /// # Errors
    /// Returns `DataAccessError` if any statement fails.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DataAccessError>;
}

#[async_trait]
impl<D: DataSource> DataSource for Arc<D> {
    type Connection = D::Connection;

    async fn get_connection(&self) -> Result<Self::Connection, DataAccessError> {
        (**self).get_connection().await
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        (**self).placeholder_style()
    }
}
