use std::marker::PhantomData;

use crate::conversion::FromRowValue;
use crate::error::DataAccessError;
use crate::results::CustomDbRow;

/// Converts one fetched row into one application value.
///
/// Any `Fn(&CustomDbRow) -> Result<T, DataAccessError>` is a row mapper, so plain functions
/// work directly:
/// ```rust
/// use sql_template::prelude::*;
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// fn user(row: &CustomDbRow) -> Result<User, DataAccessError> {
///     Ok(User {
///         id: row.try_get("id")?,
///         name: row.try_get("name")?,
///     })
/// }
/// # fn takes_mapper<M: RowMapper<User>>(_m: M) {}
/// # takes_mapper(user);
/// ```
pub trait RowMapper<T> {
    /// # Errors
    ///
    /// Returns `DataAccessError` if the row cannot be mapped; the template surfaces it unchanged.
    fn map_row(&self, row: &CustomDbRow) -> Result<T, DataAccessError>;
}

impl<T, F> RowMapper<T> for F
where
    F: Fn(&CustomDbRow) -> Result<T, DataAccessError>,
{
    fn map_row(&self, row: &CustomDbRow) -> Result<T, DataAccessError> {
        self(row)
    }
}

/// Maps the first column of each row to `T`.
#[derive(Debug)]
pub struct SingleColumnRowMapper<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SingleColumnRowMapper<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SingleColumnRowMapper<T> {}

impl<T: FromRowValue> RowMapper<T> for SingleColumnRowMapper<T> {
    fn map_row(&self, row: &CustomDbRow) -> Result<T, DataAccessError> {
        if row.len() != 1 {
            return Err(DataAccessError::MappingError(format!(
                "single-column mapper got a row with {} columns",
                row.len()
            )));
        }
        row.try_get_by_index(0)
    }
}

/// Row mapper for `SELECT count(*)`-style queries that return one column.
#[must_use]
pub fn single_column<T: FromRowValue>() -> SingleColumnRowMapper<T> {
    SingleColumnRowMapper {
        _marker: PhantomData,
    }
}
