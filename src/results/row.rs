use std::collections::HashMap;
use std::sync::Arc;

use crate::conversion::FromRowValue;
use crate::error::DataAccessError;
use crate::types::RowValues;

/// A row from a database query result
///
/// Column names and the name-to-index map are shared by every row of one result set.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, in column order
    pub rows: Vec<RowValues>,
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        // Drivers may report a different case than the SQL text used.
        self.column_names
            .iter()
            .position(|col| col.eq_ignore_ascii_case(column_name))
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Number of columns in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a column by name and convert it to `T`.
    ///
    /// # Errors
    /// Returns `DataAccessError::MappingError` if the column does not exist or its value cannot
    /// be converted to `T`.
    pub fn try_get<T: FromRowValue>(&self, column_name: &str) -> Result<T, DataAccessError> {
        let value = self.get(column_name).ok_or_else(|| {
            DataAccessError::MappingError(format!("no column named `{column_name}`"))
        })?;
        T::from_row_value(value).map_err(|e| with_column_context(e, column_name))
    }

    /// Read a column by position and convert it to `T`.
    ///
    /// # Errors
    /// Returns `DataAccessError::MappingError` if the index is out of bounds or the value cannot
    /// be converted to `T`.
    pub fn try_get_by_index<T: FromRowValue>(&self, index: usize) -> Result<T, DataAccessError> {
        let value = self.get_by_index(index).ok_or_else(|| {
            DataAccessError::MappingError(format!(
                "column index {index} out of range for a row with {} columns",
                self.rows.len()
            ))
        })?;
        let label = self
            .column_names
            .get(index)
            .map_or_else(|| index.to_string(), Clone::clone);
        T::from_row_value(value).map_err(|e| with_column_context(e, &label))
    }
}

/// Name-to-index map; a name that appears more than once resolves to its first column.
pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    index
}

fn with_column_context(err: DataAccessError, column: &str) -> DataAccessError {
    match err {
        DataAccessError::MappingError(msg) => {
            DataAccessError::MappingError(format!("column `{column}`: {msg}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CustomDbRow {
        CustomDbRow::new(
            Arc::new(vec!["id".into(), "Name".into(), "nickname".into()]),
            vec![
                RowValues::Int(7),
                RowValues::Text("alice".into()),
                RowValues::Null,
            ],
        )
    }

    #[test]
    fn lookup_by_name_and_index() {
        let row = sample();
        assert_eq!(row.get("id"), Some(&RowValues::Int(7)));
        assert_eq!(row.get("name"), Some(&RowValues::Text("alice".into())));
        assert_eq!(row.get_by_index(2), Some(&RowValues::Null));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn typed_getters() {
        let row = sample();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(row.try_get::<String>("Name").unwrap(), "alice");
        assert_eq!(row.try_get::<Option<String>>("nickname").unwrap(), None);
        assert_eq!(row.try_get_by_index::<i32>(0).unwrap(), 7);
    }

    #[test]
    fn typed_getter_errors_name_the_column() {
        let row = sample();
        let err = row.try_get::<i64>("Name").unwrap_err();
        match err {
            DataAccessError::MappingError(msg) => assert!(msg.starts_with("column `Name`")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            row.try_get::<i64>("missing"),
            Err(DataAccessError::MappingError(_))
        ));
        assert!(matches!(
            row.try_get_by_index::<i64>(9),
            Err(DataAccessError::MappingError(_))
        ));
    }

    #[test]
    fn duplicate_column_names_resolve_to_the_first() {
        let row = CustomDbRow::new(
            Arc::new(vec!["id".into(), "ID".into(), "id".into()]),
            vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)],
        );
        assert_eq!(row.try_get::<i64>("id").unwrap(), 1);
        assert_eq!(row.try_get::<i64>("ID").unwrap(), 2);
        assert_eq!(row.try_get::<i64>("Id").unwrap(), 1);
    }
}
