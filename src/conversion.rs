//! Typed reads out of [`RowValues`].
//!
//! Row mappers call [`CustomDbRow::try_get`](crate::CustomDbRow::try_get), which goes through
//! [`FromRowValue`]. SQL `NULL` only converts into `Option<T>` or `RowValues`.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::DataAccessError;
use crate::types::RowValues;

/// Conversion from one fetched column value into a Rust type.
pub trait FromRowValue: Sized {
    /// # Errors
    ///
    /// Returns `DataAccessError::MappingError` if the value has an incompatible type.
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError>;
}

fn mismatch(expected: &str, value: &RowValues) -> DataAccessError {
    DataAccessError::MappingError(format!("expected {expected}, found {}", value.kind()))
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        Ok(value.clone())
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value.as_int().copied().ok_or_else(|| mismatch("Int", value))
    }
}

impl FromRowValue for i32 {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        let wide = i64::from_row_value(value)?;
        i32::try_from(wide).map_err(|_| {
            DataAccessError::MappingError(format!("value {wide} does not fit in i32"))
        })
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value.as_float().ok_or_else(|| mismatch("Float", value))
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value.as_bool().ok_or_else(|| mismatch("Bool", value))
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value
            .as_text()
            .map(ToString::to_string)
            .ok_or_else(|| mismatch("Text", value))
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value
            .as_blob()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("Blob", value))
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        value.as_timestamp().ok_or_else(|| mismatch("Timestamp", value))
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        match value {
            RowValues::JSON(json) => Ok(json.clone()),
            // SQLite stores JSON as text.
            RowValues::Text(text) => serde_json::from_str(text)
                .map_err(|e| DataAccessError::MappingError(format!("invalid JSON text: {e}"))),
            other => Err(mismatch("JSON", other)),
        }
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Result<Self, DataAccessError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}
