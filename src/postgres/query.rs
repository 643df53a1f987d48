use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::types::Type;
use tokio_postgres::{Row, Statement};

use crate::error::DataAccessError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// The Postgres column types the crate reads back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Bool,
    Timestamp,
    TimestampTz,
    Date,
    Json,
    Bytea,
    Text,
}

/// Classify a column by its Postgres type.
///
/// # Errors
/// Returns `DataAccessError::MappingError` naming the column and type when the type has no
/// `RowValues` counterpart.
pub(crate) fn column_kind(ty: &Type, column: &str) -> Result<ColumnKind, DataAccessError> {
    let kind = match *ty {
        Type::INT2 => ColumnKind::Int2,
        Type::INT4 => ColumnKind::Int4,
        Type::INT8 => ColumnKind::Int8,
        Type::FLOAT4 => ColumnKind::Float4,
        Type::FLOAT8 => ColumnKind::Float8,
        Type::BOOL => ColumnKind::Bool,
        Type::TIMESTAMP => ColumnKind::Timestamp,
        Type::TIMESTAMPTZ => ColumnKind::TimestampTz,
        Type::DATE => ColumnKind::Date,
        Type::JSON | Type::JSONB => ColumnKind::Json,
        Type::BYTEA => ColumnKind::Bytea,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => ColumnKind::Text,
        ref other => {
            return Err(DataAccessError::MappingError(format!(
                "unsupported Postgres column type `{other}` for column `{column}`; cast it in SQL"
            )));
        }
    };
    Ok(kind)
}

fn extract(row: &Row, idx: usize, kind: ColumnKind) -> Result<RowValues, DataAccessError> {
    let value = match kind {
        ColumnKind::Int2 => row
            .try_get::<_, Option<i16>>(idx)?
            .map(|v| RowValues::Int(i64::from(v))),
        ColumnKind::Int4 => row
            .try_get::<_, Option<i32>>(idx)?
            .map(|v| RowValues::Int(i64::from(v))),
        ColumnKind::Int8 => row.try_get::<_, Option<i64>>(idx)?.map(RowValues::Int),
        ColumnKind::Float4 => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| RowValues::Float(f64::from(v))),
        ColumnKind::Float8 => row.try_get::<_, Option<f64>>(idx)?.map(RowValues::Float),
        ColumnKind::Bool => row.try_get::<_, Option<bool>>(idx)?.map(RowValues::Bool),
        ColumnKind::Timestamp => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(RowValues::Timestamp),
        ColumnKind::TimestampTz => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| RowValues::Timestamp(v.naive_utc())),
        ColumnKind::Date => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .and_then(|v| v.and_hms_opt(0, 0, 0))
            .map(RowValues::Timestamp),
        ColumnKind::Json => row.try_get::<_, Option<Value>>(idx)?.map(RowValues::JSON),
        ColumnKind::Bytea => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(RowValues::Blob),
        ColumnKind::Text => row.try_get::<_, Option<String>>(idx)?.map(RowValues::Text),
    };

    Ok(value.unwrap_or(RowValues::Null))
}

/// Extracts a `RowValues` from a `tokio_postgres` row at the given index.
///
/// # Errors
/// Returns `DataAccessError` if the column type is unsupported or the value cannot be read as
/// its declared type.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<RowValues, DataAccessError> {
    let column = &row.columns()[idx];
    let kind = column_kind(column.type_(), column.name())?;
    extract(row, idx, kind)
}

/// Drain already-fetched rows into a `ResultSet`, taking column names from the statement so
/// empty results still carry them.
///
/// # Errors
/// Returns `DataAccessError` if any column cannot be read.
pub fn build_result_set(stmt: &Statement, rows: &[Row]) -> Result<ResultSet, DataAccessError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    // Classified once per statement, so an unsupported column fails even on an empty result.
    let kinds = stmt
        .columns()
        .iter()
        .map(|col| column_kind(col.type_(), col.name()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(kinds.len());
        for (i, kind) in kinds.iter().enumerate() {
            row_values.push(extract(row, i, *kind)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
