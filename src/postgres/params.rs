use std::error::Error;

use chrono::NaiveDate;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::error::DataAccessError;
use crate::types::RowValues;

/// Borrowed Postgres parameter list.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Borrow each `RowValues` as a `ToSql` trait object.
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        Params { references }
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, ty: &Type) -> Result<T, Box<dyn Error + Sync + Send>> {
    T::try_from(value).map_err(|_| format!("integer {value} out of range for {ty}").into())
}

fn is_text(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

/// Whether `value` may be sent for a parameter the server typed as `ty`.
///
/// Each variant binds only to the column types whose wire format it actually produces; `Null`
/// binds to anything.
#[must_use]
pub fn binds_to(value: &RowValues, ty: &Type) -> bool {
    match value {
        RowValues::Null => true,
        RowValues::Int(_) => matches!(
            *ty,
            Type::INT2 | Type::INT4 | Type::INT8 | Type::FLOAT4 | Type::FLOAT8
        ),
        RowValues::Float(_) => matches!(*ty, Type::FLOAT4 | Type::FLOAT8),
        RowValues::Text(_) => is_text(ty),
        RowValues::Bool(_) => *ty == Type::BOOL,
        RowValues::Timestamp(_) => {
            matches!(*ty, Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE)
        }
        RowValues::JSON(_) => matches!(*ty, Type::JSON | Type::JSONB),
        RowValues::Blob(_) => *ty == Type::BYTEA,
    }
}

/// Check every argument against the parameter types of a prepared statement.
///
/// # Errors
/// Returns `DataAccessError::ParameterError` naming the first `$N` whose value cannot be sent
/// as the type the server inferred for it.
pub fn check_param_types(types: &[Type], params: &[RowValues]) -> Result<(), DataAccessError> {
    if types.len() != params.len() {
        return Err(DataAccessError::ParameterError(format!(
            "statement expects {} parameters but {} were bound",
            types.len(),
            params.len()
        )));
    }
    for (i, (ty, value)) in types.iter().zip(params).enumerate() {
        if !binds_to(value, ty) {
            return Err(DataAccessError::ParameterError(format!(
                "${}: cannot bind {} value to a parameter of type {ty}",
                i + 1,
                value.kind()
            )));
        }
    }
    Ok(())
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if !binds_to(self, ty) {
            let kind = self.kind();
            return Err(format!("cannot bind {kind} value to a parameter of type {ty}").into());
        }
        match self {
            // Narrow to the column's width; the wire format is fixed-size per type.
            RowValues::Int(i) => match *ty {
                Type::INT2 => narrow::<i16>(*i, ty)?.to_sql_checked(ty, out),
                Type::INT4 => narrow::<i32>(*i, ty)?.to_sql_checked(ty, out),
                #[allow(clippy::cast_precision_loss)]
                Type::FLOAT4 => (*i as f32).to_sql_checked(ty, out),
                #[allow(clippy::cast_precision_loss)]
                Type::FLOAT8 => (*i as f64).to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            RowValues::Float(f) => match *ty {
                #[allow(clippy::cast_possible_truncation)]
                Type::FLOAT4 => (*f as f32).to_sql_checked(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            RowValues::Text(s) => s.to_sql_checked(ty, out),
            RowValues::Bool(b) => b.to_sql_checked(ty, out),
            RowValues::Timestamp(dt) => match *ty {
                Type::TIMESTAMPTZ => dt.and_utc().to_sql_checked(ty, out),
                Type::DATE => {
                    let date: NaiveDate = dt.date();
                    date.to_sql_checked(ty, out)
                }
                _ => dt.to_sql_checked(ty, out),
            },
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql_checked(ty, out),
            RowValues::Blob(bytes) => bytes.as_slice().to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
