//! Convenient imports for common functionality.
//!
//! ```rust
//! use sql_template::prelude::*;
//! ```

pub use crate::conversion::FromRowValue;
pub use crate::data_source::{
    AnyConnection, AnyDataSource, DataSource, DataSourceConfig, DbConnection,
};
pub use crate::error::DataAccessError;
pub use crate::mapper::{RowMapper, SingleColumnRowMapper, single_column};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::template::SqlTemplate;
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresDataSource, PostgresOptions, PostgresOptionsBuilder};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDataSource, SqliteOptions, SqliteOptionsBuilder};
