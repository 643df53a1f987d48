//! Thin async template over relational database drivers.
//!
//! [`SqlTemplate`] borrows a [`DataSource`], acquires one connection per call, binds positional
//! [`RowValues`], executes the statement, maps rows with a caller-supplied [`RowMapper`], and
//! releases the connection before returning. Every failure comes back as a
//! [`DataAccessError`]; driver error types never escape.
//!
//! ```rust,no_run
//! # #[cfg(feature = "sqlite")]
//! # async fn demo() -> Result<(), sql_template::DataAccessError> {
//! use sql_template::prelude::*;
//!
//! let template = SqlTemplate::new(SqliteDataSource::new(SqliteOptions::new("app.db".into())));
//! template
//!     .update("INSERT INTO users (name) VALUES (?)", &[RowValues::Text("alice".into())])
//!     .await?;
//! let name: String = template
//!     .query_for_object(
//!         "SELECT name FROM users WHERE id = ?",
//!         single_column::<String>(),
//!         &[RowValues::Int(1)],
//!     )
//!     .await?;
//! # let _ = name;
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one backend feature: `sqlite` or `postgres`");

pub mod conversion;
pub mod data_source;
pub mod error;
pub mod mapper;
pub mod prelude;
pub mod results;
pub mod template;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use conversion::FromRowValue;
pub use data_source::{AnyConnection, AnyDataSource, DataSource, DataSourceConfig, DbConnection};
pub use error::DataAccessError;
pub use mapper::{RowMapper, single_column};
pub use results::{CustomDbRow, ResultSet};
pub use template::SqlTemplate;
pub use translation::{PlaceholderStyle, translate_placeholders};
pub use types::{DatabaseType, RowValues};
