// SQLite backend, built on rusqlite.
//
// - config: options, builder, and the data source
// - connection: per-call connection implementing `DbConnection`
// - params: `RowValues` -> rusqlite binding
// - query: cursor -> `ResultSet`

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{SqliteDataSource, SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use params::Params;
pub use query::build_result_set;
