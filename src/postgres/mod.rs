// PostgreSQL backend, built on tokio-postgres.
//
// - config: options, builder, and the data source
// - connection: per-call session implementing `DbConnection`
// - params: `RowValues: ToSql`, per-parameter type checks
// - query: rows -> `ResultSet`

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{PostgresDataSource, PostgresOptions, PostgresOptionsBuilder};
pub use connection::PostgresConnection;
pub use params::{Params, binds_to, check_param_types};
pub use query::build_result_set;
