pub mod config;
pub mod core;
pub mod domain;
pub mod io;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};
pub use config::ToolConfig;
pub use core::config_cmd::ConfigOp;
pub use core::ctx::{detach_head, DetachedHead, DoltHubContext};
pub use core::exec::{BinaryExecutor, DEFAULT_DOLT_PATH, DOLT_PATH_ENV};
pub use core::repo::{CheckoutOptions, DiffOptions, Dolt};
pub use core::schema::{SchemaImportMode, SchemaImportOptions};
pub use core::sql::{ResultFormat, SqlOptions, SqlResult};
pub use core::table::{TableExportOptions, TableImportMode, TableImportOptions};
pub use domain::model::{row_str, Branch, Commit, KeyPair, Remote, Row, Status, Table};
pub use domain::ports::{ExecOutput, ExecSpec, Executor};
pub use io::{
    columns_to_rows, read_columns, read_columns_sql, read_csv_rows, read_rows, read_rows_sql,
    rows_to_columns, write_columns, write_file, write_rows, ImportMode, WriteOptions,
};
pub use utils::error::{DoltError, Result};
