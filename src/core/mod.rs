pub mod branch;
pub mod config_cmd;
pub mod creds;
pub mod ctx;
pub mod exec;
pub mod remote;
pub mod repo;
pub mod schema;
pub mod sql;
pub mod table;

pub use crate::domain::model::{Branch, Commit, KeyPair, Remote, Row, Status, Table};
pub use crate::domain::ports::{ExecOutput, ExecSpec, Executor};
pub use crate::utils::error::Result;
pub use config_cmd::ConfigOp;
pub use ctx::{detach_head, DetachedHead, DoltHubContext};
pub use exec::BinaryExecutor;
pub use repo::{CheckoutOptions, DiffOptions, Dolt};
pub use schema::{SchemaImportMode, SchemaImportOptions};
pub use sql::{ResultFormat, SqlOptions, SqlResult};
pub use table::{TableExportOptions, TableImportMode, TableImportOptions};
