use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::repo::Dolt;
use crate::domain::model::Row;
use crate::io::read::read_csv_rows;
use crate::utils::error::{DoltError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    Csv,
    Json,
}

impl ResultFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Options for `dolt sql`. Build with the fluent methods; incompatible
/// combinations are rejected by `Dolt::sql`.
#[derive(Debug, Clone, Default)]
pub struct SqlOptions {
    pub query: Option<String>,
    pub result_format: Option<ResultFormat>,
    /// Execute a saved query by name.
    pub execute_saved: Option<String>,
    /// Save the query under this name.
    pub save: Option<String>,
    /// Message attached to the saved query.
    pub message: Option<String>,
    pub list_saved: bool,
    /// Execute statements one after the other, delimited by `;`.
    pub batch: bool,
    /// Treat a directory of repositories as one multi-db server.
    pub multi_db_dir: Option<String>,
    /// Write CSV results to this file instead of parsing them.
    pub result_file: Option<PathBuf>,
}

impl SqlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn format(mut self, format: ResultFormat) -> Self {
        self.result_format = Some(format);
        self
    }

    pub fn execute_saved(mut self, name: impl Into<String>) -> Self {
        self.execute_saved = Some(name.into());
        self
    }

    pub fn save(mut self, name: impl Into<String>) -> Self {
        self.save = Some(name.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn list_saved(mut self) -> Self {
        self.list_saved = true;
        self
    }

    pub fn batch(mut self) -> Self {
        self.batch = true;
        self
    }

    pub fn multi_db_dir(mut self, dir: impl Into<String>) -> Self {
        self.multi_db_dir = Some(dir.into());
        self
    }

    pub fn result_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_file = Some(path.into());
        self
    }
}

#[derive(Debug, Clone)]
pub enum SqlResult {
    Rows(Vec<Row>),
    Json(Value),
    File(PathBuf),
    None,
}

impl Dolt {
    /// Execute a SQL query, with the options dictating how it runs and
    /// where the output goes.
    pub async fn sql(&self, opts: SqlOptions) -> Result<SqlResult> {
        let mut args = vec!["sql".to_string()];

        if opts.list_saved {
            if opts.query.is_some()
                || opts.result_format.is_some()
                || opts.execute_saved.is_some()
                || opts.save.is_some()
                || opts.message.is_some()
                || opts.batch
                || opts.multi_db_dir.is_some()
                || opts.result_file.is_some()
            {
                return Err(DoltError::args(
                    "list_saved is incompatible with other sql options",
                ));
            }
            args.push("--list-saved".to_string());
            self.run(args).await?;
            return Ok(SqlResult::None);
        }

        if let Some(name) = &opts.execute_saved {
            if opts.query.is_some()
                || opts.save.is_some()
                || opts.message.is_some()
                || opts.batch
                || opts.multi_db_dir.is_some()
            {
                return Err(DoltError::args(
                    "execute_saved is incompatible with other sql options",
                ));
            }
            args.push("--execute".to_string());
            args.push(name.clone());
        }

        if let Some(dir) = &opts.multi_db_dir {
            args.push("--multi-db-dir".to_string());
            args.push(dir.clone());
        }
        if opts.batch {
            args.push("--batch".to_string());
        }
        if let Some(save) = &opts.save {
            args.push("--save".to_string());
            args.push(save.clone());
            if let Some(message) = &opts.message {
                args.push("--message".to_string());
                args.push(message.clone());
            }
        }

        if let Some(file) = &opts.result_file {
            let query = opts.query.as_ref().ok_or_else(|| {
                DoltError::args("must provide a query to write results to a file")
            })?;
            args.push("--query".to_string());
            args.push(query.clone());
            args.push("--result-format".to_string());
            args.push("csv".to_string());
            let path = self.run_to_file(args, file.clone()).await?;
            return Ok(SqlResult::File(path));
        }

        if let Some(format) = opts.result_format {
            let query = opts.query.as_ref().ok_or_else(|| {
                DoltError::args("must provide a query in order to specify a result format")
            })?;
            args.push("--query".to_string());
            args.push(query.clone());
            args.push("--result-format".to_string());
            args.push(format.as_str().to_string());

            // spool stdout to a temp file, then parse it
            let spool = tempfile::Builder::new()
                .prefix("doltcli-sql-")
                .suffix(".out")
                .tempfile()?;
            let path = self.run_to_file(args, spool.path().to_path_buf()).await?;
            return match format {
                ResultFormat::Csv => Ok(SqlResult::Rows(read_csv_rows(&path)?)),
                ResultFormat::Json => {
                    let file = std::fs::File::open(&path)?;
                    Ok(SqlResult::Json(serde_json::from_reader(file)?))
                }
            };
        }

        match &opts.query {
            Some(query) => {
                args.push("--query".to_string());
                args.push(query.clone());
            }
            None if opts.execute_saved.is_none() && opts.save.is_none() => {
                return Err(DoltError::args("must provide a query or a saved-query option"));
            }
            None => {}
        }
        self.run(args).await?;
        Ok(SqlResult::None)
    }

    /// Run a query through the CSV result path and return its rows.
    pub async fn sql_rows(&self, query: &str) -> Result<Vec<Row>> {
        match self
            .sql(SqlOptions::new().query(query).format(ResultFormat::Csv))
            .await?
        {
            SqlResult::Rows(rows) => Ok(rows),
            _ => Err(DoltError::parse("sql", "expected csv rows")),
        }
    }

    /// Run a query through the JSON result path; dolt returns a document
    /// with a `rows` array.
    pub async fn sql_json(&self, query: &str) -> Result<Value> {
        match self
            .sql(SqlOptions::new().query(query).format(ResultFormat::Json))
            .await?
        {
            SqlResult::Json(value) => Ok(value),
            _ => Err(DoltError::parse("sql", "expected a json document")),
        }
    }

    /// Run a query and leave the CSV results in the given file.
    pub async fn sql_to_file(&self, query: &str, path: impl Into<PathBuf>) -> Result<PathBuf> {
        match self
            .sql(SqlOptions::new().query(query).result_file(path))
            .await?
        {
            SqlResult::File(path) => Ok(path),
            _ => Err(DoltError::parse("sql", "expected a result file")),
        }
    }

    /// Run a statement for effect, discarding any output.
    pub async fn sql_exec(&self, query: &str) -> Result<()> {
        self.sql(SqlOptions::new().query(query)).await.map(|_| ())
    }
}
