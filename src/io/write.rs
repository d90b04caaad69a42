use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::repo::Dolt;
use crate::domain::model::Row;
use crate::utils::error::{DoltError, Result};

/// How `dolt table import` treats the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Create,
    ForceCreate,
    Replace,
    Update,
}

impl ImportMode {
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            Self::Create => &["-c"],
            Self::ForceCreate => &["-f", "-c"],
            Self::Replace => &["-r"],
            Self::Update => &["-u"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ForceCreate => "force_create",
            Self::Replace => "replace",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Inferred from `ls()` when unset: update for existing tables, create
    /// otherwise.
    pub import_mode: Option<ImportMode>,
    pub primary_key: Vec<String>,
    pub commit: bool,
    pub commit_message: Option<String>,
    pub commit_date: Option<DateTime<Utc>>,
    /// Keep importing when a row fails.
    pub continue_importing: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: ImportMode) -> Self {
        self.import_mode = Some(mode);
        self
    }

    pub fn primary_key<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn commit(mut self) -> Self {
        self.commit = true;
        self
    }

    pub fn commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit = true;
        self.commit_message = Some(message.into());
        self
    }

    pub fn commit_date(mut self, date: DateTime<Utc>) -> Self {
        self.commit_date = Some(date);
        self
    }

    pub fn continue_importing(mut self) -> Self {
        self.continue_importing = true;
        self
    }
}

/// Write rows into a table through a temp CSV and `dolt table import`. The
/// CSV header is the sorted union of the row keys; rows missing a key get
/// an empty cell.
pub async fn write_rows(dolt: &Dolt, table: &str, rows: &[Row], opts: WriteOptions) -> Result<()> {
    let mut fields: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        for key in row.keys() {
            fields.insert(key.as_str());
        }
    }
    let fields: Vec<&str> = fields.into_iter().collect();

    let file = import_temp_file()?;
    write_csv(file.path(), &fields, rows)?;
    import_file(dolt, table, file.path(), &opts).await
}

/// Write column-oriented data into a table. All columns must have the same
/// length.
pub async fn write_columns(
    dolt: &Dolt,
    table: &str,
    columns: &HashMap<String, Vec<Value>>,
    opts: WriteOptions,
) -> Result<()> {
    let lengths: BTreeSet<usize> = columns.values().map(Vec::len).collect();
    if lengths.len() > 1 {
        return Err(DoltError::args("must pass columns of identical length"));
    }

    let rows = crate::io::columns_to_rows(columns);
    let mut fields: Vec<&str> = columns.keys().map(String::as_str).collect();
    fields.sort_unstable();

    let file = import_temp_file()?;
    write_csv(file.path(), &fields, &rows)?;
    import_file(dolt, table, file.path(), &opts).await
}

/// Import an existing CSV file into a table.
pub async fn write_file(dolt: &Dolt, table: &str, file: &Path, opts: WriteOptions) -> Result<()> {
    if !file.exists() {
        return Err(DoltError::args(format!(
            "import file does not exist: {}",
            file.display()
        )));
    }
    import_file(dolt, table, file, &opts).await
}

fn import_temp_file() -> Result<tempfile::NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix("doltcli-import-")
        .suffix(".csv")
        .tempfile()?)
}

fn write_csv(path: &Path, fields: &[&str], rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(fields)?;
    for row in rows {
        let record: Vec<String> = fields
            .iter()
            .map(|field| row.get(*field).map(render_value).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

async fn import_file(dolt: &Dolt, table: &str, file: &Path, opts: &WriteOptions) -> Result<()> {
    let mode = match opts.import_mode {
        Some(mode) => mode,
        None => infer_import_mode(dolt, table).await?,
    };
    tracing::info!(
        "Importing to table {} in dolt directory {}, import mode {}",
        table,
        dolt.repo_dir().display(),
        mode
    );

    let mut args = vec!["table".to_string(), "import".to_string(), table.to_string()];
    args.extend(mode.flags().iter().map(|f| f.to_string()));
    if !opts.primary_key.is_empty() {
        args.push(format!("--pk={}", opts.primary_key.join(",")));
    }
    if opts.continue_importing {
        args.push("--continue".to_string());
    }
    args.push(file.to_string_lossy().to_string());

    dolt.execute(args).await?;

    if opts.commit {
        let message = opts.commit_message.clone().unwrap_or_else(|| {
            format!("Committing write to table {} in {} mode", table, mode)
        });
        dolt.add(&[table]).await?;
        dolt.commit_with(Some(&message), false, opts.commit_date)
            .await?;
    }
    Ok(())
}

async fn infer_import_mode(dolt: &Dolt, table: &str) -> Result<ImportMode> {
    let exists = dolt.ls(false, false).await?.iter().any(|t| t.name == table);
    if exists {
        tracing::info!("No import mode specified, table exists, using \"update\"");
        Ok(ImportMode::Update)
    } else {
        tracing::info!("No import mode specified, table does not exist, using \"create\"");
        Ok(ImportMode::Create)
    }
}
