use std::path::{Path, PathBuf};

use crate::core::repo::Dolt;
use crate::utils::error::{DoltError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaImportMode {
    Create,
    Update,
    Replace,
}

impl SchemaImportMode {
    fn flag(&self) -> &'static str {
        match self {
            Self::Create => "--create",
            Self::Update => "--update",
            Self::Replace => "--replace",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaImportOptions {
    /// Output the SQL that would run, without executing it.
    pub dry_run: bool,
    /// When a column already exists, keep its current type.
    pub keep_types: bool,
    pub file_type: Option<String>,
    pub pks: Vec<String>,
    /// Mapping file from column names in the file to new names.
    pub map: Option<PathBuf>,
    /// Minimum fractional component a value must have to infer a float.
    pub float_threshold: Option<f64>,
    pub delim: Option<String>,
}

impl Dolt {
    /// Export the schema of the table, to a file when one is given,
    /// returning the schema text otherwise.
    pub async fn schema_export(&self, table: &str, filename: Option<&Path>) -> Result<String> {
        let mut args = vec![
            "schema".to_string(),
            "export".to_string(),
            table.to_string(),
        ];
        if let Some(filename) = filename {
            args.push("--filename".to_string());
            args.push(filename.to_string_lossy().to_string());
        }
        let output = self.run(args).await?;
        if filename.is_none() {
            tracing::info!("{}", output);
        }
        Ok(output)
    }

    /// Infer a schema from a file and create, update, or replace the table
    /// with it. Create and replace need primary keys, since they produce a
    /// brand new table.
    pub async fn schema_import(
        &self,
        table: &str,
        filename: &Path,
        mode: SchemaImportMode,
        opts: SchemaImportOptions,
    ) -> Result<()> {
        if matches!(mode, SchemaImportMode::Create | SchemaImportMode::Replace)
            && opts.pks.is_empty()
        {
            return Err(DoltError::args(
                "primary keys must be provided when creating or replacing a table schema",
            ));
        }

        let mut args = vec!["schema".to_string(), "import".to_string()];
        args.push(mode.flag().to_string());
        if opts.dry_run {
            args.push("--dry-run".to_string());
        }
        if opts.keep_types {
            args.push("--keep-types".to_string());
        }
        if let Some(file_type) = &opts.file_type {
            args.push("--file-type".to_string());
            args.push(file_type.clone());
        }
        if !opts.pks.is_empty() {
            args.push("--pks".to_string());
            args.push(opts.pks.join(","));
        }
        if let Some(map) = &opts.map {
            args.push("--map".to_string());
            args.push(map.to_string_lossy().to_string());
        }
        if let Some(threshold) = opts.float_threshold {
            args.push("--float-threshold".to_string());
            args.push(threshold.to_string());
        }
        if let Some(delim) = &opts.delim {
            args.push("--delim".to_string());
            args.push(delim.clone());
        }
        args.push(table.to_string());
        args.push(filename.to_string_lossy().to_string());

        self.run(args).await?;
        Ok(())
    }

    /// Display the schema of the tables, optionally at a commit.
    pub async fn schema_show(&self, tables: &[&str], commit: Option<&str>) -> Result<String> {
        let mut args = vec!["schema".to_string(), "show".to_string()];
        if let Some(commit) = commit {
            args.push(commit.to_string());
        }
        args.extend(tables.iter().map(|t| t.to_string()));
        self.run(args).await
    }
}
