use std::path::{Path, PathBuf};

use crate::core::repo::Dolt;
use crate::domain::model::Table;
use crate::utils::error::{DoltError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableImportMode {
    Create,
    Update,
    Replace,
}

impl TableImportMode {
    fn flag(&self) -> &'static str {
        match self {
            Self::Create => "--create-table",
            Self::Update => "--update-table",
            Self::Replace => "--replace-table",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableImportOptions {
    pub force: bool,
    pub mapping_file: Option<PathBuf>,
    pub pk: Vec<String>,
    pub file_type: Option<String>,
    pub continue_importing: bool,
    pub delim: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TableExportOptions {
    pub force: bool,
    pub schema: Option<String>,
    pub mapping_file: Option<PathBuf>,
    pub pk: Vec<String>,
    pub file_type: Option<String>,
    pub continue_exporting: bool,
}

impl Dolt {
    /// Tables in the working set, the system tables, or all, with root hash
    /// and row count for working-set tables.
    pub async fn ls(&self, system: bool, all: bool) -> Result<Vec<Table>> {
        let mut args = vec!["ls".to_string(), "--verbose".to_string()];
        if all {
            args.push("--all".to_string());
        }
        if system {
            args.push("--system".to_string());
        }
        let output = self.run(args).await?;
        parse_ls(&output)
    }

    /// Remove tables from the working set.
    pub async fn table_rm(&self, tables: &[&str]) -> Result<()> {
        let mut args = vec!["table".to_string(), "rm".to_string()];
        args.extend(tables.iter().map(|t| t.to_string()));
        self.run(args).await?;
        Ok(())
    }

    /// Import a data file into a table, inferring the schema from the file.
    /// Create and replace need a primary key, since they produce a brand
    /// new table.
    pub async fn table_import(
        &self,
        table: &str,
        filename: &Path,
        mode: TableImportMode,
        opts: TableImportOptions,
    ) -> Result<()> {
        if matches!(mode, TableImportMode::Create | TableImportMode::Replace)
            && opts.pk.is_empty()
        {
            return Err(DoltError::args(
                "a primary key must be provided when creating or replacing a table",
            ));
        }

        let mut args = vec!["table".to_string(), "import".to_string()];
        args.push(mode.flag().to_string());
        if let Some(file_type) = &opts.file_type {
            args.push("--file-type".to_string());
            args.push(file_type.clone());
        }
        if !opts.pk.is_empty() {
            args.push("--pk".to_string());
            args.push(opts.pk.join(","));
        }
        if let Some(mapping) = &opts.mapping_file {
            args.push("--map".to_string());
            args.push(mapping.to_string_lossy().to_string());
        }
        if let Some(delim) = &opts.delim {
            args.push("--delim".to_string());
            args.push(delim.clone());
        }
        if opts.continue_importing {
            args.push("--continue".to_string());
        }
        if opts.force {
            args.push("--force".to_string());
        }
        args.push(table.to_string());
        args.push(filename.to_string_lossy().to_string());

        self.run(args).await?;
        Ok(())
    }

    /// Export a table to a data file.
    pub async fn table_export(
        &self,
        table: &str,
        filename: &Path,
        opts: TableExportOptions,
    ) -> Result<()> {
        let mut args = vec!["table".to_string(), "export".to_string()];
        if opts.force {
            args.push("--force".to_string());
        }
        if opts.continue_exporting {
            args.push("--continue".to_string());
        }
        if let Some(schema) = &opts.schema {
            args.push("--schema".to_string());
            args.push(schema.clone());
        }
        if let Some(mapping) = &opts.mapping_file {
            args.push("--map".to_string());
            args.push(mapping.to_string_lossy().to_string());
        }
        if !opts.pk.is_empty() {
            args.push("--pk".to_string());
            args.push(opts.pk.join(","));
        }
        if let Some(file_type) = &opts.file_type {
            args.push("--file-type".to_string());
            args.push(file_type.clone());
        }
        args.push(table.to_string());
        args.push(filename.to_string_lossy().to_string());

        self.run(args).await?;
        Ok(())
    }

    /// Rename a table.
    pub async fn table_mv(&self, old_table: &str, new_table: &str, force: bool) -> Result<()> {
        let mut args = vec!["table".to_string(), "mv".to_string()];
        if force {
            args.push("--force".to_string());
        }
        args.push(old_table.to_string());
        args.push(new_table.to_string());
        self.run(args).await?;
        Ok(())
    }

    /// Copy a table to a new table, optionally as of a commit.
    pub async fn table_cp(
        &self,
        old_table: &str,
        new_table: &str,
        commit: Option<&str>,
        force: bool,
    ) -> Result<()> {
        let mut args = vec!["table".to_string(), "cp".to_string()];
        if force {
            args.push("--force".to_string());
        }
        if let Some(commit) = commit {
            args.push(commit.to_string());
        }
        args.push(old_table.to_string());
        args.push(new_table.to_string());
        self.run(args).await?;
        Ok(())
    }
}

fn parse_ls(output: &str) -> Result<Vec<Table>> {
    let mut tables = Vec::new();

    if output
        .lines()
        .next()
        .is_some_and(|l| l.starts_with("No tables in working set"))
    {
        return Ok(tables);
    }

    let mut system_section = false;
    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("Tables") {
            continue;
        }
        if trimmed.starts_with("System") {
            system_section = true;
            continue;
        }

        if system_section {
            tables.push(Table {
                name: trimmed.to_string(),
                root: None,
                row_cnt: None,
                system: true,
            });
        } else {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(DoltError::parse(
                    "ls",
                    format!("unexpected line: {}", trimmed),
                ));
            }
            let row_cnt = parts[2].parse::<u64>().map_err(|_| {
                DoltError::parse("ls", format!("invalid row count in line: {}", trimmed))
            })?;
            tables.push(Table {
                name: parts[0].to_string(),
                root: Some(parts[1].to_string()),
                row_cnt: Some(row_cnt),
                system: false,
            });
        }
    }

    Ok(tables)
}
