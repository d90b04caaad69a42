use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::exec::BinaryExecutor;
use crate::domain::model::{row_str, Commit, Status};
use crate::domain::ports::{ExecSpec, Executor};
use crate::io::read::read_rows_sql;
use crate::utils::error::{DoltError, Result};
use crate::utils::validation::validate_at_most_one;

/// A handle on a Dolt repository. Cheap to clone; all operations shell out
/// to the dolt binary through the configured executor.
#[derive(Clone)]
pub struct Dolt {
    pub(crate) repo_dir: PathBuf,
    pub(crate) executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Dolt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dolt")
            .field("repo_dir", &self.repo_dir)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    pub branch: Option<String>,
    pub tables: Vec<String>,
    pub new_branch: bool,
    pub start_point: Option<String>,
    pub track: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    pub data: bool,
    pub schema: bool,
    pub summary: bool,
    pub sql: bool,
    pub filter: Option<String>,
    pub limit: Option<usize>,
}

impl Dolt {
    /// Wrap an existing repository; the directory must contain `.dolt`.
    pub fn open(repo_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_executor(repo_dir, Arc::new(BinaryExecutor::new()))
    }

    pub fn with_executor(
        repo_dir: impl Into<PathBuf>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let repo_dir = repo_dir.into();
        if !repo_dir.join(".dolt").exists() {
            return Err(DoltError::InvalidRepo { path: repo_dir });
        }
        Ok(Self { repo_dir, executor })
    }

    /// Create a new repository in the directory, creating the directory
    /// when needed, and return a handle on it.
    pub async fn init(repo_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::init_with(repo_dir, Arc::new(BinaryExecutor::new())).await
    }

    /// Init with a custom executor. A failing `dolt init` is tolerated so
    /// that initializing an already-initialized directory still yields a
    /// handle.
    pub async fn init_with(
        repo_dir: impl Into<PathBuf>,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let repo_dir = repo_dir.into();
        std::fs::create_dir_all(&repo_dir)?;
        tracing::info!("Initializing dolt repo in {}", repo_dir.display());

        match executor
            .execute(ExecSpec::new(["init"]).cwd(&repo_dir))
            .await
        {
            Ok(_) | Err(DoltError::Command { .. }) => {}
            Err(e) => return Err(e),
        }
        Self::with_executor(repo_dir, executor)
    }

    pub async fn version() -> Result<String> {
        Self::version_with(Arc::new(BinaryExecutor::new())).await
    }

    pub async fn version_with(executor: Arc<dyn Executor>) -> Result<String> {
        let out = executor.execute(ExecSpec::new(["version"])).await?;
        out.stdout
            .split_whitespace()
            .nth(2)
            .map(str::to_string)
            .ok_or_else(|| {
                DoltError::parse("version", format!("unexpected output: {}", out.stdout.trim()))
            })
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// The repository name: directory basename with `-` mapped to `_`,
    /// matching how dolt names the database in SQL contexts.
    pub fn repo_name(&self) -> String {
        self.repo_dir
            .file_name()
            .map(|n| n.to_string_lossy().replace('-', "_"))
            .unwrap_or_default()
    }

    pub(crate) async fn run(&self, args: Vec<String>) -> Result<String> {
        let out = self
            .executor
            .execute(ExecSpec {
                args,
                cwd: Some(self.repo_dir.clone()),
                outfile: None,
            })
            .await?;
        Ok(out.stdout)
    }

    pub(crate) async fn run_to_file(&self, args: Vec<String>, outfile: PathBuf) -> Result<PathBuf> {
        let out = self
            .executor
            .execute(ExecSpec {
                args,
                cwd: Some(self.repo_dir.clone()),
                outfile: Some(outfile),
            })
            .await?;
        out.path
            .ok_or_else(|| DoltError::parse("exec", "executor did not report an output file"))
    }

    /// Escape hatch: run any dolt subcommand in this repository, as it
    /// would appear on the command line, and return its stdout.
    pub async fn execute<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(args.into_iter().map(Into::into).collect()).await
    }

    /// Hash of the current HEAD commit.
    pub async fn head(&self) -> Result<String> {
        let rows = self.sql_rows("select HASHOF('HEAD') as hash").await?;
        rows.first()
            .and_then(|r| row_str(r, "hash"))
            .ok_or_else(|| DoltError::parse("head", "head not found"))
    }

    /// Hash of the working set root.
    pub async fn working(&self) -> Result<String> {
        let query = format!("select @@{}_working as working", self.repo_name());
        let rows = self.sql_rows(&query).await?;
        rows.first()
            .and_then(|r| row_str(r, "working"))
            .ok_or_else(|| DoltError::parse("working", "working head not found"))
    }

    pub async fn active_branch(&self) -> Result<String> {
        let rows = self.sql_rows("select active_branch() as a").await?;
        rows.first()
            .and_then(|r| row_str(r, "a"))
            .ok_or_else(|| DoltError::parse("active_branch", "active branch not found"))
    }

    /// Parse `dolt status` into a `Status`.
    pub async fn status(&self) -> Result<Status> {
        let output = self.run(vec!["status".to_string()]).await?;
        Ok(parse_status(&output))
    }

    /// Stage the given tables, then return the refreshed status.
    pub async fn add(&self, tables: &[&str]) -> Result<Status> {
        let mut args = vec!["add".to_string()];
        args.extend(tables.iter().map(|t| t.to_string()));
        self.run(args).await?;
        self.status().await
    }

    /// Reset tables in the working set to their value at the tip of the
    /// current branch. Without tables or flags this is a soft reset.
    pub async fn reset(&self, tables: &[&str], hard: bool, soft: bool) -> Result<()> {
        validate_at_most_one("reset", &[("hard", hard), ("soft", soft)])?;
        if (hard || soft) && !tables.is_empty() {
            return Err(DoltError::args(
                "specify either the hard/soft flag, or tables to reset",
            ));
        }

        let mut args = vec!["reset".to_string()];
        if hard {
            args.push("--hard".to_string());
        } else if soft || tables.is_empty() {
            args.push("--soft".to_string());
        } else {
            args.extend(tables.iter().map(|t| t.to_string()));
        }
        self.run(args).await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.commit_with(Some(message), false, None).await
    }

    pub async fn commit_with(
        &self,
        message: Option<&str>,
        allow_empty: bool,
        date: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut args = vec![
            "commit".to_string(),
            "-m".to_string(),
            message.unwrap_or("").to_string(),
        ];
        if allow_empty {
            args.push("--allow-empty".to_string());
        }
        if let Some(date) = date {
            args.push("--date".to_string());
            args.push(date.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        self.run(args).await?;
        Ok(())
    }

    /// Merge a branch into the active branch. Refuses when the working set
    /// is dirty or the branch does not exist. Conflicting merges are
    /// aborted; an interactive merge does not make sense when scripting.
    pub async fn merge(&self, branch: &str, message: Option<&str>, squash: bool) -> Result<()> {
        let (current, branches) = self.branch_list().await?;
        if !self.status().await?.is_clean {
            return Err(DoltError::args(format!(
                "changes in the working set, please commit before merging {} to {}",
                branch, current.name
            )));
        }
        if !branches.iter().any(|b| b.name == branch) {
            return Err(DoltError::args(format!(
                "trying to merge in non-existent branch {} to {}",
                branch, current.name
            )));
        }

        tracing::info!("Merging {} into {}", branch, current.name);
        let mut args = vec!["merge".to_string()];
        if squash {
            args.push("--squash".to_string());
        }
        args.push(branch.to_string());

        let output = self.run(args).await?;
        let lines: Vec<&str> = output.split('\n').collect();

        if lines.len() == 3 && lines[1].contains("Fast-forward") {
            tracing::info!(
                "Completed fast-forward merge of {} into {}",
                branch,
                current.name
            );
            return Ok(());
        }
        if lines.len() == 5 && lines[2].starts_with("CONFLICT") {
            tracing::warn!(
                "merge conflict merging {} to {}: {}",
                branch,
                current.name,
                lines[2]
            );
            tracing::warn!("aborting, interactive merges are not supported");
            self.run(vec!["merge".to_string(), "--abort".to_string()])
                .await?;
            return Ok(());
        }

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Merged {} into {}", current.name, branch));
        tracing::info!("{}", message);

        let status = self.status().await?;
        let tables: Vec<String> = status
            .added_tables
            .keys()
            .chain(status.modified_tables.keys())
            .cloned()
            .collect();
        if !tables.is_empty() {
            let refs: Vec<&str> = tables.iter().map(String::as_str).collect();
            self.add(&refs).await?;
        }
        self.commit(&message).await?;
        Ok(())
    }

    /// Checkout an existing branch.
    pub async fn checkout(&self, branch: &str) -> Result<()> {
        self.checkout_with(CheckoutOptions {
            branch: Some(branch.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Checkout a branch (optionally creating it at a start point), or a
    /// set of tables. Branch and tables are mutually exclusive.
    pub async fn checkout_with(&self, opts: CheckoutOptions) -> Result<()> {
        if opts.branch.is_some() && !opts.tables.is_empty() {
            return Err(DoltError::args(
                "no tables may be provided when checking out a branch",
            ));
        }

        let mut args = vec!["checkout".to_string()];
        if let Some(branch) = &opts.branch {
            if opts.new_branch {
                args.push("-b".to_string());
            }
            args.push(branch.clone());
            if let Some(start) = &opts.start_point {
                args.push(start.clone());
            }
        }
        args.extend(opts.tables.iter().cloned());
        if let Some(track) = &opts.track {
            args.push("--track".to_string());
            args.push(track.clone());
        }
        self.run(args).await?;
        Ok(())
    }

    /// Commit history, most recent first, optionally limited or scoped to
    /// one commit.
    pub async fn log(&self, number: Option<usize>, commit: Option<&str>) -> Result<Vec<Commit>> {
        let rows = read_rows_sql(self, &Commit::log_table_query(number, commit)).await?;
        Commit::parse_log_rows(&rows)
    }

    /// Diff between the working set and a commit, or between two commits,
    /// returning the raw diff text. At most one of data/schema/summary.
    pub async fn diff(
        &self,
        commit: Option<&str>,
        other_commit: Option<&str>,
        tables: &[&str],
        opts: DiffOptions,
    ) -> Result<String> {
        validate_at_most_one(
            "diff",
            &[
                ("data", opts.data),
                ("schema", opts.schema),
                ("summary", opts.summary),
            ],
        )?;

        let mut args = vec!["diff".to_string()];
        if opts.data {
            if let Some(filter) = &opts.filter {
                args.push("--where".to_string());
                args.push(filter.clone());
            }
            if let Some(limit) = opts.limit {
                args.push("--limit".to_string());
                args.push(limit.to_string());
            }
        }
        if opts.summary {
            args.push("--summary".to_string());
        }
        if opts.schema {
            args.push("--schema".to_string());
        }
        if opts.sql {
            args.push("--sql".to_string());
        }
        if let Some(commit) = commit {
            args.push(commit.to_string());
        }
        if let Some(other) = other_commit {
            args.push(other.to_string());
        }
        args.extend(tables.iter().map(|t| t.to_string()));
        self.run(args).await
    }

    /// Authorship of the last change to each row of a table.
    pub async fn blame(&self, table: &str, rev: Option<&str>) -> Result<String> {
        let mut args = vec!["blame".to_string()];
        if let Some(rev) = rev {
            args.push(rev.to_string());
        }
        args.push(table.to_string());
        self.run(args).await
    }
}

fn parse_status(output: &str) -> Status {
    if output.contains("clean") {
        return Status {
            is_clean: true,
            ..Default::default()
        };
    }

    let mut staged = false;
    let mut modified_tables: HashMap<String, bool> = HashMap::new();
    let mut added_tables: HashMap<String, bool> = HashMap::new();

    for line in output.lines() {
        let line = line.trim_start();
        if line.starts_with("Changes to be committed") {
            staged = true;
        } else if line.starts_with("Changes not staged for commit")
            || line.starts_with("Untracked files")
        {
            staged = false;
        } else if line.starts_with("modified") {
            if let Some((_, name)) = line.split_once(':') {
                modified_tables.insert(name.trim().to_string(), staged);
            }
        } else if line.starts_with("new table") {
            if let Some((_, name)) = line.split_once(':') {
                added_tables.insert(name.trim().to_string(), staged);
            }
        }
    }

    Status {
        is_clean: false,
        modified_tables,
        added_tables,
    }
}
