use std::path::PathBuf;

use crate::core::repo::{CheckoutOptions, Dolt};
use crate::domain::model::row_str;
use crate::utils::error::{DoltError, Result};

/// Guard for temporarily pointing HEAD at a commit. Checks out a branch
/// containing the commit (creating `detached_HEAD_at_<hash prefix>` when
/// none exists) and records the branch to return to.
pub struct DetachedHead {
    dolt: Dolt,
    original_branch: String,
    switched: bool,
}

impl DetachedHead {
    pub fn switched(&self) -> bool {
        self.switched
    }

    /// Check the original branch back out, when a switch happened.
    pub async fn restore(self) -> Result<()> {
        if self.switched {
            self.dolt.checkout(&self.original_branch).await?;
        }
        Ok(())
    }
}

/// Point HEAD at the given commit, returning a guard that restores the
/// original branch via `restore()`.
pub async fn detach_head(dolt: &Dolt, committish: &str) -> Result<DetachedHead> {
    let (active, _) = dolt.branch_list().await?;

    let query = format!(
        "select name, hash from dolt_branches where hash = '{}'",
        committish
    );
    let rows = dolt.sql_rows(&query).await?;

    let mut switched = false;
    match rows.first() {
        Some(row) => {
            let name = row_str(row, "name")
                .ok_or_else(|| DoltError::parse("dolt_branches", "row is missing a branch name"))?;
            let hash = row_str(row, "hash")
                .ok_or_else(|| DoltError::parse("dolt_branches", "row is missing a branch hash"))?;
            if active.hash != hash {
                dolt.checkout(&name).await?;
                switched = true;
            }
        }
        None => {
            let prefix: String = committish.chars().take(5).collect();
            dolt.checkout_with(CheckoutOptions {
                branch: Some(format!("detached_HEAD_at_{}", prefix)),
                new_branch: true,
                start_point: Some(committish.to_string()),
                ..Default::default()
            })
            .await?;
            switched = true;
        }
    }

    Ok(DetachedHead {
        dolt: dolt.clone(),
        original_branch: active.name,
        switched,
    })
}

/// Clone-or-pull helper for working against a remote database: opens and
/// pulls when the local path already holds a repository, otherwise clones
/// (or runs read-tables when a table list is given).
pub struct DoltHubContext {
    pub dolt: Dolt,
    pub path: PathBuf,
}

impl DoltHubContext {
    pub const DEFAULT_REMOTE: &'static str = "origin";

    pub async fn load(
        db_path: &str,
        path: Option<PathBuf>,
        remote: &str,
        tables_to_read: Option<&[&str]>,
    ) -> Result<Self> {
        let db_name = Self::db_name(db_path)?;
        let path = match path {
            Some(path) => path,
            None => tempfile::tempdir()?.into_path().join(db_name),
        };

        match Dolt::open(&path) {
            Ok(dolt) => {
                tracing::info!(
                    "Dolt database found at {}, pulling from remote \"{}\"",
                    path.display(),
                    remote
                );
                dolt.pull(remote, None).await?;
                Ok(Self { dolt, path })
            }
            Err(DoltError::InvalidRepo { .. }) => {
                let dolt = match tables_to_read {
                    Some(tables) => {
                        tracing::info!("Running read-tables, creating a fresh copy of {}", db_path);
                        Dolt::read_tables(db_path, "master", tables, Some(&path)).await?
                    }
                    None => {
                        tracing::info!("Running clone, cloning remote {}", db_path);
                        Dolt::clone(db_path, Some(&path), None, None).await?
                    }
                };
                Ok(Self { dolt, path })
            }
            Err(e) => Err(e),
        }
    }

    fn db_name(db_path: &str) -> Result<String> {
        let split: Vec<&str> = db_path.split('/').collect();
        if split.len() != 2 {
            return Err(DoltError::args(format!("invalid DoltHub path {}", db_path)));
        }
        Ok(split[1].to_string())
    }
}
