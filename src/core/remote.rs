use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::exec::BinaryExecutor;
use crate::core::repo::Dolt;
use crate::domain::model::Remote;
use crate::domain::ports::{ExecSpec, Executor};
use crate::utils::error::{DoltError, Result};
use crate::utils::validation::validate_remote_url;

impl Dolt {
    /// Remotes configured for this repository.
    pub async fn remote_list(&self) -> Result<Vec<Remote>> {
        let output = self
            .run(vec!["remote".to_string(), "--verbose".to_string()])
            .await?;
        Ok(parse_remotes(&output))
    }

    pub async fn remote_add(&self, name: &str, url: &str) -> Result<()> {
        validate_remote_url("url", url)?;
        self.run(
            ["remote", "--verbose", "add", name, url]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .await?;
        Ok(())
    }

    pub async fn remote_remove(&self, name: &str) -> Result<()> {
        self.run(
            ["remote", "--verbose", "remove", name]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .await?;
        Ok(())
    }

    /// Push to the remote, optionally a specific refspec.
    pub async fn push(
        &self,
        remote: &str,
        refspec: Option<&str>,
        set_upstream: bool,
        force: bool,
    ) -> Result<()> {
        let mut args = vec!["push".to_string()];
        if set_upstream {
            args.push("--set-upstream".to_string());
        }
        if force {
            args.push("--force".to_string());
        }
        args.push(remote.to_string());
        if let Some(refspec) = refspec {
            args.push(refspec.to_string());
        }
        self.run(args).await?;
        Ok(())
    }

    /// Pull the latest changes, optionally from a specific branch.
    pub async fn pull(&self, remote: &str, branch: Option<&str>) -> Result<()> {
        let mut args = vec!["pull".to_string(), remote.to_string()];
        if let Some(branch) = branch {
            args.push(branch.to_string());
        }
        self.run(args).await?;
        Ok(())
    }

    /// Fetch the given refspecs (or everything) from the remote.
    pub async fn fetch(&self, remote: &str, refspecs: &[&str], force: bool) -> Result<()> {
        let mut args = vec!["fetch".to_string()];
        if force {
            args.push("--force".to_string());
        }
        args.push(remote.to_string());
        args.extend(refspecs.iter().map(|r| r.to_string()));
        self.run(args).await?;
        Ok(())
    }

    /// Clone a remote database into a new directory (explicit, or inferred
    /// from the last segment of the remote URL).
    pub async fn clone(
        remote_url: &str,
        new_dir: Option<&Path>,
        remote: Option<&str>,
        branch: Option<&str>,
    ) -> Result<Dolt> {
        Self::clone_with(
            remote_url,
            new_dir,
            remote,
            branch,
            Arc::new(BinaryExecutor::new()),
        )
        .await
    }

    pub async fn clone_with(
        remote_url: &str,
        new_dir: Option<&Path>,
        remote: Option<&str>,
        branch: Option<&str>,
        executor: Arc<dyn Executor>,
    ) -> Result<Dolt> {
        validate_remote_url("remote_url", remote_url)?;

        let mut args = vec!["clone".to_string(), remote_url.to_string()];
        if let Some(remote) = remote {
            args.push("--remote".to_string());
            args.push(remote.to_string());
        }
        if let Some(branch) = branch {
            args.push("--branch".to_string());
            args.push(branch.to_string());
        }

        let infer_from = if new_dir.is_some() {
            None
        } else {
            Some(remote_url)
        };
        let clone_dir = infer_clone_dir(new_dir, infer_from)?;
        args.push(clone_dir.to_string_lossy().to_string());

        executor.execute(ExecSpec::new(args)).await?;
        Dolt::with_executor(clone_dir, executor)
    }

    /// Read the given tables (or all tables) from a remote database into a
    /// new local database at the commit or branch provided.
    pub async fn read_tables(
        remote_url: &str,
        committish: &str,
        tables: &[&str],
        new_dir: Option<&Path>,
    ) -> Result<Dolt> {
        Self::read_tables_with(
            remote_url,
            committish,
            tables,
            new_dir,
            Arc::new(BinaryExecutor::new()),
        )
        .await
    }

    pub async fn read_tables_with(
        remote_url: &str,
        committish: &str,
        tables: &[&str],
        new_dir: Option<&Path>,
        executor: Arc<dyn Executor>,
    ) -> Result<Dolt> {
        validate_remote_url("remote_url", remote_url)?;

        let infer_from = if new_dir.is_some() {
            None
        } else {
            Some(remote_url)
        };
        let clone_dir = infer_clone_dir(new_dir, infer_from)?;

        let mut args = vec![
            "read-tables".to_string(),
            "--dir".to_string(),
            clone_dir.to_string_lossy().to_string(),
            remote_url.to_string(),
            committish.to_string(),
        ];
        args.extend(tables.iter().map(|t| t.to_string()));

        let mut spec = ExecSpec::new(args);
        if let Some(dir) = new_dir {
            spec = spec.cwd(dir);
        }
        executor.execute(spec).await?;
        Dolt::with_executor(clone_dir, executor)
    }
}

/// Pick the directory to clone into: the explicit directory, or the last
/// segment of the remote URL under the current (or explicit) directory.
pub(crate) fn infer_clone_dir(
    new_dir: Option<&Path>,
    remote_url: Option<&str>,
) -> Result<PathBuf> {
    match (new_dir, remote_url) {
        (None, None) => Err(DoltError::args("provide either new_dir or remote_url")),
        (new_dir, Some(remote_url)) => {
            let segment = remote_url.rsplit('/').next().unwrap_or(remote_url);
            let base = match new_dir {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()?,
            };
            let inferred = base.join(segment);
            if inferred.exists() {
                return Err(DoltError::DirectoryExists { path: inferred });
            }
            Ok(inferred)
        }
        (Some(new_dir), None) => Ok(new_dir.to_path_buf()),
    }
}

fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes = Vec::new();
    for line in output.lines() {
        if line.is_empty() {
            break;
        }
        let mut parts = line.split_whitespace();
        if let (Some(name), Some(url)) = (parts.next(), parts.next()) {
            remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }
    remotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_clone_dir_new_dir_only() {
        let dir = infer_clone_dir(Some(Path::new("new_dir")), None).unwrap();
        assert_eq!(dir, PathBuf::from("new_dir"));
    }

    #[test]
    fn test_infer_clone_dir_remote_only() {
        let dir = infer_clone_dir(None, Some("some/remote")).unwrap();
        assert_eq!(dir, std::env::current_dir().unwrap().join("remote"));
    }

    #[test]
    fn test_infer_clone_dir_new_dir_and_remote() {
        let dir = infer_clone_dir(Some(Path::new("foo/bar")), Some("some/remote")).unwrap();
        assert_eq!(dir, PathBuf::from("foo/bar").join("remote"));
    }

    #[test]
    fn test_infer_clone_dir_requires_input() {
        assert!(infer_clone_dir(None, None).is_err());
    }

    #[test]
    fn test_infer_clone_dir_refuses_existing() {
        let tmp = tempfile::tempdir().unwrap();
        let existing = tmp.path().join("db");
        std::fs::create_dir_all(&existing).unwrap();
        let err = infer_clone_dir(Some(tmp.path()), Some("org/db")).unwrap_err();
        assert!(matches!(err, DoltError::DirectoryExists { .. }));
    }

    #[test]
    fn test_parse_remotes() {
        let output = "origin https://doltremoteapi.dolthub.com/org/db\nbackup file:///var/backup\n\nignored after blank\n";
        let remotes = parse_remotes(output);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "https://doltremoteapi.dolthub.com/org/db");
        assert_eq!(remotes[1].name, "backup");
    }
}
