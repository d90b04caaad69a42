use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{ExecOutput, ExecSpec, Executor};
use crate::utils::error::{DoltError, Result};

pub const DEFAULT_DOLT_PATH: &str = "dolt";

/// Overrides the dolt binary location for executors built with `new`.
pub const DOLT_PATH_ENV: &str = "DOLTCLI_PATH";

/// Runs the dolt binary as a subprocess, capturing stdout (or redirecting
/// it to a file) and mapping nonzero exits to `DoltError::Command`.
#[derive(Debug, Clone)]
pub struct BinaryExecutor {
    dolt_path: String,
    timeout: Option<Duration>,
}

impl BinaryExecutor {
    pub fn new() -> Self {
        let dolt_path =
            std::env::var(DOLT_PATH_ENV).unwrap_or_else(|_| DEFAULT_DOLT_PATH.to_string());
        Self {
            dolt_path,
            timeout: None,
        }
    }

    pub fn with_dolt_path(mut self, path: impl Into<String>) -> Self {
        self.dolt_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn dolt_path(&self) -> &str {
        &self.dolt_path
    }
}

impl Default for BinaryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for BinaryExecutor {
    async fn execute(&self, spec: ExecSpec) -> Result<ExecOutput> {
        let display_line = spec.display_args();
        tracing::info!("{} {}", self.dolt_path, display_line);

        let mut cmd = tokio::process::Command::new(&self.dolt_path);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        match &spec.outfile {
            Some(path) => {
                let file = std::fs::File::create(path)?;
                cmd.stdout(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::piped());
            }
        }
        cmd.stderr(Stdio::piped());
        cmd.stdin(Stdio::null());

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| DoltError::Timeout {
                    args: display_line.clone(),
                    limit,
                })??,
            None => cmd.output().await?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::error!("{}", stderr);
            return Err(DoltError::Command {
                args: display_line,
                stdout,
                stderr,
                exit_code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(ExecOutput {
            stdout,
            path: spec.outfile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let exec = BinaryExecutor::new()
            .with_dolt_path("/usr/local/bin/dolt")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(exec.dolt_path(), "/usr/local/bin/dolt");
        assert_eq!(exec.timeout, Some(Duration::from_secs(30)));
    }
}
