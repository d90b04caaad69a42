use std::path::PathBuf;

use async_trait::async_trait;

use crate::utils::error::Result;

/// One dolt invocation: arguments as they would appear on the command line
/// after the binary name, an optional working directory, and an optional
/// file to redirect stdout into.
#[derive(Debug, Clone, Default)]
pub struct ExecSpec {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub outfile: Option<PathBuf>,
}

impl ExecSpec {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            outfile: None,
        }
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn outfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.outfile = Some(path.into());
        self
    }

    /// The argument list as a whitespace-normalized display string.
    pub fn display_args(&self) -> String {
        self.args
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Captured stdout; empty when stdout was redirected to a file.
    pub stdout: String,
    /// The redirect target, when one was requested.
    pub path: Option<PathBuf>,
}

/// The seam between the repository API and the dolt binary. The production
/// implementation spawns subprocesses; tests script it.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, spec: ExecSpec) -> Result<ExecOutput>;
}
