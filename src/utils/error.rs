use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoltError {
    #[error("`dolt {args}` exited with code {exit_code}: {stderr}")]
    Command {
        args: String,
        stdout: String,
        stderr: String,
        exit_code: i32,
    },

    #[error("`dolt {args}` timed out after {limit:?}")]
    Timeout { args: String, limit: Duration },

    #[error("{} is not a valid Dolt repository", path.display())]
    InvalidRepo { path: PathBuf },

    #[error("directory already exists: {}", path.display())]
    DirectoryExists { path: PathBuf },

    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("could not parse {context} output: {message}")]
    Parse { context: String, message: String },

    #[error("credential operation failed: {message}")]
    Creds { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DoltError {
    pub fn args(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoltError>;
