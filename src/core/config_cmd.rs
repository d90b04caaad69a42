use std::collections::HashMap;
use std::sync::Arc;

use crate::core::exec::BinaryExecutor;
use crate::core::repo::Dolt;
use crate::domain::ports::{ExecSpec, Executor};
use crate::utils::error::Result;

/// One config manipulation. The enum makes "exactly one of add, list, get,
/// unset" structurally impossible to get wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOp {
    Add { name: String, value: String },
    List,
    Get { name: String },
    Unset { name: String },
}

impl ConfigOp {
    pub fn add(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Add {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Self::Get { name: name.into() }
    }

    pub fn unset(name: impl Into<String>) -> Self {
        Self::Unset { name: name.into() }
    }

    fn extend_args(&self, args: &mut Vec<String>) {
        match self {
            Self::Add { name, value } => {
                args.push("--add".to_string());
                args.push(name.clone());
                args.push(value.clone());
            }
            Self::List => args.push("--list".to_string()),
            Self::Get { name } => {
                args.push("--get".to_string());
                args.push(name.clone());
            }
            Self::Unset { name } => {
                args.push("--unset".to_string());
                args.push(name.clone());
            }
        }
    }
}

impl Dolt {
    /// Manipulate the global dolt config.
    pub async fn config_global(op: ConfigOp) -> Result<HashMap<String, String>> {
        Self::config_global_with(Arc::new(BinaryExecutor::new()), op).await
    }

    pub async fn config_global_with(
        executor: Arc<dyn Executor>,
        op: ConfigOp,
    ) -> Result<HashMap<String, String>> {
        let mut args = vec!["config".to_string(), "--global".to_string()];
        op.extend_args(&mut args);
        let out = executor.execute(ExecSpec::new(args)).await?;
        Ok(parse_config(&out.stdout))
    }

    /// Manipulate config local to this repository.
    pub async fn config_local(&self, op: ConfigOp) -> Result<HashMap<String, String>> {
        let mut args = vec!["config".to_string(), "--local".to_string()];
        op.extend_args(&mut args);
        let output = self.run(args).await?;
        Ok(parse_config(&output))
    }
}

fn parse_config(output: &str) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for line in output.lines() {
        if let Some((name, value)) = line.split_once(" = ") {
            result.insert(name.to_string(), value.to_string());
        }
    }
    result
}
