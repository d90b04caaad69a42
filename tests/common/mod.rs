use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use doltcli::{Dolt, DoltError, ExecOutput, ExecSpec, Executor, Result};

pub enum Response {
    Stdout(String),
    Fail {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub outfile: Option<PathBuf>,
    /// Contents of a CSV file argument captured at call time; import files
    /// are temp files that vanish right after the call returns.
    pub file_payload: Option<String>,
}

/// Replays canned responses in order and records every call. When a call
/// redirects stdout to a file, the canned stdout is written there, the way
/// the real executor spools SQL results. Exhausted scripts answer with
/// empty stdout.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Response>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stdout(&self, stdout: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Response::Stdout(stdout.into()));
    }

    pub fn push_failure(&self, stderr: impl Into<String>, exit_code: i32) {
        self.responses.lock().unwrap().push_back(Response::Fail {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, spec: ExecSpec) -> Result<ExecOutput> {
        let file_payload = spec.args.last().and_then(|arg| {
            let path = std::path::Path::new(arg);
            if path.extension().is_some_and(|e| e == "csv") && path.exists() {
                std::fs::read_to_string(path).ok()
            } else {
                None
            }
        });
        self.calls.lock().unwrap().push(RecordedCall {
            args: spec.args.clone(),
            cwd: spec.cwd.clone(),
            outfile: spec.outfile.clone(),
            file_payload,
        });

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Response::Stdout(String::new()));

        match response {
            Response::Stdout(stdout) => match &spec.outfile {
                Some(path) => {
                    std::fs::write(path, &stdout)?;
                    Ok(ExecOutput {
                        stdout: String::new(),
                        path: spec.outfile,
                    })
                }
                None => Ok(ExecOutput {
                    stdout,
                    path: None,
                }),
            },
            Response::Fail {
                stdout,
                stderr,
                exit_code,
            } => Err(DoltError::Command {
                args: spec.display_args(),
                stdout,
                stderr,
                exit_code,
            }),
        }
    }
}

/// An initialized-looking repository directory (contains `.dolt`) wired to
/// a scripted executor.
pub fn scripted_repo() -> (tempfile::TempDir, Arc<ScriptedExecutor>, Dolt) {
    let dir = tempfile::tempdir().unwrap();
    let repo_dir = dir.path().join("test-db");
    std::fs::create_dir_all(repo_dir.join(".dolt")).unwrap();

    let executor = Arc::new(ScriptedExecutor::new());
    let dolt = Dolt::with_executor(&repo_dir, executor.clone()).unwrap();
    (dir, executor, dolt)
}

pub const CLEAN_STATUS: &str = "On branch main\nnothing to commit, working tree clean\n";

pub const BRANCH_HEADER: &str =
    "name,hash,latest_committer,latest_committer_email,latest_commit_date,latest_commit_message";

/// CSV for `select * from dolt_branches` with the given (name, hash) rows.
pub fn branches_csv(rows: &[(&str, &str)]) -> String {
    let mut csv = String::from(BRANCH_HEADER);
    for (name, hash) in rows {
        csv.push_str(&format!("\n{},{},,,,", name, hash));
    }
    csv.push('\n');
    csv
}
