use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::error::{DoltError, Result};

/// One result row: column name to value. CSV-sourced rows hold string
/// values, JSON-sourced rows hold whatever the server typed them as.
pub type Row = HashMap<String, Value>;

/// String rendering of a row cell. Empty strings and nulls are absent.
pub fn row_str(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Working-set status. The maps go from table name to a flag indicating
/// whether the change is staged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub is_clean: bool,
    pub modified_tables: HashMap<String, bool>,
    pub added_tables: HashMap<String, bool>,
}

/// A branch, along with the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub hash: String,
    pub latest_committer: Option<String>,
    pub latest_committer_email: Option<String>,
    pub latest_commit_date: Option<String>,
    pub latest_commit_message: Option<String>,
}

impl Branch {
    /// Build a branch from a `dolt_branches` row.
    pub fn from_row(row: &Row) -> Result<Self> {
        let name = row_str(row, "name")
            .ok_or_else(|| DoltError::parse("dolt_branches", "row is missing a branch name"))?;
        let hash = row_str(row, "hash")
            .ok_or_else(|| DoltError::parse("dolt_branches", "row is missing a branch hash"))?;
        Ok(Self {
            name,
            hash,
            latest_committer: row_str(row, "latest_committer"),
            latest_committer_email: row_str(row, "latest_committer_email"),
            latest_commit_date: row_str(row, "latest_commit_date"),
            latest_commit_message: row_str(row, "latest_commit_message"),
        })
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "branch name: {}, hash: {}", self.name, self.hash)
    }
}

/// Commit metadata, including ref, timestamp, and author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(rename = "ref")]
    pub ref_: String,
    pub timestamp: Option<String>,
    pub author: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub parents: Vec<String>,
    pub merge: bool,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn append_parent(&mut self, parent: impl Into<String>) {
        let parent = parent.into();
        if parent.is_empty() {
            return;
        }
        self.parents.push(parent);
        self.merge = self.parents.len() > 1;
    }

    /// The commit timestamp parsed with chrono, when it matches one of the
    /// formats the dolt CLI emits. Naive timestamps are taken as UTC.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %z") {
            return Some(dt);
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc().fixed_offset());
            }
        }
        None
    }

    /// Query over `dolt_log` joined to `dolt_commit_ancestors`, most recent
    /// first, optionally scoped to one commit and/or limited.
    pub fn log_table_query(number: Option<usize>, commit: Option<&str>) -> String {
        let mut query = String::from(
            "select \
             dc.`commit_hash` as commit_hash, \
             dca.`parent_hash` as parent_hash, \
             `committer` as committer, \
             `email` as email, \
             `date` as date, \
             `message` as message \
             from dolt_log as dc \
             left outer join dolt_commit_ancestors as dca \
             on dc.commit_hash = dca.commit_hash",
        );

        if let Some(commit) = commit {
            query.push_str(&format!(" where dc.`commit_hash` = '{}'", commit));
        }

        query.push_str(" order by `date` desc");

        if let Some(number) = number {
            query.push_str(&format!(" limit {}", number));
        }

        query
    }

    /// Fold log-table rows into commits, preserving order of first
    /// appearance. A hash occurring on several rows has one ancestor per
    /// row; the extras become merge parents.
    pub fn parse_log_rows(rows: &[Row]) -> Result<Vec<Commit>> {
        let mut commits: Vec<Commit> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in rows {
            let ref_ = row_str(row, "commit_hash")
                .ok_or_else(|| DoltError::parse("dolt_log", "row is missing commit_hash"))?;
            let parent = row_str(row, "parent_hash");

            if let Some(&at) = index.get(&ref_) {
                if let Some(parent) = parent {
                    commits[at].append_parent(parent);
                }
            } else {
                let mut commit = Commit {
                    ref_: ref_.clone(),
                    timestamp: row_str(row, "date"),
                    author: row_str(row, "committer"),
                    email: row_str(row, "email"),
                    message: row_str(row, "message"),
                    parents: Vec::new(),
                    merge: false,
                };
                if let Some(parent) = parent {
                    commit.append_parent(parent);
                }
                index.insert(ref_, commits.len());
                commits.push(commit);
            }
        }

        Ok(commits)
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} @ {}, {}",
            self.ref_,
            self.author.as_deref().unwrap_or(""),
            self.timestamp.as_deref().unwrap_or(""),
            self.message.as_deref().unwrap_or("")
        )
    }
}

/// A table in the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub root: Option<String>,
    pub row_cnt: Option<u64>,
    pub system: bool,
}

/// A remote: a name and URL pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// A key pair generated by dolt for authentication with remotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: String,
    pub key_id: String,
    pub active: bool,
}
