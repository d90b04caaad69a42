use crate::core::repo::Dolt;
use crate::domain::model::Branch;
use crate::io::read::read_rows_sql;
use crate::utils::error::{DoltError, Result};

impl Dolt {
    /// The active branch and all branches, read from `dolt_branches`.
    pub async fn branch_list(&self) -> Result<(Branch, Vec<Branch>)> {
        let rows = read_rows_sql(self, "select * from dolt_branches").await?;
        let branches = rows
            .iter()
            .map(Branch::from_row)
            .collect::<Result<Vec<_>>>()?;

        let active_rows = read_rows_sql(
            self,
            "select * from dolt_branches where name = (select active_branch())",
        )
        .await?;
        if active_rows.len() != 1 {
            return Err(DoltError::parse(
                "dolt_branches",
                format!(
                    "expected exactly one active branch row, found {}",
                    active_rows.len()
                ),
            ));
        }
        let active = Branch::from_row(&active_rows[0])?;

        Ok((active, branches))
    }

    /// Create a branch, optionally at a start point, and return the
    /// refreshed listing.
    pub async fn branch_create(
        &self,
        name: &str,
        start_point: Option<&str>,
        force: bool,
    ) -> Result<(Branch, Vec<Branch>)> {
        let mut args = branch_args(force);
        args.push(name.to_string());
        if let Some(start) = start_point {
            args.push(start.to_string());
        }
        self.run(args).await?;
        self.branch_list().await
    }

    pub async fn branch_delete(&self, name: &str, force: bool) -> Result<(Branch, Vec<Branch>)> {
        let mut args = branch_args(force);
        args.push("--delete".to_string());
        args.push(name.to_string());
        self.run(args).await?;
        self.branch_list().await
    }

    /// Copy a branch; with no source, copies the active branch.
    pub async fn branch_copy(
        &self,
        src: Option<&str>,
        new_branch: &str,
        force: bool,
    ) -> Result<(Branch, Vec<Branch>)> {
        let mut args = branch_args(force);
        args.push("--copy".to_string());
        if let Some(src) = src {
            args.push(src.to_string());
        }
        args.push(new_branch.to_string());
        self.run(args).await?;
        self.branch_list().await
    }

    /// Rename a branch; with no source, renames the active branch.
    pub async fn branch_move(
        &self,
        src: Option<&str>,
        new_branch: &str,
        force: bool,
    ) -> Result<(Branch, Vec<Branch>)> {
        let mut args = branch_args(force);
        args.push("--move".to_string());
        if let Some(src) = src {
            args.push(src.to_string());
        }
        args.push(new_branch.to_string());
        self.run(args).await?;
        self.branch_list().await
    }
}

fn branch_args(force: bool) -> Vec<String> {
    let mut args = vec!["branch".to_string()];
    if force {
        args.push("--force".to_string());
    }
    args
}
