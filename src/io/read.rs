use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::core::repo::Dolt;
use crate::domain::model::Row;
use crate::utils::error::Result;

/// Read a whole table, optionally as of a commit or branch.
pub async fn read_rows(dolt: &Dolt, table: &str, as_of: Option<&str>) -> Result<Vec<Row>> {
    read_rows_sql(dolt, &read_table_asof_query(table, as_of)).await
}

/// Read a whole table column-oriented, optionally as of a commit or branch.
pub async fn read_columns(
    dolt: &Dolt,
    table: &str,
    as_of: Option<&str>,
) -> Result<HashMap<String, Vec<Value>>> {
    read_columns_sql(dolt, &read_table_asof_query(table, as_of)).await
}

pub fn read_table_asof_query(table: &str, as_of: Option<&str>) -> String {
    match as_of {
        Some(as_of) => format!("SELECT * FROM `{}` AS OF \"{}\"", table, as_of),
        None => format!("SELECT * FROM `{}`", table),
    }
}

/// Run an arbitrary query through the CSV result path.
pub async fn read_rows_sql(dolt: &Dolt, sql: &str) -> Result<Vec<Row>> {
    dolt.sql_rows(sql).await
}

pub async fn read_columns_sql(dolt: &Dolt, sql: &str) -> Result<HashMap<String, Vec<Value>>> {
    let rows = read_rows_sql(dolt, sql).await?;
    Ok(crate::io::rows_to_columns(&rows))
}

/// Parse a CSV result file into rows of string values.
pub fn read_csv_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(value.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_read_table_asof_query() {
        assert_eq!(
            read_table_asof_query("characters", None),
            "SELECT * FROM `characters`"
        );
        assert_eq!(
            read_table_asof_query("characters", Some("abc123")),
            "SELECT * FROM `characters` AS OF \"abc123\""
        );
    }

    #[test]
    fn test_read_csv_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,id").unwrap();
        writeln!(file, "Rafael,1").unwrap();
        writeln!(file, "Novak,2").unwrap();
        file.flush().unwrap();

        let rows = read_csv_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::String("Rafael".to_string()));
        assert_eq!(rows[1]["id"], Value::String("2".to_string()));
    }

    #[test]
    fn test_read_csv_rows_empty_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,date_of_death").unwrap();
        writeln!(file, "Vronsky,").unwrap();
        file.flush().unwrap();

        let rows = read_csv_rows(file.path()).unwrap();
        assert_eq!(rows[0]["date_of_death"], Value::String(String::new()));
    }
}
