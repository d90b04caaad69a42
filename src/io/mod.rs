pub mod read;
pub mod write;

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::model::Row;

pub use read::{
    read_columns, read_columns_sql, read_csv_rows, read_rows, read_rows_sql,
    read_table_asof_query,
};
pub use write::{write_columns, write_file, write_rows, ImportMode, WriteOptions};

/// Pivot rows into columns. Ragged rows contribute only to the columns they
/// actually carry.
pub fn rows_to_columns(rows: &[Row]) -> HashMap<String, Vec<Value>> {
    let mut columns: HashMap<String, Vec<Value>> = HashMap::new();
    for row in rows {
        for (col, val) in row {
            columns.entry(col.clone()).or_default().push(val.clone());
        }
    }
    columns
}

/// Pivot columns into rows; the row count comes from the first column.
pub fn columns_to_rows(columns: &HashMap<String, Vec<Value>>) -> Vec<Row> {
    let row_count = columns.values().next().map(Vec::len).unwrap_or(0);
    let mut rows: Vec<Row> = vec![Row::new(); row_count];
    for (name, values) in columns {
        for (j, value) in values.iter().enumerate().take(row_count) {
            rows[j].insert(name.clone(), value.clone());
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_to_columns_and_back() {
        let rows: Vec<Row> = vec![
            [
                ("name".to_string(), json!("Roger")),
                ("rank".to_string(), json!("1")),
            ]
            .into_iter()
            .collect(),
            [
                ("name".to_string(), json!("Rafael")),
                ("rank".to_string(), json!("2")),
            ]
            .into_iter()
            .collect(),
        ];

        let columns = rows_to_columns(&rows);
        assert_eq!(columns["name"], vec![json!("Roger"), json!("Rafael")]);
        assert_eq!(columns["rank"], vec![json!("1"), json!("2")]);

        let mut round_tripped = columns_to_rows(&columns);
        round_tripped.sort_by_key(|r| r["rank"].as_str().map(str::to_string));
        assert_eq!(round_tripped, rows);
    }

    #[test]
    fn test_columns_to_rows_empty() {
        assert!(columns_to_rows(&HashMap::new()).is_empty());
    }
}
