mod common;

use common::scripted_repo;
use doltcli::{read_csv_rows, DoltError, ResultFormat, SqlOptions, SqlResult};

#[tokio::test]
async fn test_sql_rows_parses_csv() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout("name,id\nRafael,1\nNovak,2\n");

    let rows = dolt
        .sql_rows("SELECT * FROM `test_players`")
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], serde_json::json!("Rafael"));
    assert_eq!(rows[1]["id"], serde_json::json!("2"));

    let call = &executor.calls()[0];
    assert_eq!(call.args[0], "sql");
    assert!(call.args.contains(&"--query".to_string()));
    assert!(call.args.contains(&"--result-format".to_string()));
    assert!(call.args.contains(&"csv".to_string()));
    assert!(call.outfile.is_some());
}

#[tokio::test]
async fn test_sql_json_returns_document() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout(r#"{"rows": [{"name": "Rafael", "id": 1}]}"#);

    let doc = dolt.sql_json("SELECT * FROM `test_players`").await.unwrap();
    assert_eq!(doc["rows"][0]["name"], serde_json::json!("Rafael"));
    assert_eq!(doc["rows"][0]["id"], serde_json::json!(1));

    let call = &executor.calls()[0];
    assert!(call.args.contains(&"json".to_string()));
}

#[tokio::test]
async fn test_sql_to_file_leaves_results_in_place() {
    let (dir, executor, dolt) = scripted_repo();
    executor.push_stdout("name,id\nRoger,3\n");

    let target = dir.path().join("results.csv");
    let path = dolt
        .sql_to_file("SELECT * FROM `test_players`", &target)
        .await
        .unwrap();
    assert_eq!(path, target);

    let rows = read_csv_rows(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], serde_json::json!("Roger"));
}

#[tokio::test]
async fn test_sql_option_validation() {
    let (_dir, executor, dolt) = scripted_repo();

    // a result format requires a query
    let err = dolt
        .sql(SqlOptions::new().format(ResultFormat::Csv))
        .await
        .unwrap_err();
    assert!(matches!(err, DoltError::InvalidArguments { .. }));

    // list_saved excludes everything else
    let err = dolt
        .sql(SqlOptions::new().list_saved().query("select 1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DoltError::InvalidArguments { .. }));

    // execute_saved excludes batch and friends
    let err = dolt
        .sql(SqlOptions::new().execute_saved("daily").batch())
        .await
        .unwrap_err();
    assert!(matches!(err, DoltError::InvalidArguments { .. }));

    // a result file requires a query
    let err = dolt
        .sql(SqlOptions::new().result_file("out.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, DoltError::InvalidArguments { .. }));

    // nothing to do at all
    let err = dolt.sql(SqlOptions::new()).await.unwrap_err();
    assert!(matches!(err, DoltError::InvalidArguments { .. }));

    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_sql_exec_discards_output() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout("");

    dolt.sql_exec("INSERT INTO `test_players` (`name`, `id`) VALUES ('Stan', 4)")
        .await
        .unwrap();

    let call = &executor.calls()[0];
    assert_eq!(call.args[0], "sql");
    assert_eq!(call.args[1], "--query");
    assert!(call.outfile.is_none());
}

#[tokio::test]
async fn test_sql_list_saved() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout("daily: select * from t1\n");

    let result = dolt.sql(SqlOptions::new().list_saved()).await.unwrap();
    assert!(matches!(result, SqlResult::None));
    assert_eq!(executor.calls()[0].args, vec!["sql", "--list-saved"]);
}

#[tokio::test]
async fn test_sql_save_with_message() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout("");

    dolt.sql(
        SqlOptions::new()
            .query("select * from t1")
            .save("daily")
            .message("daily extract"),
    )
    .await
    .unwrap();

    assert_eq!(
        executor.calls()[0].args,
        vec![
            "sql",
            "--save",
            "daily",
            "--message",
            "daily extract",
            "--query",
            "select * from t1"
        ]
    );
}

#[tokio::test]
async fn test_log_parses_commits_and_merge_parents() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout(
        "commit_hash,parent_hash,committer,email,date,message\n\
         mmm,aaa,rafa,rafa@example.com,2021-03-03 10:00:00,merge\n\
         mmm,bbb,rafa,rafa@example.com,2021-03-03 10:00:00,merge\n\
         aaa,base,rafa,rafa@example.com,2021-03-02 10:00:00,first\n",
    );

    let commits = dolt.log(None, None).await.unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].ref_, "mmm");
    assert!(commits[0].is_merge());
    assert_eq!(commits[0].parents, vec!["aaa".to_string(), "bbb".to_string()]);
    assert_eq!(commits[1].message.as_deref(), Some("first"));

    let call = &executor.calls()[0];
    let query = call
        .args
        .iter()
        .find(|a| a.contains("dolt_log"))
        .expect("log query missing");
    assert!(query.contains("dolt_commit_ancestors"));
}

#[tokio::test]
async fn test_log_number_limits_query() {
    let (_dir, executor, dolt) = scripted_repo();
    executor.push_stdout(
        "commit_hash,parent_hash,committer,email,date,message\n\
         aaa,base,rafa,rafa@example.com,2021-03-02 10:00:00,first\n",
    );

    let commits = dolt.log(Some(1), None).await.unwrap();
    assert_eq!(commits.len(), 1);

    let call = &executor.calls()[0];
    let query = call.args.iter().find(|a| a.contains("dolt_log")).unwrap();
    assert!(query.contains("limit 1"));
}
