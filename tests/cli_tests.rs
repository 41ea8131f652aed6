// tests/cli_tests.rs

use evq::cli::{
    CliError, DocCategory, QueryOptions, QueryOutcome, WriteOptions, execute_query, execute_write,
    get_doc_category, get_docs_overview,
};
use serde_json::json;
use tempfile::TempDir;

fn query_input(query: &str, input: &str) -> Result<QueryOutcome, CliError> {
    execute_query(&QueryOptions {
        query: query.to_string(),
        input: Some(input.to_string()),
        ..Default::default()
    })
}

#[test]
fn test_query_piped_input() {
    let input = "{\"user_id\": \"a\", \"amount\": 5}\n{\"user_id\": \"a\", \"amount\": 7}\n";
    match query_input("MAP user_id, amount REDUCE SUM(amount) ON user_id", input).unwrap() {
        QueryOutcome::Success(result) => assert_eq!(result.to_json(), json!({"a": {"amount": 12}})),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_syntax_only() {
    let options = QueryOptions {
        query: "MAP a WHERE a > 1".to_string(),
        syntax_only: true,
        ..Default::default()
    };
    assert!(matches!(
        execute_query(&options).unwrap(),
        QueryOutcome::SyntaxValid
    ));
}

#[test]
fn test_syntax_error() {
    let err = query_input("MAP a WHERE", "").unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert_eq!(
        err.to_string(),
        "Parse error: found end of query, expected NUMBER, STRING or IDENT"
    );
}

#[test]
fn test_evaluation_error() {
    let err = query_input("MAP sku IN items", "{\"items\": 1}").unwrap_err();
    assert!(matches!(err, CliError::Eval(_)));
}

#[test]
fn test_write_then_query_store() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_path_buf();

    let written = execute_write(&WriteOptions {
        data: json!([
            {"_ts": 1_709_820_000, "user_id": "a", "amount": 5},
            {"_ts": 1_709_823_600, "user_id": "b", "amount": 3},
        ])
        .to_string(),
        data_dir: data_dir.clone(),
    })
    .unwrap();
    assert_eq!(written, 2);

    let written = execute_write(&WriteOptions {
        data: json!({"_ts": 1_709_823_700, "user_id": "a", "amount": 7}).to_string(),
        data_dir: data_dir.clone(),
    })
    .unwrap();
    assert_eq!(written, 1);

    let outcome = execute_query(&QueryOptions {
        query: "MAP user_id, amount REDUCE SUM amount ON user_id".to_string(),
        data_dir: data_dir.clone(),
        ..Default::default()
    })
    .unwrap();
    let QueryOutcome::Success(all) = outcome else {
        panic!("expected output");
    };
    assert_eq!(all.to_json(), json!({"a": {"amount": 12}, "b": {"amount": 3}}));

    let outcome = execute_query(&QueryOptions {
        query: "MAP user_id, amount".to_string(),
        data_dir,
        start: Some(1_709_823_600),
        end: Some(1_709_823_600),
        ..Default::default()
    })
    .unwrap();
    let QueryOutcome::Success(second_hour) = outcome else {
        panic!("expected output");
    };
    assert_eq!(
        second_hour.to_json(),
        json!([{"user_id": "b", "amount": 3}, {"user_id": "a", "amount": 7}])
    );
}

#[test]
fn test_write_without_timestamp_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = execute_write(&WriteOptions {
        data: "{\"user_id\": \"a\"}".to_string(),
        data_dir: temp_dir.path().to_path_buf(),
    })
    .unwrap_err();
    assert!(matches!(err, CliError::Store(_)));
}

#[test]
fn test_docs() {
    assert!(get_docs_overview().contains("DOCUMENTATION CATEGORIES"));
    for name in ["syntax", "fields", "conditions", "reduce", "store"] {
        assert!(DocCategory::from_name(name).is_some(), "{}", name);
        assert!(get_doc_category(name).is_ok(), "{}", name);
    }
    assert_eq!(DocCategory::from_name("WHERE"), Some(DocCategory::Conditions));
    assert!(matches!(
        get_doc_category("nope"),
        Err(CliError::UnknownCategory(name)) if name == "nope"
    ));
}

#[test]
fn test_query_output_text() {
    let input = "{\"user_id\": \"a\", \"amount\": 5}\n";
    let QueryOutcome::Success(result) = query_input("MAP user_id, amount", input).unwrap() else {
        panic!("expected output");
    };
    assert_eq!(evq::output::to_json(&result), r#"[{"amount":5,"user_id":"a"}]"#);
    assert_eq!(
        evq::output::to_json_pretty(&result),
        "[\n  {\n    \"amount\": 5,\n    \"user_id\": \"a\"\n  }\n]"
    );
}
