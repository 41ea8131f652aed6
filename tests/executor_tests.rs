// tests/executor_tests.rs

use evq::executor::{Executor, QueryResult, parse_record};
use evq::{EvalError, QueryError, Value, parse_query, run_query};
use serde_json::json;

const PURCHASES: [&str; 5] = [
    r#"{"user_id": "a", "amount": 5, "kind": "purchase"}"#,
    r#"{"user_id": "b", "amount": 3, "kind": "purchase"}"#,
    r#"{"user_id": "a", "amount": 7, "kind": "purchase"}"#,
    r#"{"user_id": "b", "amount": -2, "kind": "refund"}"#,
    r#"{"user_id": "c", "amount": 1.5, "kind": "purchase"}"#,
];

fn run_json(query: &str, lines: &[&str]) -> serde_json::Value {
    run_query(query, lines.iter().copied()).unwrap().to_json()
}

// ============================================================================
// Map-only queries
// ============================================================================

#[test]
fn test_map_rows_in_input_order() {
    let result = run_json("MAP user_id, amount", &PURCHASES[..3]);
    assert_eq!(
        result,
        json!([
            {"user_id": "a", "amount": 5},
            {"user_id": "b", "amount": 3},
            {"user_id": "a", "amount": 7},
        ])
    );
}

#[test]
fn test_map_filter() {
    let result = run_json(
        "MAP user_id WHERE amount > 0 AND kind = \"purchase\"",
        &PURCHASES,
    );
    assert_eq!(
        result,
        json!([{"user_id": "a"}, {"user_id": "b"}, {"user_id": "a"}, {"user_id": "c"}])
    );
}

#[test]
fn test_map_without_conditions_keeps_every_record() {
    let result = run_query("MAP user_id", PURCHASES).unwrap();
    assert_eq!(result.len(), PURCHASES.len());
}

#[test]
fn test_missing_field_is_null() {
    let result = run_json("MAP user_id, coupon", &PURCHASES[..1]);
    assert_eq!(result, json!([{"user_id": "a", "coupon": null}]));
}

#[test]
fn test_map_computed_fields() {
    let lines = [r#"{"price": 2.5, "quantity": 4, "items": [{"sku": "x"}, {"sku": "y"}]}"#];
    let result = run_json("MAP price * quantity, sku IN items, COUNT(sku IN items)", &lines);
    // the plucked list and its count share the output name "sku"; the count is
    // evaluated last and wins
    assert_eq!(result, json!([{"price*quantity": 10.0, "sku": 2}]));
}

#[test]
fn test_empty_input() {
    let result = run_query("MAP a", Vec::<String>::new()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.to_json(), json!([]));
}

// ============================================================================
// Reduce queries
// ============================================================================

#[test]
fn test_sum_per_user() {
    let result = run_json(
        "MAP user_id, amount WHERE amount > 0 REDUCE SUM(amount) ON user_id",
        &PURCHASES[..3],
    );
    assert_eq!(result, json!({"a": {"amount": 12}, "b": {"amount": 3}}));
}

#[test]
fn test_unaggregated_fields_stay_lists() {
    let result = run_json(
        "MAP user_id, amount, kind REDUCE COUNT(amount) ON user_id",
        &PURCHASES,
    );
    assert_eq!(
        result,
        json!({
            "a": {"amount": 2, "kind": ["purchase", "purchase"]},
            "b": {"amount": 2, "kind": ["purchase", "refund"]},
            "c": {"amount": 1, "kind": ["purchase"]},
        })
    );
}

#[test]
fn test_every_row_lands_in_one_group() {
    let query = "MAP user_id, amount REDUCE COUNT amount ON user_id";
    let result = run_query(query, PURCHASES).unwrap();
    let QueryResult::Groups(groups) = result else {
        panic!("expected groups");
    };
    let total: i64 = groups
        .values()
        .map(|group| match group.get("amount") {
            Some(Value::Int(n)) => *n,
            other => panic!("unexpected count {:?}", other),
        })
        .sum();
    assert_eq!(total, PURCHASES.len() as i64);
}

#[test]
fn test_rows_without_string_key_are_dropped() {
    let lines = [
        r#"{"user_id": "a", "amount": 1}"#,
        r#"{"user_id": 7, "amount": 2}"#,
        r#"{"amount": 3}"#,
        r#"{"user_id": ["a"], "amount": 4}"#,
    ];
    let result = run_json("MAP user_id, amount REDUCE SUM amount ON user_id", &lines);
    assert_eq!(result, json!({"a": {"amount": 1}}));
}

#[test]
fn test_key_must_be_a_map_field() {
    // user_id is filtered on but not projected, so no row has a key
    let result = run_json(
        "MAP amount WHERE user_id = \"a\" REDUCE SUM amount ON user_id",
        &PURCHASES,
    );
    assert_eq!(result, json!({}));
}

#[test]
fn test_reduce_condition_on_accumulated_list_fails() {
    let result = run_query(
        "MAP user_id, amount REDUCE SUM amount WHERE amount > 10 ON user_id",
        PURCHASES,
    );
    assert!(matches!(
        result,
        Err(QueryError::Eval(EvalError::UnsupportedComparison { .. }))
    ));
}

#[test]
fn test_reduce_condition_on_scalar_field() {
    let result = run_json(
        "MAP user_id, amount, kind REDUCE SUM amount WHERE user_id != \"x\" ON user_id",
        &PURCHASES[..1],
    );
    // conditions resolve against the group, which has no user_id entry
    assert_eq!(
        result,
        json!({"a": {"amount": 5, "kind": ["purchase"]}})
    );
}

#[test]
fn test_reduce_float_sum() {
    let result = run_json(
        "MAP user_id, amount REDUCE SUM amount ON user_id",
        &PURCHASES[4..],
    );
    assert_eq!(result, json!({"c": {"amount": 1.5}}));
}

// ============================================================================
// Input handling
// ============================================================================

#[test]
fn test_malformed_lines_are_skipped() {
    let clean = PURCHASES.to_vec();
    let mut noisy = clean.clone();
    noisy.insert(1, "{not json");
    noisy.insert(3, "");
    noisy.insert(4, "[1, 2]");
    noisy.push("\"just a string\"");

    for query in [
        "MAP user_id, amount",
        "MAP user_id, amount REDUCE SUM amount ON user_id",
    ] {
        assert_eq!(run_json(query, &noisy), run_json(query, &clean), "{}", query);
    }
}

#[test]
fn test_parse_record() {
    assert!(parse_record(r#"{"a": 1}"#).is_some());
    assert!(parse_record("   ").is_none());
    assert!(parse_record("{").is_none());
    assert!(parse_record("42").is_none());
}

#[test]
fn test_iter_error_aborts_run() {
    let lines = [r#"{"items": [{"sku": "a"}]}"#, r#"{"items": 5}"#];
    let result = run_query("MAP sku IN items", lines);
    assert!(matches!(
        result,
        Err(QueryError::Eval(EvalError::CollectionNotList { .. }))
    ));
}

#[test]
fn test_executor_reuses_parsed_query() {
    let query = parse_query("MAP user_id WHERE amount > 4").unwrap();
    let first = Executor::new(&query).run(PURCHASES).unwrap();
    let second = Executor::new(&query).run(&PURCHASES[..1]).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
}

#[test]
fn test_parse_error_surfaces() {
    let result = run_query("MAP", PURCHASES);
    assert!(matches!(result, Err(QueryError::Parse(_))));
}
