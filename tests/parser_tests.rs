// tests/parser_tests.rs

use evq::ast::{AggregateMethod, ArithOp, CompareOp, Condition, Field, IterOperator, Query};
use evq::lexer::Lexer;
use evq::parser::{ParseError, Parser};
use evq::value::{Value, ValueKind};

fn parse(input: &str) -> Result<Query, ParseError> {
    Parser::new(Lexer::new(input)).parse()
}

fn error_message(input: &str) -> String {
    match parse(input) {
        Ok(query) => panic!("expected a parse error, got {:?}", query),
        Err(e) => e.to_string(),
    }
}

fn float(text: &str) -> Field {
    Field::Literal {
        text: text.to_string(),
        value: Value::Float(text.parse().unwrap()),
    }
}

// ============================================================================
// Map statements
// ============================================================================

#[test]
fn test_map_fields() {
    let query = parse("MAP user_id, amount").unwrap();
    assert_eq!(
        query.map.fields,
        vec![Field::property("user_id"), Field::property("amount")]
    );
    assert!(query.map.conditions.is_empty());
    assert!(query.reduce.is_none());
}

#[test]
fn test_map_conditions() {
    let query = parse("MAP a WHERE amount > 0 AND kind = \"purchase\" AND b <= c").unwrap();
    assert_eq!(
        query.map.conditions,
        vec![
            Condition::new(Field::property("amount"), CompareOp::GreaterThan, float("0")),
            Condition::new(
                Field::property("kind"),
                CompareOp::Equal,
                Field::literal(ValueKind::String, "purchase").unwrap()
            ),
            Condition::new(Field::property("b"), CompareOp::LessEqual, Field::property("c")),
        ]
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let upper = parse("MAP a WHERE a != 1 REDUCE SUM a ON k").unwrap();
    let lower = parse("map a where a != 1 reduce sum a on k").unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn test_number_field() {
    let query = parse("MAP 3.5").unwrap();
    assert_eq!(query.map.fields, vec![float("3.5")]);
    assert_eq!(query.map.fields[0].name(), "3.5");
}

// ============================================================================
// Field forms
// ============================================================================

#[test]
fn test_iter_field() {
    let query = parse("MAP sku IN items").unwrap();
    assert_eq!(
        query.map.fields,
        vec![Field::Iter {
            name: "sku".to_string(),
            operator: IterOperator::In,
            collection: Box::new(Field::property("items")),
        }]
    );
    assert_eq!(query.map.fields[0].name(), "sku");
}

#[test]
fn test_multiply_field() {
    let query = parse("MAP price * quantity").unwrap();
    let field = &query.map.fields[0];
    assert_eq!(
        *field,
        Field::BinaryExpr {
            op: ArithOp::Multiply,
            left: Box::new(Field::property("price")),
            right: Box::new(Field::property("quantity")),
        }
    );
    assert_eq!(field.name(), "price*quantity");
}

#[test]
fn test_aggregate_with_and_without_parens() {
    let bare = parse("MAP SUM amount").unwrap();
    let parens = parse("MAP SUM(amount)").unwrap();
    assert_eq!(bare, parens);
    assert_eq!(
        bare.map.fields,
        vec![Field::Aggregate {
            method: AggregateMethod::Sum,
            target: Box::new(Field::property("amount")),
        }]
    );
    assert_eq!(bare.map.fields[0].name(), "amount");
}

#[test]
fn test_count_of_plucked_values() {
    let query = parse("MAP count(sku IN items)").unwrap();
    match &query.map.fields[0] {
        Field::Aggregate {
            method: AggregateMethod::Count,
            target,
        } => assert!(matches!(**target, Field::Iter { .. })),
        other => panic!("expected COUNT aggregate, got {:?}", other),
    }
}

// ============================================================================
// Reduce statements
// ============================================================================

#[test]
fn test_reduce_statement() {
    let query =
        parse("MAP user_id, amount WHERE amount > 0 REDUCE SUM(amount) WHERE amount > 10 ON user_id")
            .unwrap();
    let reduce = query.reduce_phase().unwrap();
    assert_eq!(reduce.key, "user_id");
    assert_eq!(reduce.fields.len(), 1);
    assert_eq!(
        reduce.conditions,
        vec![Condition::new(
            Field::property("amount"),
            CompareOp::GreaterThan,
            float("10")
        )]
    );
}

#[test]
fn test_reduce_requires_on() {
    assert_eq!(
        error_message("MAP a REDUCE SUM a"),
        "found end of query, expected ON"
    );
}

#[test]
fn test_reduce_key_must_be_identifier() {
    assert_eq!(
        error_message("MAP a REDUCE SUM a ON 5"),
        "found 5, expected reduce key"
    );
}

#[test]
fn test_trailing_tokens_after_key() {
    assert_eq!(
        error_message("MAP a REDUCE SUM a ON k extra"),
        "found extra, expected end of query"
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_must_start_with_map() {
    assert_eq!(error_message("REDUCE a ON b"), "found REDUCE, expected MAP");
    assert_eq!(error_message(""), "found end of query, expected MAP");
}

#[test]
fn test_empty_field_list() {
    assert_eq!(
        error_message("MAP"),
        "found end of query, expected IDENT, NUMBER or SUM"
    );
}

#[test]
fn test_missing_comma() {
    assert_eq!(
        error_message("MAP a b"),
        "found b, expected ',' or end of field list"
    );
}

#[test]
fn test_missing_operator() {
    assert_eq!(
        error_message("MAP a WHERE a 5"),
        "found 5, expected operator"
    );
}

#[test]
fn test_unspaced_condition() {
    assert_eq!(
        error_message("MAP a WHERE a>0"),
        "found a>0, expected NUMBER, STRING or IDENT"
    );
}

#[test]
fn test_unclosed_aggregate() {
    assert_eq!(error_message("MAP SUM(a"), "found end of query, expected ')'");
}

#[test]
fn test_invalid_literal() {
    let err = Field::literal(ValueKind::Int, "1.5").unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidLiteral {
            text: "1.5".to_string(),
            kind: ValueKind::Int,
        }
    );
    assert_eq!(err.to_string(), "invalid int literal '1.5'");
    assert!(Field::literal(ValueKind::List, "{}").is_err());
    assert!(Field::literal(ValueKind::Absent, "").is_err());
}

#[test]
fn test_list_literal() {
    let field = Field::literal(ValueKind::List, "[1, \"a\"]").unwrap();
    assert_eq!(
        field,
        Field::Literal {
            text: "[1, \"a\"]".to_string(),
            value: Value::List(vec![Value::Int(1), Value::String("a".into())]),
        }
    );
}

// ============================================================================
// Canonical form
// ============================================================================

#[test]
fn test_canonical_form_reparses_to_equal_query() {
    let queries = [
        "MAP user_id, amount WHERE amount > 0 REDUCE SUM(amount) ON user_id",
        "map  a,b   where b >= -1.5 and kind != \"x y\"",
        "MAP sku IN items, price * quantity, COUNT sku IN items",
        "MAP k, v REDUCE sum v, count(v) WHERE v < 100 AND k = \"a\" ON k",
        "MAP 42",
    ];
    for text in queries {
        let query = parse(text).unwrap();
        let canonical = query.to_string();
        assert_eq!(parse(&canonical).unwrap(), query, "{}", canonical);
    }
}

#[test]
fn test_canonical_form() {
    // "a=1" has no spaces and lexes as a single illegal token
    assert_eq!(
        error_message("map a,SUM b where a=1 reduce count a on a"),
        "found a=1, expected NUMBER, STRING or IDENT"
    );

    let query = parse("map a,  SUM b where a = 1 reduce count a on a").unwrap();
    assert_eq!(
        query.to_string(),
        "MAP a, SUM(b) WHERE a = 1 REDUCE COUNT(a) ON a"
    );
}
