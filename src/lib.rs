//! A MAP/REDUCE query engine over newline-delimited JSON event logs.
//!
//! ```
//! let lines = [
//!     r#"{"user_id": "a", "amount": 5}"#,
//!     r#"{"user_id": "b", "amount": -1}"#,
//!     r#"{"user_id": "a", "amount": 7}"#,
//! ];
//! let result = evq::run_query(
//!     "MAP user_id, amount WHERE amount > 0 REDUCE SUM(amount) ON user_id",
//!     lines,
//! )
//! .unwrap();
//! assert_eq!(result.to_json(), serde_json::json!({"a": {"amount": 12}}));
//! ```
pub mod ast;
pub mod cli;
pub mod compare;
pub mod evaluator;
pub mod executor;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod store;
pub mod value;

use thiserror::Error;

pub use ast::{Condition, Field, Query, Token, TokenKind};
pub use evaluator::EvalError;
pub use executor::{Executor, Group, QueryResult, Row};
pub use lexer::Lexer;
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use store::{HourlyStore, StoreError, TimeWindow};
pub use value::{Record, Value};

/// Errors from parsing or running a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Parses query text.
pub fn parse_query(text: &str) -> Result<Query, ParseError> {
    Parser::new(Lexer::new(text)).parse()
}

/// Parses `query` and runs it over `records`, one JSON document per item.
pub fn run_query<I>(query: &str, records: I) -> Result<QueryResult, QueryError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let query = parse_query(query)?;
    tracing::debug!(query = %query, "parsed query");
    Ok(Executor::new(&query).run(records)?)
}
