//! JSON output of query results.
//!
//! Map-only queries print an array of rows; map/reduce queries print an object
//! keyed by grouping value. Object keys are sorted.
//!
//! ```
//! use evq::{output::to_json, run_query};
//!
//! let result = run_query("MAP n", [r#"{"n": 1}"#, r#"{"n": 2.5}"#]).unwrap();
//! assert_eq!(to_json(&result), r#"[{"n":1},{"n":2.5}]"#);
//! ```

use crate::executor::QueryResult;

/// Compact JSON with no extra whitespace.
pub fn to_json(result: &QueryResult) -> String {
    result.to_json().to_string()
}

/// JSON with 2-space indentation.
pub fn to_json_pretty(result: &QueryResult) -> String {
    format!("{:#}", result.to_json())
}
