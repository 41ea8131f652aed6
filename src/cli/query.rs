//! Run evq queries against piped input or the hourly store

use std::path::PathBuf;

use super::CliError;
use crate::{Executor, HourlyStore, QueryResult, StoreError, TimeWindow, parse_query};

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// The query to run
    pub query: String,
    /// Newline-delimited JSON records; when absent the store is scanned
    pub input: Option<String>,
    /// Directory of hour files
    pub data_dir: PathBuf,
    /// First hour to scan, unix seconds
    pub start: Option<i64>,
    /// Last hour to scan, unix seconds
    pub end: Option<i64>,
    /// Only validate syntax, don't execute
    pub syntax_only: bool,
}

/// Result of a query command
#[derive(Debug)]
pub enum QueryOutcome {
    /// Syntax validation passed
    SyntaxValid,
    /// Query executed successfully
    Success(QueryResult),
}

/// Execute a query command
pub fn execute_query(options: &QueryOptions) -> Result<QueryOutcome, CliError> {
    let query = parse_query(&options.query)?;

    if options.syntax_only {
        return Ok(QueryOutcome::SyntaxValid);
    }

    let executor = Executor::new(&query);

    let result = match &options.input {
        Some(input) => executor.run(input.lines())?,
        None => {
            let window = TimeWindow::from_unix(options.start, options.end)?;
            let records = HourlyStore::new(&options.data_dir).records(&window)?;

            // stop at the first read error and report it once the run returns
            let mut read_error: Option<StoreError> = None;
            let lines = records.map_while(|line| match line {
                Ok(line) => Some(line),
                Err(e) => {
                    read_error = Some(e);
                    None
                }
            });
            let result = executor.run(lines)?;
            if let Some(e) = read_error {
                return Err(e.into());
            }
            result
        }
    };

    Ok(QueryOutcome::Success(result))
}
