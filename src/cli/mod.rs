//! CLI support for evq
//!
//! Provides programmatic access to the evq commands so they can be embedded
//! (for example behind an HTTP endpoint) and tested without spawning a process.

mod docs;
mod query;
mod write;

pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use query::{QueryOptions, QueryOutcome, execute_query};
pub use write::{WriteOptions, execute_write};

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("Store error: {0}")]
    Store(#[from] crate::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown category: '{0}'\nRun 'evq docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::QueryError> for CliError {
    fn from(e: crate::QueryError) -> Self {
        match e {
            crate::QueryError::Parse(e) => CliError::Parse(e),
            crate::QueryError::Eval(e) => CliError::Eval(e),
        }
    }
}
