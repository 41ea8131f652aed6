//! Append events to the hourly store

use std::path::PathBuf;

use super::CliError;
use crate::HourlyStore;

/// Options for the write command
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// A JSON event object, or an array of them
    pub data: String,
    /// Directory of hour files
    pub data_dir: PathBuf,
}

/// Execute a write command, returning the number of events stored
pub fn execute_write(options: &WriteOptions) -> Result<usize, CliError> {
    let paths = HourlyStore::new(&options.data_dir).ingest(&options.data)?;
    Ok(paths.len())
}
