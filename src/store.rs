//! Hour-bucketed, append-only event files.
//!
//! Each event is one line of compact JSON in a file named after the UTC hour of
//! its `_ts` field (unix seconds), e.g. `2024-03-07T14`. Because the names are
//! zero-padded and most-significant first, a time window maps to a plain
//! lexicographic range of file names.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Lines, Write},
    path::PathBuf,
    sync::LazyLock,
};

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

static HOUR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}$").expect("valid hour pattern"));

/// Errors from reading or writing the event store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Event must be a JSON object")]
    NotAnObject,

    #[error("Event has no integer '_ts' timestamp")]
    MissingTimestamp,

    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// The file name for the hour containing `t`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use evq::store::hour_file_name;
///
/// let t = Utc.with_ymd_and_hms(2024, 3, 7, 14, 59, 1).unwrap();
/// assert_eq!(hour_file_name(t), "2024-03-07T14");
/// ```
pub fn hour_file_name(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H").to_string()
}

pub fn is_hour_file_name(name: &str) -> bool {
    HOUR_NAME.is_match(name)
}

/// The UTC time of `secs` unix seconds.
///
/// Only years 0 through 9999 are accepted, since other years have no
/// four-digit hour file name.
pub fn timestamp_from_unix(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .filter(|t| (0..=9999).contains(&t.year()))
        .ok_or(StoreError::InvalidTimestamp(secs))
}

/// The hour file an event belongs in, from its `_ts` field.
fn event_hour(event: &serde_json::Value) -> Result<String, StoreError> {
    let ts = event
        .as_object()
        .ok_or(StoreError::NotAnObject)?
        .get("_ts")
        .and_then(serde_json::Value::as_i64)
        .ok_or(StoreError::MissingTimestamp)?;
    Ok(hour_file_name(timestamp_from_unix(ts)?))
}

/// An inclusive range of hours. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Every hour.
    pub fn all() -> Self {
        Self::default()
    }

    /// Window from optional unix-second bounds.
    pub fn from_unix(start: Option<i64>, end: Option<i64>) -> Result<Self, StoreError> {
        Ok(TimeWindow {
            start: start.map(timestamp_from_unix).transpose()?,
            end: end.map(timestamp_from_unix).transpose()?,
        })
    }

    /// Whether the hour file `name` falls inside the window.
    pub fn contains(&self, name: &str) -> bool {
        let after_start = self
            .start
            .is_none_or(|start| name >= hour_file_name(start).as_str());
        let before_end = self.end.is_none_or(|end| name <= hour_file_name(end).as_str());
        after_start && before_end
    }
}

/// A directory of hour files.
#[derive(Debug, Clone)]
pub struct HourlyStore {
    dir: PathBuf,
}

impl HourlyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        HourlyStore { dir: dir.into() }
    }

    /// Appends one event to the file for the hour of its `_ts`.
    ///
    /// Returns the path written to.
    pub fn append(&self, event: &serde_json::Value) -> Result<PathBuf, StoreError> {
        let hour = event_hour(event)?;

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(hour);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        writeln!(file, "{}", event).map_err(io_err)?;

        debug!(path = %path.display(), "appended event");
        Ok(path)
    }

    /// Ingests a payload holding one event object or an array of them.
    ///
    /// Every event is validated before any is written.
    pub fn ingest(&self, payload: &str) -> Result<Vec<PathBuf>, StoreError> {
        let events = match serde_json::from_str::<serde_json::Value>(payload)? {
            serde_json::Value::Array(events) => events,
            event => vec![event],
        };

        for event in &events {
            event_hour(event)?;
        }

        let paths = events
            .iter()
            .map(|event| self.append(event))
            .collect::<Result<Vec<_>, _>>()?;
        info!(events = paths.len(), dir = %self.dir.display(), "ingested events");
        Ok(paths)
    }

    /// Hour files inside `window`, in chronological order.
    ///
    /// A missing directory holds no files.
    pub fn files(&self, window: &TimeWindow) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "store directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str()
                && is_hour_file_name(name)
                && window.contains(name)
            {
                names.push(name.to_string());
            }
        }
        names.sort();

        info!(files = names.len(), dir = %self.dir.display(), "selected hour files");
        Ok(names.into_iter().map(|name| self.dir.join(name)).collect())
    }

    /// Lines of every hour file inside `window`, file by file.
    pub fn records(&self, window: &TimeWindow) -> Result<RecordLines, StoreError> {
        Ok(RecordLines {
            files: self.files(window)?.into_iter(),
            current: None,
        })
    }
}

/// Lazily reads the lines of a sequence of files, opening one file at a time.
///
/// Lines that are not valid UTF-8 are skipped.
pub struct RecordLines {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, Lines<BufReader<File>>)>,
}

impl Iterator for RecordLines {
    type Item = Result<String, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, lines)) = self.current.as_mut() {
                match lines.next() {
                    Some(Ok(line)) => return Some(Ok(line)),
                    Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                        debug!(path = %path.display(), "skipping line that is not UTF-8");
                        continue;
                    }
                    Some(Err(source)) => {
                        return Some(Err(StoreError::Io {
                            path: path.clone(),
                            source,
                        }));
                    }
                    None => {}
                }
            }

            let path = self.files.next()?;
            match File::open(&path) {
                Ok(file) => self.current = Some((path, BufReader::new(file).lines())),
                Err(source) => return Some(Err(StoreError::Io { path, source })),
            }
        }
    }
}
