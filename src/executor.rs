//! Map/reduce execution of a parsed [`Query`] over a stream of JSON lines.
//!
//! The map phase turns each record into a row of evaluated fields and keeps it
//! when every map condition holds. When the query has a reduce key, kept rows
//! are folded into groups by the string value of that key, each non-key field
//! accumulating a list of values. The reduce fields (typically aggregations) are
//! then evaluated per group, and groups failing a reduce condition are dropped.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    ast::{Query, ReduceStatement},
    evaluator::{EvalError, eval_conditions, evaluate},
    value::{Record, Value, ValueKind, record_from_json, record_to_json},
};

/// One map-phase output record: field name to value.
pub type Row = Record;

/// One reduce-phase bucket: field name to accumulated list, or to its
/// aggregated value once reduce fields have been evaluated.
pub type Group = Record;

/// Result of a query run.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Map-only query: kept rows in input order
    Rows(Vec<Row>),

    /// Map/reduce query: surviving groups keyed by grouping value
    Groups(BTreeMap<String, Group>),
}

impl QueryResult {
    /// JSON form: an array of rows, or an object of groups.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            QueryResult::Rows(rows) => serde_json::Value::Array(rows.iter().map(record_to_json).collect()),
            QueryResult::Groups(groups) => serde_json::Value::Object(
                groups
                    .iter()
                    .map(|(key, group)| (key.clone(), record_to_json(group)))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            QueryResult::Rows(rows) => rows.len(),
            QueryResult::Groups(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses one input line into a record. Blank lines, invalid JSON and JSON
/// that is not an object yield `None`.
pub fn parse_record(line: &str) -> Option<Record> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(serde_json::Value::Object(obj)) => Some(record_from_json(obj)),
        Ok(other) => {
            debug!(line, kind = json_kind(&other), "skipping non-object record");
            None
        }
        Err(e) => {
            debug!(line, error = %e, "skipping malformed record");
            None
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Runs one query. Holds the rows and groups of that run only.
pub struct Executor<'q> {
    query: &'q Query,
    rows: Vec<Row>,
    groups: BTreeMap<String, Group>,
}

impl<'q> Executor<'q> {
    pub fn new(query: &'q Query) -> Self {
        Executor {
            query,
            rows: Vec::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Consumes the record stream and produces the final result.
    ///
    /// # Examples
    ///
    /// ```
    /// use evq::{executor::{Executor, QueryResult}, parse_query};
    ///
    /// let query = parse_query("MAP user_id, amount REDUCE SUM amount ON user_id").unwrap();
    /// let lines = [
    ///     r#"{"user_id": "a", "amount": 5}"#,
    ///     r#"{"user_id": "a", "amount": 7}"#,
    /// ];
    ///
    /// let result = Executor::new(&query).run(lines).unwrap();
    /// assert_eq!(result.to_json()["a"]["amount"], 12);
    /// ```
    pub fn run<I>(mut self, records: I) -> Result<QueryResult, EvalError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = 0usize;
        for line in records {
            if let Some(record) = parse_record(line.as_ref()) {
                seen += 1;
                self.map_record(&record)?;
            }
        }
        debug!(records = seen, kept = self.rows.len(), "map phase complete");

        let query = self.query;
        let Some(reduce) = query.reduce_phase() else {
            return Ok(QueryResult::Rows(self.rows));
        };

        self.fold(&reduce.key)?;
        self.reduce(reduce)?;
        Ok(QueryResult::Groups(self.groups))
    }

    fn map_record(&mut self, record: &Record) -> Result<(), EvalError> {
        let map = &self.query.map;

        let mut row = Row::with_capacity(map.fields.len());
        for field in &map.fields {
            row.insert(field.name(), evaluate(record, field)?);
        }

        if eval_conditions(record, &map.conditions)? {
            self.rows.push(row);
        }
        Ok(())
    }

    /// Appends every kept row to the group named by its `key` value.
    fn fold(&mut self, key: &str) -> Result<(), EvalError> {
        for row in std::mem::take(&mut self.rows) {
            let group_key = match row.get(key) {
                Some(Value::String(s)) => s.clone(),
                other => {
                    let kind = other.map_or(ValueKind::Absent, |v| v.kind());
                    debug!(key, %kind, "dropping row without a string grouping value");
                    continue;
                }
            };

            let group = self.groups.entry(group_key).or_default();
            for (name, value) in row {
                if name == key {
                    continue;
                }
                match group.entry(name.clone()).or_insert_with(|| Value::List(Vec::new())) {
                    Value::List(values) => values.push(value),
                    other => {
                        return Err(EvalError::AccumulatorNotList {
                            field: name,
                            found: other.kind(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates reduce fields per group and drops groups failing a condition.
    ///
    /// Conditions see the accumulated lists, not the aggregated values.
    fn reduce(&mut self, reduce: &ReduceStatement) -> Result<(), EvalError> {
        for (group_key, mut group) in std::mem::take(&mut self.groups) {
            let mut aggregated = Vec::with_capacity(reduce.fields.len());
            for field in &reduce.fields {
                let name = field.name();
                if name == reduce.key {
                    continue;
                }
                aggregated.push((name, evaluate(&group, field)?));
            }

            if !eval_conditions(&group, &reduce.conditions)? {
                debug!(group = %group_key, "group filtered out");
                continue;
            }

            group.extend(aggregated);
            self.groups.insert(group_key, group);
        }
        Ok(())
    }
}
