use std::collections::HashMap;

/// A record, row or group: field name to value.
pub type Record = HashMap<String, Value>;

/// A dynamically typed value produced by evaluating a field.
///
/// Unlike JSON, integers and floats are kept apart so comparisons and sums can
/// preserve the source type.
///
/// # Examples
///
/// ```
/// use evq::Value;
///
/// let missing = Value::Absent;
/// let count = Value::Int(3);
/// let amount = Value::Float(12.5);
/// let name = Value::String("alice".to_string());
/// let amounts = Value::List(vec![Value::Int(5), Value::Int(7)]);
/// assert_eq!(amounts.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing key, JSON null, or an unsupported leaf
    Absent,

    /// Integer number
    Int(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Ordered list of values
    List(Vec<Value>),

    /// Nested record; only reachable as a list element, where it can be plucked
    Object(Record),
}

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Absent,
    Int,
    Float,
    String,
    List,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Absent => "absent",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// The zero value of a kind, used when an absent operand takes on the
    /// type of the other side of a comparison.
    pub fn zero_of(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Int => Value::Int(0),
            ValueKind::Float | ValueKind::Absent => Value::Float(0.0),
            ValueKind::String => Value::String(String::new()),
            ValueKind::List => Value::List(Vec::new()),
            ValueKind::Object => Value::Object(Record::new()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a parsed JSON value.
    ///
    /// Numbers that fit an `i64` become [`Value::Int`], everything else numeric
    /// becomes [`Value::Float`]. Booleans and nulls have no counterpart and
    /// become [`Value::Absent`].
    pub fn from_json(v: serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null | serde_json::Value::Bool(_) => Value::Absent,
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Absent),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::List(arr.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(record_from_json(obj)),
        }
    }

    /// Convert back to JSON. Absent becomes `null`, as do non-finite floats.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(obj) => record_to_json(obj),
        }
    }
}

/// Convert a JSON object into a record.
pub fn record_from_json(obj: serde_json::Map<String, serde_json::Value>) -> Record {
    obj.into_iter()
        .map(|(k, v)| (k, Value::from_json(v)))
        .collect()
}

/// Convert a record into a JSON object.
pub fn record_to_json(record: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        record
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}
