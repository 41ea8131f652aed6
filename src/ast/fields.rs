use std::fmt;

use crate::{
    ast::{AggregateMethod, ArithOp, IterOperator},
    parser::ParseError,
    value::{Value, ValueKind},
};

/// A parsed output column or condition operand.
///
/// Each variant knows its output name (see [`Field::name`]), which becomes the
/// key of the evaluated value in a row or group.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Property looked up by name in the current record
    ///
    /// # Example
    /// ```text
    /// user_id
    /// ```
    Property(String),

    /// Typed constant taken straight from a literal token
    ///
    /// # Example
    /// ```text
    /// 42
    /// "purchase"
    /// ```
    Literal { text: String, value: Value },

    /// Plucks `name` out of every record in the evaluated collection
    ///
    /// # Example
    /// ```text
    /// sku IN items
    /// ```
    Iter {
        name: String,
        operator: IterOperator,
        collection: Box<Field>,
    },

    /// Arithmetic between two fields
    ///
    /// # Example
    /// ```text
    /// price * quantity
    /// ```
    BinaryExpr {
        op: ArithOp,
        left: Box<Field>,
        right: Box<Field>,
    },

    /// Reduces the evaluated collection of `target` to one scalar
    ///
    /// # Example
    /// ```text
    /// SUM amount
    /// COUNT(amount)
    /// ```
    Aggregate {
        method: AggregateMethod,
        target: Box<Field>,
    },
}

impl Field {
    /// Builds a literal field, parsing `text` as the requested kind.
    ///
    /// List literals are JSON arrays. Text that does not parse as the kind, or
    /// any other kind, is a [`ParseError::InvalidLiteral`].
    pub fn literal(kind: ValueKind, text: &str) -> Result<Field, ParseError> {
        let invalid = || ParseError::InvalidLiteral {
            text: text.to_string(),
            kind,
        };

        let value = match kind {
            ValueKind::Int => Value::Int(text.parse::<i64>().map_err(|_| invalid())?),
            ValueKind::Float => Value::Float(text.parse::<f64>().map_err(|_| invalid())?),
            ValueKind::String => Value::String(text.to_string()),
            ValueKind::List => match serde_json::from_str(text).map_err(|_| invalid())? {
                list @ serde_json::Value::Array(_) => Value::from_json(list),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        };

        Ok(Field::Literal {
            text: text.to_string(),
            value,
        })
    }

    pub fn property(name: impl Into<String>) -> Field {
        Field::Property(name.into())
    }

    /// The output column this field writes to.
    pub fn name(&self) -> String {
        match self {
            Field::Property(name) => name.clone(),
            Field::Literal { text, .. } => text.clone(),
            Field::Iter { name, .. } => name.clone(),
            Field::BinaryExpr { op, left, right } => {
                format!("{}{}{}", left.name(), op, right.name())
            }
            Field::Aggregate { target, .. } => target.name(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Property(name) => f.write_str(name),
            Field::Literal {
                value: Value::String(s),
                ..
            } => write!(f, "\"{}\"", s),
            Field::Literal { text, .. } => f.write_str(text),
            Field::Iter {
                name, collection, ..
            } => write!(f, "{} IN {}", name, collection),
            Field::BinaryExpr { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Field::Aggregate { method, target } => write!(f, "{}({})", method, target),
        }
    }
}
