use std::{fmt, ops::Deref};

use crate::ast::{CompareOp, Field};

/// A relational test between two operands.
///
/// Property operands are resolved against the current record (or group) before
/// the comparison runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Field,
    pub op: CompareOp,
    pub right: Field,
}

impl Condition {
    pub fn new(left: Field, op: CompareOp, right: Field) -> Self {
        Condition { left, op, right }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// Output fields plus an implicit AND of conditions.
///
/// # Example
/// ```text
/// user_id, amount WHERE amount > 0 AND kind = "purchase"
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub fields: Vec<Field>,
    pub conditions: Vec<Condition>,
}

/// The per-record projection and filter.
pub type MapStatement = Statement;

/// The per-group aggregation and filter, grouped on `key`.
///
/// An empty `key` means there is no reduce phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReduceStatement {
    pub statement: Statement,
    pub key: String,
}

impl Deref for ReduceStatement {
    type Target = Statement;

    fn deref(&self) -> &Statement {
        &self.statement
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        for (i, condition) in self.conditions.iter().enumerate() {
            let keyword = if i == 0 { " WHERE " } else { " AND " };
            write!(f, "{}{}", keyword, condition)?;
        }
        Ok(())
    }
}
