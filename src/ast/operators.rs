use std::fmt;

/// Relational operators usable in a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (`=`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
}

impl CompareOp {
    /// The operator that holds exactly when `self` does not.
    pub fn negate(self) -> Self {
        match self {
            CompareOp::Equal => CompareOp::NotEqual,
            CompareOp::NotEqual => CompareOp::Equal,
            CompareOp::GreaterThan => CompareOp::LessEqual,
            CompareOp::GreaterEqual => CompareOp::LessThan,
            CompareOp::LessThan => CompareOp::GreaterEqual,
            CompareOp::LessEqual => CompareOp::GreaterThan,
        }
    }

    /// The operator to use when the operands are swapped (`a < b` is `b > a`).
    pub fn reverse(self) -> Self {
        match self {
            CompareOp::Equal => CompareOp::Equal,
            CompareOp::NotEqual => CompareOp::NotEqual,
            CompareOp::GreaterThan => CompareOp::LessThan,
            CompareOp::GreaterEqual => CompareOp::LessEqual,
            CompareOp::LessThan => CompareOp::GreaterThan,
            CompareOp::LessEqual => CompareOp::GreaterEqual,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::LessThan => "<",
            CompareOp::LessEqual => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Arithmetic operators between two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// Multiplication (`*`)
    Multiply,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Multiply => f.write_str("*"),
        }
    }
}

/// Collection operator of an iterator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterOperator {
    /// `name IN collection`
    In,
}

/// Reduction applied by an aggregator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateMethod {
    /// Sum of the numeric elements
    Sum,
    /// Number of elements
    Count,
}

impl AggregateMethod {
    /// Case-insensitive lookup of an aggregation keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("SUM") {
            Some(AggregateMethod::Sum)
        } else if word.eq_ignore_ascii_case("COUNT") {
            Some(AggregateMethod::Count)
        } else {
            None
        }
    }
}

impl fmt::Display for AggregateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateMethod::Sum => f.write_str("SUM"),
            AggregateMethod::Count => f.write_str("COUNT"),
        }
    }
}
