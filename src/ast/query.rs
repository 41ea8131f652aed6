use std::fmt;

use crate::ast::{MapStatement, ReduceStatement};

/// A complete MAP/REDUCE query.
///
/// Displays in canonical form, which parses back to an equal query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Projection and filter applied to every record
    pub map: MapStatement,

    /// Grouping stage; `None` for map-only queries
    pub reduce: Option<ReduceStatement>,
}

impl Query {
    /// The reduce statement, if it has a grouping key.
    pub fn reduce_phase(&self) -> Option<&ReduceStatement> {
        self.reduce.as_ref().filter(|r| !r.key.is_empty())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAP {}", self.map)?;
        if let Some(reduce) = &self.reduce {
            write!(f, " REDUCE {} ON {}", reduce.statement, reduce.key)?;
        }
        Ok(())
    }
}
