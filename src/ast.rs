//! # evq Query Language - Abstract Syntax Tree
//!
//! This module defines the parsed form of an evq query: a MAP statement that
//! projects and filters every event, and an optional REDUCE statement that groups
//! the surviving rows by a key and aggregates them.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[fields]** - Output fields and condition operands
//! - **[operators]** - Relational, arithmetic, iteration and aggregation operators
//! - **[statements]** - Conditions and MAP/REDUCE statements
//! - **[query]** - The complete query
//!
//! ## Quick Start
//!
//! ```text
//! MAP user_id, amount WHERE amount > 0 REDUCE SUM amount ON user_id
//! ```
//!
//! Keeps every event with a positive `amount`, then totals `amount` per `user_id`.
//!
//! ## Core Concepts
//!
//! ### Fields
//!
//! - **Property** `amount` - value of a key in the event
//! - **Pluck** `sku IN items` - the `sku` of every record in the `items` list
//! - **Product** `price * quantity` - numeric multiplication
//! - **Aggregate** `SUM amount`, `COUNT(amount)` - reduce a list to one value
//!
//! ### Conditions
//!
//! `WHERE` takes one or more `operand op operand` tests joined by `AND`.
//! Operands are numbers, double-quoted strings, or property names.
//!
//! ### Keywords
//!
//! `MAP`, `REDUCE`, `ON`, `WHERE`, `AND`, `IN`, `SUM` and `COUNT` are
//! case-insensitive. Operators must be separated from operands by whitespace.
pub mod fields;
pub mod operators;
pub mod query;
pub mod statements;
pub mod tokens;

pub use fields::Field;
pub use operators::{AggregateMethod, ArithOp, CompareOp, IterOperator};
pub use query::Query;
pub use statements::{Condition, MapStatement, ReduceStatement, Statement};
pub use tokens::{Token, TokenKind};
