use thiserror::Error;

use crate::{
    ast::{
        AggregateMethod, ArithOp, CompareOp, Condition, Field, IterOperator, Query, ReduceStatement,
        Statement, Token, TokenKind,
    },
    lexer::Lexer,
    value::ValueKind,
};

/// Errors raised while turning query text into a [`Query`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A token appeared where a different construct was required
    #[error("found {found}, expected {expected}")]
    Unexpected { found: String, expected: String },

    /// A literal whose text does not parse as its kind
    #[error("invalid {kind} literal '{text}'")]
    InvalidLiteral { text: String, kind: ValueKind },
}

fn unexpected(token: &Token, expected: &str) -> ParseError {
    let found = match token.kind {
        TokenKind::Eof => "end of query".to_string(),
        _ => token.text.clone(),
    };
    ParseError::Unexpected {
        found,
        expected: expected.to_string(),
    }
}

/// Recursive-descent parser with a single token of pushback.
pub struct Parser {
    lexer: Lexer,
    last: Token,
    buffered: Option<Token>,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            lexer,
            last: Token::eof(),
            buffered: None,
        }
    }

    /// Next token, taking the pushed-back one first if there is one.
    fn scan(&mut self) -> Token {
        let token = match self.buffered.take() {
            Some(token) => token,
            None => self.lexer.scan(),
        };
        self.last = token.clone();
        token
    }

    fn scan_ignore_whitespace(&mut self) -> Token {
        let token = self.scan();
        if token.is(TokenKind::Whitespace) {
            self.scan()
        } else {
            token
        }
    }

    /// Pushes the last scanned token back so the next scan returns it again.
    fn unscan(&mut self) {
        self.buffered = Some(self.last.clone());
    }

    /// Parse a complete query
    ///
    /// ```text
    /// MAP fields [WHERE conditions] [REDUCE fields [WHERE conditions] ON key]
    /// ```
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::Map) {
            return Err(unexpected(&token, "MAP"));
        }

        let mut map = Statement::default();
        self.parse_fields(&mut map.fields)?;
        self.parse_where(&mut map.conditions)?;

        let token = self.scan_ignore_whitespace();
        match token.kind {
            TokenKind::Eof => return Ok(Query { map, reduce: None }),
            TokenKind::Reduce => {}
            _ => return Err(unexpected(&token, "REDUCE")),
        }

        let mut statement = Statement::default();
        self.parse_fields(&mut statement.fields)?;
        self.parse_where(&mut statement.conditions)?;

        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::On) {
            return Err(unexpected(&token, "ON"));
        }

        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::Ident) {
            return Err(unexpected(&token, "reduce key"));
        }
        let key = token.text;

        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::Eof) {
            return Err(unexpected(&token, "end of query"));
        }

        Ok(Query {
            map,
            reduce: Some(ReduceStatement { statement, key }),
        })
    }

    /// Comma-separated fields, stopping before EOF, REDUCE, ON or WHERE.
    fn parse_fields(&mut self, fields: &mut Vec<Field>) -> Result<(), ParseError> {
        loop {
            fields.push(self.parse_field()?);

            let token = self.scan_ignore_whitespace();
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::Eof | TokenKind::Reduce | TokenKind::On | TokenKind::Where => {
                    self.unscan();
                    return Ok(());
                }
                _ => return Err(unexpected(&token, "',' or end of field list")),
            }
        }
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let token = self.scan_ignore_whitespace();
        match token.kind {
            TokenKind::Ident => match AggregateMethod::from_keyword(&token.text) {
                Some(method) => {
                    let target = self.parse_aggregate_target()?;
                    let field = Field::Aggregate {
                        method,
                        target: Box::new(target),
                    };
                    self.parse_field_tail(field)
                }
                None => self.parse_field_tail(Field::Property(token.text)),
            },
            TokenKind::Number => {
                let field = Field::literal(ValueKind::Float, token.literal())?;
                self.parse_field_tail(field)
            }
            _ => Err(unexpected(&token, "IDENT, NUMBER or SUM")),
        }
    }

    /// `SUM(amount)` or `SUM amount`
    fn parse_aggregate_target(&mut self) -> Result<Field, ParseError> {
        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::LParen) {
            self.unscan();
            return self.parse_field();
        }

        let target = self.parse_field()?;
        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::RParen) {
            return Err(unexpected(&token, "')'"));
        }
        Ok(target)
    }

    /// Optional `IN collection` or `* field` after an operand.
    fn parse_field_tail(&mut self, operand: Field) -> Result<Field, ParseError> {
        let token = self.scan_ignore_whitespace();
        match token.kind {
            TokenKind::In => match operand {
                Field::Property(name) => Ok(Field::Iter {
                    name,
                    operator: IterOperator::In,
                    collection: Box::new(self.parse_field()?),
                }),
                _ => Err(unexpected(&token, "',' or end of field list")),
            },
            TokenKind::Star => Ok(Field::BinaryExpr {
                op: ArithOp::Multiply,
                left: Box::new(operand),
                right: Box::new(self.parse_field()?),
            }),
            _ => {
                self.unscan();
                Ok(operand)
            }
        }
    }

    /// Optional `WHERE condition (AND condition)*`.
    fn parse_where(&mut self, conditions: &mut Vec<Condition>) -> Result<(), ParseError> {
        let token = self.scan_ignore_whitespace();
        if !token.is(TokenKind::Where) {
            self.unscan();
            return Ok(());
        }

        loop {
            let left = self.parse_operand()?;

            let token = self.scan_ignore_whitespace();
            let op = match token.kind {
                TokenKind::Eq => CompareOp::Equal,
                TokenKind::NotEq => CompareOp::NotEqual,
                TokenKind::Gt => CompareOp::GreaterThan,
                TokenKind::GtEq => CompareOp::GreaterEqual,
                TokenKind::Lt => CompareOp::LessThan,
                TokenKind::LtEq => CompareOp::LessEqual,
                _ => return Err(unexpected(&token, "operator")),
            };

            let right = self.parse_operand()?;
            conditions.push(Condition::new(left, op, right));

            if !self.scan_ignore_whitespace().is(TokenKind::And) {
                self.unscan();
                return Ok(());
            }
        }
    }

    fn parse_operand(&mut self) -> Result<Field, ParseError> {
        let token = self.scan_ignore_whitespace();
        match token.kind {
            TokenKind::Number => Field::literal(ValueKind::Float, token.literal()),
            TokenKind::String => Field::literal(ValueKind::String, token.literal()),
            TokenKind::Ident => Ok(Field::Property(token.text)),
            _ => Err(unexpected(&token, "NUMBER, STRING or IDENT")),
        }
    }
}
