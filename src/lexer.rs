use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Token, TokenKind};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)$").expect("valid number pattern"));

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

/// Splits query text into tokens, one per call to [`Lexer::scan`].
///
/// Whitespace is returned as a token rather than skipped, so the literal text of
/// all tokens concatenates back to the input.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a double-quoted literal, quotes included.
    fn read_string(&mut self) -> Token {
        let mut text = String::from('"');
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            text.push(ch);
            self.advance();
            if ch == '"' {
                return Token::new(TokenKind::String, text);
            }
        }

        Token::new(TokenKind::Illegal, text)
    }

    /// Returns the next token. Returns `Eof` forever once the input is exhausted.
    pub fn scan(&mut self) -> Token {
        match self.current_char() {
            None => Token::eof(),
            Some(ch) if ch.is_whitespace() => {
                let text = self.read_while(char::is_whitespace);
                Token::new(TokenKind::Whitespace, text)
            }
            Some(',') => {
                self.advance();
                Token::new(TokenKind::Comma, ",")
            }
            Some('(') => {
                self.advance();
                Token::new(TokenKind::LParen, "(")
            }
            Some(')') => {
                self.advance();
                Token::new(TokenKind::RParen, ")")
            }
            Some('"') => self.read_string(),
            Some(ch) if is_word_char(ch) => {
                let text = self.read_while(is_word_char);
                Token::new(classify(&text), text)
            }
            Some(ch) => {
                self.advance();
                Token::new(TokenKind::Illegal, ch)
            }
        }
    }

    /// Scans the whole input, ending with (and including) the `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | '=' | '!' | '+' | '-' | '*' | '/')
}

/// Characters accumulated into one candidate token before classification.
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || ch == '"' || is_operator_char(ch)
}

fn classify(text: &str) -> TokenKind {
    match text.to_ascii_uppercase().as_str() {
        "MAP" => return TokenKind::Map,
        "REDUCE" => return TokenKind::Reduce,
        "ON" => return TokenKind::On,
        "WHERE" => return TokenKind::Where,
        "AND" => return TokenKind::And,
        "IN" => return TokenKind::In,
        _ => {}
    }

    match text {
        "<" => TokenKind::Lt,
        "<=" => TokenKind::LtEq,
        ">" => TokenKind::Gt,
        ">=" => TokenKind::GtEq,
        "=" => TokenKind::Eq,
        "!=" => TokenKind::NotEq,
        "*" => TokenKind::Star,
        t if NUMBER.is_match(t) => TokenKind::Number,
        t if IDENT.is_match(t) => TokenKind::Ident,
        _ => TokenKind::Illegal,
    }
}

#[test]
fn test_keywords_are_case_insensitive() {
    let mut lexer = Lexer::new("map Reduce ON where And in");
    let kinds: Vec<TokenKind> = lexer
        .tokenize()
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::Whitespace)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Map,
            TokenKind::Reduce,
            TokenKind::On,
            TokenKind::Where,
            TokenKind::And,
            TokenKind::In,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_condition() {
    let mut lexer = Lexer::new("amount >= 10");
    assert_eq!(lexer.scan(), Token::new(TokenKind::Ident, "amount"));
    assert_eq!(lexer.scan(), Token::new(TokenKind::Whitespace, " "));
    assert_eq!(lexer.scan(), Token::new(TokenKind::GtEq, ">="));
    assert_eq!(lexer.scan(), Token::new(TokenKind::Whitespace, " "));
    assert_eq!(lexer.scan(), Token::new(TokenKind::Number, "10"));
    assert_eq!(lexer.scan(), Token::eof());
}
