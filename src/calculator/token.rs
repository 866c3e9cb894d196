//! Tokenizer for arithmetic expressions.
//!
//! Whitespace is removed first, then the remaining text is split into
//! numbers, operators and parentheses with a single regex. Any text the regex
//! skips over is an invalid character.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use super::error::CalcError;
use super::operators::Operator;

lazy_static! {
    /// One or more ASCII digits with an optional fractional part, or a single
    /// operator/parenthesis character.
    static ref LEXEME: Regex = Regex::new(r"[0-9]+\.?[0-9]*|[+\-*/()]").unwrap();
}

/// A single token of an arithmetic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A number together with the literal it was read from, so `1.50`
    /// renders as `1.50` and not `1.5`.
    Number { value: f64, literal: String },
    Operator(Operator),
    LeftParen,
    RightParen,
}

impl Token {
    /// A number token whose literal is the shortest form of `value`.
    pub fn number(value: f64) -> Self {
        Self::Number {
            value,
            literal: value.to_string(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number { .. })
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { literal, .. } => f.write_str(literal),
            Self::Operator(op) => write!(f, "{}", op),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
        }
    }
}

/// Remove every whitespace character from the input.
pub fn strip_whitespace(expression: &str) -> String {
    expression.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split whitespace-free input into its lexemes.
///
/// The lexemes always concatenate back to `stripped`; if they would not, the
/// first character the pattern could not consume is reported.
pub fn scan(stripped: &str) -> Result<Vec<&str>, CalcError> {
    let mut lexemes = Vec::new();
    let mut cursor = 0;

    for m in LEXEME.find_iter(stripped) {
        if m.start() != cursor {
            return Err(invalid_character_at(stripped, cursor));
        }
        lexemes.push(m.as_str());
        cursor = m.end();
    }

    if cursor != stripped.len() {
        return Err(invalid_character_at(stripped, cursor));
    }

    Ok(lexemes)
}

fn invalid_character_at(input: &str, index: usize) -> CalcError {
    // `index` is always a match boundary, so it sits on a char boundary.
    let c = input[index..].chars().next().unwrap_or_default();
    CalcError::InvalidCharacter(c)
}

/// Convert an expression string into a sequence of tokens.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, CalcError> {
    let stripped = strip_whitespace(expression);

    scan(&stripped)?
        .into_iter()
        .map(classify)
        .collect()
}

fn classify(lexeme: &str) -> Result<Token, CalcError> {
    let mut chars = lexeme.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(op) = Operator::from_symbol(c) {
            return Ok(Token::Operator(op));
        }
        match c {
            '(' => return Ok(Token::LeftParen),
            ')' => return Ok(Token::RightParen),
            _ => {}
        }
    }

    let value = lexeme
        .parse::<f64>()
        .map_err(|_| CalcError::InvalidNumber(lexeme.to_string()))?;

    Ok(Token::Number {
        value,
        literal: lexeme.to_string(),
    })
}

/// Render tokens back to a compact string, one space between tokens.
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
