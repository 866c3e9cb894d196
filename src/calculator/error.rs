//! Errors raised while tokenizing, converting or evaluating an expression.

use std::fmt;

use thiserror::Error;

/// Which side of a parenthesis pair is missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParenMismatch {
    /// A `)` with no matching `(` before it.
    ExtraClosing,
    /// A `(` that is never closed.
    UnclosedOpening,
}

impl fmt::Display for ParenMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtraClosing => f.write_str("extra closing parenthesis"),
            Self::UnclosedOpening => f.write_str("unclosed opening parenthesis"),
        }
    }
}

/// Every way a single parse call can fail.
///
/// All variants are terminal for the call that produced them; no partial
/// result is ever returned alongside an error.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum CalcError {
    /// Input contains a character outside `[0-9.+\-*/()]` after whitespace removal.
    #[error("Invalid characters in expression: '{0}'")]
    InvalidCharacter(char),

    /// A numeric-looking token could not be read as a float.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Mismatched parentheses: {0}")]
    MismatchedParentheses(ParenMismatch),

    #[error("Invalid expression: not enough operands")]
    InsufficientOperands,

    #[error("Invalid expression: too many operands")]
    ExcessOperands,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Empty expression")]
    EmptyExpression,

    /// A parenthesis was handed to the evaluator.
    #[error("Unexpected token in postfix expression: {0}")]
    UnexpectedToken(String),
}

impl CalcError {
    /// Check if this error was raised before evaluation started.
    ///
    /// Syntax errors are the only ones [`validate`](super::validate) reports.
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCharacter(_) | Self::InvalidNumber(_) | Self::MismatchedParentheses(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CalcError::MismatchedParentheses(ParenMismatch::ExtraClosing).to_string(),
            "Mismatched parentheses: extra closing parenthesis"
        );
        assert_eq!(
            CalcError::MismatchedParentheses(ParenMismatch::UnclosedOpening).to_string(),
            "Mismatched parentheses: unclosed opening parenthesis"
        );
        assert_eq!(
            CalcError::InvalidCharacter('x').to_string(),
            "Invalid characters in expression: 'x'"
        );
        assert_eq!(CalcError::EmptyExpression.to_string(), "Empty expression");
    }

    #[test]
    fn test_syntax_classification() {
        assert!(CalcError::InvalidCharacter('a').is_syntax_error());
        assert!(CalcError::MismatchedParentheses(ParenMismatch::ExtraClosing).is_syntax_error());
        assert!(!CalcError::DivisionByZero.is_syntax_error());
        assert!(!CalcError::InsufficientOperands.is_syntax_error());
    }
}
