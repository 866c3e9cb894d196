//! Expression parser façade.
//!
//! Runs tokenize → infix-to-postfix → evaluate for `parse`, and only the
//! first two stages for `validate`.

use lazy_static::lazy_static;

use super::error::CalcError;
use super::evaluation::evaluate_postfix;
use super::operators::OperatorTable;
use super::postfix::infix_to_postfix;
use super::token::{Token, join_tokens, tokenize};

lazy_static! {
    static ref DEFAULT_PARSER: ExpressionParser = ExpressionParser::new();
}

/// Outcome of a structural check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn failed(err: &CalcError) -> Self {
        Self {
            valid: false,
            error: Some(err.to_string()),
        }
    }
}

impl From<Validation> for (bool, Option<String>) {
    fn from(v: Validation) -> Self {
        (v.valid, v.error)
    }
}

/// Parses and evaluates arithmetic expressions without dynamic evaluation.
///
/// Supports `+ - * /`, unary minus and parentheses. The parser holds only
/// its read-only operator table, so one instance can serve any number of
/// callers.
#[derive(Clone, Debug, Default)]
pub struct ExpressionParser {
    operators: OperatorTable,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operators(operators: OperatorTable) -> Self {
        Self { operators }
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Parse and evaluate an expression.
    ///
    /// Empty or whitespace-only input is rejected up front. Otherwise the
    /// first error from any stage is returned unchanged.
    pub fn parse(&self, expression: &str) -> Result<f64, CalcError> {
        if expression.trim().is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let postfix = self.postfix(expression)?;
        let value = evaluate_postfix(&postfix, &self.operators)?;

        tracing::debug!(
            expression,
            postfix = %join_tokens(&postfix),
            value,
            "evaluated expression"
        );

        Ok(value)
    }

    /// Check an expression's structure without evaluating it.
    ///
    /// Only tokenizer and parenthesis errors are reported. Operand counts and
    /// division by zero are left to [`parse`](Self::parse), so `"3+"` is
    /// structurally valid here.
    pub fn validate(&self, expression: &str) -> Validation {
        match self.postfix(expression) {
            Ok(_) => Validation::ok(),
            Err(e) => {
                tracing::debug!(expression, error = %e, "expression failed validation");
                Validation::failed(&e)
            }
        }
    }

    /// Tokenize and reorder into postfix tokens.
    pub fn postfix(&self, expression: &str) -> Result<Vec<Token>, CalcError> {
        let tokens = tokenize(expression)?;
        infix_to_postfix(&tokens, &self.operators)
    }

    /// Render the postfix form with single spaces between tokens.
    pub fn to_postfix_string(&self, expression: &str) -> Result<String, CalcError> {
        self.postfix(expression).map(|tokens| join_tokens(&tokens))
    }
}

/// Parse and evaluate with the shared default parser.
pub fn parse(expression: &str) -> Result<f64, CalcError> {
    DEFAULT_PARSER.parse(expression)
}

/// Validate with the shared default parser.
pub fn validate(expression: &str) -> Validation {
    DEFAULT_PARSER.validate(expression)
}
