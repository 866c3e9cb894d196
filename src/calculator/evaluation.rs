//! Postfix evaluation and the user-facing calculation result.

use super::error::CalcError;
use super::format::{format_clipboard, format_display};
use super::operators::{Apply, Operator, OperatorTable};
use super::parser::ExpressionParser;
use super::token::Token;

/// Evaluate postfix tokens on an operand stack.
///
/// Binary operators pop the right operand first, then the left one. Division
/// checks for a zero divisor before the operator function runs.
pub fn evaluate_postfix(tokens: &[Token], table: &OperatorTable) -> Result<f64, CalcError> {
    let mut stack: Vec<f64> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match *token {
            Token::Number { value, .. } => stack.push(value),

            Token::Operator(op) => {
                let result = match table.get(op).apply {
                    Apply::Unary(f) => {
                        let a = stack.pop().ok_or(CalcError::InsufficientOperands)?;
                        f(a)
                    }
                    Apply::Binary(f) => {
                        let b = stack.pop().ok_or(CalcError::InsufficientOperands)?;
                        let a = stack.pop().ok_or(CalcError::InsufficientOperands)?;

                        if op == Operator::Div && b == 0.0 {
                            return Err(CalcError::DivisionByZero);
                        }
                        f(a, b)
                    }
                };
                stack.push(result);
            }

            Token::LeftParen | Token::RightParen => {
                return Err(CalcError::UnexpectedToken(token.to_string()));
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        [] => Err(CalcError::InsufficientOperands),
        _ => Err(CalcError::ExcessOperands),
    }
}

/// Describe a value that cannot be shown as a result, or `None` when it is
/// finite.
pub fn non_finite_message(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("Not a Number")
    } else if value == f64::INFINITY {
        Some("Infinity")
    } else if value == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

/// A finite value in the forms the front ends show it.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub value: f64,
    /// Grouped for reading, e.g. `1,000,000`.
    pub display: String,
    /// Plain digits for pasting elsewhere, e.g. `1000000`.
    pub clipboard: String,
}

/// An evaluated expression: the trimmed input and either its rendered value
/// or an error message.
#[derive(Clone, Debug)]
pub struct CalcResult {
    pub expression: String,
    pub outcome: Result<Rendered, String>,
}

impl CalcResult {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|r| r.value)
    }

    /// The display form on success, the message on failure.
    pub fn display(&self) -> &str {
        match &self.outcome {
            Ok(rendered) => &rendered.display,
            Err(message) => message,
        }
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|r| r.clipboard.as_str())
    }
}

/// Evaluate an expression into a displayable result.
///
/// Unlike [`ExpressionParser::parse`], this never fails: parse errors and
/// non-finite values end up as the `Err` side of [`CalcResult::outcome`].
pub fn evaluate_expression(parser: &ExpressionParser, input: &str) -> CalcResult {
    let expression = input.trim().to_string();

    let outcome = parser
        .parse(&expression)
        .map_err(|e| e.to_string())
        .and_then(|value| match non_finite_message(value) {
            Some(message) => Err(message.to_string()),
            None => Ok(Rendered {
                value,
                display: format_display(value),
                clipboard: format_clipboard(value),
            }),
        });

    CalcResult {
        expression,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Token {
        Token::number(v)
    }

    fn op(o: Operator) -> Token {
        Token::Operator(o)
    }

    #[test]
    fn test_operand_order() {
        let table = OperatorTable::default();
        let rpn = [num(10.0), num(4.0), op(Operator::Sub)];
        assert_eq!(evaluate_postfix(&rpn, &table), Ok(6.0));

        let rpn = [num(1.0), num(4.0), op(Operator::Div)];
        assert_eq!(evaluate_postfix(&rpn, &table), Ok(0.25));
    }

    #[test]
    fn test_division_by_zero() {
        let table = OperatorTable::default();
        let rpn = [num(10.0), num(0.0), op(Operator::Div)];
        assert_eq!(evaluate_postfix(&rpn, &table), Err(CalcError::DivisionByZero));

        // Negative zero compares equal to zero.
        let rpn = [num(1.0), num(-0.0), op(Operator::Div)];
        assert_eq!(evaluate_postfix(&rpn, &table), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_operand_count() {
        let table = OperatorTable::default();
        assert_eq!(
            evaluate_postfix(&[num(3.0), op(Operator::Add)], &table),
            Err(CalcError::InsufficientOperands)
        );
        assert_eq!(
            evaluate_postfix(&[op(Operator::Neg)], &table),
            Err(CalcError::InsufficientOperands)
        );
        assert_eq!(
            evaluate_postfix(&[num(3.0), num(4.0)], &table),
            Err(CalcError::ExcessOperands)
        );
        assert_eq!(evaluate_postfix(&[], &table), Err(CalcError::InsufficientOperands));
    }

    #[test]
    fn test_negation() {
        let table = OperatorTable::default();
        let rpn = [num(5.0), op(Operator::Neg), num(10.0), op(Operator::Add)];
        assert_eq!(evaluate_postfix(&rpn, &table), Ok(5.0));
    }

    #[test]
    fn test_parenthesis_rejected() {
        let table = OperatorTable::default();
        assert_eq!(
            evaluate_postfix(&[Token::LeftParen], &table),
            Err(CalcError::UnexpectedToken("(".to_string()))
        );
    }

    #[test]
    fn test_basic_evaluation() {
        let parser = ExpressionParser::new();
        let result = evaluate_expression(&parser, "2 + 2");
        assert!(result.is_success());
        assert_eq!(result.display(), "4");
        assert_eq!(result.clipboard(), Some("4"));
        assert_eq!(result.value(), Some(4.0));
    }

    #[test]
    fn test_thousand_separators() {
        let parser = ExpressionParser::new();
        let result = evaluate_expression(&parser, "1000 * 1000");
        assert!(result.is_success());
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.clipboard(), Some("1000000"));
    }

    #[test]
    fn test_decimal_result() {
        let parser = ExpressionParser::new();
        let result = evaluate_expression(&parser, "1 / 3");
        assert!(result.is_success());
        assert!(result.display().starts_with("0.333"));
    }

    #[test]
    fn test_error_result() {
        let parser = ExpressionParser::new();
        let result = evaluate_expression(&parser, " 1 / 0 ");
        assert!(!result.is_success());
        assert_eq!(result.expression(), "1 / 0");
        assert_eq!(result.display(), "Division by zero");
        assert_eq!(result.clipboard(), None);
    }

    #[test]
    fn test_overflow_is_error() {
        let parser = ExpressionParser::new();
        let big = format!("1{}", "0".repeat(308));
        let result = evaluate_expression(&parser, &format!("{big}*{big}"));
        assert!(!result.is_success());
        assert_eq!(result.display(), "Infinity");
    }

    #[test]
    fn test_non_finite_message() {
        assert_eq!(non_finite_message(1.5), None);
        assert_eq!(non_finite_message(f64::MAX), None);
        assert_eq!(non_finite_message(f64::INFINITY), Some("Infinity"));
        assert_eq!(non_finite_message(f64::NEG_INFINITY), Some("-Infinity"));
        assert_eq!(non_finite_message(f64::NAN), Some("Not a Number"));
    }

    #[test]
    fn test_negative_overflow_is_error() {
        let parser = ExpressionParser::new();
        let big = format!("1{}", "0".repeat(308));
        let result = evaluate_expression(&parser, &format!("-{big}*{big}"));
        assert_eq!(result.outcome, Err("-Infinity".to_string()));
        assert_eq!(result.value(), None);
    }
}
