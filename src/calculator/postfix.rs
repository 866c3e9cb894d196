//! Infix to postfix conversion (Shunting Yard).

use super::error::{CalcError, ParenMismatch};
use super::operators::{Associativity, Operator, OperatorTable};
use super::token::Token;

/// Reorder infix tokens into postfix order.
///
/// The result holds only `Number` and `Operator` tokens. A `-` that shows up
/// where an operand is expected (at the start, after another operator, or
/// after `(`) is emitted as [`Operator::Neg`].
pub fn infix_to_postfix(tokens: &[Token], table: &OperatorTable) -> Result<Vec<Token>, CalcError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    // True right after a number or a closing parenthesis.
    let mut prev_was_operand = false;

    for token in tokens {
        match token {
            Token::Number { .. } => {
                output.push(token.clone());
                prev_was_operand = true;
            }

            Token::Operator(Operator::Sub) if !prev_was_operand => {
                // Prefix operators bind to what follows; nothing is popped.
                stack.push(Token::Operator(Operator::Neg));
            }

            &Token::Operator(op) => {
                let info = table.get(op);

                while let Some(&Token::Operator(top)) = stack.last() {
                    let top_precedence = table.precedence(top);
                    let should_pop = match info.associativity {
                        Associativity::Left => top_precedence >= info.precedence,
                        Associativity::Right => top_precedence > info.precedence,
                    };
                    if !should_pop {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }

                stack.push(Token::Operator(op));
                prev_was_operand = false;
            }

            Token::LeftParen => {
                stack.push(Token::LeftParen);
                prev_was_operand = false;
            }

            Token::RightParen => {
                loop {
                    match stack.pop() {
                        Some(Token::LeftParen) => break,
                        Some(top) => output.push(top),
                        None => {
                            return Err(CalcError::MismatchedParentheses(
                                ParenMismatch::ExtraClosing,
                            ));
                        }
                    }
                }
                prev_was_operand = true;
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LeftParen {
            return Err(CalcError::MismatchedParentheses(
                ParenMismatch::UnclosedOpening,
            ));
        }
        output.push(top);
    }

    Ok(output)
}
