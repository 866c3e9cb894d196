//! Calculator module for evaluating arithmetic expressions.
//!
//! This module provides functionality to:
//! - Tokenize, convert (Shunting Yard) and evaluate expressions
//! - Format results for display and the clipboard
//! - Detect if user input looks like an expression
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod error;
mod evaluation;
mod format;
mod operators;
mod parser;
mod postfix;
mod token;

pub use clipboard::copy_to_clipboard;
pub use detection::looks_like_expression;
pub use error::{CalcError, ParenMismatch};
pub use evaluation::{
    CalcResult, Rendered, evaluate_expression, evaluate_postfix, non_finite_message,
};
pub use format::{
    DEFAULT_PRECISION, DisplayOptions, format_clipboard, format_display, format_significant,
    group_thousands,
};
pub use operators::{Apply, Associativity, Operator, OperatorInfo, OperatorTable};
pub use parser::{ExpressionParser, Validation, parse, validate};
pub use postfix::infix_to_postfix;
pub use token::{Token, join_tokens, scan, strip_whitespace, tokenize};
