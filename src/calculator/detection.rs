//! Expression detection for interactive input.
//!
//! Decides whether a line typed at the prompt looks like arithmetic, so that
//! failures on things like mistyped commands can point the user at the help
//! text instead of only reporting a parse error.

use lazy_static::lazy_static;
use regex::Regex;

use super::token::strip_whitespace;

lazy_static! {
    /// Matches strings containing only characters the tokenizer accepts.
    static ref MATH_SAFE_CHARS: Regex = Regex::new(r"^[0-9\s\.\+\-\*/()]+$").unwrap();

    /// Matches parentheses that contain something (not empty).
    static ref HAS_PARENS: Regex = Regex::new(r"\([^)]+\)").unwrap();
}

/// Check if input looks like a calculator expression.
///
/// Returns `true` if the input:
/// 1. Contains only digits, whitespace, dots, operators and parentheses
/// 2. Is not just a plain number
/// 3. Has at least one binary operator or non-trivial parentheses
pub fn looks_like_expression(input: &str) -> bool {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return false;
    }

    if !MATH_SAFE_CHARS.is_match(trimmed) {
        return false;
    }

    if is_plain_number(trimmed) {
        return false;
    }

    has_operator(trimmed) || HAS_PARENS.is_match(trimmed)
}

/// A number with an optional sign and nothing else, like `-42.5`.
fn is_plain_number(input: &str) -> bool {
    let compact = strip_whitespace(input);
    let unsigned = compact.strip_prefix('-').unwrap_or(&compact);

    !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

/// True if any operator in the input has an operand on its left, i.e. is
/// used as a binary operator.
fn has_operator(input: &str) -> bool {
    let mut after_operand = false;

    for c in input.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '+' | '*' | '/' => return true,
            '-' if after_operand => return true,
            _ => after_operand = c.is_ascii_digit() || c == '.' || c == ')',
        }
    }

    false
}
