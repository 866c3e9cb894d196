//! Operator table shared by the converter and the evaluator.
//!
//! The table is plain data: built once, never mutated, and handed around by
//! reference. Nothing here holds state between calls.

use std::fmt;

/// An arithmetic operator.
///
/// `Neg` never comes out of the tokenizer. The converter produces it when a
/// `-` appears where an operand is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl Operator {
    /// All binary operators accepted in input, in table order.
    pub const BINARY: [Operator; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Map a source character to its binary operator.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    /// The character this operator is written with.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub | Self::Neg => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Short description used in help output.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Add => "Add two numbers",
            Self::Sub => "Subtract the second number from the first",
            Self::Mul => "Multiply two numbers",
            Self::Div => "Divide the first number by the second",
            Self::Neg => "Negate a number",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// How an operator behaves once it is applied.
#[derive(Clone, Copy, Debug)]
pub enum Apply {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
}

/// Table entry for a single operator.
#[derive(Clone, Copy, Debug)]
pub struct OperatorInfo {
    pub precedence: u8,
    pub associativity: Associativity,
    pub apply: Apply,
}

impl OperatorInfo {
    /// Number of operands the operator consumes.
    pub fn arity(&self) -> usize {
        match self.apply {
            Apply::Unary(_) => 1,
            Apply::Binary(_) => 2,
        }
    }
}

/// Immutable mapping from operator to precedence, associativity and function.
#[derive(Clone, Debug)]
pub struct OperatorTable {
    add: OperatorInfo,
    sub: OperatorInfo,
    mul: OperatorInfo,
    div: OperatorInfo,
    neg: OperatorInfo,
}

impl OperatorTable {
    /// Look up the entry for an operator.
    pub fn get(&self, op: Operator) -> &OperatorInfo {
        match op {
            Operator::Add => &self.add,
            Operator::Sub => &self.sub,
            Operator::Mul => &self.mul,
            Operator::Div => &self.div,
            Operator::Neg => &self.neg,
        }
    }

    pub fn precedence(&self, op: Operator) -> u8 {
        self.get(op).precedence
    }

    /// Apply a binary operator directly.
    ///
    /// Division by zero is not checked here; callers that care (the
    /// evaluator) check the right operand first. Returns `None` for `Neg`.
    pub fn apply_binary(&self, op: Operator, a: f64, b: f64) -> Option<f64> {
        match self.get(op).apply {
            Apply::Binary(f) => Some(f(a, b)),
            Apply::Unary(_) => None,
        }
    }
}

fn binary(precedence: u8, f: fn(f64, f64) -> f64) -> OperatorInfo {
    OperatorInfo {
        precedence,
        associativity: Associativity::Left,
        apply: Apply::Binary(f),
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self {
            add: binary(1, |a, b| a + b),
            sub: binary(1, |a, b| a - b),
            mul: binary(2, |a, b| a * b),
            div: binary(2, |a, b| a / b),
            neg: OperatorInfo {
                precedence: 3,
                associativity: Associativity::Right,
                apply: Apply::Unary(|a| -a),
            },
        }
    }
}
