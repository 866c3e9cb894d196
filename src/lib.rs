//! zcalc: a terminal calculator built on a hand-written Shunting Yard parser.
//!
//! The [`calculator`] module holds the parser core; [`history`], [`config`],
//! [`repl`] and [`oneshot`] are the pieces the `zcalc` binary wires around it.

pub mod calculator;
pub mod config;
pub mod history;
pub mod logging;
pub mod oneshot;
pub mod repl;

pub use calculator::{CalcError, ExpressionParser, parse, validate};
