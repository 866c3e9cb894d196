//! Single-expression mode: evaluate, check or convert one expression given on
//! the command line and report on the supplied writers.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;

use crate::calculator::{
    CalcResult, DisplayOptions, ExpressionParser, copy_to_clipboard, evaluate_expression,
};
use crate::history::HistoryManager;

/// What to do with the expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Action {
    #[default]
    Evaluate,
    /// Tokens and parentheses only; prints `valid`.
    Check,
    /// Print the postfix (RPN) form.
    Postfix,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

pub struct OneShot {
    parser: ExpressionParser,
    display: DisplayOptions,
    copy: bool,
}

impl OneShot {
    pub fn new(display: DisplayOptions) -> Self {
        Self {
            parser: ExpressionParser::new(),
            display,
            copy: false,
        }
    }

    /// Also copy a successful result to the system clipboard.
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    /// Run `action` on `expression`, writing the result to `out` and errors
    /// to `err`. Only a successful evaluation is added to `history`.
    ///
    /// Expression errors are an [`Outcome::Failure`]; `Err` means a writer
    /// failed. A clipboard failure is logged and does not change the outcome.
    pub fn run<O: Write, E: Write>(
        &self,
        action: Action,
        expression: &str,
        history: &mut HistoryManager,
        out: &mut O,
        err: &mut E,
    ) -> Result<Outcome> {
        let reported = match action {
            Action::Check => match self.parser.validate(expression).error {
                None => Ok("valid".to_string()),
                Some(message) => Err(message),
            },
            Action::Postfix => self
                .parser
                .to_postfix_string(expression)
                .map_err(|e| e.to_string()),
            Action::Evaluate => {
                let CalcResult {
                    expression,
                    outcome,
                } = evaluate_expression(&self.parser, expression);
                outcome.map(|rendered| {
                    history.add_entry(expression, rendered.value);
                    if self.copy
                        && let Err(e) = copy_to_clipboard(&rendered.clipboard)
                    {
                        tracing::warn!(error = %e, "clipboard copy failed");
                    }
                    self.display.format(rendered.value)
                })
            }
        };

        match reported {
            Ok(text) => {
                writeln!(out, "{}", text)?;
                Ok(Outcome::Success)
            }
            Err(message) => {
                tracing::debug!(expression, %message, "expression rejected");
                writeln!(err, "Error: {}", message)?;
                Ok(Outcome::Failure)
            }
        }
    }
}
