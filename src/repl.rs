//! Interactive calculator loop.
//!
//! Reads commands and expressions line by line. The loop is generic over its
//! input and output so it can run against stdin/stdout or in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::calculator::{
    CalcError, DisplayOptions, ExpressionParser, Operator, copy_to_clipboard, format_clipboard,
    looks_like_expression, non_finite_message,
};
use crate::history::HistoryManager;

/// Entries shown by the `history` command.
const HISTORY_DISPLAY_LIMIT: usize = 10;

const RULE_WIDTH: usize = 50;
const HELP_RULE_WIDTH: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Whole expressions like `(3+4)*2`.
    Expression,
    /// Prompt for a number, an operator and a second number.
    StepByStep,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Self::Expression => "Expression",
            Self::StepByStep => "Step-by-step",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Expression => Self::StepByStep,
            Self::StepByStep => Self::Expression,
        }
    }
}

/// A parsed line at the main prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    ToggleMode,
    ShowHistory,
    ClearHistory,
    Copy,
    Input(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "q" | "quit" | "exit" => Self::Quit,
            "h" | "help" => Self::Help,
            "expr" => Self::ToggleMode,
            "history" | "hist" => Self::ShowHistory,
            "clear history" => Self::ClearHistory,
            "copy" => Self::Copy,
            _ => Self::Input(trimmed.to_string()),
        }
    }
}

/// Interactive session state.
pub struct Repl<R, W> {
    input: R,
    output: W,
    parser: ExpressionParser,
    history: HistoryManager,
    display: DisplayOptions,
    mode: Mode,
    last_result: Option<f64>,
    clipboard_enabled: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, history: HistoryManager, display: DisplayOptions) -> Self {
        Self {
            input,
            output,
            parser: ExpressionParser::new(),
            history,
            display,
            mode: Mode::Expression,
            last_result: None,
            clipboard_enabled: true,
        }
    }

    /// Disable the system clipboard (`copy` then reports the value only).
    pub fn without_clipboard(mut self) -> Self {
        self.clipboard_enabled = false;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run until the user quits or input ends, returning the history.
    pub fn run(mut self) -> Result<HistoryManager> {
        self.print_welcome()?;
        writeln!(self.output, "\nMode: {}", self.mode.name())?;
        writeln!(self.output, "Type 'expr' to toggle modes, 'h' for help\n")?;

        loop {
            let prompt = match self.mode {
                Mode::Expression => "Enter expression (or command): ",
                Mode::StepByStep => "Enter command (or press Enter to calculate): ",
            };
            let Some(line) = self.prompt(prompt)? else {
                writeln!(self.output)?;
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => self.print_help()?,
                Command::ToggleMode => {
                    self.mode = self.mode.toggled();
                    writeln!(self.output, "\nSwitched to {} mode\n", self.mode.name())?;
                }
                Command::ShowHistory => {
                    let text = self
                        .history
                        .format_history_display(Some(HISTORY_DISPLAY_LIMIT));
                    writeln!(self.output, "\n{}", text)?;
                }
                Command::ClearHistory => self.clear_history()?,
                Command::Copy => self.copy_last_result()?,
                Command::Input(text) => {
                    let keep_going = match self.mode {
                        Mode::Expression => {
                            self.evaluate(&text)?;
                            true
                        }
                        Mode::StepByStep => self.step_by_step()?,
                    };
                    if !keep_going {
                        break;
                    }
                }
            }
        }

        writeln!(self.output, "Thank you for using Calculator. Goodbye!")?;
        Ok(self.history)
    }

    /// Print a prompt and read one line. `None` at end of input.
    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn evaluate(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        match self.parser.parse(text) {
            Ok(value) => match non_finite_message(value) {
                Some(message) => writeln!(self.output, "Error: {}\n", message)?,
                None => {
                    writeln!(
                        self.output,
                        "Result: {} = {}\n",
                        text,
                        self.display.format(value)
                    )?;
                    self.record(text, value);
                }
            },
            Err(CalcError::DivisionByZero) => {
                writeln!(self.output, "Error: Cannot divide by zero!\n")?;
            }
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                if !looks_like_expression(text) {
                    writeln!(self.output, "Type 'h' for a list of commands.")?;
                }
                writeln!(self.output)?;
            }
        }
        Ok(())
    }

    fn record(&mut self, expression: &str, value: f64) {
        self.history.add_entry(expression, value);
        self.last_result = Some(value);
    }

    /// Returns `false` when the user quit from one of the prompts.
    fn step_by_step(&mut self) -> Result<bool> {
        let Some(a) = self.read_number("Enter first number: ")? else {
            return Ok(false);
        };
        let Some(op) = self.read_operator()? else {
            return Ok(false);
        };
        let Some(b) = self.read_number("Enter second number: ")? else {
            return Ok(false);
        };

        if op == Operator::Div && b == 0.0 {
            writeln!(self.output, "Error: Cannot divide by zero!\n")?;
            return Ok(true);
        }

        let Some(result) = self.parser.operators().apply_binary(op, a, b) else {
            return Ok(true);
        };

        if let Some(message) = non_finite_message(result) {
            writeln!(self.output, "Error: {}\n", message)?;
            return Ok(true);
        }

        writeln!(
            self.output,
            "\nResult: {} {} {} = {}\n",
            self.display.format(a),
            op,
            self.display.format(b),
            self.display.format(result)
        )?;
        // History keeps a form the parser reads back, without separators.
        let expression = format!("{}{}{}", format_clipboard(a), op, format_clipboard(b));
        self.record(&expression, result);

        Ok(true)
    }

    fn read_number(&mut self, prompt: &str) -> Result<Option<f64>> {
        loop {
            let Some(line) = self.prompt(prompt)? else {
                return Ok(None);
            };
            if is_quit(&line) {
                return Ok(None);
            }
            match line.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Some(value)),
                _ => writeln!(self.output, "Invalid number. Please try again or 'q' to quit.")?,
            }
        }
    }

    fn read_operator(&mut self) -> Result<Option<Operator>> {
        let symbols = operator_list();
        let prompt = format!("Enter operator ({}): ", symbols);

        loop {
            let Some(line) = self.prompt(&prompt)? else {
                return Ok(None);
            };
            if is_quit(&line) {
                return Ok(None);
            }

            let mut chars = line.chars();
            if let (Some(c), None) = (chars.next(), chars.next())
                && let Some(op) = Operator::from_symbol(c)
            {
                return Ok(Some(op));
            }
            writeln!(self.output, "Invalid operator. Valid operators: {}", symbols)?;
        }
    }

    fn clear_history(&mut self) -> Result<()> {
        let answer = self.prompt("Clear all history? (y/n): ")?;
        if answer.is_some_and(|a| a.eq_ignore_ascii_case("y")) {
            self.history.clear();
            writeln!(self.output, "History cleared.\n")?;
        }
        Ok(())
    }

    fn copy_last_result(&mut self) -> Result<()> {
        let Some(value) = self.last_result else {
            writeln!(self.output, "Nothing to copy yet.\n")?;
            return Ok(());
        };

        let text = format_clipboard(value);
        if !self.clipboard_enabled {
            writeln!(self.output, "Clipboard disabled; last result: {}\n", text)?;
            return Ok(());
        }

        match copy_to_clipboard(&text) {
            Ok(()) => writeln!(self.output, "Copied {} to clipboard.\n", text)?,
            Err(e) => {
                tracing::warn!(error = %e, "clipboard copy failed");
                writeln!(self.output, "Error: {:#}\n", e)?;
            }
        }
        Ok(())
    }

    fn print_welcome(&mut self) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "Welcome to Command-Line Calculator")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "Commands:")?;
        writeln!(self.output, "  - Enter an expression like (3+4)*2 to calculate")?;
        writeln!(self.output, "  - 'h' or 'help' - Show help menu")?;
        writeln!(self.output, "  - 'q' or 'quit' - Exit calculator")?;
        writeln!(self.output, "{}", rule)?;
        Ok(())
    }

    fn print_help(&mut self) -> Result<()> {
        let rule = "-".repeat(HELP_RULE_WIDTH);
        writeln!(self.output, "\nHelp Menu:")?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "Available operations:")?;
        for op in Operator::BINARY {
            writeln!(self.output, "  {} - {}", op, op.describe())?;
        }
        writeln!(self.output, "\nExpression Mode:")?;
        writeln!(self.output, "  Enter complete expressions like '3+4*2'")?;
        writeln!(self.output, "  Supports parentheses: '(3+4)*2' and negation: '-(2+3)'")?;
        writeln!(self.output, "  Type 'expr' to toggle step-by-step mode")?;
        writeln!(self.output, "\nHistory Commands:")?;
        writeln!(self.output, "  'history' or 'hist' - Show calculation history")?;
        writeln!(self.output, "  'clear history' - Clear all history")?;
        writeln!(self.output, "  'copy' - Copy the last result to the clipboard")?;
        writeln!(self.output, "\nCommands:")?;
        writeln!(self.output, "  'h' or 'help' - Show this menu")?;
        writeln!(self.output, "  'q' or 'quit' - Exit calculator")?;
        writeln!(self.output, "{}", rule)?;
        Ok(())
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "q" | "quit")
}

fn operator_list() -> String {
    Operator::BINARY
        .iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (String, HistoryManager) {
        run_with(script, DisplayOptions::default())
    }

    fn run_with(script: &str, display: DisplayOptions) -> (String, HistoryManager) {
        let mut output = Vec::new();
        let repl = Repl::new(
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
            HistoryManager::default(),
            display,
        )
        .without_clipboard();
        let history = repl.run().unwrap();
        (String::from_utf8(output).unwrap(), history)
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse(" QUIT "), Command::Quit);
        assert_eq!(Command::parse("Hist"), Command::ShowHistory);
        assert_eq!(Command::parse("clear history"), Command::ClearHistory);
        assert_eq!(Command::parse("3 + 4"), Command::Input("3 + 4".to_string()));
    }

    #[test]
    fn test_expression_mode() {
        let (out, history) = run("3+4*2\n(3+4)*2\nq\n");
        assert!(out.contains("Result: 3+4*2 = 11"));
        assert!(out.contains("Result: (3+4)*2 = 14"));
        assert!(out.ends_with("Thank you for using Calculator. Goodbye!\n"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_errors_are_reported() {
        let (out, history) = run("10/0\n(3+4\nfoo\n");
        assert!(out.contains("Error: Cannot divide by zero!"));
        assert!(out.contains("Error: Mismatched parentheses: unclosed opening parenthesis"));
        assert!(out.contains("Error: Invalid characters in expression: 'f'"));
        assert!(out.contains("Type 'h' for a list of commands."));
        assert!(history.is_empty());
    }

    #[test]
    fn test_end_of_input_exits() {
        let (out, _) = run("1+1\n");
        assert!(out.contains("Result: 1+1 = 2"));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_history_commands() {
        let (out, history) = run("1+1\nhistory\nclear history\ny\nhist\n");
        assert!(out.contains("Calculation History:"));
        assert!(out.contains("1+1 = 2"));
        assert!(out.contains("History cleared."));
        assert!(out.contains("No calculation history"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_history_declined() {
        let (_, history) = run("2*2\nclear history\nn\n");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_step_by_step_mode() {
        let (out, history) = run("expr\n\n6\nx\n*\n7\nq\n");
        assert!(out.contains("Switched to Step-by-step mode"));
        assert!(out.contains("Invalid operator. Valid operators: +, -, *, /"));
        assert!(out.contains("Result: 6 * 7 = 42"));
        assert_eq!(history.last().unwrap().expression, "6*7");
    }

    #[test]
    fn test_step_by_step_division_by_zero() {
        let (out, history) = run("expr\n\n1\n/\nabc\n0\nq\n");
        assert!(out.contains("Invalid number. Please try again or 'q' to quit."));
        assert!(out.contains("Error: Cannot divide by zero!"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_quit_from_step_prompt() {
        let (out, _) = run("expr\n\nq\n");
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn test_copy_without_clipboard() {
        let (out, _) = run("copy\n1/4\ncopy\n");
        assert!(out.contains("Nothing to copy yet."));
        assert!(out.contains("Clipboard disabled; last result: 0.25"));
    }

    #[test]
    fn test_help() {
        let (out, _) = run("help\n");
        assert!(out.contains("Help Menu:"));
        assert!(out.contains("  / - Divide the first number by the second"));
    }

    #[test]
    fn test_overflow_is_not_recorded() {
        let script = format!("{}*2\n1+1\n", "9".repeat(400));
        let (out, history) = run(&script);
        assert!(out.contains("Error: Infinity"));
        assert!(out.contains("Result: 1+1 = 2"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().expression, "1+1");
    }

    #[test]
    fn test_negative_overflow_is_not_recorded() {
        let script = format!("-{}*2\ncopy\n", "9".repeat(400));
        let (out, history) = run(&script);
        assert!(out.contains("Error: -Infinity"));
        assert!(out.contains("Nothing to copy yet."));
        assert!(history.is_empty());
    }

    #[test]
    fn test_step_by_step_overflow() {
        let (out, history) = run("expr\n\n1e308\n*\n10\nq\n");
        assert!(out.contains("Error: Infinity"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_step_by_step_records_plain_numbers() {
        let display = DisplayOptions {
            thousands_separators: true,
            ..DisplayOptions::default()
        };
        let (out, history) = run_with("expr\n\n1000\n*\n2500\nq\n", display);
        assert!(out.contains("Result: 1,000 * 2,500 = 2,500,000"));

        let entry = history.last().unwrap();
        assert_eq!(entry.expression, "1000*2500");
        assert_eq!(crate::parse(&entry.expression), Ok(entry.result));
    }
}
