use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use zcalc::config::Config;
use zcalc::history::HistoryManager;
use zcalc::logging;
use zcalc::oneshot::{Action, OneShot};
use zcalc::repl::Repl;

/// A terminal calculator for arithmetic expressions with `+ - * /` and
/// parentheses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Only check the expression's structure (tokens and parentheses).
    #[arg(long, conflicts_with = "postfix")]
    check: bool,

    /// Print the expression in postfix (RPN) order instead of evaluating it.
    #[arg(long)]
    postfix: bool,

    /// Copy the result to the clipboard.
    #[arg(short, long)]
    copy: bool,

    /// Use this history file instead of the configured one.
    #[arg(long, value_name = "PATH")]
    history_file: Option<PathBuf>,

    /// Neither load nor save history.
    #[arg(long)]
    no_history: bool,

    /// Use this config file instead of ~/.config/zcalc/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Significant digits shown for results.
    #[arg(short, long)]
    precision: Option<usize>,

    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Expression to evaluate. Starts the interactive calculator when omitted.
    expression: Option<String>,
}

impl Args {
    fn action(&self) -> Action {
        if self.check {
            Action::Check
        } else if self.postfix {
            Action::Postfix
        } else {
            Action::Evaluate
        }
    }

    fn history_path(&self, config: &Config) -> Option<PathBuf> {
        if self.no_history {
            return None;
        }
        self.history_file.clone().or_else(|| config.history_path())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = Config::load(args.config.as_deref())?;
    let mut display = config.display.options();
    if let Some(precision) = args.precision {
        display.precision = precision;
    }

    let history_path = args.history_path(&config);
    let mut history = load_history(&config, history_path.as_deref());

    let Some(expression) = args.expression.as_deref() else {
        let stdin = io::stdin();
        let history = Repl::new(stdin.lock(), io::stdout(), history, display).run()?;
        save_history(&history, history_path.as_deref());
        return Ok(ExitCode::SUCCESS);
    };

    let action = args.action();
    let outcome = OneShot::new(display).with_copy(args.copy).run(
        action,
        expression,
        &mut history,
        &mut io::stdout(),
        &mut io::stderr(),
    )?;

    if action == Action::Evaluate && outcome.is_success() {
        save_history(&history, history_path.as_deref());
    }
    Ok(outcome.into())
}

/// Load history if a file is configured. A missing or unreadable file only
/// costs the old entries.
fn load_history(config: &Config, path: Option<&Path>) -> HistoryManager {
    let mut history = HistoryManager::new(config.history.max_entries);

    if let Some(path) = path
        && path.exists()
        && let Err(e) = history.load_from_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to load history");
    }

    history
}

fn save_history(history: &HistoryManager, path: Option<&Path>) {
    if let Some(path) = path
        && let Err(e) = history.save_to_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to save history");
    }
}
