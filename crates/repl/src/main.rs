//! Interactive shell for Pfix. Reads lines, feeds them through the push
//! pipeline one token at a time, and prints the resulting top of stack,
//! switching to a continuation prompt while a `{...}`/`[...]` is left open.

mod helper;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pfix_core::Value;
use pfix_runtime::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use tracing::{debug, warn};

use helper::PfixHelper;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "pfix", version = VERSION, about = "Interactive shell for the Pfix language")]
struct Args {
    /// Suppress the startup banner.
    #[arg(short, long)]
    quiet: bool,

    /// Feed FILE through the interpreter non-interactively, then exit
    /// without dropping into the interactive prompt.
    #[arg(long)]
    no_repl: bool,

    /// A Pfix source file to run before (or instead of) the interactive
    /// prompt.
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut interp = pfix_runtime::new_interpreter();

    if let Some(path) = &args.file {
        debug!(path = %path.display(), "running source file");
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read source file");
                eprintln!("error: could not read {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        };
        for line in source.lines() {
            if let Err(e) = pfix_runtime::eval_line(&mut interp, line) {
                eprintln!("error: {e}");
            }
        }
        if args.no_repl {
            return ExitCode::SUCCESS;
        }
    }

    run_repl(interp, args.quiet)
}

fn run_repl(mut interp: Interpreter, quiet: bool) -> ExitCode {
    if !quiet {
        println!("PostFix - {VERSION}");
        println!("Type 'exit' or Ctrl-D to exit");
    }

    let config = Config::builder().history_ignore_space(true).build();
    let mut rl: Editor<PfixHelper, rustyline::history::DefaultHistory> =
        match Editor::with_config(config) {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("error: could not start line editor: {e}");
                return ExitCode::FAILURE;
            }
        };
    rl.set_helper(Some(PfixHelper {
        dict: interp.dictionary(),
    }));

    let history_path = history_path();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = if interp.is_mid_structure() { "... " } else { ">>> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match eval_line_until_exit(&mut interp, &line) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => {
                        eprintln!("error: {e}");
                        continue;
                    }
                }
                if !interp.is_mid_structure() {
                    if let Some(top) = interp.stack().as_slice().last() {
                        println!("{top}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = rl.append_history(path);
    }

    ExitCode::SUCCESS
}

/// Feed `line` through the push pipeline one token at a time, stopping the
/// instant the sanitized sentinel symbol `exit` is seen, before it ever
/// reaches the dictionary. Returns whether the session should end.
fn eval_line_until_exit(interp: &mut Interpreter, line: &str) -> pfix_core::Result<bool> {
    for token in pfix_core::Lexer::new(line) {
        let token = token?;
        let Some(value) = pfix_runtime::token_to_value(token) else {
            continue;
        };
        if let Value::Sym(s) = &value {
            if pfix_core::dictionary::sanitize(s) == "exit" {
                return Ok(true);
            }
        }
        interp.push(value)?;
    }
    Ok(false)
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pfix_history"))
}
