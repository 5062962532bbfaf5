//! `rustyline::Helper` wiring: tab-completion over the dictionary's keys.
//! Continuation-prompt detection for an unfinished `{...}`/`[...]` lives
//! on `Interpreter::is_mid_structure` instead, checked by the REPL loop.

use std::cell::RefCell;
use std::rc::Rc;

use pfix_core::Dictionary;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

pub struct PfixHelper {
    pub dict: Rc<RefCell<Dictionary>>,
}

impl Helper for PfixHelper {}
impl Highlighter for PfixHelper {}
impl Hinter for PfixHelper {
    type Hint = String;
}

impl Completer for PfixHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word_start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = &line[word_start..pos];

        let dict = self.dict.borrow();
        let mut matches: Vec<Pair> = dict
            .keys()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        matches.sort_by(|a, b| a.display.cmp(&b.display));
        Ok((word_start, matches))
    }
}

/// The shell never has its own notion of "complete"; it defers entirely to
/// `Interpreter::is_mid_structure`, checked by the caller between lines.
/// Rustyline's own multi-line support is unused: a line is always reported
/// complete, and the REPL loop decides whether to keep reading.
impl Validator for PfixHelper {
    fn validate(&self, _ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}
