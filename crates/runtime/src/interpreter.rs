//! The push-driven evaluator: one central `push(value)` operation that
//! decides whether an incoming value pushes verbatim, opens/closes a
//! nested structure, stores a binding, or invokes a definition.

use std::cell::RefCell;
use std::rc::Rc;

use pfix_core::{Context, Dictionary, ExeArr, PfixError, Result, Stack, Value};

/// Owns the operand stack, the current dictionary, and the bracket/brace
/// nesting state that drives the push dispatch below.
pub struct Interpreter {
    stack: Stack,
    dict: Rc<RefCell<Dictionary>>,
    evaluate_on_push: bool,
    exe_depth: usize,
    exe_begin: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            stack: Stack::new(),
            dict: Rc::new(RefCell::new(Dictionary::new())),
            evaluate_on_push: true,
            exe_depth: 0,
            exe_begin: 0,
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    pub fn dictionary(&self) -> Rc<RefCell<Dictionary>> {
        self.dict.clone()
    }

    /// True while an unfinished `{ ... }` or `[ ... ]` means the REPL shell
    /// should switch to a continuation prompt.
    pub fn is_mid_structure(&self) -> bool {
        self.exe_depth > 0 || find_marker(&self.stack, "[").is_some()
    }

    /// The central push dispatch.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let Value::Sym(s) = &value else {
            self.stack.push(value);
            return Ok(());
        };
        let s = s.clone();

        // Rule 1: type literals, `->`, and `[` always push verbatim.
        if Value::is_type_literal_text(&s) || s == "->" || s == "[" {
            self.stack.push(value);
            return Ok(());
        }

        match s.as_str() {
            "(" => {
                self.stack.push(value);
                self.evaluate_on_push = false;
                Ok(())
            }
            ")" => {
                self.evaluate_on_push = true;
                self.close_param_list()
            }
            "{" => {
                self.stack.push(value);
                self.evaluate_on_push = false;
                if self.exe_depth == 0 {
                    self.exe_begin = self.stack.size();
                }
                self.exe_depth += 1;
                Ok(())
            }
            "}" => {
                if self.exe_depth == 0 {
                    return Err(PfixError::UnbalancedBrace);
                }
                self.exe_depth -= 1;
                if self.exe_depth == 0 {
                    self.evaluate_on_push = true;
                    let body = self.stack.split_off(self.exe_begin);
                    self.stack.pop()?; // drop the "{" marker beneath
                    self.stack.push(Value::ExeArr(ExeArr::new(body)));
                } else {
                    self.stack.push(value);
                }
                Ok(())
            }
            _ if self.evaluate_on_push => self.evaluate_symbol(&s),
            _ => {
                self.stack.push(value);
                Ok(())
            }
        }
    }

    /// Symbol evaluation: built-ins, user definitions, and binding.
    fn evaluate_symbol(&mut self, s: &str) -> Result<()> {
        if let Some(name) = s.strip_suffix('!') {
            let value = self.stack.pop()?;
            self.dict.borrow_mut().set(name, value);
            return Ok(());
        }

        let bound = self
            .dict
            .borrow()
            .get(s)
            .ok_or_else(|| PfixError::Undefined(s.to_string()))?;

        match bound {
            Value::Native(native) => (native.func)(self),
            Value::ExeArr(exe) => self.execute(&exe),
            other => {
                self.stack.push(other);
                Ok(())
            }
        }
    }

    /// Execute an `ExeArr`: install a fresh copy of its captured dictionary,
    /// feed each body element through `push` in order, then restore the
    /// caller's dictionary on every exit path, success or failure. Each call
    /// gets its own copy (rather than sharing `exe`'s dictionary cell
    /// directly) so that parameter bindings from one in-flight recursive
    /// call don't clobber another's.
    pub fn execute(&mut self, exe: &ExeArr) -> Result<()> {
        let call_dict = Rc::new(RefCell::new(exe.dict.borrow().snapshot()));
        let saved = std::mem::replace(&mut self.dict, call_dict);
        let result = (|| {
            for item in exe.body.clone() {
                self.push(item)?;
            }
            Ok(())
        })();
        self.dict = saved;
        result
    }

    /// `)`'s parameter-list close.
    fn close_param_list(&mut self) -> Result<()> {
        let idx = find_marker(&self.stack, "(").ok_or_else(|| {
            PfixError::BadParamList("no matching ( for parameter list".into())
        })?;
        let buffer = self.stack.split_off(idx + 1);
        self.stack.pop()?; // drop the "(" marker

        let params = crate::builtins::control::parse_param_list(buffer)?;
        self.stack.push(Value::Params(params));
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the closest-to-top occurrence of `Sym(text)` on the stack.
pub(crate) fn find_marker(stack: &Stack, text: &str) -> Option<usize> {
    stack
        .as_slice()
        .iter()
        .rposition(|v| matches!(v, Value::Sym(s) if s == text))
}

impl Context for Interpreter {
    fn stack(&mut self) -> &mut Stack {
        &mut self.stack
    }

    fn dict(&self) -> Rc<RefCell<Dictionary>> {
        self.dict.clone()
    }

    fn set_dict(&mut self, dict: Rc<RefCell<Dictionary>>) {
        self.dict = dict;
    }

    fn push(&mut self, value: Value) -> Result<()> {
        Interpreter::push(self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(interp: &mut Interpreter, src: &str) -> Result<()> {
        for token in pfix_core::Lexer::new(src) {
            let token = token?;
            let value = crate::token_to_value(token);
            if let Some(value) = value {
                interp.push(value)?;
            }
        }
        Ok(())
    }

    #[test]
    fn literals_push_verbatim() {
        let mut interp = Interpreter::new();
        run(&mut interp, "1 2.5 true \"hi\"").unwrap();
        assert_eq!(interp.stack().size(), 4);
    }

    #[test]
    fn unbalanced_brace_errors() {
        let mut interp = Interpreter::new();
        assert_eq!(run(&mut interp, "}"), Err(PfixError::UnbalancedBrace));
    }

    #[test]
    fn exe_arr_closes_into_a_value() {
        let mut interp = Interpreter::new();
        run(&mut interp, "{ 1 2 }").unwrap();
        assert_eq!(interp.stack().size(), 1);
        assert!(matches!(
            interp.stack().as_slice()[0],
            Value::ExeArr(ref e) if e.body.len() == 2
        ));
    }

    #[test]
    fn bang_shorthand_binds_and_reads_back() {
        let mut interp = Interpreter::new();
        run(&mut interp, "5 x!").unwrap();
        run(&mut interp, "x").unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(5));
    }

    #[test]
    fn undefined_symbol_errors() {
        let mut interp = Interpreter::new();
        assert_eq!(
            run(&mut interp, "bogus"),
            Err(PfixError::Undefined("bogus".into()))
        );
    }
}
