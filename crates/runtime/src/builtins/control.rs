//! `!`, `lam`, `fun`, `if`, and the bracket closers `]`/`)`.

use std::cell::RefCell;
use std::rc::Rc;

use pfix_core::{dictionary::sanitize, Dictionary, ExeArr, Param, Params, PfixError, Result, Value};

use super::define;

/// Explicit `!`: `( sym val -- )`, as opposed to the `name!` suffix
/// shorthand the interpreter's push dispatch handles inline.
fn bang(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let val = ctx.stack().pop()?;
    let sym = ctx.stack().pop_sym()?;
    ctx.dict().borrow_mut().set(&sym, val);
    Ok(())
}

/// `]`: close a `[ ... ]` data array.
fn close_array(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let idx = ctx
        .stack()
        .as_slice()
        .iter()
        .rposition(|v| matches!(v, Value::Sym(s) if s == "["))
        .ok_or(PfixError::UnbalancedBracket)?;
    let items = ctx.stack().split_off(idx + 1);
    ctx.stack().pop()?; // drop the "[" marker
    ctx.stack().push(Value::Arr(items));
    Ok(())
}

/// `lam`: `( exeArr -- exeArr' )`, attaching a copy of the current
/// dictionary without binding any name back to it.
fn lam(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let mut exe = ctx.stack().pop_exe_arr()?;
    exe.dict = Rc::new(RefCell::new(ctx.dict().borrow().snapshot()));
    ctx.stack().push(Value::ExeArr(exe));
    Ok(())
}

/// `fun`: `( sym exeArr -- )` or `( params sym exeArr -- )`. The name and
/// the optional parameter list may appear in either order below the
/// `ExeArr`; both `( params ) :name { ... } fun` and
/// `:name ( params ) { ... } fun` are accepted.
fn fun(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let mut exe = ctx.stack().pop_exe_arr()?;
    let second = ctx.stack().pop()?;

    let (name, params) = match second {
        Value::Params(p) => {
            let name = ctx.stack().pop_sym()?;
            (name, Some(p))
        }
        Value::Sym(name) => {
            let params = match ctx.stack().back() {
                Ok(Value::Params(_)) => Some(ctx.stack().pop()?),
                _ => None,
            };
            let params = params.map(|v| match v {
                Value::Params(p) => p,
                _ => unreachable!(),
            });
            (name, params)
        }
        other => {
            return Err(PfixError::TypeMismatch {
                expected: ":Sym or :Params".into(),
                found: other.type_name(),
            })
        }
    };

    exe.dict = Rc::new(RefCell::new(ctx.dict().borrow().snapshot()));

    if let Some(params) = params {
        let mut prelude: Vec<Value> = params
            .params
            .iter()
            .map(|p| Value::Sym(format!("{}!", p.name)))
            .collect();
        prelude.append(&mut exe.body);
        exe.body = prelude;
    }

    let name = sanitize(&name).to_string();
    let dict = ctx.dict();
    dict.borrow_mut().set(&name, Value::ExeArr(exe.clone()));
    let entry = dict
        .borrow()
        .entry(&name)
        .expect("just inserted this name");
    exe.dict.borrow_mut().set_entry(&name, entry);
    Ok(())
}

/// Feed an `ExeArr`'s body through the push dispatch in the *current*
/// dictionary, without installing the array's own captured one. A bare
/// `{ ... }` branch handed straight to `if` was never looked up by name,
/// so it carries an empty captured dictionary of its own; running it
/// should see whatever scope `if` itself runs in, the same as if its
/// tokens had been written inline.
fn run_exe_arr(ctx: &mut dyn pfix_core::Context, exe: ExeArr) -> Result<()> {
    for item in exe.body {
        ctx.push(item)?;
    }
    Ok(())
}

/// `if`: `( cond ifArr -- )` or `( cond trueArr falseArr -- )`. The chosen
/// branch is executed directly rather than pushed back through `push`.
///
/// With two branches, they are written in source order condition-true-
/// false (`cond { ... } { ... } if`, as the recursive `fib` definition
/// does), so the *last*-pushed array, the one immediately before `if`,
/// is the false branch, and the one beneath it is the true branch.
fn if_(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let last = ctx.stack().pop_exe_arr()?;
    let earlier = match ctx.stack().back() {
        Ok(Value::ExeArr(_)) => Some(ctx.stack().pop_exe_arr()?),
        _ => None,
    };
    let cond = ctx.stack().pop_bool()?;

    match earlier {
        Some(true_arr) => {
            if cond {
                run_exe_arr(ctx, true_arr)
            } else {
                run_exe_arr(ctx, last)
            }
        }
        None if cond => run_exe_arr(ctx, last),
        None => Ok(()),
    }
}

/// Parse the buffer collected between `(` and `)` into a `Params`.
pub fn parse_param_list(buffer: Vec<Value>) -> Result<Params> {
    let mut params = Vec::new();
    let mut returns = Vec::new();
    let mut pending_name: Option<String> = None;
    let mut in_returns = false;

    for value in buffer {
        let Value::Sym(text) = value else {
            return Err(PfixError::BadParamList(
                "parameter list may only contain symbols".into(),
            ));
        };

        if text == "->" {
            if let Some(name) = pending_name.take() {
                params.push(Param {
                    name,
                    ty: ":Obj".to_string(),
                });
            }
            in_returns = true;
            continue;
        }

        let is_type = Value::is_type_literal_text(&text);

        if in_returns {
            if !is_type {
                return Err(PfixError::BadParamList(format!(
                    "expected a type-literal in return list, found `{text}`"
                )));
            }
            returns.push(text);
            continue;
        }

        if is_type {
            match pending_name.take() {
                Some(name) => params.push(Param { name, ty: text }),
                None => {
                    return Err(PfixError::BadParamList(format!(
                        "type-literal `{text}` with no preceding parameter name"
                    )))
                }
            }
        } else {
            if let Some(name) = pending_name.take() {
                params.push(Param {
                    name,
                    ty: ":Obj".to_string(),
                });
            }
            pending_name = Some(text);
        }
    }

    if let Some(name) = pending_name.take() {
        params.push(Param {
            name,
            ty: ":Obj".to_string(),
        });
    }

    Ok(Params { params, returns })
}

pub fn install(dict: &mut Dictionary) {
    define(dict, "!", bang);
    define(dict, "]", close_array);
    define(dict, "lam", lam);
    define(dict, "fun", fun);
    define(dict, "if", if_);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interpreter;

    fn interp_with_builtins() -> Interpreter {
        let interp = Interpreter::new();
        install(&mut interp.dictionary().borrow_mut());
        interp
    }

    #[test]
    fn array_literal_preserves_order() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Sym("[".into())).unwrap();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Int(2)).unwrap();
        interp.push(Value::Int(3)).unwrap();
        interp.push(Value::Sym("]".into())).unwrap();
        assert_eq!(
            interp.stack_mut().pop().unwrap(),
            Value::Arr(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn unbalanced_bracket_without_opener() {
        let mut interp = interp_with_builtins();
        assert_eq!(
            interp.push(Value::Sym("]".into())),
            Err(PfixError::UnbalancedBracket)
        );
    }

    #[test]
    fn param_list_defaults_missing_type_to_obj() {
        let buffer = vec![Value::Sym("n".into()), Value::Sym(":Int".into())];
        let params = parse_param_list(buffer).unwrap();
        assert_eq!(params.params[0].name, "n");
        assert_eq!(params.params[0].ty, ":Int");
    }

    #[test]
    fn param_list_rejects_orphan_type() {
        let buffer = vec![Value::Sym(":Int".into())];
        assert!(matches!(
            parse_param_list(buffer),
            Err(PfixError::BadParamList(_))
        ));
    }

    #[test]
    fn if_true_executes_if_branch() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Bool(true)).unwrap();
        interp.push(Value::Sym("{".into())).unwrap();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Sym("}".into())).unwrap();
        interp.push(Value::Sym("if".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(1));
    }

    #[test]
    fn if_false_runs_the_branch_written_last() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Bool(false)).unwrap();
        interp.push(Value::Sym("{".into())).unwrap();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Sym("}".into())).unwrap();
        interp.push(Value::Sym("{".into())).unwrap();
        interp.push(Value::Int(2)).unwrap();
        interp.push(Value::Sym("}".into())).unwrap();
        interp.push(Value::Sym("if".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(2));
    }
}
