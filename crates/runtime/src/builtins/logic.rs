//! Logic and comparison built-ins: `and or not`, the relational operators
//! used by the recursive `fib` scenario, and `type`.

use pfix_core::{Dictionary, PfixError, Result, Value};

use super::define;

fn and(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop_bool()?;
    let a = ctx.stack().pop_bool()?;
    ctx.stack().push_bool(a && b);
    Ok(())
}

fn or(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop_bool()?;
    let a = ctx.stack().pop_bool()?;
    ctx.stack().push_bool(a || b);
    Ok(())
}

fn not(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let a = ctx.stack().pop_bool()?;
    ctx.stack().push_bool(!a);
    Ok(())
}

/// Numeric ordering, widening Int/Flt the same way arithmetic does.
fn compare(ctx: &mut dyn pfix_core::Context) -> Result<std::cmp::Ordering> {
    let right = ctx.stack().pop()?;
    let left = ctx.stack().pop()?;
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(&b)),
        (Value::Flt(a), Value::Flt(b)) => {
            a.partial_cmp(&b).ok_or(PfixError::NotDefined("NaN comparison".into()))
        }
        (Value::Int(a), Value::Flt(b)) => (a as f64)
            .partial_cmp(&b)
            .ok_or(PfixError::NotDefined("NaN comparison".into())),
        (Value::Flt(a), Value::Int(b)) => a
            .partial_cmp(&(b as f64))
            .ok_or(PfixError::NotDefined("NaN comparison".into())),
        (other_left, other_right) => Err(PfixError::TypeMismatch {
            expected: ":Int or :Flt".into(),
            found: format!("{} / {}", other_left.type_name(), other_right.type_name()),
        }),
    }
}

fn lt(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let ord = compare(ctx)?;
    ctx.stack().push_bool(ord.is_lt());
    Ok(())
}

fn gt(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let ord = compare(ctx)?;
    ctx.stack().push_bool(ord.is_gt());
    Ok(())
}

fn le(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let ord = compare(ctx)?;
    ctx.stack().push_bool(ord.is_le());
    Ok(())
}

fn ge(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let ord = compare(ctx)?;
    ctx.stack().push_bool(ord.is_ge());
    Ok(())
}

fn eq(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop()?;
    let a = ctx.stack().pop()?;
    ctx.stack().push_bool(a == b);
    Ok(())
}

fn ne(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop()?;
    let a = ctx.stack().pop()?;
    ctx.stack().push_bool(a != b);
    Ok(())
}

fn type_of(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let top = ctx.stack().pop()?;
    ctx.stack().push(Value::Sym(top.type_literal().to_string()));
    Ok(())
}

pub fn install(dict: &mut Dictionary) {
    define(dict, "and", and);
    define(dict, "or", or);
    define(dict, "not", not);
    define(dict, "<", lt);
    define(dict, ">", gt);
    define(dict, "<=", le);
    define(dict, ">=", ge);
    define(dict, "==", eq);
    define(dict, "!=", ne);
    define(dict, "type", type_of);
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
    fn less_than_across_numeric_kinds() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Flt(2.0)).unwrap();
        interp.push(Value::Sym("<".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Bool(true));
    }

    #[test]
    fn type_returns_literal_symbol() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Sym("type".into())).unwrap();
        assert_eq!(
            interp.stack_mut().pop().unwrap(),
            Value::Sym(":Int".into())
        );
    }

    #[test]
    fn and_requires_bools() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Bool(true)).unwrap();
        assert!(matches!(
            interp.push(Value::Sym("and".into())),
            Err(PfixError::TypeMismatch { .. })
        ));
    }
}
