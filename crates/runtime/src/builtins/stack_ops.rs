//! Stack shuffling and introspection built-ins: the
//! `dup`/`drop`/`swap`/`over`/`rot`/`len`/`@` quartet-and-friends.

use pfix_core::{Dictionary, PfixError, Result, Value};

use super::define;

fn dup(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let top = ctx.stack().back()?.clone();
    ctx.stack().push(top);
    Ok(())
}

fn drop_top(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    ctx.stack().pop()?;
    Ok(())
}

fn swap(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop()?;
    let a = ctx.stack().pop()?;
    ctx.stack().push(b);
    ctx.stack().push(a);
    Ok(())
}

fn over(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let b = ctx.stack().pop()?;
    let a = ctx.stack().pop()?;
    ctx.stack().push(a.clone());
    ctx.stack().push(b);
    ctx.stack().push(a);
    Ok(())
}

fn rot(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let c = ctx.stack().pop()?;
    let b = ctx.stack().pop()?;
    let a = ctx.stack().pop()?;
    ctx.stack().push(b);
    ctx.stack().push(c);
    ctx.stack().push(a);
    Ok(())
}

fn clear(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    ctx.stack().clear();
    Ok(())
}

fn print(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let top = ctx.stack().pop()?;
    print!("{top}");
    Ok(())
}

fn println_(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let top = ctx.stack().pop()?;
    println!("{top}");
    Ok(())
}

fn print_stack(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    for v in ctx.stack().as_slice() {
        print!("{v} ");
    }
    println!();
    Ok(())
}

fn print_dict(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    println!("{}", ctx.dict().borrow());
    Ok(())
}

fn len(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let top = ctx.stack().pop()?;
    let n = match &top {
        Value::Arr(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(PfixError::TypeMismatch {
                expected: ":Arr or :Str".into(),
                found: other.type_name(),
            })
        }
    };
    ctx.stack().push(Value::Int(n as i64));
    Ok(())
}

fn index(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let i = ctx.stack().pop_int()?;
    let arr = ctx.stack().pop_arr()?;
    let idx = usize::try_from(i).map_err(|_| PfixError::TypeMismatch {
        expected: "non-negative :Int".into(),
        found: format!("{i}"),
    })?;
    let item = arr.get(idx).cloned().ok_or_else(|| {
        PfixError::NotDefined(format!("index {idx} out of range for array of length {}", arr.len()))
    })?;
    ctx.stack().push(item);
    Ok(())
}

pub fn install(dict: &mut Dictionary) {
    define(dict, "dup", dup);
    define(dict, "drop", drop_top);
    define(dict, "swap", swap);
    define(dict, "over", over);
    define(dict, "rot", rot);
    define(dict, "clear", clear);
    define(dict, "print", print);
    define(dict, "println", println_);
    define(dict, "stack", print_stack);
    define(dict, "dict", print_dict);
    define(dict, "len", len);
    define(dict, "@", index);
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
    fn dup_duplicates_top() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(5)).unwrap();
        interp.push(Value::Sym("dup".into())).unwrap();
        assert_eq!(interp.stack().size(), 2);
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(5));
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(5));
    }

    #[test]
    fn swap_exchanges_top_two() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Int(2)).unwrap();
        interp.push(Value::Sym("swap".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(1));
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(2));
    }

    #[test]
    fn rot_moves_third_to_top() {
        let mut interp = interp_with_builtins();
        interp.push(Value::Int(1)).unwrap();
        interp.push(Value::Int(2)).unwrap();
        interp.push(Value::Int(3)).unwrap();
        interp.push(Value::Sym("rot".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(1));
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(3));
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(2));
    }

    #[test]
    fn len_on_array() {
        let mut interp = interp_with_builtins();
        interp
            .push(Value::Arr(vec![Value::Int(1), Value::Int(2)]))
            .unwrap();
        interp.push(Value::Sym("len".into())).unwrap();
        assert_eq!(interp.stack_mut().pop().unwrap(), Value::Int(2));
    }
}
