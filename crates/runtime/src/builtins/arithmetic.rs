//! Numeric built-ins: `+ - * /`, integer-only `i/`/`mod`, `int->flt`.
//!
//! Stack effect: `( a b -- c )` unless noted.

use pfix_core::{Dictionary, PfixError, Result, Value};

use super::define;

/// Pop the top two values, promoting to `Flt` if either operand is `Flt`.
/// Returns `(left, right)` already widened to a common numeric representation.
enum Operands {
    Int(i64, i64),
    Flt(f64, f64),
}

fn pop_numeric_pair(ctx: &mut dyn pfix_core::Context) -> Result<Operands> {
    let right = ctx.stack().pop()?;
    let left = ctx.stack().pop()?;
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(Operands::Int(a, b)),
        (Value::Flt(a), Value::Flt(b)) => Ok(Operands::Flt(a, b)),
        (Value::Int(a), Value::Flt(b)) => Ok(Operands::Flt(a as f64, b)),
        (Value::Flt(a), Value::Int(b)) => Ok(Operands::Flt(a, b as f64)),
        (other_left, other_right) => Err(PfixError::TypeMismatch {
            expected: ":Int or :Flt".into(),
            found: format!("{} / {}", other_left.type_name(), other_right.type_name()),
        }),
    }
}

fn add(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let right = ctx.stack().pop()?;
    let left = ctx.stack().pop()?;
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => ctx.stack().push(Value::Str(a + &b)),
        (Value::Int(a), Value::Int(b)) => ctx.stack().push(Value::Int(a + b)),
        (Value::Flt(a), Value::Flt(b)) => ctx.stack().push(Value::Flt(a + b)),
        (Value::Int(a), Value::Flt(b)) => ctx.stack().push(Value::Flt(a as f64 + b)),
        (Value::Flt(a), Value::Int(b)) => ctx.stack().push(Value::Flt(a + b as f64)),
        (left, right) => {
            return Err(PfixError::TypeMismatch {
                expected: ":Int, :Flt or :Str".into(),
                found: format!("{} / {}", left.type_name(), right.type_name()),
            })
        }
    }
    Ok(())
}

fn sub(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    match pop_numeric_pair(ctx)? {
        Operands::Int(a, b) => ctx.stack().push(Value::Int(a - b)),
        Operands::Flt(a, b) => ctx.stack().push(Value::Flt(a - b)),
    }
    Ok(())
}

fn mul(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    match pop_numeric_pair(ctx)? {
        Operands::Int(a, b) => ctx.stack().push(Value::Int(a * b)),
        Operands::Flt(a, b) => ctx.stack().push(Value::Flt(a * b)),
    }
    Ok(())
}

fn div(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    match pop_numeric_pair(ctx)? {
        Operands::Int(a, b) => ctx.stack().push(Value::Flt(a as f64 / b as f64)),
        Operands::Flt(a, b) => ctx.stack().push(Value::Flt(a / b)),
    }
    Ok(())
}

fn pop_int_pair(ctx: &mut dyn pfix_core::Context, op: &str) -> Result<(i64, i64)> {
    let right = ctx.stack().pop()?;
    let left = ctx.stack().pop()?;
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok((a, b)),
        (other_left, other_right) => Err(PfixError::NotDefined(format!(
            "{op} on {} / {}",
            other_left.type_name(),
            other_right.type_name()
        ))),
    }
}

fn int_div(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let (a, b) = pop_int_pair(ctx, "i/")?;
    ctx.stack().push(Value::Int(a / b));
    Ok(())
}

fn int_mod(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let (a, b) = pop_int_pair(ctx, "mod")?;
    ctx.stack().push(Value::Int(a % b));
    Ok(())
}

fn int_to_flt(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let n = ctx.stack().pop_int()?;
    ctx.stack().push(Value::Flt(n as f64));
    Ok(())
}

pub fn install(dict: &mut Dictionary) {
    define(dict, "+", add);
    define(dict, "-", sub);
    define(dict, "*", mul);
    define(dict, "/", div);
    define(dict, "i/", int_div);
    define(dict, "mod", int_mod);
    define(dict, "int->flt", int_to_flt);
}
