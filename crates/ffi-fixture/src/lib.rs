//! A minimal Pfix FFI extension used only by `pfix-runtime`'s integration
//! tests to exercise `load-library` end to end.
//!
//! Registers one native word, `fib`, computed iteratively so the extension
//! has no dependency on the interpreter's own recursive-`fun` machinery.

use pfix_core::{Context, Dictionary, Native, Result, Value};
use std::rc::Rc;

/// Matches the recursive `fib` defined in the runtime's own end-to-end
/// tests (base case returns 1 for `n < 2`), so `5 fib` yields `8`.
fn fib(ctx: &mut dyn Context) -> Result<()> {
    let n = ctx.stack().pop_int()?;
    let mut a = 1i64;
    let mut b = 1i64;
    for _ in 0..n {
        let next = a + b;
        a = b;
        b = next;
    }
    ctx.stack().push_int(a);
    Ok(())
}

/// The entry point `load-library` looks for: `PfixInit<Stem>` where `Stem`
/// is the library file's capitalized stem (here, `example`).
///
/// # Safety
/// `dict` must point to a live `Dictionary` for the duration of the call,
/// as guaranteed by `load-library`'s contract.
#[no_mangle]
pub unsafe extern "C" fn PfixInitExample(dict: *mut Dictionary) {
    let dict = &mut *dict;
    dict.define_native(
        "fib",
        Value::Native(Native {
            name: "fib".to_string(),
            func: Rc::new(fib) as pfix_core::NativeFn,
        }),
    );
}
