//! Registration table for every built-in primitive.

pub mod arithmetic;
pub mod control;
pub mod ffi;
pub mod logic;
pub mod stack_ops;

use std::rc::Rc;

use pfix_core::{Context, Dictionary, Native, Result, Value};

/// Bind `name` in `dict` to a native primitive wrapping `func`.
pub(crate) fn define(
    dict: &mut Dictionary,
    name: &str,
    func: impl Fn(&mut dyn Context) -> Result<()> + 'static,
) {
    dict.define_native(
        name,
        Value::Native(Native {
            name: name.to_string(),
            func: Rc::new(func),
        }),
    );
}

/// Populate a fresh dictionary with every built-in primitive.
pub fn install(dict: &mut Dictionary) {
    arithmetic::install(dict);
    logic::install(dict);
    stack_ops::install(dict);
    control::install(dict);
    ffi::install(dict);
}
