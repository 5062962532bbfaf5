//! `load-library`: open a shared object, resolve the conventional
//! `PfixInit<Stem>` symbol and hand it the current dictionary.

use std::cell::RefCell;
use std::path::Path;

use libloading::{Library, Symbol};
use pfix_core::{Dictionary, PfixError, Result};
use tracing::{debug, warn};

use super::define;

/// Signature every `PfixInit<Stem>` entry point must have.
type InitFn = unsafe extern "C" fn(*mut Dictionary);

// Loaded libraries live for the process, never unloaded.
thread_local! {
    static LOADED: RefCell<Vec<Library>> = const { RefCell::new(Vec::new()) };
}

/// Derive `PfixInit<Stem>` from a library path: strip any directory
/// prefix and extension, then the platform `lib` prefix if present, then
/// capitalize the first character (`./libexample.so` pairs with
/// `PfixInitExample`, so the conventional `lib` prefix is not part of
/// the stem).
fn init_symbol_name(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path);
    let stem = stem.strip_prefix("lib").unwrap_or(stem);
    let mut chars = stem.chars();
    let capitalized = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("PfixInit{capitalized}")
}

fn load_library(ctx: &mut dyn pfix_core::Context) -> Result<()> {
    let path = ctx.stack().pop_str()?;

    let library = unsafe { Library::new(&path) }.map_err(|e| {
        warn!(path = %path, error = %e, "failed to load library");
        PfixError::LoadFailed(format!("{path}: {e}"))
    })?;
    debug!(path = %path, "loaded library");

    let symbol_name = init_symbol_name(&path);
    let init: Option<Symbol<InitFn>> =
        unsafe { library.get(symbol_name.as_bytes()) }.ok();

    match init {
        Some(init) => {
            debug!(symbol = %symbol_name, "resolved init symbol");
            let dict_ptr = ctx.dict().as_ptr();
            unsafe { init(dict_ptr) };
        }
        None => warn!(symbol = %symbol_name, path = %path, "library has no init symbol"),
    }

    LOADED.with(|loaded| loaded.borrow_mut().push(library));
    Ok(())
}

pub fn install(dict: &mut Dictionary) {
    define(dict, "load-library", load_library);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_capitalization() {
        assert_eq!(init_symbol_name("./libexample.so"), "PfixInitExample");
        assert_eq!(init_symbol_name("/a/b/foo.dylib"), "PfixInitFoo");
        assert_eq!(init_symbol_name("bare"), "PfixInitBare");
        assert_eq!(init_symbol_name("libby.so"), "PfixInitBy");
    }

    #[test]
    fn missing_library_is_load_failed() {
        let mut interp = crate::Interpreter::new();
        install(&mut interp.dictionary().borrow_mut());
        interp
            .push(pfix_core::Value::Str("./does-not-exist.so".into()))
            .unwrap();
        assert!(matches!(
            interp.push(pfix_core::Value::Sym("load-library".into())),
            Err(PfixError::LoadFailed(_))
        ));
    }
}
