//! The current mapping from identifiers to values.
//!
//! A dictionary entry is a shared, mutable cell: a recursive user function
//! refers to its own entry from inside its own captured dictionary, so
//! entries must be shareable rather than owned outright.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// A dictionary entry: shared so the same binding can be reached from
/// several names, and in particular from inside its own captured dictionary.
pub type Entry = Rc<RefCell<Value>>;

/// Strip one leading `:` and/or one trailing `:` from a symbol used as a
/// dictionary key.
pub fn sanitize(name: &str) -> &str {
    let name = name.strip_prefix(':').unwrap_or(name);
    name.strip_suffix(':').unwrap_or(name)
}

/// Mapping from identifier to shared value.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, Entry>,
}

impl Dictionary {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dictionary that shares all of `self`'s current bindings, used to
    /// snapshot the enclosing scope into a newly created `lam`/`fun` body.
    /// Entries are shared references, not copies: later mutations through
    /// `!` on names defined *before* the snapshot are visible to both, which
    /// matches the single sanctioned self-reference cycle; names defined
    /// *after* the snapshot in one dictionary are invisible to the other.
    pub fn snapshot(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }

    /// Look up a binding by its (already sanitized) name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).map(|cell| cell.borrow().clone())
    }

    /// Bind `name` (sanitized) to `value`, overwriting any existing entry.
    pub fn set(&mut self, name: &str, value: Value) {
        let name = sanitize(name).to_string();
        self.entries.insert(name, Rc::new(RefCell::new(value)));
    }

    /// Insert an already-shared entry under `name` (sanitized), used to make
    /// a function's captured dictionary bind its own name back to the same
    /// shared `ExeArr`.
    pub fn set_entry(&mut self, name: &str, entry: Entry) {
        self.entries.insert(sanitize(name).to_string(), entry);
    }

    /// Fetch the shared entry cell for `name`, if bound.
    pub fn entry(&self, name: &str) -> Option<Entry> {
        self.entries.get(sanitize(name)).cloned()
    }

    /// Register a native primitive under `name` (used by built-ins
    /// registration and by FFI extensions via `define_native`).
    pub fn define_native(&mut self, name: &str, value: Value) {
        self.set(name, value);
    }

    /// Iterate over `(name, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.borrow().clone()))
    }

    /// All bound names, used by the REPL shell to drive tab-completion.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

impl Clone for Dictionary {
    fn clone(&self) -> Self {
        self.snapshot()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (name, value) in self.entries.iter() {
            write!(f, "{}:{} ", name, value.borrow())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_leading_and_trailing_colon() {
        assert_eq!(sanitize(":foo"), "foo");
        assert_eq!(sanitize("foo:"), "foo");
        assert_eq!(sanitize(":foo:"), "foo");
        assert_eq!(sanitize("foo"), "foo");
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut dict = Dictionary::new();
        dict.set("x", Value::Int(42));
        assert_eq!(dict.get("x"), Some(Value::Int(42)));
    }

    #[test]
    fn self_reference_through_shared_entry() {
        let mut outer = Dictionary::new();
        outer.set("answer", Value::Int(1));
        let entry = outer.entry("answer").unwrap();

        let mut inner = Dictionary::new();
        inner.set_entry("answer", entry.clone());

        *entry.borrow_mut() = Value::Int(2);
        assert_eq!(inner.get("answer"), Some(Value::Int(2)));
    }
}
