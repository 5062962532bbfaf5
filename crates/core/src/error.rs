//! The error taxonomy shared by every layer of Pfix.
//!
//! Every built-in and interpreter operation returns `Result<_, PfixError>`;
//! nothing in non-test code panics on a malformed program.

use thiserror::Error;

/// All the ways a Pfix program (or an attempt to extend the interpreter) can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PfixError {
    /// A pop (or an operand-arity check) found the stack empty.
    #[error("stack underflow")]
    StackUnderflow,

    /// `expect(tag)` found a value of the wrong type, or a built-in got an
    /// operand it cannot work with.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Human-readable description of what was wanted.
        expected: String,
        /// Human-readable description of what was on the stack.
        found: String,
    },

    /// A symbol had no binding in the current dictionary.
    #[error("undefined symbol: {0}")]
    Undefined(String),

    /// `]` ran off the bottom of the stack without finding a `[` marker.
    #[error("unbalanced bracket")]
    UnbalancedBracket,

    /// `}` closed more braces than were opened.
    #[error("unbalanced brace")]
    UnbalancedBrace,

    /// The contents of a `( ... )` parameter list could not be parsed.
    #[error("bad parameter list: {0}")]
    BadParamList(String),

    /// The operation exists but is not defined for the given type combination.
    #[error("not defined for these operand types: {0}")]
    NotDefined(String),

    /// `load-library` could not open the shared object, or it lacked the
    /// required init symbol.
    #[error("failed to load library {0}")]
    LoadFailed(String),

    /// The lexer found an unterminated string literal.
    #[error("lex error: {0}")]
    LexError(String),
}

/// Convenience alias used throughout the Pfix crates.
pub type Result<T> = std::result::Result<T, PfixError>;
